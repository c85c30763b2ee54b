// Copyright 2026 riopulse Contributors
// SPDX-License-Identifier: Apache-2.0

//! Sequencer session traits and the scoped session handle.

use std::ops::{Deref, DerefMut};
use std::path::Path;

use tracing::warn;

use crate::error::TransportError;

/// Register/FIFO access to a sequencer target.
///
/// Implementations wrap whatever vendor interface reaches the device; the
/// crate only relies on the operations below.
pub trait SequencerSession {
    /// Load the sequencer bitfile onto the target.
    fn download(&mut self) -> Result<(), TransportError>;

    /// Start the loaded bitfile.
    fn run(&mut self) -> Result<(), TransportError>;

    /// Write the number of instructions about to be streamed.
    fn write_instruction_count(&mut self, count: u32) -> Result<(), TransportError>;

    /// Push a batch of instruction words into the command FIFO.
    fn write_words(&mut self, words: &[u32]) -> Result<(), TransportError>;

    /// Instructions the device is still expecting. Zero after a complete
    /// upload.
    fn pending_instructions(&mut self) -> Result<u32, TransportError>;

    /// Persistent trigger: when set the program restarts on every loop.
    fn set_persistent_trigger(&mut self, enabled: bool) -> Result<(), TransportError>;

    /// Drive the software trigger line.
    fn set_software_trigger(&mut self, level: bool) -> Result<(), TransportError>;

    /// Release the session.
    fn close(&mut self) -> Result<(), TransportError>;
}

/// Opens sessions on a sequencer target.
pub trait Connector {
    type Session: SequencerSession;

    /// Open a session on `resource`, using `bitfile` when given.
    fn open(
        &self,
        resource: &str,
        bitfile: Option<&Path>,
    ) -> Result<Self::Session, TransportError>;
}

/// Open session that closes itself when dropped.
///
/// Use [`SessionGuard::finish`] to observe close errors; a close failing
/// during drop is only logged.
pub struct SessionGuard<S: SequencerSession> {
    session: S,
    closed: bool,
}

impl<S: SequencerSession> SessionGuard<S> {
    pub fn new(session: S) -> Self {
        Self {
            session,
            closed: false,
        }
    }

    /// Close the session now and report the result.
    pub fn finish(mut self) -> Result<(), TransportError> {
        self.closed = true;
        self.session.close()
    }
}

impl<S: SequencerSession> Deref for SessionGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: SequencerSession> DerefMut for SessionGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: SequencerSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.session.close() {
            warn!(error = %e, "Failed to close sequencer session");
        }
    }
}
