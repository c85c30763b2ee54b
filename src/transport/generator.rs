// Copyright 2026 riopulse Contributors
// SPDX-License-Identifier: Apache-2.0

//! Upload and trigger driver for a sequencer target.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::session::{Connector, SequencerSession, SessionGuard};
use crate::compiler::Program;
use crate::config::TransportConfig;
use crate::error::{TransportError, ValidationError};

/// Default number of words per FIFO write (half of a 1 KiB device buffer).
pub const DEFAULT_BATCH_SIZE: usize = 128;

/// Outcome of a program upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadReport {
    /// Words written
    pub words: usize,
    /// FIFO writes issued
    pub batches: usize,
    /// Pending counter read back after the upload
    pub pending: u32,
}

/// Drives one sequencer target.
///
/// Every operation opens its own session and releases it before returning,
/// including on error.
pub struct PulseGenerator<C: Connector> {
    connector: C,
    resource: String,
    bitfile: Option<PathBuf>,
    batch_size: usize,
}

impl<C: Connector> PulseGenerator<C> {
    pub fn new(connector: C, resource: impl Into<String>) -> Self {
        Self {
            connector,
            resource: resource.into(),
            bitfile: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Build from the `transport` config section.
    pub fn from_config(connector: C, config: &TransportConfig) -> Result<Self, ValidationError> {
        let generator = Self::new(connector, config.resource.clone())
            .with_batch_size(config.batch_size)?;
        Ok(match &config.bitfile {
            Some(path) => generator.with_bitfile(path),
            None => generator,
        })
    }

    pub fn with_bitfile(mut self, bitfile: impl Into<PathBuf>) -> Self {
        self.bitfile = Some(bitfile.into());
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Result<Self, ValidationError> {
        if batch_size == 0 {
            return Err(ValidationError::Field {
                field: "batch_size".into(),
                message: "must be at least 1".into(),
            });
        }
        self.batch_size = batch_size;
        Ok(self)
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn bitfile(&self) -> Option<&Path> {
        self.bitfile.as_deref()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn session(&self) -> Result<SessionGuard<C::Session>, TransportError> {
        let session = self.connector.open(&self.resource, self.bitfile.as_deref())?;
        debug!(resource = %self.resource, "Opened sequencer session");
        Ok(SessionGuard::new(session))
    }

    /// Download the bitfile to the target and start it.
    pub fn initialize(&self) -> Result<(), TransportError> {
        let mut session = self.session()?;
        session.download()?;
        session.run()?;
        info!(resource = %self.resource, "Sequencer bitfile running");
        session.finish()
    }

    /// Upload a compiled program.
    ///
    /// The instruction count goes first, then the words in batches of at
    /// most `batch_size`. A non-zero pending counter afterwards means the
    /// device did not receive everything; it is logged and reported but
    /// not treated as an error.
    pub fn program(&self, program: &Program) -> Result<UploadReport, TransportError> {
        let words = program.encode();
        let count = u32::try_from(words.len()).map_err(|_| {
            TransportError::Write(format!("{} instructions exceed the counter", words.len()))
        })?;

        let mut session = self.session()?;
        session.write_instruction_count(count)?;

        let mut batches = 0;
        for (index, batch) in words.chunks(self.batch_size).enumerate() {
            session.write_words(batch)?;
            debug!(batch = index, words = batch.len(), "Wrote instruction batch");
            batches += 1;
        }

        let pending = session.pending_instructions()?;
        if pending != 0 {
            warn!(pending, expected = 0, "Sequencer still expects instructions");
        }
        info!(
            resource = %self.resource,
            instructions = count,
            batches,
            period_ticks = program.period_ticks(),
            "Uploaded program"
        );
        session.finish()?;

        Ok(UploadReport {
            words: words.len(),
            batches,
            pending,
        })
    }

    /// Restart the program on every loop.
    pub fn run_continuous(&self) -> Result<(), TransportError> {
        let mut session = self.session()?;
        session.set_persistent_trigger(true)?;
        info!(resource = %self.resource, "Continuous generation started");
        session.finish()
    }

    /// Run the program once: persistent trigger off, then a rising edge on
    /// the software trigger.
    pub fn run_single(&self) -> Result<(), TransportError> {
        let mut session = self.session()?;
        session.set_persistent_trigger(false)?;
        session.set_software_trigger(false)?;
        session.set_software_trigger(true)?;
        info!(resource = %self.resource, "Single run triggered");
        session.finish()
    }

    /// Stop after the current loop. The sequencer comes to rest on the
    /// leading trigger-wait with every output at its idle state.
    pub fn stop(&self) -> Result<(), TransportError> {
        let mut session = self.session()?;
        session.set_persistent_trigger(false)?;
        info!(resource = %self.resource, "Generation stopped");
        session.finish()
    }
}
