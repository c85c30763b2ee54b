// Copyright 2026 riopulse Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared test utilities for transport tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::TransportError;
use crate::transport::{Connector, SequencerSession};

/// One recorded session operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOp {
    Open { resource: String },
    Download,
    Run,
    InstructionCount(u32),
    Words(Vec<u32>),
    PendingRead,
    PersistentTrigger(bool),
    SoftwareTrigger(bool),
    Close,
}

#[derive(Debug, Default)]
struct Recorder {
    ops: Vec<SessionOp>,
    bitfiles: Vec<Option<PathBuf>>,
    expected: u32,
    received: u32,
}

/// In-memory sequencer that records every operation.
///
/// Clones share the same recording, so a test can hand one clone to a
/// `PulseGenerator` and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    recorder: Arc<Mutex<Recorder>>,
    fail_writes: bool,
    fail_close: bool,
    fail_reads: bool,
    dropped_words: u32,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every count and FIFO write fail.
    pub fn fail_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Make `close` fail (after recording it).
    pub fn fail_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Make the pending counter read fail.
    pub fn fail_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Lose `n` words of every upload.
    pub fn drop_words(mut self, n: u32) -> Self {
        self.dropped_words = n;
        self
    }

    pub fn ops(&self) -> Vec<SessionOp> {
        self.recorder.lock().ops.clone()
    }

    pub fn bitfiles(&self) -> Vec<Option<PathBuf>> {
        self.recorder.lock().bitfiles.clone()
    }

    pub fn count(&self, pred: impl Fn(&SessionOp) -> bool) -> usize {
        self.recorder
            .lock()
            .ops
            .iter()
            .filter(|op| pred(op))
            .count()
    }
}

impl Connector for MemoryConnector {
    type Session = MemorySession;

    fn open(
        &self,
        resource: &str,
        bitfile: Option<&Path>,
    ) -> Result<MemorySession, TransportError> {
        let mut recorder = self.recorder.lock();
        recorder.ops.push(SessionOp::Open {
            resource: resource.to_string(),
        });
        recorder.bitfiles.push(bitfile.map(Path::to_path_buf));
        Ok(MemorySession {
            connector: self.clone(),
            closed: false,
        })
    }
}

/// Session handed out by [`MemoryConnector`].
#[derive(Debug)]
pub struct MemorySession {
    connector: MemoryConnector,
    closed: bool,
}

impl MemorySession {
    fn record(&self, op: SessionOp) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        self.connector.recorder.lock().ops.push(op);
        Ok(())
    }

    fn check_write(&self) -> Result<(), TransportError> {
        if self.closed {
            Err(TransportError::Closed)
        } else if self.connector.fail_writes {
            Err(TransportError::Write("mock write failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl SequencerSession for MemorySession {
    fn download(&mut self) -> Result<(), TransportError> {
        self.record(SessionOp::Download)
    }

    fn run(&mut self) -> Result<(), TransportError> {
        self.record(SessionOp::Run)
    }

    fn write_instruction_count(&mut self, count: u32) -> Result<(), TransportError> {
        self.check_write()?;
        let mut recorder = self.connector.recorder.lock();
        recorder.expected = count;
        recorder.received = 0;
        recorder.ops.push(SessionOp::InstructionCount(count));
        Ok(())
    }

    fn write_words(&mut self, words: &[u32]) -> Result<(), TransportError> {
        self.check_write()?;
        let mut recorder = self.connector.recorder.lock();
        recorder.received += words.len() as u32;
        recorder.ops.push(SessionOp::Words(words.to_vec()));
        Ok(())
    }

    fn pending_instructions(&mut self) -> Result<u32, TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        if self.connector.fail_reads {
            return Err(TransportError::Read("mock read failure".to_string()));
        }
        let mut recorder = self.connector.recorder.lock();
        recorder.ops.push(SessionOp::PendingRead);
        let delivered = recorder.received.saturating_sub(self.connector.dropped_words);
        Ok(recorder.expected.saturating_sub(delivered))
    }

    fn set_persistent_trigger(&mut self, enabled: bool) -> Result<(), TransportError> {
        self.record(SessionOp::PersistentTrigger(enabled))
    }

    fn set_software_trigger(&mut self, level: bool) -> Result<(), TransportError> {
        self.record(SessionOp::SoftwareTrigger(level))
    }

    fn close(&mut self) -> Result<(), TransportError> {
        self.record(SessionOp::Close)?;
        self.closed = true;
        if self.connector.fail_close {
            Err(TransportError::Write("mock close failure".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Connector whose target is never reachable.
pub struct FailingConnector;

impl Connector for FailingConnector {
    type Session = MemorySession;

    fn open(
        &self,
        resource: &str,
        _bitfile: Option<&Path>,
    ) -> Result<MemorySession, TransportError> {
        Err(TransportError::Open(format!(
            "mock resource {} unavailable",
            resource
        )))
    }
}
