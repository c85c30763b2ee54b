// Copyright 2026 riopulse Contributors
// SPDX-License-Identifier: Apache-2.0

//! Sequencer transport.
//!
//! This module provides the [`SequencerSession`] and [`Connector`] traits a
//! device integration implements, and the [`PulseGenerator`] that uses
//! them to upload compiled programs and control the triggers.
//!
//! Wire protocol: the instruction count is written first, then the encoded
//! words in bounded batches, then the pending counter is read back and
//! should be zero.

pub mod generator;
pub mod session;

pub use generator::{PulseGenerator, UploadReport, DEFAULT_BATCH_SIZE};
pub use session::{Connector, SequencerSession, SessionGuard};
