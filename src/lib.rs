// Copyright 2026 riopulse Contributors
// SPDX-License-Identifier: Apache-2.0

//! riopulse: digital pulse sequences for FPGA sequencers
//!
//! This crate models multi-channel on/off pulse sequences and compiles them
//! into the instruction stream of a clocked state machine that drives up to
//! 24 digital outputs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │     SequenceFile (YAML / JSON)          │
//! ├─────────────────────────────────────────┤
//! │  Sequence ── ChannelTimeline × n        │
//! ├─────────────────────────────────────────┤
//! │  Compiler ──► Program ──► u32 words     │
//! ├─────────────────────────────────────────┤
//! │  PulseGenerator ──► SequencerSession    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use riopulse::compiler::{compile, Instruction};
//! use riopulse::timeline::Sequence;
//!
//! let mut seq = Sequence::new(1)?;
//! seq.add_pulse(0, 1e-6, 2e-6)?;
//!
//! let program = compile(&seq)?;
//! assert_eq!(program.instructions()[0], Instruction::TriggerWait { outputs: 0 });
//! assert_eq!(program.period_ticks(), 300);
//! # Ok::<(), riopulse::error::ValidationError>(())
//! ```
//!
//! # Modules
//!
//! - [`timeline`]: channel timelines, sequences and sequence files
//! - [`compiler`]: instruction set, compiler and wire encoding
//! - [`transport`]: sequencer session traits and the upload driver
//! - [`config`]: Configuration management
//! - [`validation`]: Input validation utilities
//! - [`error`]: Error types

pub mod compiler;
pub mod config;
pub mod error;
pub mod timeline;
pub mod transport;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};

#[cfg(test)]
pub mod test_utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
