// Copyright 2026 riopulse Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pulse timeline data model.
//!
//! - [`ChannelTimeline`]: default state plus toggle-cancelling switch times
//! - [`Sequence`]: fixed set of channels with auto-widening time bounds
//! - [`SequenceFile`]: declarative YAML/JSON form of a sequence

pub mod channel;
pub mod description;
pub mod sequence;

pub use channel::{ChannelTimeline, Curve};
pub use description::{PulseEntry, SequenceFile, DEFAULT_NCHANNELS};
pub use sequence::Sequence;
