// Copyright 2026 riopulse Contributors
// SPDX-License-Identifier: Apache-2.0

//! Declarative sequence files.
//!
//! A [`SequenceFile`] is the YAML/JSON form of a [`Sequence`] used by the
//! command-line tool:
//!
//! ```yaml
//! nchannels: 2
//! defaults: [false, true]
//! start_time: 0.0
//! stop_time: 75.0e-6
//! pulses:
//!   - { kind: append, channel: 0, delay: 5.0e-6, duration: 10.0e-6 }
//!   - { kind: add, channel: 1, t0: 15.0e-6, duration: 15.0e-6 }
//! ```
//!
//! Pulses are replayed in file order through the regular [`Sequence`]
//! methods, so the same validation and merge rules apply. `stop_time` is
//! applied last, after every pulse is in place.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::sequence::Sequence;
use crate::error::{Error, Result, ValidationError};

/// One entry of the `pulses` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PulseEntry {
    /// Pulse at an absolute front-edge time.
    Add { channel: usize, t0: f64, duration: f64 },
    /// Pulse relative to the channel's latest switch.
    Append {
        channel: usize,
        #[serde(default)]
        delay: f64,
        duration: f64,
    },
    /// Single raw state switch.
    Switch { channel: usize, t: f64 },
}

/// Serialized description of a pulse sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceFile {
    /// Number of channels; the caller's default applies when omitted
    #[serde(default)]
    pub nchannels: Option<usize>,

    /// Per-channel default states (all low when omitted)
    #[serde(default)]
    pub defaults: Option<Vec<bool>>,

    /// Stored start time in seconds
    #[serde(default)]
    pub start_time: f64,

    /// Stored stop time in seconds (defaults to `start_time`)
    #[serde(default)]
    pub stop_time: Option<f64>,

    /// Pulses, applied in order
    #[serde(default)]
    pub pulses: Vec<PulseEntry>,
}

/// Channel count used when neither the file nor the caller sets one.
pub const DEFAULT_NCHANNELS: usize = 8;

impl SequenceFile {
    /// Read a sequence file. `.json` files are parsed as JSON, everything
    /// else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }

    /// Replay the description into a [`Sequence`].
    pub fn build(&self) -> Result<Sequence> {
        self.build_with(DEFAULT_NCHANNELS)
    }

    /// Like [`build`](Self::build), with `default_nchannels` channels when
    /// the file sets neither `nchannels` nor `defaults`.
    pub fn build_with(&self, default_nchannels: usize) -> Result<Sequence> {
        let seq = match (&self.defaults, self.nchannels) {
            (Some(defaults), Some(n)) if defaults.len() != n => {
                return Err(Error::Validation(ValidationError::Field {
                    field: "defaults".into(),
                    message: format!("length {} does not match nchannels {}", defaults.len(), n),
                }));
            }
            (Some(defaults), _) => Sequence::with_defaults(defaults)?,
            (None, n) => Sequence::new(n.unwrap_or(default_nchannels))?,
        };

        let mut seq = seq.with_interval(self.start_time, None)?;

        for pulse in &self.pulses {
            match *pulse {
                PulseEntry::Add {
                    channel,
                    t0,
                    duration,
                } => seq.add_pulse(channel, t0, duration)?,
                PulseEntry::Append {
                    channel,
                    delay,
                    duration,
                } => seq.append_pulse(channel, delay, duration)?,
                PulseEntry::Switch { channel, t } => seq.add_state_switch(channel, t)?,
            }
        }

        if let Some(stop) = self.stop_time {
            seq.set_stop_time(stop)?;
        }

        Ok(seq)
    }
}
