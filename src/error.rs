// Copyright 2026 riopulse Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for sequence construction, configuration and upload.

use std::fmt;

/// Result type alias for riopulse operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-wide error type.
#[derive(Debug)]
pub enum Error {
    /// Configuration error
    Config(String),
    /// Sequence construction rejected a caller argument
    Validation(ValidationError),
    /// Sequencer session error
    Transport(TransportError),
    /// IO error
    Io(std::io::Error),
    /// Serialization error
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Validation(e) => write!(f, "Validation error: {}", e),
            Error::Transport(e) => write!(f, "Transport error: {}", e),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Validation(e) => Some(e),
            Error::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Error::Validation(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Error::Transport(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Which end of the sequence interval a bound write targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    Stop,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Start => write!(f, "start time"),
            Bound::Stop => write!(f, "stop time"),
        }
    }
}

/// Validation errors raised while a sequence is being built.
///
/// These are always returned from the mutating call that caused them;
/// the sequence is left unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field validation failed
    Field { field: String, message: String },
    /// Pulse duration was zero or negative
    NonPositiveDuration(f64),
    /// Append delay was negative
    NegativeDelay(f64),
    /// A time argument was NaN or infinite
    NonFiniteTime { field: String, value: f64 },
    /// Channel index outside `0..nchannels`
    ChannelOutOfRange { channel: usize, nchannels: usize },
    /// Bound write would leave an existing switch outside the interval
    BoundClipsSwitch {
        bound: Bound,
        value: f64,
        channel: usize,
        switch_time: f64,
    },
    /// Bound write would put the start after the stop
    BoundOrder { start: f64, stop: f64 },
    /// Resource limit exceeded
    ResourceLimit {
        resource: String,
        limit: u64,
        requested: u64,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Field { field, message } => {
                write!(f, "Field '{}': {}", field, message)
            }
            ValidationError::NonPositiveDuration(d) => {
                write!(f, "Pulse duration must be greater than zero, got {}", d)
            }
            ValidationError::NegativeDelay(d) => {
                write!(f, "Pulse delay must be greater or equal to zero, got {}", d)
            }
            ValidationError::NonFiniteTime { field, value } => {
                write!(f, "Field '{}' must be a finite time, got {}", field, value)
            }
            ValidationError::ChannelOutOfRange { channel, nchannels } => {
                write!(
                    f,
                    "Channel {} out of range for a sequence with {} channels",
                    channel, nchannels
                )
            }
            ValidationError::BoundClipsSwitch {
                bound,
                value,
                channel,
                switch_time,
            } => {
                write!(
                    f,
                    "The {} {} would exclude the transition in channel {} (t={})",
                    bound, value, channel, switch_time
                )
            }
            ValidationError::BoundOrder { start, stop } => {
                write!(
                    f,
                    "The start time {} cannot be greater than the stop time {}",
                    start, stop
                )
            }
            ValidationError::ResourceLimit {
                resource,
                limit,
                requested,
            } => {
                write!(
                    f,
                    "Resource limit exceeded for {}: limit={}, requested={}",
                    resource, limit, requested
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors reported by a sequencer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Session could not be opened
    Open(String),
    /// Register or FIFO write failed
    Write(String),
    /// Register read failed
    Read(String),
    /// Session was already closed
    Closed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Open(msg) => write!(f, "Failed to open session: {}", msg),
            TransportError::Write(msg) => write!(f, "Write failed: {}", msg),
            TransportError::Read(msg) => write!(f, "Read failed: {}", msg),
            TransportError::Closed => write!(f, "Session is closed"),
        }
    }
}

impl std::error::Error for TransportError {}
