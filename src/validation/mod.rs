// Copyright 2026 riopulse Contributors
// SPDX-License-Identifier: Apache-2.0

//! Argument validation shared by the sequence builders.

use crate::error::ValidationError;

/// Number of output bits in a set-outputs payload.
pub const MAX_CHANNELS: usize = 24;

/// Validate a channel count for a new sequence.
pub fn validate_channel_count(nchannels: usize) -> Result<(), ValidationError> {
    if nchannels == 0 {
        return Err(ValidationError::Field {
            field: "nchannels".into(),
            message: "must be greater than 0".into(),
        });
    }

    if nchannels > MAX_CHANNELS {
        return Err(ValidationError::ResourceLimit {
            resource: "nchannels".into(),
            limit: MAX_CHANNELS as u64,
            requested: nchannels as u64,
        });
    }

    Ok(())
}

/// Validate a channel index against the channel count.
pub fn validate_channel(channel: usize, nchannels: usize) -> Result<(), ValidationError> {
    if channel >= nchannels {
        return Err(ValidationError::ChannelOutOfRange { channel, nchannels });
    }
    Ok(())
}

/// Reject NaN and infinite times.
pub fn validate_time(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteTime {
            field: field.into(),
            value,
        });
    }
    Ok(())
}

/// A pulse duration must be finite and strictly positive.
pub fn validate_duration(duration: f64) -> Result<(), ValidationError> {
    validate_time("duration", duration)?;
    if duration <= 0.0 {
        return Err(ValidationError::NonPositiveDuration(duration));
    }
    Ok(())
}

/// An append delay must be finite and non-negative.
pub fn validate_delay(delay: f64) -> Result<(), ValidationError> {
    validate_time("delay", delay)?;
    if delay < 0.0 {
        return Err(ValidationError::NegativeDelay(delay));
    }
    Ok(())
}

/// Validate a clock period in seconds.
pub fn validate_clock_period(dt: f64) -> Result<(), ValidationError> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(ValidationError::Field {
            field: "dt".into(),
            message: format!("clock period must be positive and finite, got {}", dt),
        });
    }
    Ok(())
}
