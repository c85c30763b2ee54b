// Copyright 2026 riopulse Contributors
// SPDX-License-Identifier: Apache-2.0

//! Multi-channel pulse sequence.
//!
//! A [`Sequence`] owns a fixed set of [`ChannelTimeline`]s and an explicitly
//! stored `[start, stop]` interval. The effective bounds reported by
//! [`Sequence::start_time`] and [`Sequence::stop_time`] are always widened
//! to cover every switch, so adding pulses outside the stored interval
//! extends the sequence instead of failing.
//!
//! Pulses on the same channel combine through toggle cancellation: a pulse
//! whose edge coincides with an existing edge merges with its neighbour,
//! and a pulse placed inside another one cuts a gap into it. No overlap
//! error is raised.

use super::channel::{ChannelTimeline, Curve};
use crate::error::{Bound, ValidationError};
use crate::validation::{
    validate_channel, validate_channel_count, validate_delay, validate_duration, validate_time,
};

/// Pulse realization over several synchronized digital channels.
#[derive(Debug, Clone)]
pub struct Sequence {
    channels: Vec<ChannelTimeline>,
    start: f64,
    stop: f64,
}

impl Sequence {
    /// Create an empty sequence with all channels defaulting to low and a
    /// zero-length interval at `t = 0`.
    ///
    /// # Errors
    ///
    /// `nchannels` must be in `1..=24` (the width of the output field).
    pub fn new(nchannels: usize) -> Result<Self, ValidationError> {
        validate_channel_count(nchannels)?;
        Ok(Self {
            channels: vec![ChannelTimeline::new(false); nchannels],
            start: 0.0,
            stop: 0.0,
        })
    }

    /// Create an empty sequence with one default state per channel.
    pub fn with_defaults(defaults: &[bool]) -> Result<Self, ValidationError> {
        validate_channel_count(defaults.len())?;
        Ok(Self {
            channels: defaults.iter().map(|&d| ChannelTimeline::new(d)).collect(),
            start: 0.0,
            stop: 0.0,
        })
    }

    /// Replace the stored interval. `stop = None` means a zero-length
    /// interval at `start`.
    ///
    /// Intended for freshly built sequences; the same checks as the bound
    /// setters apply.
    pub fn with_interval(mut self, start: f64, stop: Option<f64>) -> Result<Self, ValidationError> {
        validate_time("start_time", start)?;
        let stop = stop.unwrap_or(start);
        validate_time("stop_time", stop)?;
        if stop < start {
            return Err(ValidationError::BoundOrder { start, stop });
        }
        self.check_bound(Bound::Start, start)?;
        self.check_bound(Bound::Stop, stop)?;
        self.start = start;
        self.stop = stop;
        Ok(self)
    }

    /// Number of channels.
    pub fn nchannels(&self) -> usize {
        self.channels.len()
    }

    /// All channels, indexed by channel id.
    pub fn channels(&self) -> &[ChannelTimeline] {
        &self.channels
    }

    /// One channel.
    pub fn channel(&self, ch: usize) -> Result<&ChannelTimeline, ValidationError> {
        validate_channel(ch, self.channels.len())?;
        Ok(&self.channels[ch])
    }

    fn channel_mut(&mut self, ch: usize) -> Result<&mut ChannelTimeline, ValidationError> {
        validate_channel(ch, self.channels.len())?;
        Ok(&mut self.channels[ch])
    }

    /// Default state of every channel, in channel order.
    pub fn defaults(&self) -> Vec<bool> {
        self.channels.iter().map(|c| c.default_state()).collect()
    }

    /// Set the default state of one channel.
    pub fn set_default(&mut self, ch: usize, default: bool) -> Result<(), ValidationError> {
        self.channel_mut(ch)?.set_default(default);
        Ok(())
    }

    /// Flip channel `ch` at `t` (or cancel an existing flip at `t`).
    pub fn add_state_switch(&mut self, ch: usize, t: f64) -> Result<(), ValidationError> {
        validate_time("t", t)?;
        self.channel_mut(ch)?.add_state_switch(t);
        Ok(())
    }

    /// Add a pulse with its front edge at `t0`.
    ///
    /// # Errors
    ///
    /// - `duration <= 0`
    /// - channel out of range or non-finite times
    pub fn add_pulse(&mut self, ch: usize, t0: f64, duration: f64) -> Result<(), ValidationError> {
        validate_time("t0", t0)?;
        validate_duration(duration)?;
        let t1 = t0 + duration;
        validate_time("t0 + duration", t1)?;

        let channel = self.channel_mut(ch)?;
        channel.add_state_switch(t0);
        channel.add_state_switch(t1);
        Ok(())
    }

    /// Add a pulse `delay` after the latest switch on the channel, or after
    /// the start time when the channel has no switches yet.
    ///
    /// With `delay = 0` the new front edge cancels the previous back edge,
    /// so consecutive appends produce one continuous pulse.
    ///
    /// # Errors
    ///
    /// - `delay < 0`
    /// - `duration <= 0`
    /// - channel out of range or non-finite times
    pub fn append_pulse(
        &mut self,
        ch: usize,
        delay: f64,
        duration: f64,
    ) -> Result<(), ValidationError> {
        validate_delay(delay)?;
        validate_duration(duration)?;
        validate_channel(ch, self.channels.len())?;

        let anchor = self.channels[ch]
            .last_switch()
            .unwrap_or_else(|| self.start_time());
        let t0 = anchor + delay;
        let t1 = t0 + duration;
        validate_time("t0 + duration", t1)?;

        let channel = &mut self.channels[ch];
        channel.add_state_switch(t0);
        channel.add_state_switch(t1);
        Ok(())
    }

    /// Start of the sequence: the stored start or the earliest switch,
    /// whichever is earlier.
    pub fn start_time(&self) -> f64 {
        self.channels
            .iter()
            .filter_map(ChannelTimeline::first_switch)
            .fold(self.start, f64::min)
    }

    /// End of the sequence: the stored stop or the latest switch,
    /// whichever is later.
    pub fn stop_time(&self) -> f64 {
        self.channels
            .iter()
            .filter_map(ChannelTimeline::last_switch)
            .fold(self.stop, f64::max)
    }

    /// `stop_time() - start_time()`.
    pub fn duration(&self) -> f64 {
        self.stop_time() - self.start_time()
    }

    /// Store a new start time.
    ///
    /// # Errors
    ///
    /// - a switch lies before `value`
    /// - `value` is after the current stop time
    pub fn set_start_time(&mut self, value: f64) -> Result<(), ValidationError> {
        validate_time("start_time", value)?;
        self.check_bound(Bound::Start, value)?;
        let stop = self.stop_time();
        if value > stop {
            return Err(ValidationError::BoundOrder { start: value, stop });
        }
        self.start = value;
        Ok(())
    }

    /// Store a new stop time.
    ///
    /// # Errors
    ///
    /// - a switch lies after `value`
    /// - `value` is before the current start time
    pub fn set_stop_time(&mut self, value: f64) -> Result<(), ValidationError> {
        validate_time("stop_time", value)?;
        self.check_bound(Bound::Stop, value)?;
        let start = self.start_time();
        if value < start {
            return Err(ValidationError::BoundOrder { start, stop: value });
        }
        self.stop = value;
        Ok(())
    }

    fn check_bound(&self, bound: Bound, value: f64) -> Result<(), ValidationError> {
        for (channel, c) in self.channels.iter().enumerate() {
            let clipped = match bound {
                Bound::Start => c.first_switch().filter(|&t| value > t),
                Bound::Stop => c.last_switch().filter(|&t| value < t),
            };
            if let Some(switch_time) = clipped {
                return Err(ValidationError::BoundClipsSwitch {
                    bound,
                    value,
                    channel,
                    switch_time,
                });
            }
        }
        Ok(())
    }

    /// Step curves of every channel over `[start_time, stop_time]`.
    pub fn curves(&self) -> Vec<Curve> {
        let interval = Some((self.start_time(), self.stop_time()));
        self.channels.iter().map(|c| c.curve(interval)).collect()
    }
}

impl PartialEq for Sequence {
    /// Equal when the effective bounds and every channel match. The stored
    /// bounds only matter through the effective ones.
    fn eq(&self, other: &Self) -> bool {
        self.start_time() == other.start_time()
            && self.stop_time() == other.stop_time()
            && self.channels == other.channels
    }
}
