// Copyright 2026 riopulse Contributors
// SPDX-License-Identifier: Apache-2.0

//! Single digital channel: a default level plus the instants at which the
//! level flips.
//!
//! The switch times form a toggle set. Adding a time that is already
//! present removes it, so two coincident flips cancel each other. This is
//! what lets back-to-back pulses merge into one longer pulse.

use std::fmt;

/// Step samples of a channel state, ready for plotting.
///
/// Each switch contributes two samples at the same time (pre- and
/// post-transition value) so that the edge renders vertically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Curve {
    /// Sample times in seconds.
    pub times: Vec<f64>,
    /// Channel state at each sample.
    pub states: Vec<bool>,
}

impl Curve {
    fn push(&mut self, t: f64, state: bool) {
        self.times.push(t);
        self.states.push(state);
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// True when the curve has no samples.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Time-dependent state of one digital channel.
///
/// # Invariants
///
/// - `switch_times` is strictly ascending (no duplicates)
/// - state at `t` is `default` XOR (odd number of switches before `t`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelTimeline {
    default: bool,
    switch_times: Vec<f64>,
}

impl ChannelTimeline {
    /// Create an empty channel with the given default state.
    pub fn new(default: bool) -> Self {
        Self {
            default,
            switch_times: Vec::new(),
        }
    }

    /// The default (idle) state.
    pub fn default_state(&self) -> bool {
        self.default
    }

    /// Change the default state. Switch times are kept, so every level on
    /// the channel inverts.
    pub fn set_default(&mut self, default: bool) {
        self.default = default;
    }

    /// Ordered switch times in seconds.
    pub fn switch_times(&self) -> &[f64] {
        &self.switch_times
    }

    /// Number of switch times.
    pub fn len(&self) -> usize {
        self.switch_times.len()
    }

    /// True when the channel never leaves its default state.
    pub fn is_empty(&self) -> bool {
        self.switch_times.is_empty()
    }

    /// Earliest switch time, if any.
    pub fn first_switch(&self) -> Option<f64> {
        self.switch_times.first().copied()
    }

    /// Latest switch time, if any.
    pub fn last_switch(&self) -> Option<f64> {
        self.switch_times.last().copied()
    }

    /// Add a state switch at `t`, or remove it if one is already there.
    pub fn add_state_switch(&mut self, t: f64) {
        let idx = self.switch_times.partition_point(|&s| s < t);
        if self.switch_times.get(idx) == Some(&t) {
            self.switch_times.remove(idx);
        } else {
            self.switch_times.insert(idx, t);
        }
    }

    /// State at time `t`. At a switch instant this is the value before
    /// the transition.
    pub fn state(&self, t: f64) -> bool {
        let before = self.switch_times.partition_point(|&s| s < t);
        self.default ^ (before % 2 == 1)
    }

    /// The state right after each switch, in order.
    pub fn states(&self) -> Vec<bool> {
        (0..self.switch_times.len())
            .map(|i| self.default ^ (i % 2 == 0))
            .collect()
    }

    /// Step samples over `interval`, or over the span of the switches when
    /// `interval` is `None`.
    ///
    /// Boundary samples are added when the interval ends are not switch
    /// points themselves. A channel without switches and no interval has
    /// an empty curve.
    pub fn curve(&self, interval: Option<(f64, f64)>) -> Curve {
        let (t0, t1, switches) = match interval {
            Some((a, b)) => {
                let (t0, t1) = (a.min(b), a.max(b));
                let lo = self.switch_times.partition_point(|&s| s < t0);
                let hi = self.switch_times.partition_point(|&s| s <= t1);
                (t0, t1, &self.switch_times[lo..hi])
            }
            None => match (self.first_switch(), self.last_switch()) {
                (Some(t0), Some(t1)) => (t0, t1, &self.switch_times[..]),
                _ => return Curve::default(),
            },
        };

        let mut curve = Curve::default();

        if switches.first() != Some(&t0) {
            curve.push(t0, self.state(t0));
        }

        for &t in switches {
            let before = self.state(t);
            curve.push(t, before);
            curve.push(t, !before);
        }

        if switches.last() != Some(&t1) {
            curve.push(t1, self.state(t1));
        }

        curve
    }
}

impl fmt::Display for ChannelTimeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChannelTimeline (default {}):", u8::from(self.default))?;
        for &t in &self.switch_times {
            let before = self.state(t);
            write!(
                f,
                "\nt={:e}s\t{}->{}",
                t,
                u8::from(before),
                u8::from(!before)
            )?;
        }
        Ok(())
    }
}
