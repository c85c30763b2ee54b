// Copyright 2026 riopulse Contributors
// SPDX-License-Identifier: Apache-2.0

//! Sequence to instruction-stream compiler.
//!
//! Switch times are quantized onto the sequencer clock, merged across
//! channels in time order and turned into a looping program:
//!
//! ```text
//! trigger-wait(idle) wait… set-outputs wait… set-outputs … wait… jump 0
//! ```
//!
//! Tick offsets are measured from the quantized start time. The idle
//! outputs latched by the trigger-wait are the channel defaults with any
//! flip on the start tick already applied. Flips landing on the loop
//! boundary (`tick == period`) would last zero ticks and are dropped. A
//! tick whose flips cancel out emits nothing.

use tracing::{debug, warn};

use super::instruction::{CompileWarning, Instruction, Program, MAX_WAIT_TICKS};
use crate::error::ValidationError;
use crate::timeline::Sequence;
use crate::validation::{validate_clock_period, validate_time, MAX_CHANNELS};

/// Default sequencer clock period (10 ns).
pub const DEFAULT_CLOCK_PERIOD: f64 = 1e-8;

/// Relative distance to the nearest tick below which a time snaps to it.
const SNAP_TOLERANCE: f64 = 1e-9;

/// Longest program period in clock ticks (`2^44`, about 49 hours at 10 ns).
///
/// Keeps the wait chain of a single program under `2^20` instructions.
pub const MAX_PROGRAM_TICKS: u64 = 1 << 44;

/// Compiler settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Compiler {
    dt: f64,
    duration: Option<f64>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self {
            dt: DEFAULT_CLOCK_PERIOD,
            duration: None,
        }
    }
}

impl Compiler {
    /// Compiler for a sequencer clocked at period `dt` seconds.
    pub fn new(dt: f64) -> Result<Self, ValidationError> {
        validate_clock_period(dt)?;
        Ok(Self { dt, duration: None })
    }

    /// Override the program length with `duration` seconds from the start
    /// time instead of the sequence's stop time.
    pub fn with_duration(mut self, duration: f64) -> Result<Self, ValidationError> {
        validate_time("duration", duration)?;
        if duration < 0.0 {
            return Err(ValidationError::Field {
                field: "duration".into(),
                message: format!("must be non-negative, got {}", duration),
            });
        }
        self.duration = Some(duration);
        Ok(self)
    }

    /// Clock period in seconds.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Duration override, if any.
    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    /// Absolute tick index of time `t`, saturating at the `i64` range.
    ///
    /// Times within a relative `1e-9` of a tick boundary snap to it, so
    /// `75e-6 / 1e-8` lands on 7500 and not 7499. Everything else rounds
    /// down.
    pub fn quantize(&self, t: f64) -> i64 {
        let x = t / self.dt;
        let nearest = x.round();
        if (x - nearest).abs() <= SNAP_TOLERANCE * nearest.abs().max(1.0) {
            nearest as i64
        } else {
            x.floor() as i64
        }
    }

    /// Compile a sequence into a looping program. The sequence is not
    /// modified.
    ///
    /// # Errors
    ///
    /// [`ValidationError::ResourceLimit`] when the program would span more
    /// than [`MAX_PROGRAM_TICKS`] clock ticks.
    ///
    /// # Panics
    ///
    /// A sequence wider than 24 channels, or a switch quantizing before the
    /// start tick, cannot come out of [`Sequence`]'s own constructors and is
    /// treated as a programming error.
    pub fn compile(&self, seq: &Sequence) -> Result<Program, ValidationError> {
        assert!(
            seq.nchannels() <= MAX_CHANNELS,
            "{} channels do not fit in the output field",
            seq.nchannels()
        );

        let start = seq.start_time();
        let start_tick = self.quantize(start);
        let offset = |t: f64| -> Result<u64, ValidationError> {
            let ticks = i128::from(self.quantize(t)) - i128::from(start_tick);
            assert!(ticks >= 0, "switch at {t:e}s precedes start at {start:e}s");
            if ticks > i128::from(MAX_PROGRAM_TICKS) {
                return Err(ValidationError::ResourceLimit {
                    resource: "program ticks".into(),
                    limit: MAX_PROGRAM_TICKS,
                    requested: u64::try_from(ticks).unwrap_or(u64::MAX),
                });
            }
            Ok(ticks as u64)
        };

        let mut events: Vec<(f64, usize)> = seq
            .channels()
            .iter()
            .enumerate()
            .flat_map(|(ch, c)| c.switch_times().iter().map(move |&t| (t, ch)))
            .collect();
        events.sort_by(|a, b| a.0.total_cmp(&b.0));

        // (tick, channels flipped on that tick)
        let mut flips: Vec<(u64, u32)> = Vec::with_capacity(events.len());
        for &(t, ch) in &events {
            let tick = offset(t)?;
            match flips.last_mut() {
                Some((last, mask)) if *last == tick => *mask ^= 1 << ch,
                _ => flips.push((tick, 1 << ch)),
            }
        }

        let declared_ticks = match self.duration {
            Some(duration) => offset(start + duration)?,
            None => offset(seq.stop_time())?,
        };
        let last_tick = flips.last().map_or(0, |&(tick, _)| tick);
        let period_ticks = declared_ticks.max(last_tick);

        let mut warnings = Vec::new();
        if last_tick > declared_ticks {
            warn!(
                declared_ticks,
                actual_ticks = last_tick,
                "Switch events exceed the declared duration"
            );
            warnings.push(CompileWarning::DurationExceeded {
                declared_ticks,
                actual_ticks: last_tick,
            });
        }

        let mut outputs = seq
            .channels()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.default_state())
            .fold(0u32, |acc, (ch, _)| acc | (1 << ch));

        let mut flips = flips.into_iter().peekable();
        if let Some(&(0, mask)) = flips.peek() {
            outputs ^= mask;
            flips.next();
        }

        let mut instructions = vec![Instruction::TriggerWait { outputs }];
        let mut now = 0;
        for (tick, mask) in flips {
            if tick >= period_ticks {
                break;
            }
            let next = outputs ^ mask;
            if next == outputs {
                continue;
            }
            instructions.extend(split_wait(tick - now));
            instructions.push(Instruction::SetOutputs { outputs: next });
            outputs = next;
            now = tick;
        }
        instructions.extend(split_wait(period_ticks - now));
        instructions.push(Instruction::Jump { target: 0 });

        debug!(
            channels = seq.nchannels(),
            switches = events.len(),
            instructions = instructions.len(),
            period_ticks,
            "Compiled sequence"
        );

        Ok(Program::new(instructions, period_ticks, warnings))
    }
}

/// Compile with the default 10 ns clock.
pub fn compile(seq: &Sequence) -> Result<Program, ValidationError> {
    Compiler::default().compile(seq)
}

/// Wait instructions covering exactly `ticks` clock ticks.
///
/// Gaps longer than one wait can express are chained; `0` yields nothing.
/// The chain holds one instruction per `2^24` ticks, so callers bound
/// `ticks` (the compiler by [`MAX_PROGRAM_TICKS`]).
pub fn split_wait(ticks: u64) -> Vec<Instruction> {
    let span = u64::from(MAX_WAIT_TICKS) + 1;
    let mut chain = Vec::with_capacity((ticks / span) as usize + 1);
    let mut remaining = ticks;
    while remaining > span {
        chain.push(Instruction::Wait {
            ticks: MAX_WAIT_TICKS,
        });
        remaining -= span;
    }
    if remaining > 0 {
        chain.push(Instruction::Wait {
            ticks: (remaining - 1) as u32,
        });
    }
    chain
}
