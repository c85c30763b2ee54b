// Copyright 2026 riopulse Contributors
// SPDX-License-Identifier: Apache-2.0

//! Sequencer instructions and compiled programs.

use std::fmt;

use serde::Serialize;

use super::encode::encode;

/// Width of every instruction payload in bits.
pub const PAYLOAD_BITS: u32 = 24;

/// Largest value a payload can carry (`2^24 - 1`).
pub const MAX_PAYLOAD: u32 = (1 << PAYLOAD_BITS) - 1;

/// Largest delay of a single [`Instruction::Wait`].
pub const MAX_WAIT_TICKS: u32 = MAX_PAYLOAD;

/// One state-machine instruction.
///
/// Timing on the sequencer clock:
///
/// - `Wait { ticks: n }` holds the current outputs for `n + 1` ticks
/// - `TriggerWait`, `SetOutputs` and `Jump` take no time on the programmed
///   timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// Latch `outputs` and block until a trigger arrives.
    TriggerWait { outputs: u32 },
    /// Delay for `ticks + 1` clock ticks.
    Wait { ticks: u32 },
    /// Latch a new output bit-vector (bit i = channel i).
    SetOutputs { outputs: u32 },
    /// Continue execution at instruction index `target`.
    Jump { target: u32 },
}

impl Instruction {
    /// Clock ticks this instruction advances the timeline by.
    pub fn elapsed_ticks(&self) -> u64 {
        match self {
            Instruction::Wait { ticks } => u64::from(*ticks) + 1,
            _ => 0,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::TriggerWait { outputs } => write!(f, "trigger-wait {:#026b}", outputs),
            Instruction::Wait { ticks } => write!(f, "wait {}", ticks),
            Instruction::SetOutputs { outputs } => write!(f, "set-outputs {:#026b}", outputs),
            Instruction::Jump { target } => write!(f, "jump {}", target),
        }
    }
}

/// Non-fatal conditions found while compiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompileWarning {
    /// Switch events run past the declared duration; the program was
    /// lengthened to include them.
    DurationExceeded {
        declared_ticks: u64,
        actual_ticks: u64,
    },
}

impl fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileWarning::DurationExceeded {
                declared_ticks,
                actual_ticks,
            } => write!(
                f,
                "Duration exceeded: declared {} ticks, events run to {} ticks",
                declared_ticks, actual_ticks
            ),
        }
    }
}

/// Immutable result of compiling a sequence.
///
/// The instruction list always starts with a [`Instruction::TriggerWait`]
/// and ends with a [`Instruction::Jump`] back to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Program {
    instructions: Vec<Instruction>,
    period_ticks: u64,
    warnings: Vec<CompileWarning>,
}

impl Program {
    pub(crate) fn new(
        instructions: Vec<Instruction>,
        period_ticks: u64,
        warnings: Vec<CompileWarning>,
    ) -> Self {
        Self {
            instructions,
            period_ticks,
            warnings,
        }
    }

    /// The instruction stream.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Always false for a compiled program; provided for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Clock ticks from trigger to the jump back.
    pub fn period_ticks(&self) -> u64 {
        self.period_ticks
    }

    /// Warnings raised while compiling.
    pub fn warnings(&self) -> &[CompileWarning] {
        &self.warnings
    }

    /// Pack every instruction into its wire word.
    pub fn encode(&self) -> Vec<u32> {
        self.instructions.iter().map(encode).collect()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}
