// Copyright 2026 riopulse Contributors
// SPDX-License-Identifier: Apache-2.0

//! Sequence compiler and sequencer instruction set.
//!
//! - [`compile`](mod@compile): quantization, event merging and wait splitting
//! - [`instruction`]: instruction model and the compiled [`Program`]
//! - [`encode`](mod@encode): 32-bit wire words

pub mod compile;
pub mod encode;
pub mod instruction;

pub use compile::{compile, split_wait, Compiler, DEFAULT_CLOCK_PERIOD, MAX_PROGRAM_TICKS};
pub use encode::{encode, Opcode};
pub use instruction::{CompileWarning, Instruction, Program, MAX_PAYLOAD, MAX_WAIT_TICKS};
