// Copyright 2026 riopulse Contributors
// SPDX-License-Identifier: Apache-2.0

//! Wire encoding of sequencer instructions.
//!
//! Every instruction packs into one 32-bit word:
//!
//! ```text
//!  31        24 23                              0
//! ┌────────────┬─────────────────────────────────┐
//! │   opcode   │             payload             │
//! └────────────┴─────────────────────────────────┘
//! ```
//!
//! | opcode | instruction  | payload              |
//! |--------|--------------|----------------------|
//! | 0      | jump         | target index         |
//! | 1      | wait         | delay ticks          |
//! | 2      | set-outputs  | channel bit-vector   |
//! | 3      | trigger-wait | idle bit-vector      |
//!
//! The encoding is one-way; nothing on the host reads words back.

use super::instruction::{Instruction, MAX_PAYLOAD, PAYLOAD_BITS};

/// Instruction opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    Jump = 0,
    Wait = 1,
    SetOutputs = 2,
    TriggerWait = 3,
}

impl Opcode {
    /// Opcode of an instruction.
    pub fn of(instruction: &Instruction) -> Self {
        match instruction {
            Instruction::Jump { .. } => Opcode::Jump,
            Instruction::Wait { .. } => Opcode::Wait,
            Instruction::SetOutputs { .. } => Opcode::SetOutputs,
            Instruction::TriggerWait { .. } => Opcode::TriggerWait,
        }
    }
}

/// Pack one instruction into `(opcode << 24) | payload`.
///
/// # Panics
///
/// A payload wider than 24 bits can only come from a broken compiler and
/// is treated as a programming error.
pub fn encode(instruction: &Instruction) -> u32 {
    let payload = match *instruction {
        Instruction::Jump { target } => target,
        Instruction::Wait { ticks } => ticks,
        Instruction::SetOutputs { outputs } | Instruction::TriggerWait { outputs } => outputs,
    };
    assert!(
        payload <= MAX_PAYLOAD,
        "payload {payload:#x} of {instruction:?} does not fit in {PAYLOAD_BITS} bits"
    );
    (u32::from(Opcode::of(instruction) as u8) << PAYLOAD_BITS) | payload
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_jump() {
        assert_eq!(encode(&Instruction::Jump { target: 0 }), 0x0000_0000);
        assert_eq!(encode(&Instruction::Jump { target: 5 }), 0x0000_0005);
    }

    #[test]
    fn test_encode_wait() {
        assert_eq!(encode(&Instruction::Wait { ticks: 499 }), (1 << 24) | 499);
        assert_eq!(
            encode(&Instruction::Wait {
                ticks: MAX_PAYLOAD
            }),
            0x01FF_FFFF
        );
    }

    #[test]
    fn test_encode_set_outputs() {
        assert_eq!(encode(&Instruction::SetOutputs { outputs: 0b11 }), 0x0200_0003);
    }

    #[test]
    fn test_encode_trigger_wait() {
        assert_eq!(encode(&Instruction::TriggerWait { outputs: 0b10 }), 0x0300_0002);
    }

    #[test]
    fn test_opcode_in_top_byte() {
        for (instruction, opcode) in [
            (Instruction::Jump { target: 1 }, 0),
            (Instruction::Wait { ticks: 1 }, 1),
            (Instruction::SetOutputs { outputs: 1 }, 2),
            (Instruction::TriggerWait { outputs: 1 }, 3),
        ] {
            assert_eq!(encode(&instruction) >> 24, opcode);
            assert_eq!(encode(&instruction) & MAX_PAYLOAD, 1);
        }
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn test_encode_oversized_payload_panics() {
        encode(&Instruction::SetOutputs { outputs: 1 << 24 });
    }
}
