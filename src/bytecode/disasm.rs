use std::fmt;

use super::spec::{Bytecode, BytecodeError, Instruction};

/// One line of disassembly output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub offset: usize,
    pub instruction: Instruction,
    /// Absolute offset a loop instruction transfers control to.
    pub target: Option<usize>,
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.instruction.opcode().mnemonic();
        write!(f, "{:06}: ", self.offset)?;
        match self.instruction {
            Instruction::Increment(count) | Instruction::Decrement(count) => {
                write!(f, "{mnemonic} {count}")
            }
            Instruction::MoveLeft(count) | Instruction::MoveRight(count) => {
                write!(f, "{mnemonic} {count}")
            }
            Instruction::Output | Instruction::Input => write!(f, "{mnemonic}"),
            Instruction::LoopBegin(distance) | Instruction::LoopEnd(distance) => match self.target {
                Some(target) => write!(f, "{mnemonic} {distance} (-> {target:06})"),
                None => write!(f, "{mnemonic} {distance} (-> ?)"),
            },
        }
    }
}

/// Decodes a whole buffer into a listing.
pub fn disassemble(bytecode: &Bytecode) -> Result<Vec<Listing>, BytecodeError> {
    bytecode
        .instructions()
        .map(|item| -> Result<Listing, BytecodeError> {
            let (offset, instruction) = item?;
            let next = offset + instruction.encoded_len();
            let target = match instruction {
                Instruction::LoopBegin(distance) => next.checked_add(distance as usize),
                Instruction::LoopEnd(distance) => next.checked_sub(distance as usize),
                _ => None,
            };
            Ok(Listing {
                offset,
                instruction,
                target,
            })
        })
        .collect()
}
