//! Definition of the TapeScript bytecode binary format.
//!
//! Every instruction is a single tag byte followed by a fixed-width,
//! big-endian operand whose width depends on the tag. Tags reuse the ASCII
//! value of the source symbol they were compiled from.

use std::convert::TryFrom;

use thiserror::Error;

/// Tag written for a loop-begin whose matching loop-end has not been seen yet.
pub const PLACEHOLDER_TAG: u8 = b'?';

/// Operand width of both loop instructions.
pub const JUMP_OPERAND_WIDTH: usize = 4;

/// Total encoded size of a loop-begin (or loop-end) instruction.
pub const JUMP_INSTRUCTION_LEN: usize = 1 + JUMP_OPERAND_WIDTH;

/// Opcodes understood by the TapeScript interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Increment = b'+',
    Decrement = b'-',
    MoveLeft = b'<',
    MoveRight = b'>',
    Output = b'.',
    Input = b',',
    LoopBegin = b'[',
    LoopEnd = b']',
}

impl Opcode {
    /// Number of operand bytes following the tag.
    pub fn operand_width(self) -> usize {
        match self {
            Opcode::Increment | Opcode::Decrement => 1,
            Opcode::MoveLeft | Opcode::MoveRight => 2,
            Opcode::Output | Opcode::Input => 0,
            Opcode::LoopBegin | Opcode::LoopEnd => JUMP_OPERAND_WIDTH,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Increment => "inc",
            Opcode::Decrement => "dec",
            Opcode::MoveLeft => "left",
            Opcode::MoveRight => "right",
            Opcode::Output => "out",
            Opcode::Input => "in",
            Opcode::LoopBegin => "loop",
            Opcode::LoopEnd => "end",
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = BytecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use Opcode::*;
        let opcode = match value {
            b'+' => Increment,
            b'-' => Decrement,
            b'<' => MoveLeft,
            b'>' => MoveRight,
            b'.' => Output,
            b',' => Input,
            b'[' => LoopBegin,
            b']' => LoopEnd,
            other => return Err(BytecodeError::UnknownOpcode(other)),
        };
        Ok(opcode)
    }
}

/// Single decoded instruction with its typed operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Increment(u8),
    Decrement(u8),
    MoveLeft(u16),
    MoveRight(u16),
    Output,
    Input,
    /// Forward-skip distance measured from the end of this instruction to
    /// the end of the matching loop-end.
    LoopBegin(u32),
    /// Backward-jump distance measured from the end of this instruction to
    /// the start of the matching loop-begin.
    LoopEnd(u32),
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Increment(_) => Opcode::Increment,
            Instruction::Decrement(_) => Opcode::Decrement,
            Instruction::MoveLeft(_) => Opcode::MoveLeft,
            Instruction::MoveRight(_) => Opcode::MoveRight,
            Instruction::Output => Opcode::Output,
            Instruction::Input => Opcode::Input,
            Instruction::LoopBegin(_) => Opcode::LoopBegin,
            Instruction::LoopEnd(_) => Opcode::LoopEnd,
        }
    }

    fn operand(&self) -> u32 {
        match *self {
            Instruction::Increment(value) | Instruction::Decrement(value) => u32::from(value),
            Instruction::MoveLeft(value) | Instruction::MoveRight(value) => u32::from(value),
            Instruction::Output | Instruction::Input => 0,
            Instruction::LoopBegin(value) | Instruction::LoopEnd(value) => value,
        }
    }

    pub fn encoded_len(&self) -> usize {
        1 + self.opcode().operand_width()
    }

    pub fn encode(&self, bytes: &mut Vec<u8>) {
        let opcode = self.opcode();
        bytes.push(opcode as u8);
        write_operand(bytes, self.operand(), opcode.operand_width());
    }

    /// Decodes the instruction starting at `*pc` and advances `*pc` past it.
    ///
    /// Operands cut short by the end of `code` are read as if the missing
    /// trailing bytes were zero.
    pub fn decode(code: &[u8], pc: &mut usize) -> Result<Self, BytecodeError> {
        let tag = *code.get(*pc).ok_or(BytecodeError::UnexpectedEof)?;
        let opcode = Opcode::try_from(tag)?;
        *pc += 1;
        let operand = read_operand(code, pc, opcode.operand_width());
        let instruction = match opcode {
            Opcode::Increment => Instruction::Increment(operand as u8),
            Opcode::Decrement => Instruction::Decrement(operand as u8),
            Opcode::MoveLeft => Instruction::MoveLeft(operand as u16),
            Opcode::MoveRight => Instruction::MoveRight(operand as u16),
            Opcode::Output => Instruction::Output,
            Opcode::Input => Instruction::Input,
            Opcode::LoopBegin => Instruction::LoopBegin(operand),
            Opcode::LoopEnd => Instruction::LoopEnd(operand),
        };
        Ok(instruction)
    }
}

/// Appends the low `width` bytes of `value`, most significant first.
pub fn write_operand(bytes: &mut Vec<u8>, value: u32, width: usize) {
    for index in (0..width).rev() {
        bytes.push((value >> (8 * index)) as u8);
    }
}

/// Reads a `width`-byte big-endian operand at `*pc`, advancing `*pc` over the
/// bytes actually present.
pub fn read_operand(code: &[u8], pc: &mut usize, width: usize) -> u32 {
    let mut value = 0u32;
    for index in (0..width).rev() {
        let Some(&byte) = code.get(*pc) else {
            break;
        };
        *pc += 1;
        value |= u32::from(byte) << (8 * index);
    }
    value
}

/// Owned bytecode buffer produced by the compiler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bytecode {
    bytes: Vec<u8>,
}

impl Bytecode {
    /// Wraps raw bytes without validating them; decoding errors surface at run time.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn instructions(&self) -> Instructions<'_> {
        Instructions::new(&self.bytes)
    }
}

impl AsRef<[u8]> for Bytecode {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Linear walk over the instructions of a buffer, yielding each with its offset.
///
/// Stops after the first decoding error.
pub struct Instructions<'a> {
    code: &'a [u8],
    pc: usize,
    failed: bool,
}

impl<'a> Instructions<'a> {
    pub fn new(code: &'a [u8]) -> Self {
        Self {
            code,
            pc: 0,
            failed: false,
        }
    }
}

impl Iterator for Instructions<'_> {
    type Item = Result<(usize, Instruction), BytecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pc >= self.code.len() {
            return None;
        }
        let offset = self.pc;
        match Instruction::decode(self.code, &mut self.pc) {
            Ok(instruction) => Some(Ok((offset, instruction))),
            Err(err) => {
                self.failed = true;
                Some(Err(err.at(offset)))
            }
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BytecodeError {
    #[error("unexpected end of bytecode")]
    UnexpectedEof,
    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),
    #[error("unknown opcode {opcode:#04x} at offset {offset}")]
    UnknownOpcodeAt { opcode: u8, offset: usize },
}

impl BytecodeError {
    fn at(self, offset: usize) -> Self {
        match self {
            BytecodeError::UnknownOpcode(opcode) => BytecodeError::UnknownOpcodeAt { opcode, offset },
            other => other,
        }
    }
}
