use std::io::{self, Read, Write};

use tracing::{debug, trace};

use crate::bytecode::Instruction;

use super::machine::Machine;
use super::{ExecutionStats, InterpreterOptions, VmError, VmResult};

/// Decode-and-dispatch loop over a borrowed bytecode buffer.
pub struct Interpreter<'a> {
    code: &'a [u8],
    options: InterpreterOptions,
}

impl<'a> Interpreter<'a> {
    pub fn new(code: &'a [u8]) -> Self {
        Self::with_options(code, InterpreterOptions::default())
    }

    pub fn with_options(code: &'a [u8], options: InterpreterOptions) -> Self {
        Self { code, options }
    }

    /// Runs the program from offset 0 until the program counter leaves the
    /// buffer. The output sink is flushed before returning successfully and
    /// before every input read.
    pub fn run<R: Read, W: Write>(
        &self,
        machine: &mut Machine,
        mut input: R,
        mut output: W,
    ) -> VmResult<ExecutionStats> {
        let code = self.code;
        let mut stats = ExecutionStats::default();
        let mut pc = 0usize;

        while pc < code.len() {
            let offset = pc;
            let instruction = Instruction::decode(code, &mut pc)
                .map_err(|source| VmError::Corrupt { offset, source })?;
            stats.instructions += 1;
            if self.options.trace {
                trace!(
                    offset,
                    ?instruction,
                    pointer = machine.pointer(),
                    cell = machine.current(),
                    "step"
                );
            }

            match instruction {
                Instruction::Increment(amount) => machine.add(amount),
                Instruction::Decrement(amount) => machine.sub(amount),
                Instruction::MoveLeft(distance) => machine.move_left(distance),
                Instruction::MoveRight(distance) => machine.move_right(distance),
                Instruction::Output => {
                    output
                        .write_all(&[machine.current()])
                        .map_err(VmError::Output)?;
                    stats.output_bytes += 1;
                }
                Instruction::Input => {
                    output.flush().map_err(VmError::Output)?;
                    let byte = read_byte(&mut input).map_err(VmError::Input)?;
                    machine.set_current(byte.unwrap_or(0));
                }
                Instruction::LoopBegin(distance) => {
                    if machine.current() == 0 {
                        pc = pc.saturating_add(distance as usize);
                    }
                }
                Instruction::LoopEnd(distance) => {
                    pc = pc
                        .checked_sub(distance as usize)
                        .ok_or(VmError::JumpOutOfBounds { offset, distance })?;
                }
            }
        }

        output.flush().map_err(VmError::Output)?;
        debug!(
            instructions = stats.instructions,
            output_bytes = stats.output_bytes,
            "program halted"
        );
        Ok(stats)
    }
}

/// Reads a single byte, returning `None` once the source is exhausted.
fn read_byte<R: Read>(input: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
}
