//! Single-pass compiler from source symbols to TapeScript bytecode.
//!
//! Runs of `+ - < >` collapse into one instruction carrying the run length.
//! Loops are resolved by backpatching: `[` emits a placeholder whose offset is
//! remembered on a [`RunStack`], and the matching `]` rewrites it in place.

pub mod reader;
pub mod run_stack;

use std::io::{self, BufReader, Read, Write};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::bytecode::{
    Bytecode, Instruction, JUMP_INSTRUCTION_LEN, JUMP_OPERAND_WIDTH, PLACEHOLDER_TAG,
    write_operand,
};

pub use reader::{Located, Symbol, SymbolReader};
pub use run_stack::RunStack;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("unmatched ']' at source byte {position}")]
    UnmatchedLoopEnd { position: usize },
    #[error("{open} unmatched '[' at end of input")]
    UnmatchedLoopBegin { open: usize },
    #[error("loop jump of {distance} bytes does not fit in a 4-byte operand")]
    JumpTooLong { distance: usize },
    #[error("failed to read source: {0}")]
    Read(#[source] io::Error),
    #[error("failed to write bytecode: {0}")]
    Write(#[source] io::Error),
}

/// Compiles an in-memory source program.
pub fn compile(source: &[u8]) -> CompileResult<Bytecode> {
    Compiler::new().compile_reader(source)
}

/// Compiles `source` and writes the finished buffer to `sink`, returning the
/// number of bytes written. Nothing is written when compilation fails.
pub fn compile_to<R: Read, W: Write>(source: R, mut sink: W) -> CompileResult<usize> {
    let bytecode = Compiler::new().compile_reader(BufReader::new(source))?;
    sink.write_all(bytecode.as_bytes())
        .and_then(|()| sink.flush())
        .map_err(CompileError::Write)?;
    Ok(bytecode.len())
}

/// Compilation state for a single program.
#[derive(Debug)]
pub struct Compiler {
    output: Vec<u8>,
    loops: RunStack,
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            output: Vec::new(),
            loops: RunStack::new(),
        }
    }

    /// Consumes the compiler and the source stream. The run stack is drained
    /// on every exit path.
    #[instrument(level = "debug", skip_all)]
    pub fn compile_reader<R: Read>(mut self, source: R) -> CompileResult<Bytecode> {
        let mut reader = SymbolReader::new(source);
        if let Err(err) = self.compile_symbols(&mut reader) {
            debug!(open_loops = self.loops.len(), error = %err, "compilation aborted");
            self.loops.clear();
            return Err(err);
        }
        debug!(bytes = self.output.len(), "compilation finished");
        Ok(Bytecode::from_bytes(self.output))
    }

    fn compile_symbols<R: Read>(&mut self, reader: &mut SymbolReader<R>) -> CompileResult<()> {
        while let Some(located) = reader.next_symbol().map_err(CompileError::Read)? {
            let mut run = |symbol| reader.count_run(symbol).map_err(CompileError::Read);
            let instruction = match located.symbol {
                Symbol::Increment => Instruction::Increment(cell_delta(run(Symbol::Increment)?)),
                Symbol::Decrement => Instruction::Decrement(cell_delta(run(Symbol::Decrement)?)),
                Symbol::MoveLeft => Instruction::MoveLeft(pointer_delta(run(Symbol::MoveLeft)?)),
                Symbol::MoveRight => {
                    Instruction::MoveRight(pointer_delta(run(Symbol::MoveRight)?))
                }
                Symbol::Output => Instruction::Output,
                Symbol::Input => Instruction::Input,
                Symbol::LoopBegin => {
                    self.open_loop();
                    continue;
                }
                Symbol::LoopEnd => {
                    self.close_loop(located.position)?;
                    continue;
                }
            };
            self.emit(instruction);
        }
        if !self.loops.is_empty() {
            return Err(CompileError::UnmatchedLoopBegin {
                open: self.loops.len(),
            });
        }
        Ok(())
    }

    fn emit(&mut self, instruction: Instruction) {
        instruction.encode(&mut self.output);
    }

    fn open_loop(&mut self) {
        self.loops.push(self.output.len());
        self.output.push(PLACEHOLDER_TAG);
        write_operand(&mut self.output, 0, JUMP_OPERAND_WIDTH);
    }

    fn close_loop(&mut self, position: usize) -> CompileResult<()> {
        let start = self
            .loops
            .pop()
            .ok_or(CompileError::UnmatchedLoopEnd { position })?;
        let (skip, back) = loop_operands(start, self.output.len())?;

        let mut patch = Vec::with_capacity(JUMP_INSTRUCTION_LEN);
        Instruction::LoopBegin(skip).encode(&mut patch);
        self.output[start..start + JUMP_INSTRUCTION_LEN].copy_from_slice(&patch);

        self.emit(Instruction::LoopEnd(back));
        Ok(())
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

/// Run lengths of `+`/`-` reduce modulo 256.
fn cell_delta(count: usize) -> u8 {
    (count % 256) as u8
}

/// Run lengths of `<`/`>` reduce modulo 65 536.
fn pointer_delta(count: usize) -> u16 {
    (count % 65_536) as u16
}

/// Operands for a loop whose begin instruction sits at `start` and whose end
/// instruction is about to be written at `here`.
fn loop_operands(start: usize, here: usize) -> CompileResult<(u32, u32)> {
    let skip = here - start;
    let back = skip
        .checked_add(JUMP_INSTRUCTION_LEN)
        .ok_or(CompileError::JumpTooLong { distance: skip })?;
    Ok((jump_operand(skip)?, jump_operand(back)?))
}

fn jump_operand(distance: usize) -> CompileResult<u32> {
    u32::try_from(distance).map_err(|_| CompileError::JumpTooLong { distance })
}
