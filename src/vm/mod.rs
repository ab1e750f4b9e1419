//! Tape machine and the bytecode interpreter that drives it.

pub mod interpreter;
pub mod machine;

use std::io::{self, Read, Write};

use thiserror::Error;

use crate::bytecode::BytecodeError;

pub use interpreter::Interpreter;
pub use machine::{Machine, TAPE_LEN};

pub type VmResult<T> = Result<T, VmError>;

#[derive(Debug, Error)]
pub enum VmError {
    #[error("corrupt bytecode at offset {offset}: {source}")]
    Corrupt {
        offset: usize,
        #[source]
        source: BytecodeError,
    },
    #[error("loop-end at offset {offset} jumps {distance} bytes before the start of the program")]
    JumpOutOfBounds { offset: usize, distance: u32 },
    #[error("failed to read program input: {0}")]
    Input(#[source] io::Error),
    #[error("failed to write program output: {0}")]
    Output(#[source] io::Error),
}

impl VmError {
    /// True when the failure comes from the bytecode itself rather than from I/O.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, VmError::Corrupt { .. } | VmError::JumpOutOfBounds { .. })
    }
}

/// Runtime flags controlling diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterpreterOptions {
    /// Emit a `trace` event for every decoded instruction.
    pub trace: bool,
}

impl InterpreterOptions {
    pub fn with_trace(trace: bool) -> Self {
        Self { trace }
    }
}

/// Counters reported after a successful run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    pub instructions: u64,
    pub output_bytes: u64,
}

/// Runs `code` on a fresh machine.
pub fn execute<R: Read, W: Write>(code: &[u8], input: R, output: W) -> VmResult<ExecutionStats> {
    execute_with(code, input, output, InterpreterOptions::default())
}

pub fn execute_with<R: Read, W: Write>(
    code: &[u8],
    input: R,
    output: W,
    options: InterpreterOptions,
) -> VmResult<ExecutionStats> {
    let mut machine = Machine::new();
    Interpreter::with_options(code, options).run(&mut machine, input, output)
}
