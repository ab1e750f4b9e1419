//=====================================================
// File: lib.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: TapeScript library main interface
// Objective: Export the bytecode format, single-pass compiler, tape machine
//            interpreter, and the configuration and logging used by the tools
//=====================================================

//! TapeScript compiles the eight-symbol tape language into compact bytecode
//! and runs that bytecode on a 65 536-cell machine.
//!
//! * [`compiler`] – single-pass compiler with run-length collapsing and loop
//!   backpatching.
//! * [`bytecode`] – the binary format shared by compiler and interpreter, plus
//!   a disassembler.
//! * [`vm`] – the tape machine and its decode-and-dispatch interpreter.

pub mod bytecode;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod logging;
pub mod vm;

use std::io::{Read, Write};

use thiserror::Error;

pub use bytecode::{Bytecode, Instruction, Opcode};
pub use compiler::{CompileError, compile};
pub use vm::{ExecutionStats, Machine, VmError, execute};

/// Result type used across TapeScript.
pub type TapeResult<T> = std::result::Result<T, TapeError>;

#[derive(Debug, Error)]
pub enum TapeError {
    #[error("compilation failed: {0}")]
    Compile(#[from] CompileError),
    #[error("execution failed: {0}")]
    Runtime(#[from] VmError),
}

/// Compiles `source` and immediately runs it on a fresh machine.
pub fn compile_and_run<R: Read, W: Write>(
    source: &[u8],
    input: R,
    output: W,
) -> TapeResult<ExecutionStats> {
    let bytecode = compile(source)?;
    Ok(execute(bytecode.as_bytes(), input, output)?)
}

//=====================================================
// End of file
//=====================================================
