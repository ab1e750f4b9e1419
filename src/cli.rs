//=====================================================
// File: cli.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: TapeScript command-line driver
// Objective: Parse flags, decide between compiling and executing, and map
//            every failure onto the tool's documented exit codes
//=====================================================

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use thiserror::Error;
use tracing::{info, warn};

use crate::compiler::{CompileError, Compiler};
use crate::config::ToolConfig;
use crate::vm::{self, InterpreterOptions, VmError};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tapescript",
    version,
    about = "Compile and run tape-machine programs"
)]
pub struct Args {
    /// Compile the input into bytecode.
    #[arg(short = 'c')]
    pub compile: bool,

    /// Execute the input (or the freshly compiled bytecode).
    #[arg(short = 'e')]
    pub execute: bool,

    /// Bytecode file written by compilation.
    #[arg(short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Configuration file to use instead of the per-user one.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (repeatable).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Trace every executed instruction (requires -vvv or RUST_LOG=trace).
    #[arg(long = "trace")]
    pub trace: bool,

    /// Source program or compiled bytecode.
    pub input: PathBuf,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0:#}")]
    Config(anyhow::Error),
    #[error("unable to open {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("compilation has been unsuccessful: {0}")]
    Compile(#[from] CompileError),
    #[error("corrupted bytecode: {0}")]
    Corrupt(VmError),
    #[error("{0}")]
    Io(VmError),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Usage(_) | CliError::Config(_) => 1,
            CliError::Compile(_) => 2,
            CliError::Corrupt(_) => 3,
            CliError::File { .. } => 4,
            CliError::Io(_) => 5,
        }
    }
}

impl From<VmError> for CliError {
    fn from(err: VmError) -> Self {
        if err.is_corrupt() {
            CliError::Corrupt(err)
        } else {
            CliError::Io(err)
        }
    }
}

/// Where compiled bytecode ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Compile-and-run without keeping the bytecode.
    InMemory,
    File(PathBuf),
}

/// What a single invocation will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub compile: bool,
    pub execute: bool,
    pub destination: Destination,
}

impl Plan {
    pub fn resolve(args: &Args, config: &ToolConfig) -> Result<Self, CliError> {
        let (compile, execute) = if args.compile || args.execute {
            (args.compile, args.execute)
        } else {
            infer_mode(&args.input, config)?
        };

        if !compile && args.output.is_some() {
            return Err(CliError::Usage(
                "explicit output file specified but nothing is going to be compiled".into(),
            ));
        }

        let destination = match (&args.output, args.compile) {
            (Some(path), _) => Destination::File(path.clone()),
            (None, true) => Destination::File(config.default_output.clone()),
            (None, false) => Destination::InMemory,
        };

        Ok(Self {
            compile,
            execute,
            destination,
        })
    }
}

fn infer_mode(input: &Path, config: &ToolConfig) -> Result<(bool, bool), CliError> {
    match input.extension().and_then(|ext| ext.to_str()) {
        None => Ok((true, true)),
        Some(ext) if ext == config.source_extension => Ok((true, true)),
        Some(ext) if ext == config.bytecode_extension => Ok((false, true)),
        Some(_) => Err(CliError::Usage("file extension unrecognised".into())),
    }
}

/// Runs one invocation against the process's stdin and stdout.
pub fn run(args: &Args) -> Result<(), CliError> {
    let config = ToolConfig::load(args.config.as_deref()).map_err(CliError::Config)?;
    let plan = Plan::resolve(args, &config)?;
    info!(?plan, input = %args.input.display(), "resolved invocation");

    let bytecode = if plan.compile {
        Some(compile_input(&args.input, &plan.destination)?)
    } else {
        None
    };

    if plan.execute {
        let code = match bytecode {
            Some(code) => code,
            None => read_file(&args.input)?,
        };
        let options = InterpreterOptions::with_trace(args.trace || config.trace);
        let stdin = io::stdin().lock();
        let stdout = BufWriter::new(io::stdout().lock());
        let stats = vm::execute_with(&code, stdin, stdout, options)
            .inspect_err(|err| warn!(error = %err, "execution aborted"))?;
        info!(
            instructions = stats.instructions,
            output_bytes = stats.output_bytes,
            "execution finished"
        );
    }

    Ok(())
}

fn compile_input(input: &Path, destination: &Destination) -> Result<Vec<u8>, CliError> {
    let source = File::open(input).map_err(|source| CliError::File {
        path: input.to_path_buf(),
        source,
    })?;
    let bytecode = Compiler::new()
        .compile_reader(BufReader::new(source))
        .inspect_err(|err| warn!(error = %err, "compilation aborted"))?
        .into_bytes();

    if let Destination::File(path) = destination {
        let file = File::create(path).map_err(|source| CliError::File {
            path: path.clone(),
            source,
        })?;
        if let Err(err) = write_bytecode(file, &bytecode) {
            let _ = fs::remove_file(path);
            return Err(CompileError::Write(err).into());
        }
        info!(path = %path.display(), bytes = bytecode.len(), "bytecode written");
    }
    Ok(bytecode)
}

fn write_bytecode(file: File, bytecode: &[u8]) -> io::Result<()> {
    let mut writer = BufWriter::new(file);
    writer.write_all(bytecode)?;
    writer.flush()
}

fn read_file(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|source| CliError::File {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["tapescript"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).expect("valid arguments")
    }

    fn plan(argv: &[&str]) -> Result<Plan, CliError> {
        Plan::resolve(&args(argv), &ToolConfig::default())
    }

    #[test]
    fn source_extension_compiles_and_runs_in_memory() {
        let plan = plan(&["hello.bf"]).unwrap();
        assert!(plan.compile && plan.execute);
        assert_eq!(plan.destination, Destination::InMemory);
    }

    #[test]
    fn missing_extension_compiles_and_runs() {
        let plan = plan(&["hello"]).unwrap();
        assert!(plan.compile && plan.execute);
    }

    #[test]
    fn bytecode_extension_only_runs() {
        let plan = plan(&["hello.cf"]).unwrap();
        assert!(!plan.compile && plan.execute);
    }

    #[test]
    fn unknown_extension_is_a_usage_error() {
        let err = plan(&["hello.txt"]).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn compile_only_writes_default_output() {
        let plan = plan(&["-c", "hello.txt"]).unwrap();
        assert!(plan.compile && !plan.execute);
        assert_eq!(plan.destination, Destination::File(PathBuf::from("out.cf")));
    }

    #[test]
    fn combined_flags_compile_and_execute() {
        let plan = plan(&["-ce", "prog"]).unwrap();
        assert!(plan.compile && plan.execute);
        assert_eq!(plan.destination, Destination::File(PathBuf::from("out.cf")));
    }

    #[test]
    fn explicit_output_is_kept() {
        let plan = plan(&["-o", "build/x.cf", "prog.bf"]).unwrap();
        assert!(plan.compile && plan.execute);
        assert_eq!(plan.destination, Destination::File(PathBuf::from("build/x.cf")));
    }

    #[test]
    fn output_without_compilation_is_rejected() {
        let err = plan(&["-e", "-o", "x.cf", "prog.cf"]).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[test]
    fn repeated_output_is_rejected_by_the_parser() {
        assert!(Args::try_parse_from(["tapescript", "-o", "a", "-o", "b", "p.bf"]).is_err());
    }
}
