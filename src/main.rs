//=====================================================
// File: main.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: TapeScript CLI entry point
// Objective: Command-line interface for compiling source programs to bytecode
//            and executing bytecode against the tape machine
//=====================================================

use std::process::ExitCode;

use clap::Parser;
use tapescript::cli::{self, Args};
use tapescript::logging;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    logging::init(args.verbose);

    match cli::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("tapescript: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

//=====================================================
// End of file
//=====================================================
