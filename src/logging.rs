//=============================================
// src/logging.rs
//=============================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Tracing setup shared by the TapeScript binaries
// Objective: Route diagnostics to stderr so stdout carries only program output
//=============================================

use std::sync::OnceLock;

use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

static INIT: OnceLock<()> = OnceLock::new();

/// Maps the number of `-v` flags to a default level.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialize tracing once; `RUST_LOG` directives take precedence.
pub fn init(verbosity: u8) {
    INIT.get_or_init(|| {
        let filter = EnvFilter::builder()
            .with_default_directive(level_for(verbosity).into())
            .from_env_lossy();
        SubscriberBuilder::default()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_ansi(true)
            .compact()
            .init();
    });
    tracing::debug!(verbosity, "tracing initialised");
}
