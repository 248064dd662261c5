// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `ivysnap`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ivysnap",
    version,
    about = "Recalculate snapshot dependencies from changed Ivy descriptors.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the registry snapshot (TOML).
    #[arg(long, value_name = "PATH", default_value = "Registry.toml")]
    pub registry: String,

    /// Path to the change set to replay (TOML).
    #[arg(long, value_name = "PATH")]
    pub changes: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `IVYSNAP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve and report, but don't write the registry back.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
