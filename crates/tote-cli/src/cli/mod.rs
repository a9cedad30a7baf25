//! Command-line interface definition.
//!
//! - `tote build` - bundle every target and commit them together
//! - `tote check` - validate config and show the planned targets
//! - `tote init` - write a `tote.toml` with the default targets
//! - `tote verify` - re-run the artifact checks on existing outputs

mod commands;

use clap::Parser;

pub use commands::{BuildArgs, CheckArgs, Command, InitArgs, VerifyArgs};

/// tote - build every bundle of a Node.js package from one version
#[derive(Parser, Debug)]
#[command(
    name = "tote",
    version,
    about = "Build every bundle of a Node.js package from one version",
    long_about = "tote reads the package version once, embeds it into every declared bundle,\n\
                  adds the runtime shims each output format needs, and builds all bundles\n\
                  concurrently. Outputs are only written when every bundle succeeded."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}
