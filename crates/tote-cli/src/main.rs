//! tote CLI - build every bundle of a Node.js package from one version.
//!
//! Parses arguments, initializes logging, and dispatches to the commands.

use clap::Parser;
use miette::Result;
use tote_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Build(build_args) => commands::build_execute(build_args).await,
        cli::Command::Check(check_args) => commands::check_execute(check_args),
        cli::Command::Init(init_args) => commands::init_execute(init_args),
        cli::Command::Verify(verify_args) => commands::verify_execute(verify_args),
    };

    result.map_err(error::cli_error_to_miette)
}
