use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available tote subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build all declared bundles
    ///
    /// Resolves the package version once, bundles every target concurrently,
    /// and writes the outputs only if all of them succeed.
    Build(BuildArgs),

    /// Validate configuration and show the planned targets
    Check(CheckArgs),

    /// Write a tote.toml with the default targets
    Init(InitArgs),

    /// Run the artifact checks against outputs already on disk
    Verify(VerifyArgs),
}

/// Arguments for the build command
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Config file (tote.toml or tote.json), relative to the project root
    ///
    /// Defaults to discovery: tote.toml, tote.json, then the "tote" field
    /// of package.json. Built-in targets apply when nothing is found.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root
    ///
    /// Entry points, outputs and the package descriptor are resolved
    /// relative to this directory. Defaults to the current directory.
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Package descriptor holding the version (overrides config)
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Only build the named targets (repeatable)
    ///
    /// Examples:
    ///   tote build --only cli
    ///   tote build --only api-esm --only api-cjs
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,
}

/// Arguments for the check command
#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Config file (tote.toml or tote.json), relative to the project root
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Print the JSON Schema of the config file and exit
    #[arg(long)]
    pub schema: bool,
}

/// Arguments for the init command
#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Directory to write tote.toml into
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Overwrite an existing tote.toml
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the verify command
#[derive(Args, Debug, Default)]
pub struct VerifyArgs {
    /// Config file (tote.toml or tote.json), relative to the project root
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Project root
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}
