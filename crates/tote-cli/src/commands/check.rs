//! Check command implementation.
//!
//! Validates configuration, entry points and the version source without
//! bundling.

use tote_bundler::plan_targets;
use tote_config::{ToteConfig, resolve_version, validate_fs};

use crate::cli::CheckArgs;
use crate::commands::utils;
use crate::error::{Result, ResultExt};
use crate::ui;

/// Execute the check command.
///
/// With `--schema`, prints the config JSON Schema to stdout and returns.
pub fn execute(args: CheckArgs) -> Result<()> {
    if args.schema {
        println!("{}", serde_json::to_string_pretty(&ToteConfig::json_schema())?);
        return Ok(());
    }

    ui::info("Checking configuration...");
    let root = utils::resolve_project_root(args.cwd.as_deref())?;
    let config = utils::load_config(&root, args.config.as_deref())?;

    validate_fs(&config, &root)?;
    ui::success("Configuration is valid");

    let manifest_path = utils::resolve_path(&config.manifest, &root);
    let version = resolve_version(&manifest_path).with_hint(utils::MANIFEST_HINT)?;
    ui::success(&format!(
        "Version {} from {}",
        version,
        utils::display_relative(&manifest_path, &root)
    ));

    let targets = plan_targets(&config, &version)?;
    for target in &targets {
        println!(
            "{}\t{}\t{}\t{:?}\texternal={}\tdefines={}",
            target.name(),
            target.entry_point().display(),
            target.output_path().display(),
            target.format(),
            target.external().len(),
            target.define().len(),
        );
    }

    ui::success("All checks passed!");
    Ok(())
}
