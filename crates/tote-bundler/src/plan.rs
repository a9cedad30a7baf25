//! Turn declared targets into [`BuildTarget`]s.
//!
//! Define precedence for every target, lowest first:
//! 1. version constants (`version_defines` → JSON string of the version)
//! 2. shim replacements (e.g. `import.meta.url` for CommonJS)
//! 3. the target's own `define` table
//!
//! The prelude is the shim prelude followed by the target's `banner`.

use tote_config::{TargetConfig, ToteConfig, VersionString, validate_schema};

use crate::Result;
use crate::shim::Shim;
use crate::target::BuildTarget;

/// Plan every declared target against one resolved version.
///
/// # Errors
///
/// Returns `Error::Config` if the config fails schema validation.
pub fn plan_targets(config: &ToteConfig, version: &VersionString) -> Result<Vec<BuildTarget>> {
    validate_schema(config)?;

    let version_literal = version.to_js_literal();

    Ok(config
        .targets
        .iter()
        .map(|target| plan_target(target, &config.version_defines, &version_literal))
        .collect())
}

fn plan_target(
    target: &TargetConfig,
    version_defines: &[String],
    version_literal: &str,
) -> BuildTarget {
    let shim = Shim::resolve(target.shim, target.format);

    let mut builder = BuildTarget::builder(&target.name, &target.entry, &target.outfile)
        .format(target.format)
        .platform(target.platform)
        .external(target.external.iter().cloned());

    for key in version_defines {
        builder = builder.define(key, version_literal);
    }
    for (key, value) in shim.defines() {
        builder = builder.define(*key, *value);
    }
    for (key, value) in &target.define {
        builder = builder.define(key, value);
    }

    let prelude = match (shim.prelude(), target.banner.as_deref()) {
        (Some(shim_text), Some(banner)) => Some(format!("{shim_text}\n{banner}")),
        (Some(shim_text), None) => Some(shim_text.to_string()),
        (None, Some(banner)) => Some(banner.to_string()),
        (None, None) => None,
    };
    if let Some(prelude) = prelude {
        builder = builder.prelude(prelude);
    }

    let planned = builder.build();
    tracing::debug!(
        target_name = planned.name(),
        format = ?planned.format(),
        ?shim,
        externals = planned.external().len(),
        defines = planned.define().len(),
        "planned build target"
    );
    planned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shim::{CJS_IMPORT_META_PRELUDE, ESM_RUNTIME_PRELUDE};
    use tote_config::{DEFAULT_API_EXTERNALS, OutputFormat, ShimMode};

    fn planned_defaults(version: &str) -> Vec<BuildTarget> {
        plan_targets(&ToteConfig::default(), &VersionString::new(version)).unwrap()
    }

    #[test]
    fn every_target_embeds_the_same_version() {
        for target in planned_defaults("1.2.3") {
            assert_eq!(
                target.define().get("process.env.CLI_VERSION").map(String::as_str),
                Some("\"1.2.3\""),
                "target {}",
                target.name()
            );
        }
    }

    #[test]
    fn default_layout_matches_three_bundles() {
        let targets = planned_defaults("0.1.0");
        let summary: Vec<_> = targets
            .iter()
            .map(|t| (t.name(), t.output_path().to_str().unwrap(), t.format()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("cli", "bundle/gemini.js", OutputFormat::Esm),
                ("api-esm", "bundle/api.js", OutputFormat::Esm),
                ("api-cjs", "bundle/api.cjs", OutputFormat::Cjs),
            ]
        );
    }

    #[test]
    fn esm_targets_get_runtime_prelude() {
        let targets = planned_defaults("0.1.0");
        assert_eq!(targets[0].prelude(), Some(ESM_RUNTIME_PRELUDE));
        assert_eq!(targets[1].prelude(), Some(ESM_RUNTIME_PRELUDE));
    }

    #[test]
    fn cjs_target_replaces_import_meta_url() {
        let targets = planned_defaults("0.1.0");
        let cjs = &targets[2];
        assert_eq!(cjs.prelude(), Some(CJS_IMPORT_META_PRELUDE));
        assert_eq!(
            cjs.define().get("import.meta.url").map(String::as_str),
            Some("_importMetaUrl")
        );
    }

    #[test]
    fn only_api_targets_have_externals() {
        let targets = planned_defaults("0.1.0");
        assert!(targets[0].external().is_empty());
        for api in &targets[1..] {
            assert_eq!(api.external().len(), DEFAULT_API_EXTERNALS.len());
            assert!(api.is_external("@google/genai"));
            assert!(api.is_external("zlib"));
        }
    }

    #[test]
    fn user_define_overrides_version_define() {
        let config = ToteConfig {
            targets: vec![
                TargetConfig::new("t", "a.ts", "a.js").define("process.env.CLI_VERSION", "\"dev\""),
            ],
            ..ToteConfig::default()
        };
        let targets = plan_targets(&config, &VersionString::new("9.9.9")).unwrap();
        assert_eq!(
            targets[0].define().get("process.env.CLI_VERSION").map(String::as_str),
            Some("\"dev\"")
        );
    }

    #[test]
    fn banner_follows_shim_prelude() {
        let config = ToteConfig {
            targets: vec![TargetConfig::new("t", "a.ts", "a.js").banner("/* license */")],
            ..ToteConfig::default()
        };
        let targets = plan_targets(&config, &VersionString::new("1.0.0")).unwrap();
        let prelude = targets[0].prelude().unwrap();
        assert!(prelude.starts_with(ESM_RUNTIME_PRELUDE));
        assert!(prelude.ends_with("\n/* license */"));
    }

    #[test]
    fn shim_none_without_banner_has_no_prelude() {
        let config = ToteConfig {
            targets: vec![TargetConfig::new("t", "a.ts", "a.js").shim(ShimMode::None)],
            ..ToteConfig::default()
        };
        let targets = plan_targets(&config, &VersionString::new("1.0.0")).unwrap();
        assert!(targets[0].prelude().is_none());
    }

    #[test]
    fn invalid_config_is_not_planned() {
        let config = ToteConfig {
            targets: vec![],
            ..ToteConfig::default()
        };
        assert!(plan_targets(&config, &VersionString::new("1.0.0")).is_err());
    }
}
