//! Runtime-compatibility preludes.
//!
//! Node.js gives CommonJS modules `require` and `__dirname`, and gives ES
//! modules `import.meta.url`. Bundled dependencies often assume the helpers
//! of the other format. Instead of patching them one by one, a short
//! prelude is placed ahead of all bundled code to rebuild the missing
//! helpers once per bundle.

use tote_config::{OutputFormat, ShimMode};

/// Prelude for ESM bundles.
///
/// Provides `__dirname` without touching `globalThis`, and a real CommonJS
/// `require` bound to the bundle's own URL via `createRequire`, so dynamic
/// requires resolve relative to the bundle instead of throwing at runtime.
/// The helper imports carry a `__cc_` prefix to stay clear of bundled names.
pub const ESM_RUNTIME_PRELUDE: &str = concat!(
    "import { createRequire as __cc_createRequire } from 'module';",
    " import { fileURLToPath as __cc_fileURLToPath } from 'url';",
    " import * as __cc_path from 'path';",
    " const require = __cc_createRequire(import.meta.url);",
    " const __dirname = __cc_path.dirname(__cc_fileURLToPath(import.meta.url));",
);

/// The ESM-only module identity expression.
pub const IMPORT_META_URL: &str = "import.meta.url";

/// Identifier substituted for `import.meta.url` in CommonJS bundles.
pub const CJS_IMPORT_META_PLACEHOLDER: &str = "_importMetaUrl";

/// Prelude for CommonJS bundles: derives the placeholder from `__filename`.
pub const CJS_IMPORT_META_PRELUDE: &str =
    "const _importMetaUrl=require('url').pathToFileURL(__filename)";

/// A resolved shim for one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shim {
    None,
    EsmRuntime,
    CjsImportMeta,
}

impl Shim {
    /// Resolve the configured mode against the target's output format.
    ///
    /// `Auto` selects the shim that matches the format.
    pub fn resolve(mode: ShimMode, format: OutputFormat) -> Self {
        match mode {
            ShimMode::None => Shim::None,
            ShimMode::EsmRuntime => Shim::EsmRuntime,
            ShimMode::CjsImportMeta => Shim::CjsImportMeta,
            ShimMode::Auto => match format {
                OutputFormat::Esm => Shim::EsmRuntime,
                OutputFormat::Cjs => Shim::CjsImportMeta,
            },
        }
    }

    pub fn prelude(self) -> Option<&'static str> {
        match self {
            Shim::None => None,
            Shim::EsmRuntime => Some(ESM_RUNTIME_PRELUDE),
            Shim::CjsImportMeta => Some(CJS_IMPORT_META_PRELUDE),
        }
    }

    /// Compile-time replacements the shim relies on.
    pub fn defines(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Shim::CjsImportMeta => &[(IMPORT_META_URL, CJS_IMPORT_META_PLACEHOLDER)],
            Shim::None | Shim::EsmRuntime => &[],
        }
    }
}

/// Place `prelude` ahead of all emitted code.
///
/// A leading hashbang line stays on the first line so executable bundles
/// keep working; the prelude follows it directly.
pub fn apply_prelude(prelude: Option<&str>, code: &str) -> String {
    let Some(prelude) = prelude else {
        return code.to_string();
    };

    let (hashbang, rest) = split_hashbang(code);
    let mut out = String::with_capacity(hashbang.len() + prelude.len() + rest.len() + 1);
    out.push_str(hashbang);
    out.push_str(prelude);
    out.push('\n');
    out.push_str(rest);
    out
}

/// Strip the hashbang line (if any) from emitted code.
pub(crate) fn split_hashbang(code: &str) -> (&str, &str) {
    if !code.starts_with("#!") {
        return ("", code);
    }
    match code.find('\n') {
        Some(end) => code.split_at(end + 1),
        None => (code, ""),
    }
}
