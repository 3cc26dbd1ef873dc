//! Extension manifest (`extconf.toml`) support.
//!
//! The manifest declares what goes into one extension module:
//!
//! ```toml
//! [extension]
//! name = "richdem._richdem"
//! sources = ["src/pywrapper.cpp", "lib/richdem/src/**/*.cpp"]
//! include_dir = "lib/richdem/include"
//!
//! [extension.defines]
//! DOCTEST_CONFIG_DISABLE = true
//! _USE_MATH_DEFINES = true
//!
//! [stamp]
//! hash_define = "RICHDEM_GIT_HASH"
//! time_define = "RICHDEM_COMPILE_TIME"
//!
//! [toolchain]
//! compiler = "gcc"
//! extra_flags = ["-g"]
//! ```
//!
//! Relative paths are resolved against the directory holding the manifest.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default manifest file name.
pub const MANIFEST_FILE: &str = "extconf.toml";

/// Parsed extension manifest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionManifest {
    /// The extension module itself
    pub extension: ExtensionSection,

    /// Names of the provenance definitions
    pub stamp: StampSection,

    /// Compiler selection overrides
    pub toolchain: ToolchainSection,
}

/// `[extension]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionSection {
    /// Module name handed to the build tool
    pub name: String,

    /// Source files or glob patterns (`**` is recursive)
    pub sources: Vec<String>,

    /// The single include directory
    pub include_dir: PathBuf,

    /// Extra preprocessor definitions
    pub defines: BTreeMap<String, DefineValue>,
}

impl Default for ExtensionSection {
    fn default() -> Self {
        ExtensionSection {
            name: "extension".to_string(),
            sources: Vec::new(),
            include_dir: PathBuf::from("include"),
            defines: BTreeMap::new(),
        }
    }
}

/// Value of a manifest define: `NAME = true` for a bare define, `NAME = "v"`
/// for `NAME=v`. `NAME = false` leaves it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefineValue {
    Enabled(bool),
    Value(String),
}

/// `[stamp]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StampSection {
    /// Definition carrying the commit identifier
    pub hash_define: String,

    /// Definition carrying the commit timestamp
    pub time_define: String,
}

impl Default for StampSection {
    fn default() -> Self {
        StampSection {
            hash_define: "GIT_HASH".to_string(),
            time_define: "COMPILE_TIME".to_string(),
        }
    }
}

/// `[toolchain]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSection {
    /// Compiler family key (`msvc`, `gcc`, `unix`, ...); detected when absent
    pub compiler: Option<String>,

    /// Flags appended after the profile flags
    pub extra_flags: Vec<String>,
}

impl ExtensionManifest {
    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    /// Parse manifest contents.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

/// Search `start` and its ancestors for an `extconf.toml`.
pub fn find_manifest(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(MANIFEST_FILE))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_manifest() {
        let manifest = ExtensionManifest::parse(
            r#"
            [extension]
            name = "richdem._richdem"
            sources = ["src/pywrapper.cpp", "lib/richdem/src/**/*.cpp"]
            include_dir = "lib/richdem/include"

            [extension.defines]
            DOCTEST_CONFIG_DISABLE = true
            _USE_MATH_DEFINES = true
            LEVEL = "2"
            DISABLED = false

            [stamp]
            hash_define = "RICHDEM_GIT_HASH"
            time_define = "RICHDEM_COMPILE_TIME"

            [toolchain]
            compiler = "gcc"
            extra_flags = ["-g"]
            "#,
        )
        .unwrap();

        assert_eq!(manifest.extension.name, "richdem._richdem");
        assert_eq!(manifest.extension.sources.len(), 2);
        assert_eq!(
            manifest.extension.include_dir,
            PathBuf::from("lib/richdem/include")
        );
        assert_eq!(
            manifest.extension.defines.get("LEVEL"),
            Some(&DefineValue::Value("2".to_string()))
        );
        assert_eq!(
            manifest.extension.defines.get("DISABLED"),
            Some(&DefineValue::Enabled(false))
        );
        assert_eq!(manifest.stamp.hash_define, "RICHDEM_GIT_HASH");
        assert_eq!(manifest.toolchain.compiler.as_deref(), Some("gcc"));
        assert_eq!(manifest.toolchain.extra_flags, vec!["-g".to_string()]);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let manifest = ExtensionManifest::parse(
            r#"
            [extension]
            sources = ["src/*.cpp"]
            "#,
        )
        .unwrap();

        assert_eq!(manifest.extension.name, "extension");
        assert_eq!(manifest.stamp.hash_define, "GIT_HASH");
        assert_eq!(manifest.stamp.time_define, "COMPILE_TIME");
        assert!(manifest.toolchain.compiler.is_none());
    }

    #[test]
    fn test_parse_error_is_reported() {
        assert!(ExtensionManifest::parse("[extension\nname = 1").is_err());
    }

    #[test]
    fn test_find_manifest_searches_ancestors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(tmp.path().join(MANIFEST_FILE), "").unwrap();

        assert_eq!(
            find_manifest(&nested),
            Some(tmp.path().join(MANIFEST_FILE))
        );
    }
}
