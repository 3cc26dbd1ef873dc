//! Assembly of an extension module's compilation unit.
//!
//! Combines the manifest's sources, include directory, and defines with the
//! version stamp and the toolchain flags into a [`CompilationUnitDescriptor`]
//! for the external build tool. Nothing here runs a compiler.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::toolchain::CompilerFamily;
use crate::util::config::{DefineValue, ExtensionManifest};
use crate::version::BuildInfo;

pub mod compile_commands;

pub use compile_commands::{compile_commands, write_compile_commands, CompileCommand};

/// A preprocessor definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Define {
    pub name: String,
    pub value: Option<String>,
}

impl Define {
    /// `NAME` with no value.
    pub fn flag(name: impl Into<String>) -> Self {
        Define {
            name: name.into(),
            value: None,
        }
    }

    /// `NAME=value`, value used verbatim.
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Define {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// `NAME="value"`, value quoted and escaped as a C string literal.
    pub fn string_literal(name: impl Into<String>, value: &str) -> Self {
        let mut literal = String::with_capacity(value.len() + 2);
        literal.push('"');
        for c in value.chars() {
            match c {
                '"' => literal.push_str("\\\""),
                '\\' => literal.push_str("\\\\"),
                c => literal.push(c),
            }
        }
        literal.push('"');
        Define::with_value(name, literal)
    }

    /// Render as a command-line option for `family`.
    pub fn to_flag(&self, family: &CompilerFamily) -> String {
        let prefix = if family.is_msvc_style() { "/D" } else { "-D" };
        match &self.value {
            Some(v) => format!("{}{}={}", prefix, self.name, v),
            None => format!("{}{}", prefix, self.name),
        }
    }
}

/// Everything the build tool needs to compile one extension module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilationUnitDescriptor {
    /// Module name
    pub name: String,
    /// Compiler family the flags were selected for
    pub family: CompilerFamily,
    /// Source files, sorted and de-duplicated
    pub sources: Vec<PathBuf>,
    /// The single include directory
    pub include_dir: PathBuf,
    /// Preprocessor definitions, provenance pair last
    pub defines: Vec<Define>,
    /// Compiler arguments applied to every source
    pub flags: Vec<String>,
    /// Stamp the provenance definitions were built from
    pub build_info: BuildInfo,
}

/// Assemble the descriptor for `manifest`, resolving paths against `root`.
pub fn assemble(
    manifest: &ExtensionManifest,
    root: &Path,
    build_info: &BuildInfo,
    family: &CompilerFamily,
) -> Result<CompilationUnitDescriptor> {
    let ext = &manifest.extension;

    let sources = expand_sources(root, &ext.sources)?;
    if sources.is_empty() {
        bail!(
            "extension `{}` has no source files\n\
             help: Add files or glob patterns to `sources` in the [extension] section",
            ext.name
        );
    }

    let mut defines: Vec<Define> = ext
        .defines
        .iter()
        .filter_map(|(name, value)| match value {
            DefineValue::Enabled(true) => Some(Define::flag(name)),
            DefineValue::Enabled(false) => None,
            DefineValue::Value(v) => Some(Define::with_value(name, v)),
        })
        .collect();

    let stamp = &manifest.stamp;
    defines.push(Define::string_literal(
        &stamp.time_define,
        build_info.commit_timestamp(),
    ));
    defines.push(Define::string_literal(
        &stamp.hash_define,
        build_info.commit_id(),
    ));

    let mut flags = family.flags();
    flags.extend(manifest.toolchain.extra_flags.iter().cloned());

    tracing::debug!(
        "Assembled `{}`: {} sources, {} defines, flags for `{}`",
        ext.name,
        sources.len(),
        defines.len(),
        family
    );

    Ok(CompilationUnitDescriptor {
        name: ext.name.clone(),
        family: family.clone(),
        sources,
        include_dir: root.join(&ext.include_dir),
        defines,
        flags,
        build_info: build_info.clone(),
    })
}

/// Expand source entries relative to `root`.
///
/// Entries without glob metacharacters are taken as literal paths; the rest
/// are glob patterns where `**` crosses directories. Metacharacters in `root`
/// itself match literally.
pub fn expand_sources(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();
    let escaped_root = PathBuf::from(glob::Pattern::escape(&root.to_string_lossy()));

    for pattern in patterns {
        if !is_glob(pattern) {
            let path = root.join(pattern);
            if !path.is_file() {
                tracing::warn!("Source file not found: {}", path.display());
            }
            sources.push(path);
            continue;
        }

        let full = escaped_root.join(pattern);
        let full = full.to_string_lossy();
        let entries =
            glob::glob(&full).with_context(|| format!("invalid source pattern `{}`", pattern))?;

        let mut matched = 0usize;
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    sources.push(path);
                    matched += 1;
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping unreadable path: {}", e),
            }
        }

        if matched == 0 {
            tracing::warn!("Source pattern `{}` matched no files", pattern);
        }
    }

    sources.sort();
    sources.dedup();
    Ok(sources)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}
