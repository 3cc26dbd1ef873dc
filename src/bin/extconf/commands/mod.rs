//! Command implementations

pub mod compile_commands;
pub mod completions;
pub mod describe;
pub mod flags;
pub mod stamp;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use extconf::toolchain::{detect_compiler, CommandSpec, CompilerFamily};
use extconf::util::config::{find_manifest, ExtensionManifest, MANIFEST_FILE};

/// Resolve the `-C` directory against the process working directory.
pub fn working_dir(directory: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("failed to read the current directory")?;
    Ok(match directory {
        Some(dir) => cwd.join(dir),
        None => cwd,
    })
}

/// Choose the compiler family and driver.
///
/// Order: explicit identifier, then detection, then the fallback family.
/// A driver command is only known when it was detected.
pub fn select_family(explicit: Option<&str>) -> (CompilerFamily, Option<CommandSpec>) {
    if let Some(key) = explicit {
        return (CompilerFamily::from_key(key), None);
    }

    match detect_compiler() {
        Some(detected) => {
            let driver = detected.command();
            (detected.family, Some(driver))
        }
        None => {
            tracing::warn!(
                "No compiler detected, using `{}` flags",
                CompilerFamily::FALLBACK
            );
            (CompilerFamily::FALLBACK, None)
        }
    }
}

/// Load the manifest, returning it with the directory it lives in.
pub fn load_manifest(explicit: Option<&Path>, cwd: &Path) -> Result<(ExtensionManifest, PathBuf)> {
    let path = match explicit {
        Some(path) => cwd.join(path),
        None => find_manifest(cwd).with_context(|| {
            format!(
                "could not find `{}` in {} or any parent directory",
                MANIFEST_FILE,
                cwd.display()
            )
        })?,
    };

    let manifest = ExtensionManifest::load(&path)?;
    let root = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| cwd.to_path_buf());

    Ok((manifest, root))
}
