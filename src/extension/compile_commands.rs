//! Per-source compile commands and `compile_commands.json` output.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::toolchain::{CommandSpec, CompilerFamily};

use super::CompilationUnitDescriptor;

/// compile_commands.json entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileCommand {
    pub directory: String,
    pub file: String,
    pub arguments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Build the command compiling `source` into `output`.
///
/// Every source of a descriptor gets the same include directory, defines,
/// and flags; only the input and output paths differ.
/// `driver` is the program plus any leading words (`ccache g++`).
pub fn compile_command(
    desc: &CompilationUnitDescriptor,
    driver: &CommandSpec,
    source: &Path,
    output: &Path,
) -> CommandSpec {
    let family = &desc.family;
    let mut cmd = driver.clone();

    if family.is_msvc_style() {
        // Quiet logo, compile only, force C++
        cmd = cmd.args(["/nologo", "/c", "/TP", "/EHsc"]);
        cmd = cmd.arg(format!("/I{}", desc.include_dir.display()));
    } else {
        cmd = cmd.arg("-c");
        cmd = cmd.arg(format!("-I{}", desc.include_dir.display()));
    }

    cmd = cmd.args(desc.defines.iter().map(|d| d.to_flag(family)));
    cmd = cmd.args(desc.flags.iter().cloned());

    if family.is_msvc_style() {
        cmd = cmd.arg(source.display().to_string());
        cmd = cmd.arg(format!("/Fo{}", output.display()));
    } else {
        cmd = cmd.arg(source.display().to_string());
        cmd = cmd.arg("-o");
        cmd = cmd.arg(output.display().to_string());
    }

    cmd
}

/// Object path for `source`: its path below `root` mirrored under `out_dir`,
/// with the object extension appended to the full file name (`a.cpp.o`).
///
/// Sources outside `root` land directly in `out_dir`.
pub fn object_path(
    source: &Path,
    root: &Path,
    out_dir: &Path,
    family: &CompilerFamily,
) -> PathBuf {
    let rel = source
        .strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| source.file_name().map(PathBuf::from).unwrap_or_default());

    let mut object = out_dir.join(rel).into_os_string();
    object.push(".");
    object.push(family.object_extension());
    PathBuf::from(object)
}

/// One compilation-database entry per source.
///
/// Two sources mapping to the same object file are reported at warn level;
/// both commands are still emitted.
pub fn compile_commands(
    desc: &CompilationUnitDescriptor,
    driver: &CommandSpec,
    root: &Path,
    out_dir: &Path,
) -> Vec<CompileCommand> {
    let mut seen = HashSet::new();

    desc.sources
        .iter()
        .map(|source| {
            let output = object_path(source, root, out_dir, &desc.family);
            if !seen.insert(output.clone()) {
                tracing::warn!(
                    "Object file {} is produced by more than one source (last: {})",
                    output.display(),
                    source.display()
                );
            }
            let spec = compile_command(desc, driver, source, &output);

            CompileCommand {
                directory: root.display().to_string(),
                file: source.display().to_string(),
                arguments: spec.to_argv(),
                output: Some(output.display().to_string()),
            }
        })
        .collect()
}

/// Write `commands` as a JSON compilation database.
pub fn write_compile_commands(commands: &[CompileCommand], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(commands)?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::info!("Wrote {} compile commands to {}", commands.len(), path.display());
    Ok(())
}
