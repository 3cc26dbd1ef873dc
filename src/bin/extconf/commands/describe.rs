//! `extconf describe` command
//!
//! Prints the compilation unit the build tool would receive.

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::{load_manifest, select_family};
use crate::cli::{DescribeArgs, ManifestArgs};
use extconf::extension::{assemble, CompilationUnitDescriptor};
use extconf::toolchain::CommandSpec;
use extconf::version::{GitCli, VersionResolver};

pub fn execute(args: DescribeArgs, cwd: &Path) -> Result<()> {
    let desc = build_descriptor(&args.manifest, cwd)?.0;
    println!("{}", serde_json::to_string_pretty(&desc)?);
    Ok(())
}

/// Load the manifest, stamp it, and assemble the descriptor.
///
/// Also returns the manifest directory and the detected compiler command.
pub fn build_descriptor(
    args: &ManifestArgs,
    cwd: &Path,
) -> Result<(CompilationUnitDescriptor, PathBuf, Option<CommandSpec>)> {
    let (manifest, root) = load_manifest(args.manifest.as_deref(), cwd)?;

    let explicit = args
        .compiler
        .as_deref()
        .or(manifest.toolchain.compiler.as_deref());
    let (family, compiler) = select_family(explicit);

    let info = VersionResolver::new(GitCli::new(&root)).resolve();
    let desc = assemble(&manifest, &root, &info, &family)?;

    Ok((desc, root, compiler))
}
