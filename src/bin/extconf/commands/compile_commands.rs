//! `extconf compile-commands` command

use std::path::Path;

use anyhow::Result;

use super::describe::build_descriptor;
use crate::cli::CompileCommandsArgs;
use extconf::extension::{compile_commands, write_compile_commands};
use extconf::toolchain::CommandSpec;

pub fn execute(args: CompileCommandsArgs, cwd: &Path) -> Result<()> {
    let (desc, root, detected) = build_descriptor(&args.manifest, cwd)?;

    let driver = match (args.cxx, detected) {
        (Some(cxx), _) => CommandSpec::new(cxx),
        (None, Some(detected)) => detected,
        (None, None) => CommandSpec::new(desc.family.default_compiler()),
    };

    let out_dir = root.join(&args.out_dir);
    let commands = compile_commands(&desc, &driver, &root, &out_dir);

    let output = match args.output {
        Some(path) => cwd.join(path),
        None => root.join("compile_commands.json"),
    };
    write_compile_commands(&commands, &output)?;

    Ok(())
}
