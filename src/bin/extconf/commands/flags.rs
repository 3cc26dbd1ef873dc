//! `extconf flags` command

use anyhow::Result;

use super::select_family;
use crate::cli::FlagsArgs;

pub fn execute(args: FlagsArgs) -> Result<()> {
    let (family, _) = select_family(args.compiler.as_deref());
    let flags = family.flags();

    if args.json {
        println!("{}", serde_json::to_string(&flags)?);
    } else {
        println!("# Compile flags for `{}`:", family);
        for flag in &flags {
            println!("  {}", flag);
        }
    }

    Ok(())
}
