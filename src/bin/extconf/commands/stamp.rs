//! `extconf stamp` command

use std::path::Path;

use anyhow::Result;

use crate::cli::StampArgs;
use extconf::version::{GitCli, VersionResolver};

pub fn execute(args: StampArgs, cwd: &Path) -> Result<()> {
    let repo = match args.repo {
        Some(repo) => cwd.join(repo),
        None => cwd.to_path_buf(),
    };

    let resolver = VersionResolver::new(GitCli::new(repo));
    let info = if args.strict {
        resolver.resolve_checked()?
    } else {
        resolver.resolve()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("commit: {}", info.commit_id());
        println!("time:   {}", info.commit_timestamp());
    }

    Ok(())
}
