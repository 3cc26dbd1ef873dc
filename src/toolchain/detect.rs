//! Compiler detection for when the build tool does not name a family.
//!
//! Detection priority:
//! 1. `CXX`, then `CC` environment variables, split on whitespace so that
//!    launcher prefixes (`ccache g++`) and extra options (`g++ -m32`) survive.
//!    Shell quoting is not interpreted.
//! 2. On Windows, `cl` on PATH
//! 3. `c++`, `g++`, `clang++`, `cc` on PATH

use std::path::{Path, PathBuf};

use crate::util::process::{find_executable, CommandRunner, ProcessBuilder, SystemRunner};

use super::{CommandSpec, CompilerFamily};

/// A compiler found on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedCompiler {
    /// Program to run: the driver, or a launcher such as `ccache`
    pub path: PathBuf,
    /// Words that followed the program in `CXX`/`CC`
    pub args: Vec<String>,
    /// Family the driver belongs to
    pub family: CompilerFamily,
}

impl DetectedCompiler {
    /// The command prefix every compile command starts with.
    pub fn command(&self) -> CommandSpec {
        CommandSpec::new(&self.path).args(self.args.iter().cloned())
    }

    /// The compiler itself: the last word that isn't an option.
    fn driver(&self) -> &Path {
        self.args
            .iter()
            .rev()
            .find(|arg| !arg.starts_with('-'))
            .map(Path::new)
            .unwrap_or(self.path.as_path())
    }
}

/// Detect the C++ compiler from the environment and PATH.
pub fn detect_compiler() -> Option<DetectedCompiler> {
    detect_with(
        |key| std::env::var(key).ok(),
        find_executable,
        &SystemRunner,
    )
}

fn detect_with<E, F, R>(env: E, find: F, runner: &R) -> Option<DetectedCompiler>
where
    E: Fn(&str) -> Option<String>,
    F: Fn(&str) -> Option<PathBuf>,
    R: CommandRunner,
{
    let from_env = ["CXX", "CC"]
        .into_iter()
        .filter_map(|key| env(key))
        .find_map(|value| {
            let mut words = value.split_whitespace().map(str::to_string);
            let program = words.next()?;
            Some((PathBuf::from(program), words.collect::<Vec<_>>()))
        });

    let (path, args) = match from_env {
        Some((path, args)) => {
            tracing::debug!("Using compiler from environment: {}", path.display());
            (path, args)
        }
        None => {
            let candidates: &[&str] = if cfg!(target_os = "windows") {
                &["cl", "c++", "g++", "clang++", "cc"]
            } else {
                &["c++", "g++", "clang++", "cc"]
            };
            let found = candidates.iter().find_map(|name| find(*name));
            let Some(path) = found else {
                tracing::debug!("No C++ compiler found on PATH");
                return None;
            };
            (path, Vec::new())
        }
    };

    let mut detected = DetectedCompiler {
        path,
        args,
        family: CompilerFamily::FALLBACK,
    };
    detected.family = match family_for_compiler(detected.driver()) {
        Some(family) => family,
        None => probe_family(&detected, runner),
    };

    tracing::debug!(
        "Detected compiler `{}` ({})",
        detected.command().to_argv().join(" "),
        detected.family
    );

    Some(detected)
}

/// Infer the family from the compiler's file name.
///
/// Returns `None` for generic driver names (`cc`, `c++`) whose family can
/// only be told by running them.
pub fn family_for_compiler(path: &Path) -> Option<CompilerFamily> {
    let name = path
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase();

    match name.as_str() {
        "cl" | "clang-cl" => Some(CompilerFamily::WindowsNative),
        "cc" | "c++" => None,
        n if n.contains("gcc") || n.contains("g++") => Some(CompilerFamily::GnuCompatible),
        _ => Some(CompilerFamily::GenericUnix),
    }
}

/// Ask a generic driver what it is via `--version`.
fn probe_family<R: CommandRunner>(compiler: &DetectedCompiler, runner: &R) -> CompilerFamily {
    let cmd = ProcessBuilder::new(&compiler.path)
        .args(&compiler.args)
        .arg("--version");

    match runner.run(&cmd) {
        Ok(output) if output.success() => {
            let stdout = String::from_utf8_lossy(&output.stdout).to_lowercase();
            if stdout.contains("clang") {
                CompilerFamily::GenericUnix
            } else if stdout.contains("gcc") || stdout.contains("free software foundation") {
                CompilerFamily::GnuCompatible
            } else {
                CompilerFamily::GenericUnix
            }
        }
        _ => {
            tracing::debug!(
                "Could not probe `{}`, assuming generic Unix",
                cmd.display_command()
            );
            CompilerFamily::GenericUnix
        }
    }
}
