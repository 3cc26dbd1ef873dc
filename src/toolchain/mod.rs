//! Compiler families and the flags each one receives.
//!
//! The build tool names its active compiler with a loose string (`"msvc"`,
//! `"unix"`, `"mingw32"`, ...). That string is normalized into a
//! [`CompilerFamily`] and looked up in a fixed table of [`ToolchainProfile`]s.
//! Unknown names are not an error: they get the generic Unix flags.

use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Serialize, Serializer};

mod detect;

pub use detect::{detect_compiler, family_for_compiler, DetectedCompiler};

/// Flags for the Windows-native compiler: standard and moderate optimization.
pub const MSVC_FLAGS: &[&str] = &["/std:c++17", "/O2"];

/// Flags for GNU-compatible and generic Unix compilers.
///
/// Symbols are hidden unless exported, and unknown pragmas are not warned
/// about since the sources carry pragmas for other compilers.
pub const UNIX_FLAGS: &[&str] = &[
    "-std=c++17",
    "-O3",
    "-fvisibility=hidden",
    "-Wno-unknown-pragmas",
];

/// One entry of the flag table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolchainProfile {
    /// Family key as supplied by the build tool
    pub key: &'static str,
    /// Ordered compiler arguments
    pub flags: &'static [&'static str],
}

/// The flag table. `gcc` and `unix` are separate keys even though their
/// flags are currently the same.
pub static PROFILES: [ToolchainProfile; 3] = [
    ToolchainProfile {
        key: "msvc",
        flags: MSVC_FLAGS,
    },
    ToolchainProfile {
        key: "gcc",
        flags: UNIX_FLAGS,
    },
    ToolchainProfile {
        key: "unix",
        flags: UNIX_FLAGS,
    },
];

/// The compiler family a module is built with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompilerFamily {
    /// Microsoft Visual C++ (`msvc`)
    WindowsNative,
    /// GCC proper (`gcc`)
    GnuCompatible,
    /// Any Unix `cc`-style driver (`unix`); also the fallback
    GenericUnix,
    /// An identifier not in the table, kept verbatim
    Other(String),
}

impl CompilerFamily {
    /// The family unrecognized identifiers are routed to.
    pub const FALLBACK: CompilerFamily = CompilerFamily::GenericUnix;

    /// Normalize a build-tool identifier. Matching is exact.
    pub fn from_key(key: &str) -> Self {
        match key {
            "msvc" => CompilerFamily::WindowsNative,
            "gcc" => CompilerFamily::GnuCompatible,
            "unix" => CompilerFamily::GenericUnix,
            other => CompilerFamily::Other(other.to_string()),
        }
    }

    /// The identifier this family was created from.
    pub fn key(&self) -> &str {
        match self {
            CompilerFamily::WindowsNative => "msvc",
            CompilerFamily::GnuCompatible => "gcc",
            CompilerFamily::GenericUnix => "unix",
            CompilerFamily::Other(key) => key,
        }
    }

    /// The table entry used for this family.
    pub fn profile(&self) -> &'static ToolchainProfile {
        let index = match self {
            CompilerFamily::WindowsNative => 0,
            CompilerFamily::GnuCompatible => 1,
            CompilerFamily::GenericUnix | CompilerFamily::Other(_) => 2,
        };
        &PROFILES[index]
    }

    /// Ordered compiler arguments for this family.
    pub fn flags(&self) -> Vec<String> {
        self.profile().flags.iter().map(|f| f.to_string()).collect()
    }

    /// Whether the family takes MSVC-style (`/D`, `/I`) options.
    pub fn is_msvc_style(&self) -> bool {
        matches!(self, CompilerFamily::WindowsNative)
    }

    /// Default compiler driver for the family.
    pub fn default_compiler(&self) -> PathBuf {
        match self {
            CompilerFamily::WindowsNative => PathBuf::from("cl"),
            CompilerFamily::GnuCompatible => PathBuf::from("g++"),
            CompilerFamily::GenericUnix | CompilerFamily::Other(_) => PathBuf::from("c++"),
        }
    }

    /// Object file extension produced by the family's compiler.
    pub fn object_extension(&self) -> &'static str {
        if self.is_msvc_style() {
            "obj"
        } else {
            "o"
        }
    }
}

impl FromStr for CompilerFamily {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CompilerFamily::from_key(s))
    }
}

impl fmt::Display for CompilerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for CompilerFamily {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

/// Flags for the compiler family named by `compiler_family`.
///
/// Never fails: identifiers not in [`PROFILES`] get the fallback flags.
pub fn select_flags(compiler_family: &str) -> Vec<String> {
    let family = CompilerFamily::from_key(compiler_family);
    if let CompilerFamily::Other(ref key) = family {
        tracing::debug!(
            "Unrecognized compiler family `{}`, using `{}` flags",
            key,
            CompilerFamily::FALLBACK
        );
    }
    family.flags()
}

/// A command to execute, with program and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// The program to run (e.g., "g++", "cl.exe")
    pub program: PathBuf,
    /// Command arguments
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Program followed by arguments.
    pub fn to_argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program.display().to_string());
        argv.extend(self.args.iter().cloned());
        argv
    }
}
