//! extconf - build configuration for native extension modules
//!
//! This crate derives a version stamp from git history, selects compiler
//! flags for the active toolchain, and assembles the compilation unit handed
//! to the build tool.

pub mod extension;
pub mod toolchain;
pub mod util;
pub mod version;

/// Test utilities and mocks for extconf unit tests.
///
/// Only compiled for unit tests. Provides a mock command runner so
/// source-control and compiler probing can be tested without processes.
#[cfg(test)]
pub mod test_support;

pub use extension::{assemble, CompilationUnitDescriptor, Define};
pub use toolchain::{select_flags, CompilerFamily, ToolchainProfile};
pub use util::config::ExtensionManifest;
pub use version::{BuildInfo, GitCli, SourceControl, StampError, VersionResolver};
