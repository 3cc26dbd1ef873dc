//! Shared utilities

pub mod config;
pub mod process;

pub use config::ExtensionManifest;
pub use process::{CommandRunner, ProcessBuilder, ProcessOutput, SystemRunner};
