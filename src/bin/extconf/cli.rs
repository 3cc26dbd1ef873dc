//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// extconf - build configuration for native extension modules
#[derive(Parser)]
#[command(name = "extconf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the version stamp derived from git
    Stamp(StampArgs),

    /// Print the compiler flags for a compiler family
    Flags(FlagsArgs),

    /// Print the assembled compilation unit as JSON
    Describe(DescribeArgs),

    /// Write compile_commands.json for the extension
    CompileCommands(CompileCommandsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct StampArgs {
    /// Repository to read history from (defaults to the working directory)
    #[arg(long)]
    pub repo: Option<PathBuf>,

    /// Emit JSON
    #[arg(long)]
    pub json: bool,

    /// Fail instead of printing the `Unknown` stamp
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct FlagsArgs {
    /// Compiler family (msvc, gcc, unix, ...); detected when omitted
    #[arg(long, env = "EXTCONF_COMPILER")]
    pub compiler: Option<String>,

    /// Emit JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ManifestArgs {
    /// Path to extconf.toml (searched upwards from the working directory)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Compiler family (msvc, gcc, unix, ...); overrides the manifest
    #[arg(long, env = "EXTCONF_COMPILER")]
    pub compiler: Option<String>,
}

#[derive(Args)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,
}

#[derive(Args)]
pub struct CompileCommandsArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Compiler driver to record in the database
    #[arg(long)]
    pub cxx: Option<PathBuf>,

    /// Where to write the database (defaults to next to the manifest)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory object files are placed in
    #[arg(long, default_value = "build")]
    pub out_dir: PathBuf,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
