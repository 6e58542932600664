//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::emit::OutputFormat;

/// targetcond - Resolve target platform conditionals.
#[derive(Debug, Parser)]
#[command(name = "targetcond")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve target flags for a build environment
    Resolve(ResolveArgs),

    /// List the flag registry
    Flags(FlagsArgs),

    /// Print the JSON Schema for environment files
    Schema,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `resolve` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ResolveArgs {
    /// Environment file (YAML, or JSON by extension)
    pub file: Option<PathBuf>,

    /// Target triple for the target query builtins
    #[arg(short, long, conflicts_with = "cargo_env")]
    pub triple: Option<String>,

    /// Describe the target from Cargo's CARGO_CFG_TARGET_* variables
    #[arg(long, conflicts_with = "file")]
    pub cargo_env: bool,

    /// Pre-declare a flag: NAME, NAME=1 or NAME=0
    #[arg(short = 'D', long = "define", value_name = "NAME[=0|1]")]
    pub defines: Vec<String>,

    /// Define a predefined compiler macro: NAME or NAME=VALUE
    #[arg(short = 'm', long = "macro", value_name = "NAME[=VALUE]")]
    pub macros: Vec<String>,

    /// Output format
    #[arg(
        short,
        long,
        value_enum,
        env = "TARGETCOND_FORMAT",
        default_value_t = OutputFormat::Text
    )]
    pub format: OutputFormat,
}

/// Arguments for the `flags` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FlagsArgs {
    /// Only list one namespace (cpu, os, rt)
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_resolve_with_defines_and_macros() {
        let cli = Cli::try_parse_from([
            "targetcond",
            "resolve",
            "-D",
            "TARGET_CPU_MIPS=1",
            "--define",
            "TARGET_OS_UNIX",
            "-m",
            "__MACH__",
            "--format",
            "header",
        ])
        .unwrap();
        let Commands::Resolve(args) = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(args.defines, vec!["TARGET_CPU_MIPS=1", "TARGET_OS_UNIX"]);
        assert_eq!(args.macros, vec!["__MACH__"]);
        assert_eq!(args.format, OutputFormat::Header);
        assert!(args.file.is_none());
    }

    #[test]
    fn triple_conflicts_with_cargo_env() {
        let result = Cli::try_parse_from([
            "targetcond",
            "resolve",
            "--triple",
            "x86_64-pc-linux-gnu",
            "--cargo-env",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["targetcond", "flags", "--quiet", "--json"]).unwrap();
        assert!(cli.quiet);
        let Commands::Flags(args) = cli.command else {
            panic!("expected flags");
        };
        assert!(args.json);
    }
}
