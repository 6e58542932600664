//! Output encodings for resolved targets.
//!
//! This module provides formatters for writing a [`ResolvedTarget`] in
//! different formats (text table, JSON, C header, Cargo directives).

pub mod cargo;
pub mod header;
pub mod json;
pub mod text;

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use clap::ValueEnum;

use crate::resolver::ResolvedTarget;

pub use cargo::CargoFormatter;
pub use header::HeaderFormatter;
pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Output format for resolved targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned `NAME value` table.
    #[default]
    Text,
    /// Flag map plus strategy and details.
    Json,
    /// C preprocessor `#define` lines.
    Header,
    /// `cargo:rustc-cfg` build-script directives.
    Cargo,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Header => write!(f, "header"),
            Self::Cargo => write!(f, "cargo"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "header" | "h" => Ok(Self::Header),
            "cargo" => Ok(Self::Cargo),
            _ => Err(format!("unknown output format: {}", s)),
        }
    }
}

/// Trait for formatting resolved targets.
pub trait TargetFormatter {
    /// Format the target to the given writer.
    fn format<W: Write>(&self, target: &ResolvedTarget, writer: &mut W) -> std::io::Result<()>;
}

/// Write a target in the given format.
pub fn render<W: Write>(
    target: &ResolvedTarget,
    format: OutputFormat,
    use_color: bool,
    writer: &mut W,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Text => TextFormatter::new(use_color).format(target, writer),
        OutputFormat::Json => JsonFormatter::new().format(target, writer),
        OutputFormat::Header => HeaderFormatter::default().format(target, writer),
        OutputFormat::Cargo => CargoFormatter::new().format(target, writer),
    }
}

/// Render a target to a string.
pub fn render_to_string(target: &ResolvedTarget, format: OutputFormat) -> String {
    let mut output = Vec::new();
    // Writing to a Vec cannot fail.
    let _ = render(target, format, false, &mut output);
    String::from_utf8_lossy(&output).into_owned()
}
