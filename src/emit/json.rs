//! JSON output formatter.

use std::io::Write;

use super::TargetFormatter;
use crate::resolver::ResolvedTarget;

/// Formats a target as pretty-printed JSON.
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetFormatter for JsonFormatter {
    fn format<W: Write>(&self, target: &ResolvedTarget, writer: &mut W) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, target)?;
        writeln!(writer)
    }
}
