//! Human-readable table.

use std::io::Write;

use super::TargetFormatter;
use crate::flags::{Derivation, FlagRegistry, Namespace};
use crate::resolver::ResolvedTarget;
use crate::ui::TargetTheme;

const NAME_WIDTH: usize = 26;

/// Formats a target as an aligned table, one namespace per section.
pub struct TextFormatter {
    theme: TargetTheme,
}

impl TextFormatter {
    /// Create a new text formatter.
    pub fn new(use_color: bool) -> Self {
        Self {
            theme: TargetTheme::for_color(use_color),
        }
    }
}

impl TargetFormatter for TextFormatter {
    fn format<W: Write>(&self, target: &ResolvedTarget, writer: &mut W) -> std::io::Result<()> {
        writeln!(
            writer,
            "{} {}",
            self.theme.dim.apply_to("Strategy:"),
            target.strategy
        )?;

        for namespace in Namespace::ALL {
            writeln!(writer)?;
            writeln!(writer, "{}", self.theme.header.apply_to(namespace))?;
            for (flag, value) in target.flags.namespace(namespace) {
                let name = format!("{:<width$}", flag.name(), width = NAME_WIDTH);
                let note = match FlagRegistry::derivation(flag) {
                    Some(Derivation::Alias(canonical)) => format!("  (alias of {})", canonical),
                    Some(Derivation::Guarded(rule)) => format!("  (guarded by {:?})", rule.signal),
                    None => String::new(),
                };
                writeln!(
                    writer,
                    "  {} {}{}",
                    self.theme.key.apply_to(name),
                    self.theme.value(value).apply_to(u8::from(value)),
                    self.theme.dim.apply_to(note)
                )?;
            }
        }

        Ok(())
    }
}
