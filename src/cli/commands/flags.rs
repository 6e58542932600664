//! The `targetcond flags` command.
//!
//! Lists the registry: every flag with its namespace, description, how it
//! is derived (if at all), and its parents in the OS hierarchy.

use serde::Serialize;

use crate::cli::args::FlagsArgs;
use crate::error::Result;
use crate::flags::{hierarchy, Derivation, Flag, FlagRegistry, Namespace};
use crate::ui::{TargetTheme, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The flags command implementation.
pub struct FlagsCommand {
    args: FlagsArgs,
}

#[derive(Debug, Serialize)]
struct FlagEntry {
    name: &'static str,
    namespace: Namespace,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    derived: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    parents: Vec<Flag>,
}

impl FlagEntry {
    fn new(flag: Flag) -> Self {
        Self {
            name: flag.name(),
            namespace: flag.namespace(),
            description: flag.description(),
            derived: FlagRegistry::derivation(flag).map(describe_derivation),
            parents: hierarchy::parents_of(flag).collect(),
        }
    }
}

fn describe_derivation(derivation: Derivation) -> String {
    match derivation {
        Derivation::Alias(canonical) => format!("alias of {}", canonical),
        Derivation::Guarded(rule) => {
            let unless: Vec<&str> = rule.unless.iter().map(|flag| flag.name()).collect();
            format!("{:?} unless {}", rule.signal, unless.join(" or "))
        }
    }
}

impl FlagsCommand {
    /// Create a new flags command.
    pub fn new(args: FlagsArgs) -> Self {
        Self { args }
    }

    fn namespaces(&self) -> Result<Vec<Namespace>> {
        match &self.args.namespace {
            Some(name) => {
                let namespace = name.parse::<Namespace>().map_err(anyhow::Error::msg)?;
                Ok(vec![namespace])
            }
            None => Ok(Namespace::ALL.to_vec()),
        }
    }

    fn render_text(&self, namespaces: &[Namespace], theme: &TargetTheme) -> String {
        let mut out = String::new();

        for (i, namespace) in namespaces.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&format!(
                "{} ({})\n",
                theme.header.apply_to(namespace),
                namespace.short_name()
            ));

            for flag in FlagRegistry::list_flags(*namespace) {
                let entry = FlagEntry::new(flag);
                let mut notes = Vec::new();
                if let Some(derived) = &entry.derived {
                    notes.push(derived.clone());
                }
                if !entry.parents.is_empty() {
                    let parents: Vec<&str> = entry.parents.iter().map(|p| p.name()).collect();
                    notes.push(format!("implies {}", parents.join(", ")));
                }

                let name = format!("{:<26}", entry.name);
                out.push_str(&format!(
                    "  {} {}",
                    theme.key.apply_to(name),
                    entry.description
                ));
                if !notes.is_empty() {
                    out.push_str(&format!(
                        " {}",
                        theme.dim.apply_to(format!("[{}]", notes.join("; ")))
                    ));
                }
                out.push('\n');
            }
        }

        out
    }
}

impl Command for FlagsCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let namespaces = match self.namespaces() {
            Ok(namespaces) => namespaces,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
        };

        if self.args.json {
            let entries: Vec<FlagEntry> = namespaces
                .iter()
                .flat_map(|namespace| FlagRegistry::list_flags(*namespace))
                .map(FlagEntry::new)
                .collect();
            let json = serde_json::to_string_pretty(&entries).map_err(anyhow::Error::from)?;
            ui.output(&format!("{}\n", json))?;
        } else {
            let theme = TargetTheme::for_color(ui.use_color());
            ui.output(&self.render_text(&namespaces, &theme))?;
        }

        Ok(CommandResult::success())
    }
}
