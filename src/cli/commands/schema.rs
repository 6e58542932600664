//! The `targetcond schema` command.
//!
//! Prints the JSON Schema for environment description files, for editor
//! validation of `.yml` and `.json` inputs.

use crate::environment::BuildEnvironment;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The schema command implementation.
#[derive(Debug, Default)]
pub struct SchemaCommand;

impl SchemaCommand {
    /// Create a new schema command.
    pub fn new() -> Self {
        Self
    }
}

/// JSON Schema for [`BuildEnvironment`], pretty-printed.
pub fn environment_schema() -> Result<String> {
    let schema = schemars::schema_for!(BuildEnvironment);
    Ok(serde_json::to_string_pretty(&schema).map_err(anyhow::Error::from)?)
}

impl Command for SchemaCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let schema = environment_schema()?;
        ui.output(&format!("{}\n", schema))?;
        Ok(CommandResult::success())
    }
}
