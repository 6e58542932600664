//! The `targetcond resolve` command.

use crate::cli::args::ResolveArgs;
use crate::emit;
use crate::environment::{load_environment, parse_truthy, BuildEnvironment, TargetQuery};
use crate::error::{Result, TargetError};
use crate::resolver::Resolver;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Exit code when the environment file does not exist.
const EXIT_NOT_FOUND: i32 = 2;

/// The resolve command implementation.
pub struct ResolveCommand {
    args: ResolveArgs,
}

impl ResolveCommand {
    /// Create a new resolve command.
    pub fn new(args: ResolveArgs) -> Self {
        Self { args }
    }

    /// Assemble the build environment from the file, Cargo variables,
    /// triple, and command-line definitions, in that order.
    fn build_environment(&self) -> Result<BuildEnvironment> {
        let mut env = match &self.args.file {
            Some(path) => load_environment(path)?,
            None if self.args.cargo_env => BuildEnvironment::from_cargo_env()?,
            None => BuildEnvironment::new(),
        };

        if let Some(triple) = &self.args.triple {
            let triple = triple.parse()?;
            env.query = Some(match env.query.take() {
                Some(query) => TargetQuery { triple, ..query },
                None => TargetQuery::new(triple),
            });
        }

        for raw in &self.args.macros {
            let (name, value) = split_definition(raw);
            env = env.with_macro(name, value.unwrap_or("1"));
        }

        for raw in &self.args.defines {
            let (name, value) = split_definition(raw);
            let value = match value {
                None => true,
                Some(value) => parse_truthy(value).ok_or_else(|| {
                    anyhow::anyhow!("invalid value for -D {}: expected 0 or 1, got '{}'", name, value)
                })?,
            };
            env = env.with_override(name, value);
        }

        Ok(env)
    }
}

fn split_definition(raw: &str) -> (&str, Option<&str>) {
    match raw.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (raw.trim(), None),
    }
}

impl Command for ResolveCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let env = match self.build_environment() {
            Ok(env) => env,
            Err(e @ TargetError::EnvironmentNotFound { .. }) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(EXIT_NOT_FOUND));
            }
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
        };

        let target = match Resolver::new().resolve(&env) {
            Ok(target) => target,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
        };

        if ui.output_mode().shows_details() {
            for detail in &target.details {
                ui.message(&format!("  {}", detail));
            }
        }

        let mut rendered = Vec::new();
        emit::render(&target, self.args.format, ui.use_color(), &mut rendered)?;
        ui.output(&String::from_utf8_lossy(&rendered))?;

        ui.success(&format!("Resolved with the {} strategy", target.strategy));
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::OutputFormat;
    use crate::ui::{MockUI, OutputMode};
    use std::fs;
    use tempfile::TempDir;

    fn args() -> ResolveArgs {
        ResolveArgs::default()
    }

    #[test]
    fn split_definition_forms() {
        assert_eq!(split_definition("TARGET_OS_MAC"), ("TARGET_OS_MAC", None));
        assert_eq!(split_definition("TARGET_OS_MAC=0"), ("TARGET_OS_MAC", Some("0")));
        assert_eq!(split_definition("__BYTE_ORDER__=1234"), ("__BYTE_ORDER__", Some("1234")));
    }

    #[test]
    fn resolves_triple_to_json() {
        let cmd = ResolveCommand::new(ResolveArgs {
            triple: Some("x86_64-pc-linux-gnu".to_string()),
            macros: vec!["__BYTE_ORDER__=__ORDER_LITTLE_ENDIAN__".into(), "__LP64__".into()],
            format: OutputFormat::Json,
            ..args()
        });
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        let json: serde_json::Value = serde_json::from_str(ui.output_text()).unwrap();
        assert_eq!(json["flags"]["TARGET_OS_LINUX"], true);
        assert_eq!(json["flags"]["TARGET_CPU_X86_64"], true);
        assert_eq!(json["strategy"], "target_query");
    }

    #[test]
    fn define_without_value_means_true() {
        let cmd = ResolveCommand::new(ResolveArgs {
            defines: vec!["TARGET_CPU_MIPS".into(), "TARGET_OS_MAC=0".into()],
            format: OutputFormat::Json,
            ..args()
        });
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        let json: serde_json::Value = serde_json::from_str(ui.output_text()).unwrap();
        assert_eq!(json["flags"]["TARGET_CPU_MIPS"], true);
        assert_eq!(json["flags"]["TARGET_OS_MAC"], false);
        assert_eq!(json["flags"]["TARGET_OS_OSX"], false);
    }

    #[test]
    fn invalid_define_value_fails() {
        let cmd = ResolveCommand::new(ResolveArgs {
            defines: vec!["TARGET_CPU_MIPS=maybe".into()],
            ..args()
        });
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("TARGET_CPU_MIPS"));
    }

    #[test]
    fn unknown_toolchain_exits_one() {
        let cmd = ResolveCommand::new(args());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("unknown toolchain"));
        assert_eq!(ui.output_text(), "");
    }

    #[test]
    fn missing_file_exits_two() {
        let temp = TempDir::new().unwrap();
        let cmd = ResolveCommand::new(ResolveArgs {
            file: Some(temp.path().join("missing.yml")),
            ..args()
        });
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 2);
        assert!(ui.has_error("not found"));
    }

    #[test]
    fn triple_replaces_file_triple() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("env.yml");
        fs::write(
            &path,
            "query:\n  triple: x86_64-pc-linux-gnu\nmacros:\n  __BYTE_ORDER__: __ORDER_LITTLE_ENDIAN__\n  __LP64__: 1\n",
        )
        .unwrap();
        let cmd = ResolveCommand::new(ResolveArgs {
            file: Some(path),
            triple: Some("x86_64-pc-windows-msvc".into()),
            format: OutputFormat::Json,
            ..args()
        });
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        let json: serde_json::Value = serde_json::from_str(ui.output_text()).unwrap();
        assert_eq!(json["flags"]["TARGET_OS_WINDOWS"], true);
        assert_eq!(json["flags"]["TARGET_OS_LINUX"], false);
    }

    #[test]
    fn verbose_shows_details() {
        let cmd = ResolveCommand::new(ResolveArgs {
            defines: vec!["TARGET_CPU_MIPS".into()],
            ..args()
        });
        let mut ui = MockUI::with_mode(OutputMode::Verbose);

        cmd.execute(&mut ui).unwrap();

        assert!(ui.has_message("TARGET_CPU_MIPS declared"));
    }

    /// A UI whose result stream is full.
    struct FullDiskUI;

    impl UserInterface for FullDiskUI {
        fn output_mode(&self) -> OutputMode {
            OutputMode::Normal
        }
        fn message(&mut self, _msg: &str) {}
        fn success(&mut self, _msg: &str) {}
        fn error(&mut self, _msg: &str) {}
        fn output(&mut self, _text: &str) -> std::io::Result<()> {
            Err(std::io::Error::other("no space left on device"))
        }
        fn use_color(&self) -> bool {
            false
        }
    }

    #[test]
    fn failed_output_write_is_an_error() {
        let cmd = ResolveCommand::new(ResolveArgs {
            defines: vec!["TARGET_CPU_X86_64".into()],
            format: OutputFormat::Header,
            ..args()
        });

        let err = cmd.execute(&mut FullDiskUI).unwrap_err();

        assert!(matches!(err, TargetError::Io(_)));
    }
}
