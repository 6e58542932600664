//! Non-interactive UI for pipes, build scripts, and CI.

use std::io::Write;

use super::theme::TargetTheme;
use super::{OutputMode, UserInterface};

/// UI implementation for non-interactive mode.
///
/// Never styles output, so results can be redirected into files as-is.
pub struct NonInteractiveUI {
    mode: OutputMode,
    theme: TargetTheme,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            theme: TargetTheme::plain(),
        }
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", self.theme.format_success(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn output(&mut self, text: &str) -> std::io::Result<()> {
        if self.mode.shows_output() {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
        Ok(())
    }

    fn use_color(&self) -> bool {
        false
    }
}
