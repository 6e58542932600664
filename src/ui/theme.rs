//! Visual theme and styling.

use console::Style;

/// Terminal theme.
#[derive(Debug, Clone)]
pub struct TargetTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for section headers (magenta bold).
    pub header: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for flag names (bold).
    pub key: Style,
    /// Style for flags that are set (green bold).
    pub enabled: Style,
    /// Style for flags that are clear (dim).
    pub disabled: Style,
}

impl Default for TargetTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetTheme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            error: Style::new().red().bold(),
            header: Style::new().bold().magenta(),
            dim: Style::new().dim(),
            key: Style::new().bold(),
            enabled: Style::new().green().bold(),
            disabled: Style::new().dim(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            error: Style::new(),
            header: Style::new(),
            dim: Style::new(),
            key: Style::new(),
            enabled: Style::new(),
            disabled: Style::new(),
        }
    }

    /// Pick a theme by color support.
    pub fn for_color(use_color: bool) -> Self {
        if use_color {
            Self::new()
        } else {
            Self::plain()
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Style for a flag value.
    pub fn value(&self, value: bool) -> &Style {
        if value {
            &self.enabled
        } else {
            &self.disabled
        }
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // Check NO_COLOR env var (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_theme_adds_no_escapes() {
        let theme = TargetTheme::plain();
        assert_eq!(theme.enabled.apply_to("1").to_string(), "1");
        assert_eq!(theme.header.apply_to("CPU").to_string(), "CPU");
    }

    #[test]
    fn plain_messages_carry_icons() {
        let theme = TargetTheme::plain();
        assert_eq!(theme.format_success("done"), "✓ done");
        assert_eq!(theme.format_error("failed"), "✗ failed");
    }

    #[test]
    fn value_style_follows_flag() {
        let theme = TargetTheme::plain();
        assert_eq!(theme.value(true).apply_to("1").to_string(), "1");
        assert_eq!(theme.value(false).apply_to("0").to_string(), "0");
    }
}
