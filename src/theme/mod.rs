//! Theme system for human-mode output.

use console::Style;

/// Visual theme for flifocus human-mode output.
///
/// Centralizes colors and styles for consistent rendering.
pub struct FocusTheme {
    // Status colors
    pub accent: Style,
    pub success: Style,
    pub error: Style,
    pub warning: Style,
    pub muted: Style,

    // Component styles
    pub header: Style,
    pub label: Style,
    pub value: Style,
    pub position: Style,
    pub device: Style,
}

impl Default for FocusTheme {
    fn default() -> Self {
        Self {
            accent: Style::new().blue().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warning: Style::new().yellow().bold(),
            muted: Style::new().dim(),
            header: Style::new().blue().bold(),
            label: Style::new().dim(),
            value: Style::new().bold(),
            position: Style::new().cyan().bold(),
            device: Style::new().italic().dim(),
        }
    }
}

impl FocusTheme {
    /// Theme with every style stripped, for `--no-color`.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            accent: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warning: Style::new(),
            muted: Style::new(),
            header: Style::new(),
            label: Style::new(),
            value: Style::new(),
            position: Style::new(),
            device: Style::new(),
        }
    }
}
