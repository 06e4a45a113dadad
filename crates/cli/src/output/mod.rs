//! Output formatting utilities
//!
//! This module provides formatters for CLI output in both human-readable
//! and JSON formats. It also owns the pending-operation spinner and colour
//! decisions shared with the navigator.

mod formatter;
mod progress;

pub use formatter::Formatter;
pub use progress::Spinner;

/// Output configuration derived from CLI flags and config defaults
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Use JSON output format
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Disable progress indicators
    pub no_progress: bool,
    /// Suppress non-error output
    pub quiet: bool,
}

impl OutputConfig {
    /// Apply the `[defaults]` section of the configuration file
    ///
    /// Flags given on the command line always win over the file.
    pub fn with_defaults(mut self, defaults: &bn_core::config::Defaults) -> Self {
        match defaults.color.as_str() {
            "never" => self.no_color = true,
            "always" if !self.no_color => console::set_colors_enabled(true),
            _ => {}
        }
        if !defaults.progress {
            self.no_progress = true;
        }
        self
    }

    /// Whether styled output should be emitted
    pub fn colors_enabled(&self) -> bool {
        !self.no_color && !self.json && console::colors_enabled()
    }
}

/// Apply `style` to `text` only when colours are enabled
pub fn paint<D>(text: D, style: console::Style, colors: bool) -> console::StyledObject<D> {
    style.force_styling(colors).apply_to(text)
}
