use std::fmt::Display;
use std::io::IsTerminal;

use crossterm::style::{Color, Stylize};

/// Catppuccin Mocha-inspired palette with 24-bit RGB colors.
/// When disabled every helper returns plain text.
pub struct Theme {
    pub enabled: bool,

    pub fg_dim: Color,
    pub blue: Color,
    pub red: Color,
    pub teal: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            enabled: true,
            fg_dim: Color::Rgb {
                r: 166,
                g: 173,
                b: 200,
            }, // Subtext0
            blue: Color::Rgb {
                r: 137,
                g: 180,
                b: 250,
            },
            red: Color::Rgb {
                r: 243,
                g: 139,
                b: 168,
            },
            teal: Color::Rgb {
                r: 148,
                g: 226,
                b: 213,
            },
        }
    }
}

impl Theme {
    /// Colors only for a terminal stdout without `NO_COLOR`
    pub fn detect() -> Self {
        if std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none() {
            Self::default()
        } else {
            Self::plain()
        }
    }

    pub fn plain() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// File paths and extension keys
    pub fn name(&self, text: impl Display) -> String {
        let text = text.to_string();
        if self.enabled {
            text.with(self.blue).underlined().to_string()
        } else {
            text
        }
    }

    /// Counts in the report body
    pub fn number(&self, text: impl Display) -> String {
        let text = text.to_string();
        if self.enabled {
            text.with(self.red).bold().underlined().to_string()
        } else {
            text
        }
    }

    pub fn heading(&self, text: impl Display) -> String {
        let text = text.to_string();
        if self.enabled {
            text.with(self.teal).bold().to_string()
        } else {
            text
        }
    }

    pub fn error(&self, text: impl Display) -> String {
        let text = text.to_string();
        if self.enabled {
            text.with(self.red).bold().to_string()
        } else {
            text
        }
    }

    pub fn dim(&self, text: impl Display) -> String {
        let text = text.to_string();
        if self.enabled {
            text.with(self.fg_dim).to_string()
        } else {
            text
        }
    }
}
