//! Terminal styles for Papertable output
//!
//! Colour is used only on an interactive stdout and never under
//! `PAPERTABLE_PLAIN`.

use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub warn: Style,
    pub info: Style,
    pub dim: Style,
    /// Natural-key identifiers (DOI, PMID, ...)
    pub key: Style,
    /// Article titles
    pub title: Style,
}

impl Theme {
    /// Styles for a coloured terminal, or all-plain styles when `colored` is false.
    pub fn new(colored: bool) -> Self {
        let style = |make: fn(Style) -> Style| if colored { make(Style::new()) } else { Style::new() };
        Self {
            header: style(|s| s.cyan().bold()),
            success: style(|s| s.green().bold()),
            warn: style(|s| s.yellow().bold()),
            info: style(|s| s.magenta()),
            dim: style(|s| s.white().dimmed()),
            key: style(|s| s.blue()),
            title: style(|s| s.bold()),
        }
    }
}

/// Process-wide theme, chosen on first use.
pub fn theme() -> &'static Theme {
    THEME.get_or_init(|| Theme::new(!crate::ui::is_quiet() && console::Term::stdout().is_term()))
}
