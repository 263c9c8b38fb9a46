//! The colorize capability the formatter paints its line segments with.

/// The colors a summary line uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Magenta,
    Red,
    Yellow,
    Green,
    Cyan,
}

/// Paints a piece of text in one of the named colors.
///
/// Terminal-capability detection is the implementor's business, not this
/// crate's: [`AnsiColors`] always emits escape codes, [`PlainColors`]
/// never does, and a caller that probes the terminal can pick between
/// them (or bring its own).
pub trait Colorize {
    /// Returns `text` wrapped in whatever makes it render as `color`.
    fn colorize(&self, text: &str, color: Color) -> String;
}

/// Paints with ANSI escape sequences via [`nu_ansi_term`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiColors;

impl Colorize for AnsiColors {
    fn colorize(&self, text: &str, color: Color) -> String {
        let ansi = match color {
            Color::Magenta => nu_ansi_term::Color::Magenta,
            Color::Red => nu_ansi_term::Color::Red,
            Color::Yellow => nu_ansi_term::Color::Yellow,
            Color::Green => nu_ansi_term::Color::Green,
            Color::Cyan => nu_ansi_term::Color::Cyan,
        };
        ansi.paint(text).to_string()
    }
}

/// Passthrough for sinks without color support.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainColors;

impl Colorize for PlainColors {
    fn colorize(&self, text: &str, _color: Color) -> String {
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_plain_is_a_passthrough() {
        assert_eq!(PlainColors.colorize("GET", Color::Cyan), "GET");
    }

    #[test]
    fn test_ansi_wraps_without_losing_text() {
        let painted = AnsiColors.colorize("404", Color::Red);
        assert!(painted.contains("404"));
        assert!(painted.starts_with('\u{1b}'));
    }
}
