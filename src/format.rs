use colored::{Color, Colorize};

use crate::config::Config;

/// Per-message presentation: indent level and an optional color.
///
/// The indent level is multiplied by the configured indent width; `color`
/// wraps the whole (indented) line in the color's start and reset codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Style {
    pub indent: usize,
    pub color: Option<Color>,
}

impl Style {
    pub fn with_indent(self, indent: usize) -> Self {
        Self { indent, ..self }
    }

    pub fn with_color(self, color: Color) -> Self {
        Self {
            color: Some(color),
            ..self
        }
    }
}

/// Builds the final printable line: indent, then color wrap, then an
/// ascii transliteration when the console has fallen back to ascii.
pub(crate) fn format_line(config: &Config, message: &str, style: &Style, ascii: bool) -> String {
    let mut line = if style.indent > 0 {
        let pad = config
            .indent_char
            .to_string()
            .repeat(style.indent * config.indent_width);
        format!("{pad}{message}")
    } else {
        message.to_string()
    };
    if let Some(color) = style.color {
        line = line.color(color).to_string();
    }
    if ascii {
        line = ascii_lossy(&line);
    }
    line
}

/// Drops every non-ascii character. Color escapes are plain ascii and
/// survive untouched, so this is safe to apply to fully formatted text.
pub(crate) fn ascii_lossy(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indent_is_linear() {
        let config = Config::default();
        let none = format_line(&config, "msg", &Style::default(), false);
        let one = format_line(&config, "msg", &Style::default().with_indent(1), false);
        let two = format_line(&config, "msg", &Style::default().with_indent(2), false);
        assert_eq!(none, "msg");
        assert_eq!(one, "    msg");
        assert_eq!(two, "        msg");
    }

    #[test]
    fn indent_uses_configured_char_and_width() {
        let config = Config {
            indent_char: '.',
            indent_width: 2,
            ..Config::default()
        };
        let line = format_line(&config, "msg", &Style::default().with_indent(3), false);
        assert_eq!(line, "......msg");
    }

    #[test]
    fn color_wraps_indented_message() {
        colored::control::set_override(true);
        let config = Config::default();
        let style = Style::default().with_indent(1).with_color(Color::Blue);
        let line = format_line(&config, "hello", &style, false);
        assert!(line.starts_with("\x1b[34m"), "line: {line:?}");
        assert!(line.ends_with("\x1b[0m"), "line: {line:?}");
        assert!(line.contains("    hello"), "line: {line:?}");
    }

    #[test]
    fn no_color_leaves_line_plain() {
        let config = Config::default();
        let line = format_line(&config, "hello", &Style::default(), false);
        assert_eq!(line, "hello");
    }

    #[test]
    fn ascii_mode_strips_non_ascii() {
        let config = Config::default();
        let line = format_line(&config, "héllo wörld →", &Style::default(), true);
        assert_eq!(line, "hllo wrld ");
    }

    #[test]
    fn ascii_lossy_keeps_ascii_intact() {
        assert_eq!(ascii_lossy("plain text\n"), "plain text\n");
        assert_eq!(ascii_lossy("\x1b[31mrëd\x1b[0m"), "\x1b[31mrd\x1b[0m");
    }
}
