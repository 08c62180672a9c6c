//! ANSI styles used by level and pattern coloring

use colored::Color;

const RESET: &str = "\x1b[0m";

/// Foreground/background color plus bold, rendered as an SGR escape sequence
///
/// # Example
///
/// ```
/// use logtree::Style;
/// use colored::Color;
///
/// let style = Style::fg(Color::Red).bold();
/// assert_eq!(style.paint("boom"), "\x1b[1;31mboom\x1b[0m");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Style {
    fg: Option<Color>,
    bg: Option<Color>,
    bold: bool,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fg(color: Color) -> Self {
        Self {
            fg: Some(color),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn on(mut self, background: Color) -> Self {
        self.bg = Some(background);
        self
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn is_plain(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && !self.bold
    }

    /// Append `text` wrapped in this style to `out`
    pub fn paint_into(&self, text: &str, out: &mut String) {
        if self.is_plain() {
            out.push_str(text);
            return;
        }

        out.push_str("\x1b[");
        let mut first = true;
        let mut code = |out: &mut String, c: &str| {
            if !first {
                out.push(';');
            }
            first = false;
            out.push_str(c);
        };
        if self.bold {
            code(out, "1");
        }
        if let Some(fg) = self.fg {
            code(out, &fg.to_fg_str());
        }
        if let Some(bg) = self.bg {
            code(out, &bg.to_bg_str());
        }
        out.push('m');
        out.push_str(text);
        out.push_str(RESET);
    }

    pub fn paint(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 16);
        self.paint_into(text, &mut out);
        out
    }
}

impl From<Color> for Style {
    fn from(color: Color) -> Self {
        Style::fg(color)
    }
}
