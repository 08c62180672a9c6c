//! Record formatting
//!
//! A [`Formatter`] turns a [`Record`] into one output line according to its
//! [`Template`], optionally coloring the level field and pattern matches
//! inside the message.

use super::error::{LoggerError, Result};
use super::level::Level;
use super::record::Record;
use super::style::Style;
use super::template::{Field, Segment, Template};
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;

#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// A named coloring rule applied to the message text
#[derive(Debug, Clone)]
pub struct PatternColor {
    pub name: String,
    pub pattern: Regex,
}

impl PatternColor {
    pub fn new(name: impl Into<String>, pattern: Regex) -> Self {
        Self {
            name: name.into(),
            pattern,
        }
    }

    /// Compile `pattern` and bind it to the color `name`
    pub fn parse(name: impl Into<String>, pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| LoggerError::config("PatternColor", format!("invalid pattern: {}", e)))?;
        Ok(Self::new(name, pattern))
    }
}

/// Default level palette
pub fn default_level_styles() -> HashMap<Level, Style> {
    Level::ALL
        .iter()
        .map(|level| {
            let style = Style::fg(level.color_code());
            let style = if *level == Level::Fatal { style.bold() } else { style };
            (*level, style)
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct Formatter {
    template: Template,
    level_styles: HashMap<Level, Style>,
    pattern_styles: HashMap<String, Style>,
    patterns: Vec<PatternColor>,
    level_coloring: bool,
    pattern_coloring: bool,
}

impl Formatter {
    /// Parse `template` and build a formatter with coloring disabled
    ///
    /// # Example
    ///
    /// ```
    /// use logtree::Formatter;
    ///
    /// assert!(Formatter::new("{name} {level} {message}").is_ok());
    /// assert!(Formatter::new("{name} {lvl} {message}").is_err());
    /// ```
    pub fn new(template: &str) -> Result<Self> {
        Ok(Self::with_template(Template::parse(template)?))
    }

    pub fn with_template(template: Template) -> Self {
        Self {
            template,
            level_styles: default_level_styles(),
            pattern_styles: HashMap::new(),
            patterns: Vec::new(),
            level_coloring: false,
            pattern_coloring: false,
        }
    }

    /// Replace the active template
    ///
    /// On error the previous template stays active.
    pub fn set_format(&mut self, template: &str) -> Result<()> {
        self.template = Template::parse(template)?;
        Ok(())
    }

    pub fn set_template(&mut self, template: Template) {
        self.template = template;
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn enable_level_coloring(&mut self, enabled: bool) {
        self.level_coloring = enabled;
    }

    pub fn enable_pattern_coloring(&mut self, enabled: bool) {
        self.pattern_coloring = enabled;
    }

    pub fn level_coloring_enabled(&self) -> bool {
        self.level_coloring
    }

    pub fn pattern_coloring_enabled(&self) -> bool {
        self.pattern_coloring
    }

    /// Replace the level palette; levels without an entry render plain
    pub fn set_level_coloring(&mut self, styles: HashMap<Level, Style>) {
        self.level_styles = styles;
    }

    /// Replace the pattern rules and the color names they refer to
    ///
    /// Rules are tried in order. A span already claimed by an earlier rule is
    /// never recolored by a later one. Rules naming a color missing from
    /// `styles` are skipped.
    pub fn set_pattern_coloring(&mut self, styles: HashMap<String, Style>, rules: Vec<PatternColor>) {
        self.pattern_styles = styles;
        self.patterns = rules;
    }

    pub fn render(&self, record: &Record) -> String {
        let mut out = String::with_capacity(record.message.len() + 64);
        self.render_into(record, &mut out);
        out
    }

    pub fn render_into(&self, record: &Record, out: &mut String) {
        for segment in self.template.segments() {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field { field, width } => {
                    let text = match field {
                        Field::Name => &*record.name,
                        Field::Level => record.level.to_str(),
                        Field::Message => record.message.as_str(),
                    };
                    let text = fit_width(text, *width);

                    match field {
                        Field::Level if self.level_coloring => {
                            match self.level_styles.get(&record.level) {
                                Some(style) => style.paint_into(&text, out),
                                None => out.push_str(&text),
                            }
                        }
                        Field::Message if self.pattern_coloring => {
                            self.paint_patterns(&text, out)
                        }
                        _ => out.push_str(&text),
                    }
                }
            }
        }
        out.push_str(LINE_ENDING);
    }

    fn paint_patterns(&self, text: &str, out: &mut String) {
        let mut spans: Vec<(usize, usize, &Style)> = Vec::new();

        for rule in &self.patterns {
            let Some(style) = self.pattern_styles.get(&rule.name) else {
                continue;
            };
            for m in rule.pattern.find_iter(text) {
                if m.start() == m.end() {
                    continue;
                }
                let claimed = spans
                    .iter()
                    .any(|&(start, end, _)| m.start() < end && start < m.end());
                if !claimed {
                    spans.push((m.start(), m.end(), style));
                }
            }
        }

        spans.sort_unstable_by_key(|&(start, _, _)| start);

        let mut pos = 0;
        for (start, end, style) in spans {
            out.push_str(&text[pos..start]);
            style.paint_into(&text[start..end], out);
            pos = end;
        }
        out.push_str(&text[pos..]);
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::with_template(Template::default())
    }
}

/// Left-align `text` in `width` chars, truncating when longer
fn fit_width(text: &str, width: Option<usize>) -> Cow<'_, str> {
    let Some(width) = width else {
        return Cow::Borrowed(text);
    };

    match text.char_indices().nth(width) {
        Some((cut, _)) => Cow::Borrowed(&text[..cut]),
        None => {
            let len = text.chars().count();
            if len == width {
                Cow::Borrowed(text)
            } else {
                Cow::Owned(format!("{:<width$}", text, width = width))
            }
        }
    }
}
