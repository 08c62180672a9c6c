//! Template parsing
//!
//! A template is literal text interleaved with placeholders:
//!
//! - `{name}`, `{level}`, `{message}` substitute the record fields
//! - `{message<40}` pads (left aligned) or truncates the field to 40 chars
//! - `{{` and `}}` produce literal braces
//!
//! Parsing either produces a complete render plan or fails; there is no
//! partially valid template.

use super::error::{LoggerError, Result};
use std::fmt;
use std::iter::Peekable;
use std::str::{CharIndices, FromStr};

/// Template used when none is configured
pub const DEFAULT_TEMPLATE: &str = "{name} {level} {message}";

/// Record field a placeholder refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Level,
    Message,
}

impl Field {
    fn from_identifier(ident: &str) -> Option<Self> {
        match ident {
            "name" => Some(Field::Name),
            "level" => Some(Field::Level),
            "message" => Some(Field::Message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Field { field: Field, width: Option<usize> },
}

/// A validated render plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                '{' => {
                    if matches!(chars.peek(), Some(&(_, '{'))) {
                        chars.next();
                        literal.push('{');
                        continue;
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_placeholder(source, offset, &mut chars)?);
                }
                '}' => {
                    if matches!(chars.peek(), Some(&(_, '}'))) {
                        chars.next();
                        literal.push('}');
                        continue;
                    }
                    return Err(LoggerError::format(source, offset, "unmatched '}'"));
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether any placeholder references `field`
    pub fn uses(&self, field: Field) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Field { field: f, .. } if *f == field))
    }
}

/// Parses the remainder of a placeholder whose `{` sits at `open`
fn parse_placeholder(
    source: &str,
    open: usize,
    chars: &mut Peekable<CharIndices<'_>>,
) -> Result<Segment> {
    let mut ident = String::new();
    let mut width_digits: Option<String> = None;

    loop {
        let Some((offset, c)) = chars.next() else {
            return Err(LoggerError::format(source, open, "unterminated placeholder"));
        };

        if c == '}' {
            break;
        }
        if c == '{' {
            return Err(LoggerError::format(source, offset, "nested '{' in placeholder"));
        }

        match width_digits {
            None if c == '<' => width_digits = Some(String::new()),
            None if c.is_alphanumeric() || c == '_' => ident.push(c),
            None => {
                return Err(LoggerError::format(
                    source,
                    offset,
                    format!("invalid character '{}' in placeholder", c),
                ));
            }
            Some(ref mut digits) if c.is_ascii_digit() => digits.push(c),
            Some(_) => {
                return Err(LoggerError::format(
                    source,
                    offset,
                    format!("width must be a decimal number, found '{}'", c),
                ));
            }
        }
    }

    let field = Field::from_identifier(&ident).ok_or_else(|| {
        LoggerError::format(source, open, format!("unknown placeholder '{}'", ident))
    })?;

    let width = match width_digits {
        None => None,
        Some(digits) if digits.is_empty() => {
            return Err(LoggerError::format(source, open, "missing width after '<'"));
        }
        Some(digits) => Some(digits.parse::<usize>().map_err(|_| {
            LoggerError::format(source, open, format!("width {} is out of range", digits))
        })?),
    };

    Ok(Segment::Field { field, width })
}

impl Default for Template {
    fn default() -> Self {
        Template {
            source: DEFAULT_TEMPLATE.to_string(),
            segments: vec![
                Segment::Field { field: Field::Name, width: None },
                Segment::Literal(" ".to_string()),
                Segment::Field { field: Field::Level, width: None },
                Segment::Literal(" ".to_string()),
                Segment::Field { field: Field::Message, width: None },
            ],
        }
    }
}

impl FromStr for Template {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        Template::parse(s)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
