//! Compiled templates and rendering.

use crate::error::TemplateError;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A value substituted for a placeholder at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValue {
    /// An integer, rendered in decimal.
    Int(i64),
    /// Text, inserted verbatim.
    Text(String),
}

impl fmt::Display for TemplateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateValue::Int(v) => write!(f, "{v}"),
            TemplateValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TemplateValue {
    fn from(v: i64) -> Self {
        TemplateValue::Int(v)
    }
}

impl From<i32> for TemplateValue {
    fn from(v: i32) -> Self {
        TemplateValue::Int(i64::from(v))
    }
}

impl From<u32> for TemplateValue {
    fn from(v: u32) -> Self {
        TemplateValue::Int(i64::from(v))
    }
}

impl From<&str> for TemplateValue {
    fn from(s: &str) -> Self {
        TemplateValue::Text(s.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(s: String) -> Self {
        TemplateValue::Text(s)
    }
}

/// Placeholder values keyed by parameter name.
pub type TemplateParameters = BTreeMap<String, TemplateValue>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

#[derive(Debug)]
struct Compiled {
    text: String,
    segments: Vec<Segment>,
    pattern: Option<Regex>,
}

/// An immutable compiled template.
///
/// Holds the substituted text with its `$name` / `${name}` placeholders, the
/// parsed placeholder segments, and the combined pattern that produced it.
/// Clones share the same compiled snapshot.
#[derive(Debug, Clone)]
pub struct Template {
    inner: Arc<Compiled>,
}

impl Template {
    /// Parses `text` into segments. `$$` is an escaped dollar sign.
    pub(crate) fn compile(text: String, pattern: Option<Regex>) -> Result<Self, TemplateError> {
        let segments = parse_segments(&text)?;
        Ok(Self {
            inner: Arc::new(Compiled {
                text,
                segments,
                pattern,
            }),
        })
    }

    /// The template text with placeholders, before rendering.
    pub fn text(&self) -> &str {
        &self.inner.text
    }

    /// The combined substitution pattern, if any parameter was registered.
    pub fn pattern(&self) -> Option<&Regex> {
        self.inner.pattern.as_ref()
    }

    /// Placeholder names in order of appearance, repeats included.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Returns `true` if both handles share one compiled snapshot.
    pub fn ptr_eq(&self, other: &Template) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Replaces every placeholder with its value from `mapping`.
    ///
    /// Entries in `mapping` that the template does not use are ignored.
    pub fn render(&self, mapping: &TemplateParameters) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.inner.text.len());
        for segment in &self.inner.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = mapping
                        .get(name)
                        .ok_or_else(|| TemplateError::MissingParameter { name: name.clone() })?;
                    out.push_str(&value.to_string());
                }
            }
        }
        Ok(out)
    }
}

fn identifier_len(s: &str) -> usize {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return 0,
    }
    chars
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map_or(s.len(), |(i, _)| i)
}

fn invalid_placeholder(text: &str, offset: usize) -> TemplateError {
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    TemplateError::InvalidPlaceholder {
        line,
        column: offset - line_start + 1,
    }
}

fn parse_segments(text: &str) -> Result<Vec<Segment>, TemplateError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(pos) = rest.find('$') {
        let offset = text.len() - rest.len() + pos;
        literal.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(tail) = after.strip_prefix('$') {
            literal.push('$');
            rest = tail;
            continue;
        }

        let (name, tail) = if let Some(braced) = after.strip_prefix('{') {
            let len = identifier_len(braced);
            if len == 0 || !braced[len..].starts_with('}') {
                return Err(invalid_placeholder(text, offset));
            }
            (&braced[..len], &braced[len + 1..])
        } else {
            let len = identifier_len(after);
            if len == 0 {
                return Err(invalid_placeholder(text, offset));
            }
            (&after[..len], &after[len..])
        };

        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Placeholder(name.to_string()));
        rest = tail;
    }

    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
