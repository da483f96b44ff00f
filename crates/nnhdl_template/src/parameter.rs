//! Template parameter types: the policies that turn prototype text into placeholders.

use regex::{Captures, Match};
use std::fmt;
use std::sync::Arc;

/// One match of a parameter's pattern, handed to `replace` and `analyse`.
///
/// Carries the name the parameter was registered under, which is also the
/// name of the capture group that fired.
#[derive(Debug, Clone, Copy)]
pub struct ParameterMatch<'a, 'h> {
    name: &'a str,
    captures: &'a Captures<'h>,
}

impl<'a, 'h> ParameterMatch<'a, 'h> {
    pub(crate) fn new(name: &'a str, captures: &'a Captures<'h>) -> Self {
        Self { name, captures }
    }

    /// The registered parameter name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The whole matched text.
    pub fn as_str(&self) -> &'h str {
        self.captures.get(0).map_or("", |m| m.as_str())
    }

    /// The span of the parameter's own named group.
    pub fn group(&self) -> Option<Match<'h>> {
        self.captures.name(self.name)
    }

    /// All captures of the combined pattern.
    pub fn captures(&self) -> &'a Captures<'h> {
        self.captures
    }

    /// Returns the whole match with the named group replaced by `replacement`.
    ///
    /// Lets a pattern match surrounding context while only the value itself
    /// becomes a placeholder.
    pub fn splice_group(&self, replacement: &str) -> String {
        let (Some(whole), Some(group)) = (self.captures.get(0), self.group()) else {
            return replacement.to_string();
        };
        let text = whole.as_str();
        let start = group.start() - whole.start();
        let end = group.end() - whole.start();
        format!("{}{replacement}{}", &text[..start], &text[end..])
    }
}

/// Formats `name` as a braced placeholder, `${name}`.
///
/// The braced form stays unambiguous when the placeholder is directly followed
/// by identifier characters.
pub fn placeholder(name: &str) -> String {
    format!("${{{name}}}")
}

/// A policy that finds prototype text and replaces it.
///
/// `regex` returns a pattern template in which every `{value}` is replaced by
/// the registered parameter name before compiling. The pattern must contain a
/// named group `(?P<{value}>...)` so matches can be attributed to it.
pub trait TemplateParameterType: Send + Sync {
    /// The substitution pattern template.
    fn regex(&self) -> String;

    /// Produces the literal replacement for one match.
    fn replace(&self, m: &ParameterMatch<'_, '_>) -> String;
}

/// A parameter type that inspects the prototype before substitution.
///
/// Every build runs an analysis pass first: `analyse` is called for each match
/// of `analyse_regex` and returns what it found, if anything. The findings of
/// that pass, in prototype order, are handed to `regex` for the substitution
/// pass of the same build. Nothing is carried over to later builds.
pub trait AnalysingTemplateParameterType: Send + Sync {
    /// The analysis pattern template, using `{value}` like [`TemplateParameterType::regex`].
    fn analyse_regex(&self) -> String;

    /// Extracts the finding of one analysis match.
    fn analyse(&self, m: &ParameterMatch<'_, '_>) -> Option<String>;

    /// The substitution pattern template for a prototype that produced `findings`.
    fn regex(&self, findings: &[String]) -> String;

    /// Produces the literal replacement for one match.
    fn replace(&self, m: &ParameterMatch<'_, '_>) -> String;
}

/// A registered parameter policy, tagged by capability.
#[derive(Clone)]
pub enum ParameterType {
    /// Participates in substitution only.
    Plain(Arc<dyn TemplateParameterType>),
    /// Participates in analysis and substitution.
    Analysing(Arc<dyn AnalysingTemplateParameterType>),
}

impl ParameterType {
    /// Wraps a plain parameter type.
    pub fn plain(ty: impl TemplateParameterType + 'static) -> Self {
        ParameterType::Plain(Arc::new(ty))
    }

    /// Wraps an analysing parameter type.
    pub fn analysing(ty: impl AnalysingTemplateParameterType + 'static) -> Self {
        ParameterType::Analysing(Arc::new(ty))
    }

    /// The substitution pattern template; plain types ignore `findings`.
    pub fn regex(&self, findings: &[String]) -> String {
        match self {
            ParameterType::Plain(ty) => ty.regex(),
            ParameterType::Analysing(ty) => ty.regex(findings),
        }
    }

    /// The replacement for one match.
    pub fn replace(&self, m: &ParameterMatch<'_, '_>) -> String {
        match self {
            ParameterType::Plain(ty) => ty.replace(m),
            ParameterType::Analysing(ty) => ty.replace(m),
        }
    }

    /// The analysing policy, if this parameter has one.
    pub fn as_analysing(&self) -> Option<&Arc<dyn AnalysingTemplateParameterType>> {
        match self {
            ParameterType::Plain(_) => None,
            ParameterType::Analysing(ty) => Some(ty),
        }
    }
}

impl fmt::Debug for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterType::Plain(ty) => write!(f, "Plain({:?})", ty.regex()),
            ParameterType::Analysing(ty) => {
                write!(f, "Analysing({:?}, {:?})", ty.analyse_regex(), ty.regex(&[]))
            }
        }
    }
}

/// Replaces every occurrence of a fixed pattern with the parameter's placeholder.
#[derive(Debug, Clone)]
pub struct Literal {
    pattern: String,
}

impl Literal {
    /// Matches `pattern`, a regular expression without its own named groups.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}

impl TemplateParameterType for Literal {
    fn regex(&self) -> String {
        format!("(?P<{{value}}>{})", self.pattern)
    }

    fn replace(&self, m: &ParameterMatch<'_, '_>) -> String {
        placeholder(m.name())
    }
}
