//! The template builder: prototype plus parameter types, compiled on demand.

use crate::error::TemplateError;
use crate::parameter::{AnalysingTemplateParameterType, ParameterMatch, ParameterType};
use crate::template::Template;
use regex::{Captures, Regex};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Builds a [`Template`] from a prototype and a set of named parameter types.
///
/// Configuration is by value: [`set_prototype`](Self::set_prototype) and
/// [`add_parameter`](Self::add_parameter) consume the builder and return a new
/// one with an empty cache, so a compiled template can never be stale.
/// [`build`](Self::build) compiles once and hands out the cached snapshot on
/// every later call.
///
/// When several parameter patterns can match at the same position, the one
/// registered first wins.
#[derive(Debug, Clone, Default)]
pub struct TemplateBuilder {
    prototype: String,
    parameters: Vec<(String, ParameterType)>,
    cache: OnceLock<Template>,
}

impl TemplateBuilder {
    /// Creates a builder with an empty prototype and no parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the prototype text.
    pub fn set_prototype(mut self, prototype: impl Into<String>) -> Self {
        self.prototype = prototype.into();
        self.cache = OnceLock::new();
        self
    }

    /// Replaces the prototype with `lines` joined by newlines.
    pub fn set_prototype_lines<I, S>(self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = lines
            .into_iter()
            .map(|l| l.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        self.set_prototype(joined)
    }

    /// Registers `ty` under `name`.
    ///
    /// Re-registering a name replaces its policy but keeps its original
    /// position in the precedence order.
    pub fn add_parameter(mut self, name: impl Into<String>, ty: ParameterType) -> Self {
        let name = name.into();
        match self.parameters.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = ty,
            None => self.parameters.push((name, ty)),
        }
        self.cache = OnceLock::new();
        self
    }

    /// The current prototype text.
    pub fn prototype(&self) -> &str {
        &self.prototype
    }

    /// Registered parameter names in precedence order.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.parameters.iter().map(|(n, _)| n.as_str())
    }

    /// Returns the compiled template, compiling it on first use.
    pub fn build(&self) -> Result<Template, TemplateError> {
        if let Some(template) = self.cache.get() {
            return Ok(template.clone());
        }
        let template = self.compile()?;
        Ok(self.cache.get_or_init(|| template).clone())
    }

    fn compile(&self) -> Result<Template, TemplateError> {
        let findings = self.analyse()?;
        let pattern = combine(
            self.parameters
                .iter()
                .zip(&findings)
                .map(|((name, ty), found)| expand(&ty.regex(found), name)),
        )?;
        let text = match &pattern {
            Some(regex) => self.substitute(regex)?,
            None => self.prototype.clone(),
        };
        debug!(
            parameters = self.parameters.len(),
            prototype_len = self.prototype.len(),
            "template compiled"
        );
        Template::compile(text, pattern)
    }

    fn analysers(&self) -> Vec<(usize, &str, &Arc<dyn AnalysingTemplateParameterType>)> {
        self.parameters
            .iter()
            .enumerate()
            .filter_map(|(ix, (name, ty))| ty.as_analysing().map(|a| (ix, name.as_str(), a)))
            .collect()
    }

    /// Runs the analysis pass over the current prototype.
    ///
    /// Returns the findings of each registered parameter, indexed like
    /// `parameters`; plain parameters get none.
    fn analyse(&self) -> Result<Vec<Vec<String>>, TemplateError> {
        let mut findings = vec![Vec::new(); self.parameters.len()];
        let analysers = self.analysers();
        let Some(regex) = combine(
            analysers
                .iter()
                .map(|(_, name, ty)| expand(&ty.analyse_regex(), name)),
        )?
        else {
            return Ok(findings);
        };
        for captures in regex.captures_iter(&self.prototype) {
            if let Some((ix, name, ty)) = analysers
                .iter()
                .find(|(_, name, _)| captures.name(name).is_some())
            {
                if let Some(found) = ty.analyse(&ParameterMatch::new(name, &captures)) {
                    findings[*ix].push(found);
                }
            }
        }
        Ok(findings)
    }

    fn substitute(&self, regex: &Regex) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.prototype.len());
        let mut last = 0;
        for captures in regex.captures_iter(&self.prototype) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            out.push_str(&self.prototype[last..whole.start()]);
            let (name, ty) = self.matching_parameter(&captures).ok_or_else(|| {
                TemplateError::UnknownPlaceholder {
                    matched: whole.as_str().to_string(),
                }
            })?;
            out.push_str(&ty.replace(&ParameterMatch::new(name, &captures)));
            last = whole.end();
        }
        out.push_str(&self.prototype[last..]);
        Ok(out)
    }

    /// Exactly one alternative fires per match; its named group identifies it.
    fn matching_parameter(&self, captures: &Captures<'_>) -> Option<(&str, &ParameterType)> {
        self.parameters
            .iter()
            .find(|(name, _)| captures.name(name).is_some())
            .map(|(name, ty)| (name.as_str(), ty))
    }
}

fn expand(pattern: &str, name: &str) -> String {
    pattern.replace("{value}", name)
}

/// Joins patterns into one leftmost-first alternation; `None` if there are none.
fn combine(patterns: impl Iterator<Item = String>) -> Result<Option<Regex>, TemplateError> {
    let alternatives: Vec<String> = patterns.map(|p| format!("(?:{p})")).collect();
    if alternatives.is_empty() {
        return Ok(None);
    }
    let pattern = alternatives.join("|");
    Regex::new(&pattern)
        .map(Some)
        .map_err(|e| TemplateError::InvalidRegex {
            pattern,
            reason: e.to_string(),
        })
}
