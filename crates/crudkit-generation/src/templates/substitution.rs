//! Placeholder substitution
//!
//! Templates carry two kinds of placeholders:
//! - inline tokens such as `{{ModelName}}`, replaced verbatim wherever they occur
//! - line tags such as `#CONTENT`, which must stand alone on their line and are
//!   replaced by a (possibly multi-line) block indented to the tag's column
//!
//! Host-language expressions (`{{ $post->title }}`) always carry inner whitespace,
//! so they are never mistaken for inline tokens.

use once_cell::sync::Lazy;
use regex::Regex;

static INLINE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{[A-Za-z_][A-Za-z0-9_\-]*\}\}").expect("valid token pattern"));

static LINE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*#([A-Z][A-Z0-9_]*)[ \t]*$").expect("valid tag pattern"));

/// Replace every literal occurrence of `token` with `value`
pub fn substitute(template: &str, token: &str, value: &str) -> String {
    if token.is_empty() {
        return template.to_string();
    }
    template.replace(token, value)
}

/// Replace every line consisting solely of `#tag` with `value`
///
/// Each line of `value` is indented to the tag's indentation. An empty value
/// removes the tag line altogether.
pub fn substitute_tag(template: &str, tag: &str, value: &str) -> String {
    let marker = format!("#{}", tag.trim_start_matches('#'));
    let mut out = String::with_capacity(template.len() + value.len());

    for line in template.split_inclusive('\n') {
        let (body, ending) = match line.strip_suffix('\n') {
            Some(body) => (body, "\n"),
            None => (line, ""),
        };

        if body.trim() != marker {
            out.push_str(line);
            continue;
        }

        if value.is_empty() {
            continue;
        }

        let indent = &body[..body.len() - body.trim_start().len()];
        let block = value
            .lines()
            .map(|l| {
                if l.is_empty() {
                    String::new()
                } else {
                    format!("{}{}", indent, l)
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        out.push_str(&block);
        out.push_str(ending);
    }

    out
}

/// Drop every line tag that is still present
pub fn remove_unset_tags(template: &str) -> String {
    template
        .split_inclusive('\n')
        .filter(|line| !LINE_TAG.is_match(line.trim_end_matches(['\n', '\r'])))
        .collect()
}

/// Names of the line tags present in `template`, in order of appearance
pub fn line_tags(template: &str) -> Vec<String> {
    template
        .lines()
        .filter_map(|line| LINE_TAG.captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Inline tokens left in `text`, in order of appearance
pub fn unresolved_tokens(text: &str) -> Vec<String> {
    INLINE_TOKEN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// An ordered set of inline token values
///
/// Keys are bare identifiers; [`Substitutions::apply`] wraps them in `{{ }}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions {
    values: Vec<(String, String)>,
}

impl Substitutions {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.values.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.values.push((key, value)),
        }
    }

    /// Builder-style variant of [`Substitutions::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Merge another set into this one; its values win
    pub fn extend(&mut self, other: &Substitutions) {
        for (key, value) in &other.values {
            self.insert(key.clone(), value.clone());
        }
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over keys and values in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether no values are set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace every `{{key}}` in `template`
    pub fn apply(&self, template: &str) -> String {
        self.values.iter().fold(template.to_string(), |text, (key, value)| {
            substitute(&text, &format!("{{{{{}}}}}", key), value)
        })
    }
}
