//! Pattern substitution with template or callback replacements.

use regex::{Captures, Regex};
use std::ops::Index;

/// Full match and positional capture groups of a single pattern match.
///
/// Index 0 is the complete match, indices 1..N are the capture groups in
/// pattern order. Groups that did not participate in the match are empty
/// strings, so callers never need to distinguish "absent" from "empty".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroups<'t> {
    groups: Vec<&'t str>,
}

impl<'t> MatchGroups<'t> {
    fn from_captures(captures: &Captures<'t>) -> Self {
        let groups = captures
            .iter()
            .map(|group| group.map_or("", |m| m.as_str()))
            .collect();

        Self { groups }
    }

    /// Returns the complete matched text.
    pub fn full(&self) -> &'t str {
        self.get(0)
    }

    /// Returns group `index`, or an empty string when out of range.
    pub fn get(&self, index: usize) -> &'t str {
        self.groups.get(index).copied().unwrap_or("")
    }

    /// Number of entries including the full match.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Always false for groups built from a match, which hold at least the full match.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<'t> Index<usize> for MatchGroups<'t> {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        self.groups[index]
    }
}

/// Replacement policy for a rewrite rule.
#[derive(Debug, Clone, Copy)]
pub enum Replacement {
    /// Template expanded with `$N` back-references.
    Template(&'static str),
    /// Function computing the replacement from the match groups.
    Transform(fn(&MatchGroups<'_>) -> String),
}

impl Replacement {
    /// Applies the policy to every match of `pattern` in `text`.
    pub fn apply(&self, pattern: &Regex, text: &str) -> String {
        match self {
            Replacement::Template(template) => replace_template(pattern, text, template),
            Replacement::Transform(transform) => replace_with(pattern, text, *transform),
        }
    }
}

/// Replaces every match of `pattern` with `template`.
///
/// Back-references use `$N`; non-participating groups expand to nothing.
pub fn replace_template(pattern: &Regex, text: &str, template: &str) -> String {
    pattern.replace_all(text, template).into_owned()
}

/// Replaces every match of `pattern` with the output of `replace`.
///
/// Matches are visited left to right and never overlap. Text between
/// matches is copied through untouched. The callback may perform side
/// effects such as remote lookups; returning `groups.full()` leaves a match
/// as it was.
///
/// # Arguments
///
/// * `pattern`: Compiled pattern to search for
/// * `text`: Input text
/// * `replace`: Callback receiving the match groups of each match
///
/// # Returns
///
/// Text with all matches replaced
pub fn replace_with<F>(pattern: &Regex, text: &str, mut replace: F) -> String
where
    F: FnMut(&MatchGroups<'_>) -> String,
{
    let mut result = String::with_capacity(text.len());
    let mut last = 0;

    for captures in pattern.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };

        result.push_str(&text[last..whole.start()]);
        result.push_str(&replace(&MatchGroups::from_captures(&captures)));
        last = whole.end();
    }

    result.push_str(&text[last..]);
    result
}
