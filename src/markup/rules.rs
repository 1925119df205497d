//! Ordered rewrite rules from Jira wiki markup to GitHub Markdown.
//!
//! The rules are regular expression rewrites, not a parser. They are applied
//! one after another, each rule seeing the output of the previous one, so
//! their order is part of their meaning: list markers must be normalized
//! before emphasis sees a leading `*`, block markers must be rewritten after
//! emphasis so `{code:...}` survives it, and whole-line table rules run last.
//! Nested structures and pathological input produce imperfect output but
//! never an error.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::substitute::{MatchGroups, Replacement};

/// Single pattern and replacement in the rewrite sequence.
#[derive(Debug)]
pub struct Rule {
    intent: &'static str,
    pattern: Regex,
    replacement: Replacement,
}

impl Rule {
    /// Short description of what the rule rewrites.
    pub fn intent(&self) -> &'static str {
        self.intent
    }

    /// Applies this rule to every match in `text`.
    pub fn apply(&self, text: &str) -> String {
        self.replacement.apply(&self.pattern, text)
    }
}

/// Rule definitions in application order.
///
/// Whitespace classes are spelled out as ASCII `[\t\n\f\r ]` so that
/// non-breaking spaces, common in text pasted into Jira, count as content.
const RULE_TABLE: &[(&str, &str, Replacement)] = &[
    (
        "unordered list",
        r"(?m)^[ \t]*(\*+)[\t\n\f\r ]+",
        Replacement::Transform(unordered_item),
    ),
    (
        "ordered list",
        r"(?m)^[ \t]*(#+)[\t\n\f\r ]+",
        Replacement::Transform(ordered_item),
    ),
    (
        "header",
        r"(?m)^h([0-6])\.(.*)$",
        Replacement::Transform(header),
    ),
    ("bold", r"\*([^\t\n\f\r ].*)\*", Replacement::Template("**$1**")),
    ("italic", r"_([^\t\n\f\r ].*)_", Replacement::Template("*$1*")),
    ("monospace", r"\{\{([^}]+)\}\}", Replacement::Template("`$1`")),
    // Imprecise: bodies are consumed two characters at a time, so
    // odd-length citations and lines with several ?? pairs mismatch.
    (
        "citation",
        r"\?\?((?:.[^?]|[^?].)+)\?\?",
        Replacement::Template("<cite>$1</cite>"),
    ),
    ("insert", r"\+([^+]*)\+", Replacement::Template("<ins>$1</ins>")),
    (
        "superscript",
        r"\^([^\^]*)\^",
        Replacement::Template("<sup>$1</sup>"),
    ),
    ("subscript", r"~([^~]*)~", Replacement::Template("<sub>$1</sub>")),
    (
        "strikethrough",
        r"([\t\n\f\r ]+)-([^\t\n\f\r ]+.*?[^\t\n\f\r ])-([\t\n\f\r ]+)",
        Replacement::Template("$1~~$2~~$3"),
    ),
    (
        "code block start",
        r"\{code(:([a-z]+))?([:|]?(title|borderStyle|borderColor|borderWidth|bgColor|titleBGColor)=.+?)*\}",
        Replacement::Template("```$2"),
    ),
    ("code block end", r"\{code\}", Replacement::Template("```")),
    ("preformatted", r"\{noformat\}", Replacement::Template("```")),
    (
        "unnamed link",
        r"(?U)\[([^|]+)\]",
        Replacement::Template("<$1>"),
    ),
    ("image", r"!(.+)!", Replacement::Template("![]($1)")),
    (
        "named link",
        r"\[(.+?)\|(.+)\]",
        Replacement::Template("[$1]($2)"),
    ),
    ("blockquote", r"(?m)^bq\.[\t\n\f\r ]+", Replacement::Template("> ")),
    (
        "color",
        r"(?m)\{color:[^}]+\}(.*)\{color\}",
        Replacement::Template("$1"),
    ),
    (
        "panel",
        r"(?m)\{panel:title=([^}]*)\}\n?(.*?)\n?\{panel\}",
        Replacement::Template("\n| $1 |\n| --- |\n| $2 |"),
    ),
    (
        "table header",
        r"(?m)^[ \t]*((?:\|\|.*?)+\|\|)[ \t]*$",
        Replacement::Transform(table_header),
    ),
    (
        "table indentation",
        r"(?m)^[ \t]*\|",
        Replacement::Template("|"),
    ),
];

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    RULE_TABLE
        .iter()
        .map(|&(intent, pattern, replacement)| Rule {
            intent,
            pattern: Regex::new(pattern).expect("rewrite rule pattern is valid"),
            replacement,
        })
        .collect()
});

static DOUBLE_BAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|\|").expect("double bar pattern is valid"));

static HEADER_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|[^|]+").expect("header cell pattern is valid"));

/// Returns the rewrite rules in application order.
pub fn rules() -> &'static [Rule] {
    &RULES
}

/// Rewrites Jira wiki markup into GitHub Flavored Markdown.
///
/// Folds the text through every rule in order. No rule re-scans its own
/// output, but later rules do see the output of earlier ones.
///
/// # Arguments
///
/// * `text`: Jira wiki markup
///
/// # Returns
///
/// Markdown text
pub fn rewrite(text: &str) -> String {
    rules().iter().fold(text.to_string(), |current, rule| {
        let next = rule.apply(&current);
        if next != current {
            debug!(rule = rule.intent(), "applied rewrite rule");
        }
        next
    })
}

/// Indentation for nested list items: two spaces per level beyond the first.
fn indent(markers: &str) -> String {
    "  ".repeat(markers.len().saturating_sub(1))
}

fn unordered_item(groups: &MatchGroups<'_>) -> String {
    indent(groups.get(1)) + "* "
}

fn ordered_item(groups: &MatchGroups<'_>) -> String {
    indent(groups.get(1)) + "1. "
}

fn header(groups: &MatchGroups<'_>) -> String {
    let level = groups.get(1).parse::<usize>().unwrap_or(0);
    "#".repeat(level) + groups.get(2)
}

/// Turns `||a||b||` into a header row and a `---` delimiter row.
fn table_header(groups: &MatchGroups<'_>) -> String {
    let header = DOUBLE_BAR.replace_all(groups.get(1), "|");
    let delimiter = HEADER_CELL.replace_all(&header, "| --- ");

    format!("\n{}\n{}", header, delimiter)
}
