//! Jira wiki markup to GitHub Flavored Markdown translation.
//!
//! Translation runs in two stages: account mentions are resolved to
//! `Display Name (email)` first, then the ordered rewrite rules turn the
//! markup into Markdown. The rewrite is a best effort line and pattern
//! rewriter, not a parser, so deeply nested markup may come out imperfect.

mod mention;
mod rules;
mod substitute;

pub use mention::{Identity, IdentityLookup, Unresolved, resolve_mentions};
pub use rules::{Rule, rewrite, rules};
pub use substitute::{MatchGroups, Replacement, replace_template, replace_with};

/// Translates Jira wiki markup to GitHub Flavored Markdown.
///
/// Mentions whose lookup fails are left as written and then go through the
/// rewrite rules like any other text.
///
/// # Arguments
///
/// * `raw`: Jira wiki markup, typically an issue description
/// * `lookup`: Identity source for `[~accountid:...]` mentions
///
/// # Returns
///
/// Markdown text
pub fn translate<L>(raw: &str, lookup: &L) -> String
where
    L: IdentityLookup + ?Sized,
{
    let resolved = resolve_mentions(raw, lookup);
    rewrite(&resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};

    fn lookup(account_id: &str) -> Result<Identity> {
        if account_id == "ada" {
            Ok(Identity::new("Ada Lovelace", "ada@x.com"))
        } else {
            Err(Error::Unavailable(account_id.to_string()))
        }
    }

    #[test]
    fn test_translate_resolves_before_rewriting() {
        // Arrange
        let raw = "h2. Owner\n* [~accountid:ada] owns *this*";

        // Act
        let result = translate(raw, &lookup);

        // Assert
        assert_eq!(result, "## Owner\n* Ada Lovelace (ada@x.com) owns **this**");
    }

    #[test]
    fn test_unresolved_mention_is_rewritten_as_link() {
        let result = translate("cc [~accountid:nobody]", &lookup);

        assert_eq!(result, "cc <~accountid:nobody>");
    }

    #[test]
    fn test_translate_through_trait_object() {
        let dynamic: &dyn IdentityLookup = &Unresolved;

        let result = translate("_quiet_", dynamic);

        assert_eq!(result, "*quiet*");
    }
}
