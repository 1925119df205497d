//! Account mention resolution.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

use super::substitute::replace_with;
use crate::error::{Error, Result};

/// Matches `[~accountid:ID]`; group 2 is the account identifier.
static MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\[~accountid:)([a-zA-Z0-9:-]+)(\])").expect("mention pattern is valid")
});

/// Human readable identity behind an account identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub display_name: String,
    pub email: String,
}

impl Identity {
    pub fn new(display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.email)
    }
}

/// Resolves account identifiers to identities.
///
/// Implemented by the Jira client and by any `Fn(&str) -> Result<Identity>`,
/// which keeps translation testable without a tracker.
pub trait IdentityLookup {
    /// Looks up a single account.
    ///
    /// # Errors
    ///
    /// Returns error if the account cannot be resolved
    fn lookup(&self, account_id: &str) -> Result<Identity>;
}

impl<F> IdentityLookup for F
where
    F: Fn(&str) -> Result<Identity>,
{
    fn lookup(&self, account_id: &str) -> Result<Identity> {
        self(account_id)
    }
}

/// Lookup that never resolves, leaving every mention as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unresolved;

impl IdentityLookup for Unresolved {
    fn lookup(&self, _account_id: &str) -> Result<Identity> {
        Err(Error::Unavailable("no issue tracker configured".to_string()))
    }
}

/// Replaces account mentions with `Display Name (email)`.
///
/// Each mention triggers exactly one lookup, in text order. A mention whose
/// lookup fails is kept verbatim so one unknown account never blocks the
/// rest of the text.
///
/// # Arguments
///
/// * `text`: Raw markup possibly containing `[~accountid:...]` tokens
/// * `lookup`: Identity source
///
/// # Returns
///
/// Text with resolvable mentions replaced
pub fn resolve_mentions<L>(text: &str, lookup: &L) -> String
where
    L: IdentityLookup + ?Sized,
{
    replace_with(&MENTION, text, |groups| {
        let account_id = groups.get(2);

        match lookup.lookup(account_id) {
            Ok(identity) => {
                debug!(account_id, name = %identity.display_name, "resolved mention");
                identity.to_string()
            }
            Err(e) => {
                debug!(account_id, error = %e, "leaving mention unresolved");
                groups.full().to_string()
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn ada(account_id: &str) -> Result<Identity> {
        match account_id {
            "557058:ada" => Ok(Identity::new("Ada Lovelace", "ada@x.com")),
            other => Err(Error::Request {
                resource: format!("user {}", other),
                status: 404,
                reason: "Not Found".to_string(),
            }),
        }
    }

    #[test]
    fn test_resolves_known_mention() {
        // Arrange
        let text = "Ping [~accountid:557058:ada] please";

        // Act
        let result = resolve_mentions(text, &ada);

        // Assert
        assert_eq!(result, "Ping Ada Lovelace (ada@x.com) please");
    }

    #[test]
    fn test_failed_lookup_keeps_token_verbatim() {
        let text = "cc [~accountid:5b10ac8d82e05b22cc7d4ef5].";

        let result = resolve_mentions(text, &ada);

        assert_eq!(result, text);
    }

    #[test]
    fn test_mixed_mentions_resolve_independently() {
        // Arrange
        let text = "[~accountid:unknown-1] and [~accountid:557058:ada]";

        // Act
        let result = resolve_mentions(text, &ada);

        // Assert
        assert_eq!(result, "[~accountid:unknown-1] and Ada Lovelace (ada@x.com)");
    }

    #[test]
    fn test_one_lookup_per_mention_in_order() {
        // Arrange
        let calls = RefCell::new(Vec::new());
        let recorder = |account_id: &str| -> Result<Identity> {
            calls.borrow_mut().push(account_id.to_string());
            Ok(Identity::new(account_id.to_uppercase(), "x@y.z"))
        };

        // Act
        let result = resolve_mentions("[~accountid:b] [~accountid:a] [~accountid:b]", &recorder);

        // Assert
        assert_eq!(result, "B (x@y.z) A (x@y.z) B (x@y.z)");
        assert_eq!(*calls.borrow(), vec!["b", "a", "b"]);
    }

    #[test]
    fn test_unresolved_lookup_changes_nothing() {
        let text = "by [~accountid:abc-123]\n";

        let result = resolve_mentions(text, &Unresolved);

        assert_eq!(result, text);
    }

    #[test]
    fn test_malformed_mentions_are_ignored() {
        // Arrange
        let calls = RefCell::new(0);
        let counter = |_: &str| -> Result<Identity> {
            *calls.borrow_mut() += 1;
            Ok(Identity::new("n", "e"))
        };

        // Act
        let result = resolve_mentions("[~accountid:] [~someone] [~accountid:a b]", &counter);

        // Assert
        assert_eq!(result, "[~accountid:] [~someone] [~accountid:a b]");
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_identity_display() {
        let identity = Identity::new("Grace Hopper", "grace@navy.mil");

        assert_eq!(identity.to_string(), "Grace Hopper (grace@navy.mil)");
    }
}
