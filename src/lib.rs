//! Print Jira tickets as GitHub Flavored Markdown.
//!
//! The translation core lives in [`markup`]; [`jira`] fetches issues and
//! resolves account mentions against a Jira instance.

mod config;
mod error;
pub mod jira;
pub mod markup;
mod render;

pub use config::Config;
pub use error::{Error, Result};
pub use jira::{Issue, JiraClient, JiraConfig, RetryPolicy};
pub use markup::{Identity, IdentityLookup, Unresolved, resolve_mentions, rewrite, translate};
pub use render::MarkdownRenderer;
