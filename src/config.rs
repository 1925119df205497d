//! Command line configuration.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::jira::JiraConfig;

/// Command line configuration for wti.
#[derive(Debug, Clone, Parser)]
#[command(name = "wti", version, about, long_about = None)]
pub struct Config {
    /// Ticket key, e.g. ABC-123
    #[arg(required_unless_present = "file")]
    pub ticket: Option<String>,

    /// Translate a local markup file instead of fetching a ticket ("-" reads stdin)
    #[arg(short, long, conflicts_with = "ticket")]
    pub file: Option<PathBuf>,

    /// Do not print the ticket title
    #[arg(long)]
    pub no_title: bool,

    /// Do not print the ticket description
    #[arg(long)]
    pub no_description: bool,

    /// Render the translated Markdown as HTML
    #[arg(long)]
    pub html: bool,

    /// Log debug details to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Jira base URL
    #[arg(long, env = "ATLASSIAN_HOST")]
    pub host: Option<String>,

    /// Jira account used for authentication
    #[arg(long, env = "ATLASSIAN_API_USER")]
    pub user: Option<String>,

    /// Jira API token
    #[arg(long, env = "ATLASSIAN_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl Config {
    /// Parses configuration from command line arguments and environment.
    ///
    /// # Errors
    ///
    /// Returns error on unknown flags or missing arguments.
    pub fn parse() -> Result<Option<Self>> {
        Self::parse_args(std::env::args_os())
    }

    /// Parses configuration from the given arguments.
    ///
    /// Help and version requests are printed here and yield `None`, so
    /// only real usage errors reach the caller.
    ///
    /// # Errors
    ///
    /// Returns error on unknown flags or missing arguments.
    pub fn parse_args<I, T>(args: I) -> Result<Option<Self>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match <Self as Parser>::try_parse_from(args) {
            Ok(config) => Ok(Some(config)),
            Err(e) if !e.use_stderr() => {
                e.print().context("Failed to print help")?;
                Ok(None)
            }
            Err(e) => Err(e).context("Invalid arguments"),
        }
    }

    /// Validates configuration.
    ///
    /// # Errors
    ///
    /// Returns error if a ticket is requested without complete credentials
    /// or the input file does not exist.
    pub fn validate(&self) -> Result<()> {
        if let Some(file) = &self.file {
            if file.as_os_str() != "-" && !file.exists() {
                bail!("Input file does not exist: {}", file.display());
            }
            return Ok(());
        }

        if self.ticket.as_deref().is_none_or(str::is_empty) {
            bail!("A ticket key is required");
        }

        let missing = self.missing_credentials();
        if !missing.is_empty() {
            bail!("Missing Jira credentials: {}", missing.join(", "));
        }

        Ok(())
    }

    /// Returns Jira connection settings when all credentials are present.
    pub fn jira(&self) -> Option<JiraConfig> {
        Some(JiraConfig {
            host: self.host.clone().filter(|v| !v.is_empty())?,
            user: self.user.clone().filter(|v| !v.is_empty())?,
            token: self.token.clone().filter(|v| !v.is_empty())?,
        })
    }

    /// Log filter directive derived from the verbosity flag.
    pub fn log_directive(&self) -> &'static str {
        if self.verbose { "wti=debug" } else { "warn" }
    }

    fn missing_credentials(&self) -> Vec<&'static str> {
        [
            (&self.host, "ATLASSIAN_HOST"),
            (&self.user, "ATLASSIAN_API_USER"),
            (&self.token, "ATLASSIAN_API_TOKEN"),
        ]
        .into_iter()
        .filter(|(value, _)| value.as_deref().is_none_or(str::is_empty))
        .map(|(_, name)| name)
        .collect()
    }
}
