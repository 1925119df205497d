use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing_subscriber::EnvFilter;
use wti::{Config, IdentityLookup, JiraClient, MarkdownRenderer, Unresolved};

/// Reads markup from a file, or from stdin when the path is `-`.
fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read stdin")?;
        return Ok(content);
    }

    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Translates markup and optionally renders it as HTML.
fn convert(raw: &str, lookup: &dyn IdentityLookup, html: bool) -> String {
    let markdown = wti::translate(raw, lookup);
    if html {
        MarkdownRenderer::new().render(&markdown)
    } else {
        markdown
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let Some(config) = Config::parse()? else {
        return Ok(());
    };
    init_logging(&config);
    config.validate().context("Invalid configuration")?;

    let client = config
        .jira()
        .map(|jira| JiraClient::new(&jira))
        .transpose()
        .context("Failed to create Jira client")?;

    if let Some(path) = &config.file {
        if config.no_description {
            return Ok(());
        }

        let raw = read_input(path)?;
        let output = match &client {
            Some(client) => convert(&raw, client, config.html),
            None => convert(&raw, &Unresolved, config.html),
        };
        println!("{}", output);
        return Ok(());
    }

    let client = client.context("Missing Jira credentials")?;
    let ticket = config.ticket.as_deref().unwrap_or_default();
    let issue = client
        .get_issue(ticket)
        .with_context(|| format!("Failed to fetch ticket {}", ticket))?;

    if !config.no_title {
        println!("{}\n", issue.heading());
    }

    if !config.no_description {
        println!("{}", convert(issue.description(), &client, config.html));
    }

    Ok(())
}
