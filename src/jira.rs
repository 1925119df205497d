//! Jira REST client for issues and user accounts.

use rand::Rng;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::markup::{Identity, IdentityLookup};

/// Per request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for a Jira instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JiraConfig {
    /// Base URL, e.g. `https://example.atlassian.net`
    pub host: String,
    /// Account name used for basic authentication
    pub user: String,
    /// API token used as basic authentication password
    pub token: String,
}

/// Retry behaviour for transient failures.
///
/// Connection errors, timeouts, `429` and `5xx` responses are retried up to
/// `max_retries` times after the first attempt. Retry `n` waits
/// `base_delay * 2^n`, randomly shifted by up to a third either way so that
/// concurrent callers do not retry in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 4,
            base_delay: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Exponential backoff before retry number `attempt` (0 based), without jitter.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Delay before retry number `attempt`: the backoff plus or minus a
    /// random third of it.
    pub fn delay(&self, attempt: u32) -> Duration {
        let backoff = self.backoff(attempt);
        let spread = backoff / 3;
        let offset = rand::thread_rng().gen_range(Duration::ZERO..=spread * 2);

        backoff - spread + offset
    }
}

/// Issue as returned by `GET /rest/api/2/issue/{key}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub key: String,
    pub fields: IssueFields,
}

/// Subset of issue fields used for printing.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueFields {
    #[serde(default)]
    pub summary: String,
    /// Wiki markup; Jira sends `null` for empty descriptions
    #[serde(default)]
    pub description: Option<String>,
}

impl Issue {
    pub fn summary(&self) -> &str {
        &self.fields.summary
    }

    pub fn description(&self) -> &str {
        self.fields.description.as_deref().unwrap_or("")
    }

    /// Returns `KEY - Summary`.
    pub fn heading(&self) -> String {
        format!("{} - {}", self.key, self.summary())
    }
}

/// User account as returned by `GET /rest/api/2/user`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub display_name: String,
    /// Hidden by Jira when the user restricts profile visibility
    #[serde(default)]
    pub email_address: String,
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Identity::new(user.display_name, user.email_address)
    }
}

/// Blocking Jira client with basic authentication and retries.
pub struct JiraClient {
    http: Client,
    base_url: String,
    user: String,
    token: String,
    retry: RetryPolicy,
}

impl JiraClient {
    /// Creates client for the configured Jira instance.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: &JiraConfig) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url: normalize_host(&config.host),
            user: config.user.clone(),
            token: config.token.clone(),
            retry: RetryPolicy::default(),
        })
    }

    /// Replaces the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches an issue by key.
    ///
    /// # Arguments
    ///
    /// * `key`: Issue key such as `ABC-123`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the issue does not exist or the
    /// response cannot be decoded
    pub fn get_issue(&self, key: &str) -> Result<Issue> {
        let url = issue_url(&self.base_url, key);
        self.get_json(&format!("issue {}", key), || self.http.get(&url))
    }

    /// Fetches a user account by account id.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the account is unknown
    pub fn get_user(&self, account_id: &str) -> Result<User> {
        let url = user_url(&self.base_url);
        self.get_json(&format!("user {}", account_id), || {
            self.http.get(&url).query(&[("accountId", account_id)])
        })
    }

    fn get_json<T, B>(&self, resource: &str, build: B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Fn() -> RequestBuilder,
    {
        let response = self.send(resource, build)?;
        check_status(resource, response.status())?;
        Ok(response.json()?)
    }

    fn send<B>(&self, resource: &str, build: B) -> Result<Response>
    where
        B: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;

        loop {
            debug!(resource, attempt, "sending request");
            let result = build()
                .basic_auth(&self.user, Some(&self.token))
                .header(reqwest::header::ACCEPT, "application/json")
                .send();

            let retryable = match &result {
                Ok(response) => is_retryable_status(response.status()),
                Err(e) => e.is_connect() || e.is_timeout(),
            };

            if !retryable || attempt >= self.retry.max_retries {
                return Ok(result?);
            }

            let delay = self.retry.delay(attempt);
            match &result {
                Ok(response) => warn!(resource, status = %response.status(), ?delay, "retrying request"),
                Err(e) => warn!(resource, error = %e, ?delay, "retrying request"),
            }

            thread::sleep(delay);
            attempt += 1;
        }
    }
}

impl IdentityLookup for JiraClient {
    fn lookup(&self, account_id: &str) -> Result<Identity> {
        self.get_user(account_id).map(Identity::from)
    }
}

/// Adds `https://` when no scheme is given and drops trailing slashes.
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

fn issue_url(base_url: &str, key: &str) -> String {
    format!("{}/rest/api/2/issue/{}", base_url, key)
}

fn user_url(base_url: &str) -> String {
    format!("{}/rest/api/2/user", base_url)
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Maps a non-success status to [`Error::Request`].
///
/// # Errors
///
/// Returns error if `status` is outside the 2xx range
pub fn check_status(resource: &str, status: StatusCode) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }

    Err(Error::Request {
        resource: resource.to_string(),
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    })
}
