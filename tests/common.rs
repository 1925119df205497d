//! Shared test utilities for integration tests.
//!
//! Provides an in-memory identity directory standing in for the Jira user
//! endpoint, recording every lookup it receives.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use wti::{Error, Identity, IdentityLookup, Result};

/// In-memory identity directory that records lookups.
#[derive(Default)]
pub struct FakeDirectory {
    users: HashMap<String, Identity>,
    calls: RefCell<Vec<String>>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resolvable account.
    pub fn with_user(mut self, account_id: &str, name: &str, email: &str) -> Self {
        self.users
            .insert(account_id.to_string(), Identity::new(name, email));
        self
    }

    /// Account ids looked up so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl IdentityLookup for FakeDirectory {
    fn lookup(&self, account_id: &str) -> Result<Identity> {
        self.calls.borrow_mut().push(account_id.to_string());

        self.users
            .get(account_id)
            .cloned()
            .ok_or_else(|| Error::Request {
                resource: format!("user {}", account_id),
                status: 404,
                reason: "Not Found".to_string(),
            })
    }
}
