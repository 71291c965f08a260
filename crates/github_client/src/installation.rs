//! GitHub App installation domain types.
//!
//! This module contains types related to GitHub App installations,
//! including installation details and account information.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "installation_tests.rs"]
mod tests;

/// Represents a GitHub account (user or organization).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Account {
    /// The unique ID of the account
    pub id: u64,
    /// The login name of the account
    pub login: String,
    /// The type of account (User or Organization)
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
}

/// Represents a GitHub App installation.
///
/// Only the installation id is required; GitHub's metadata is kept when present.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Installation {
    /// The unique ID of the installation
    pub id: u64,
    /// The account (user or organization) where the app is installed
    #[serde(default)]
    pub account: Option<Account>,
    /// Whether the installation covers `all` or `selected` repositories
    #[serde(default)]
    pub repository_selection: Option<String>,
}

impl Installation {
    /// The login of the account the app is installed on, if known.
    pub fn account_login(&self) -> Option<&str> {
        self.account.as_ref().map(|account| account.login.as_str())
    }
}
