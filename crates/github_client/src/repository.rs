//! Repository domain types.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;

/// A repository visible to an installation.
///
/// # Examples
///
/// ```rust
/// use github_client::RepositoryRef;
///
/// let repo: RepositoryRef =
///     serde_json::from_str(r#"{"id": 1, "full_name": "acme/widgets", "private": true}"#).unwrap();
/// assert_eq!(repo.full_name, "acme/widgets");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RepositoryRef {
    /// The full name of the repository (owner/name)
    pub full_name: String,
    /// The numeric repository id
    #[serde(default)]
    pub id: Option<u64>,
    /// Whether the repository is private
    #[serde(default)]
    pub private: Option<bool>,
}
