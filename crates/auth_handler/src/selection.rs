//! Installation selection policies.
//!
//! A GitHub App can be installed on several accounts, but the broker works with a
//! single installation per call. The policy deciding which one is explicit so it can
//! be swapped without touching the broker.

use github_client::Installation;

/// Picks the installation the broker works with.
pub trait InstallationSelector: Send + Sync + std::fmt::Debug {
    /// Returns the chosen installation, or `None` if none is acceptable.
    fn select<'a>(&self, installations: &'a [Installation]) -> Option<&'a Installation>;
}

/// Uses the first installation in the order GitHub returned them.
///
/// This is a single-tenant assumption: GitHub does not promise any particular order,
/// so with more than one installation the choice is not necessarily the intended one.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstInstallation;

impl InstallationSelector for FirstInstallation {
    fn select<'a>(&self, installations: &'a [Installation]) -> Option<&'a Installation> {
        installations.first()
    }
}

/// Uses the installation on the account with the given login (case-insensitive).
#[derive(Debug, Clone)]
pub struct AccountLoginSelector {
    login: String,
}

impl AccountLoginSelector {
    /// Creates a selector for the account `login`.
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
        }
    }
}

impl InstallationSelector for AccountLoginSelector {
    fn select<'a>(&self, installations: &'a [Installation]) -> Option<&'a Installation> {
        installations.iter().find(|installation| {
            installation
                .account_login()
                .is_some_and(|login| login.eq_ignore_ascii_case(&self.login))
        })
    }
}
