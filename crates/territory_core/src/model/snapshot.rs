//! Point-in-time bundle of the records a planning call works on.

use crate::model::account::Account;
use crate::model::outcome::{Outcome, OutcomeValidationError};
use serde::{Deserialize, Serialize};

/// Accounts and outcomes as fetched by the external data layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

impl Snapshot {
    /// Finds an account by id.
    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == id)
    }

    /// Finds an outcome by id.
    pub fn outcome(&self, id: &str) -> Option<&Outcome> {
        self.outcomes.iter().find(|outcome| outcome.id == id)
    }

    /// Collects every outcome-level validation failure without stopping at
    /// the first one.
    pub fn validation_errors(&self) -> Vec<OutcomeValidationError> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.validate().err())
            .collect()
    }
}
