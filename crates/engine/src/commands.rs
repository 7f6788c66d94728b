//! Command structs for engine write operations.
//!
//! These types group parameters for the larger writes (cost and allocation
//! creation), keeping call sites readable and avoiding long argument lists.
//! The acting user is always an explicit field; the engine has no notion of
//! an ambient session.

use chrono::NaiveDate;

use crate::{CostStatus, SplitSpec};

/// Create a cost together with its splits.
#[derive(Clone, Debug)]
pub struct CostNewCmd {
    pub project_id: String,
    /// Acting user; also recorded as the payer.
    pub user_id: String,
    pub amount_minor: i64,
    pub category: String,
    pub description: String,
    pub occurred_on: NaiveDate,
    pub status: CostStatus,
    pub receipt_url: Option<String>,
    pub split: SplitSpec,
}

impl CostNewCmd {
    #[must_use]
    pub fn new(
        project_id: impl Into<String>,
        user_id: impl Into<String>,
        amount_minor: i64,
        category: impl Into<String>,
        description: impl Into<String>,
        occurred_on: NaiveDate,
        split: SplitSpec,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            user_id: user_id.into(),
            amount_minor,
            category: category.into(),
            description: description.into(),
            occurred_on,
            status: CostStatus::Final,
            receipt_url: None,
            split,
        }
    }

    /// Create the cost as provisional instead of final.
    #[must_use]
    pub fn tentative(mut self) -> Self {
        self.status = CostStatus::Tentative;
        self
    }

    #[must_use]
    pub fn status(mut self, status: CostStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn receipt_url(mut self, url: impl Into<String>) -> Self {
        self.receipt_url = Some(url.into());
        self
    }
}

/// Create a budget allocation line item.
#[derive(Clone, Debug)]
pub struct AllocationNewCmd {
    pub project_id: String,
    pub user_id: String,
    pub name: String,
    pub amount_minor: i64,
    pub ticket_ref: Option<String>,
}

impl AllocationNewCmd {
    #[must_use]
    pub fn new(
        project_id: impl Into<String>,
        user_id: impl Into<String>,
        name: impl Into<String>,
        amount_minor: i64,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            user_id: user_id.into(),
            name: name.into(),
            amount_minor,
            ticket_ref: None,
        }
    }

    #[must_use]
    pub fn ticket_ref(mut self, ticket_ref: impl Into<String>) -> Self {
        self.ticket_ref = Some(ticket_ref.into());
        self
    }
}
