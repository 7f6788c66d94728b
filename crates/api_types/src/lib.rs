use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
}

pub mod project {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectNew {
        pub name: String,
        pub description: Option<String>,
        pub currency: Option<Currency>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectView {
        pub id: String,
        pub name: String,
        pub description: Option<String>,
        pub currency: Currency,
        pub owner_id: String,
        /// Project budget cap in minor units; absent means "no cap".
        pub budget_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectsResponse {
        pub projects: Vec<ProjectView>,
    }

    /// Request body for setting/clearing the budget cap.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        pub budget_minor: Option<i64>,
    }
}

pub mod member {
    use super::*;

    /// Role of a user in a project.
    ///
    /// - `owner`: created the project and manages members and budget.
    /// - `member`: can log costs, allocate and read reports.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ProjectRole {
        Owner,
        Member,
    }

    /// Request body for inviting an existing user by email.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberInvite {
        pub email: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberView {
        pub user_id: String,
        pub name: Option<String>,
        pub email: String,
        pub role: ProjectRole,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MembersResponse {
        pub members: Vec<MemberView>,
    }
}

pub mod cost {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CostStatus {
        Tentative,
        Final,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SplitMode {
        Equal,
        Exact,
        Percentage,
    }

    /// One exact share: the absolute amount the participant owes.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExactShare {
        pub user_id: String,
        pub amount_minor: i64,
    }

    /// One percentage share (0-100, fractional allowed).
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PercentShare {
        pub user_id: String,
        pub percent: f64,
    }

    /// How to divide the cost, fully typed at the boundary.
    ///
    /// ```json
    /// { "mode": "equal", "participants": ["u-1", "u-2"] }
    /// { "mode": "exact", "shares": [{ "user_id": "u-1", "amount_minor": 1250 }] }
    /// { "mode": "percentage", "shares": [{ "user_id": "u-1", "percent": 60 }] }
    /// ```
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(tag = "mode", rename_all = "snake_case")]
    pub enum SplitNew {
        Equal { participants: Vec<String> },
        Exact { shares: Vec<ExactShare> },
        Percentage { shares: Vec<PercentShare> },
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CostNew {
        pub amount_minor: i64,
        pub category: String,
        pub description: String,
        /// Calendar date the cost occurred on (ISO 8601 date).
        pub occurred_on: NaiveDate,
        /// Defaults to `final` when absent.
        pub status: Option<CostStatus>,
        /// Opaque receipt reference returned by the upload service.
        pub receipt_url: Option<String>,
        pub split: SplitNew,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CostCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CostView {
        pub id: Uuid,
        pub paid_by: String,
        pub amount_minor: i64,
        pub currency: Currency,
        pub category: String,
        pub description: String,
        pub occurred_on: NaiveDate,
        pub status: CostStatus,
        pub receipt_url: Option<String>,
    }

    /// Query parameters for listing costs.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CostListQuery {
        pub status: Option<CostStatus>,
        pub limit: Option<u64>,
        /// Opaque pagination cursor (base64), from `next_cursor`.
        ///
        /// Newest → older pagination.
        pub cursor: Option<String>,
        /// Inclusive lower bound on the cost date.
        pub from: Option<NaiveDate>,
        /// Exclusive upper bound on the cost date.
        pub to: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CostListResponse {
        pub costs: Vec<CostView>,
        /// Opaque cursor for fetching the next page (older items).
        pub next_cursor: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CostSplitView {
        pub user_id: String,
        pub amount_minor: i64,
        pub mode: SplitMode,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CostDetailResponse {
        pub cost: CostView,
        pub splits: Vec<CostSplitView>,
    }
}

pub mod allocation {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AllocationNew {
        pub name: String,
        pub amount_minor: i64,
        /// Optional external ticket reference, stored verbatim.
        pub ticket_ref: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AllocationCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AllocationView {
        pub id: Uuid,
        pub name: String,
        pub amount_minor: i64,
        pub ticket_ref: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AllocationsResponse {
        pub allocations: Vec<AllocationView>,
    }
}

pub mod stats {
    use super::*;

    /// Query parameters for the statistics endpoint.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct StatsQuery {
        /// How many recent days with activity the daily series covers.
        /// Defaults to 7.
        pub days: Option<usize>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotalView {
        pub category: String,
        pub total_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DailySpendView {
        pub date: NaiveDate,
        pub final_minor: i64,
        pub tentative_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetVarianceView {
        pub budget_minor: Option<i64>,
        pub allocated_minor: i64,
        /// `budget - allocated`; absent when no budget is declared.
        pub remaining_minor: Option<i64>,
        pub over_budget: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ProjectStats {
        pub currency: Currency,
        pub total_spent_minor: i64,
        pub tentative_minor: i64,
        pub categories: Vec<CategoryTotalView>,
        pub daily: Vec<DailySpendView>,
        pub variance: BudgetVarianceView,
    }
}
