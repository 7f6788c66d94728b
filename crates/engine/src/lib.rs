pub use budget_allocations::BudgetAllocation;
pub use commands::{AllocationNewCmd, CostNewCmd};
pub use cost_splits::CostSplit;
pub use costs::{Cost, CostStatus};
pub use currency::Currency;
pub use error::EngineError;
pub use money::Money;
pub use ops::{CostListFilter, Engine, EngineBuilder, MemberRecord};
pub use projects::Project;
pub use report::{
    BudgetVariance, CategoryTotal, DailySpend, ProjectStatistics, budget_variance,
    category_breakdown, daily_series, total_spent,
};
pub use split::{Share, SplitMode, SplitSpec, compute_splits};

mod budget_allocations;
mod commands;
mod cost_splits;
mod costs;
mod currency;
mod error;
mod money;
mod ops;
mod project_members;
mod projects;
pub mod report;
mod split;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
