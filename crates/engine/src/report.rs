//! Budget aggregation.
//!
//! Pure, deterministic functions over a snapshot of a project's costs and
//! allocations. Nothing here reads the clock or the store: "today" only
//! enters via the data, and the ops layer is responsible for loading a
//! consistent snapshot before calling in.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{BudgetAllocation, Cost, CostStatus, Currency, EngineError, Money};

/// One category with the summed amount of its **final** costs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
}

/// Summed spend for one calendar day, final and tentative kept apart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailySpend {
    pub date: NaiveDate,
    pub final_total: Money,
    pub tentative_total: Money,
}

/// Planned budget vs. allocated line items.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetVariance {
    pub budget: Option<Money>,
    pub allocated: Money,
    /// `budget - allocated`; absent when no budget is declared.
    pub remaining: Option<Money>,
    pub over_budget: bool,
}

/// Everything a project reporting surface needs, computed in one pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectStatistics {
    pub currency: Currency,
    pub total_spent: Money,
    pub tentative_total: Money,
    pub categories: Vec<CategoryTotal>,
    pub daily: Vec<DailySpend>,
    pub variance: BudgetVariance,
}

/// Sum of cost amounts whose status matches `status`.
pub fn total_spent(
    currency: Currency,
    costs: &[Cost],
    status: CostStatus,
) -> Result<Money, EngineError> {
    Money::sum(
        currency,
        costs
            .iter()
            .filter(|cost| cost.status == status)
            .map(|cost| cost.amount),
    )
}

/// Category → summed amount over final costs, sorted descending by amount
/// (ties broken by name so the order is stable). Consumers may truncate to
/// the top N.
pub fn category_breakdown(
    currency: Currency,
    costs: &[Cost],
) -> Result<Vec<CategoryTotal>, EngineError> {
    let mut by_category: BTreeMap<&str, Money> = BTreeMap::new();
    for cost in costs {
        if cost.status != CostStatus::Final {
            continue;
        }
        let entry = by_category
            .entry(cost.category.as_str())
            .or_insert_with(|| Money::zero(currency));
        *entry = entry.checked_add(cost.amount)?;
    }

    let mut out: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    out.sort_by(|a, b| {
        b.total
            .minor()
            .cmp(&a.total.minor())
            .then_with(|| a.category.cmp(&b.category))
    });
    Ok(out)
}

/// Groups costs by calendar day and returns the most recent `window` days
/// **present in the data**, ascending. Days without any cost entry do not
/// appear.
pub fn daily_series(
    currency: Currency,
    costs: &[Cost],
    window: usize,
) -> Result<Vec<DailySpend>, EngineError> {
    let mut by_day: BTreeMap<NaiveDate, (Money, Money)> = BTreeMap::new();
    for cost in costs {
        let entry = by_day
            .entry(cost.occurred_on)
            .or_insert_with(|| (Money::zero(currency), Money::zero(currency)));
        match cost.status {
            CostStatus::Final => entry.0 = entry.0.checked_add(cost.amount)?,
            CostStatus::Tentative => entry.1 = entry.1.checked_add(cost.amount)?,
        }
    }

    let days: Vec<DailySpend> = by_day
        .into_iter()
        .map(|(date, (final_total, tentative_total))| DailySpend {
            date,
            final_total,
            tentative_total,
        })
        .collect();
    let skip = days.len().saturating_sub(window);
    Ok(days.into_iter().skip(skip).collect())
}

/// Rolls allocations up against the optional budget cap.
pub fn budget_variance(
    currency: Currency,
    budget: Option<Money>,
    allocations: &[BudgetAllocation],
) -> Result<BudgetVariance, EngineError> {
    let allocated = Money::sum(currency, allocations.iter().map(|a| a.amount))?;
    let remaining = budget.map(|b| b.checked_sub(allocated)).transpose()?;
    Ok(BudgetVariance {
        budget,
        allocated,
        remaining,
        over_budget: remaining.is_some_and(Money::is_negative),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    const CURRENCY: Currency = Currency::Usd;

    fn usd(minor: i64) -> Money {
        Money::new(minor, CURRENCY)
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, day).unwrap()
    }

    fn cost(minor: i64, category: &str, day: u32, status: CostStatus) -> Cost {
        Cost {
            id: Uuid::new_v4(),
            project_id: "p".to_string(),
            paid_by: "u".to_string(),
            amount: usd(minor),
            category: category.to_string(),
            description: String::new(),
            occurred_on: date(day),
            status,
            receipt_url: None,
            created_at: Utc::now(),
        }
    }

    fn allocation(minor: i64) -> BudgetAllocation {
        BudgetAllocation::new(
            "p".to_string(),
            "item".to_string(),
            usd(minor),
            None,
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn total_spent_filters_by_status() {
        let costs = vec![
            cost(10_00, "Software", 1, CostStatus::Final),
            cost(5_00, "Software", 2, CostStatus::Tentative),
            cost(20_00, "Legal", 3, CostStatus::Final),
        ];
        assert_eq!(
            total_spent(CURRENCY, &costs, CostStatus::Final)
                .unwrap()
                .minor(),
            30_00
        );
        assert_eq!(
            total_spent(CURRENCY, &costs, CostStatus::Tentative)
                .unwrap()
                .minor(),
            5_00
        );
    }

    #[test]
    fn category_breakdown_final_only_sorted_descending() {
        let costs = vec![
            cost(10_00, "Software", 1, CostStatus::Final),
            cost(25_00, "Marketing", 1, CostStatus::Final),
            cost(15_00, "Software", 2, CostStatus::Final),
            cost(99_00, "Legal", 2, CostStatus::Tentative),
        ];
        let breakdown = category_breakdown(CURRENCY, &costs).unwrap();
        let labels: Vec<(&str, i64)> = breakdown
            .iter()
            .map(|c| (c.category.as_str(), c.total.minor()))
            .collect();
        assert_eq!(labels, vec![("Marketing", 25_00), ("Software", 25_00)]);
    }

    #[test]
    fn category_breakdown_ties_break_by_name() {
        let costs = vec![
            cost(10_00, "Zeta", 1, CostStatus::Final),
            cost(10_00, "Alpha", 1, CostStatus::Final),
        ];
        let breakdown = category_breakdown(CURRENCY, &costs).unwrap();
        assert_eq!(breakdown[0].category, "Alpha");
        assert_eq!(breakdown[1].category, "Zeta");
    }

    #[test]
    fn daily_series_groups_and_windows() {
        let costs = vec![
            cost(10_00, "a", 1, CostStatus::Final),
            cost(5_00, "a", 1, CostStatus::Tentative),
            cost(7_00, "a", 3, CostStatus::Final),
            cost(2_00, "a", 5, CostStatus::Final),
            cost(1_00, "a", 9, CostStatus::Tentative),
        ];

        let all = daily_series(CURRENCY, &costs, 10).unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].date, date(1));
        assert_eq!(all[0].final_total.minor(), 10_00);
        assert_eq!(all[0].tentative_total.minor(), 5_00);

        // Window keeps only the most recent days present in the data.
        let windowed = daily_series(CURRENCY, &costs, 2).unwrap();
        assert_eq!(windowed.len(), 2);
        assert_eq!(windowed[0].date, date(5));
        assert_eq!(windowed[1].date, date(9));
        assert_eq!(windowed[1].tentative_total.minor(), 1_00);
        assert_eq!(windowed[1].final_total.minor(), 0);
    }

    #[test]
    fn variance_with_budget() {
        let variance = budget_variance(
            CURRENCY,
            Some(usd(1000_00)),
            &[allocation(400_00), allocation(300_00)],
        )
        .unwrap();
        assert_eq!(variance.allocated.minor(), 700_00);
        assert_eq!(variance.remaining.unwrap().minor(), 300_00);
        assert!(!variance.over_budget);

        let variance = budget_variance(
            CURRENCY,
            Some(usd(1000_00)),
            &[allocation(400_00), allocation(300_00), allocation(400_00)],
        )
        .unwrap();
        assert_eq!(variance.remaining.unwrap().minor(), -100_00);
        assert!(variance.over_budget);
    }

    #[test]
    fn variance_without_budget_has_no_remaining() {
        let variance = budget_variance(CURRENCY, None, &[allocation(400_00)]).unwrap();
        assert_eq!(variance.allocated.minor(), 400_00);
        assert!(variance.remaining.is_none());
        assert!(!variance.over_budget);
    }
}
