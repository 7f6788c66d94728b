//! The split calculator.
//!
//! [`compute_splits`] turns a cost total into per-participant shares. It is a
//! pure function over its inputs and is the single place the splitting rules
//! live; the ledger re-uses it when persisting a cost so the stored splits
//! always sum exactly to the stored total.

use serde::{Deserialize, Serialize};

use crate::{EngineError, Money};

/// Tolerance when checking that percentage weights sum to 100.
const PERCENT_EPSILON: f64 = 0.01;

/// How a cost was divided among participants, as stored on each split row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    Equal,
    Exact,
    Percentage,
}

impl SplitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Exact => "exact",
            Self::Percentage => "percentage",
        }
    }
}

impl TryFrom<&str> for SplitMode {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "equal" => Ok(Self::Equal),
            "exact" => Ok(Self::Exact),
            "percentage" => Ok(Self::Percentage),
            other => Err(EngineError::Validation(format!(
                "invalid split mode: {other}"
            ))),
        }
    }
}

/// A fully typed split request.
///
/// Callers (the HTTP boundary) convert loose payloads into this variant
/// before the engine ever sees them; the calculator never handles untyped
/// data. Participant order is significant: rounding remainders go to the
/// trailing participants.
#[derive(Clone, Debug, PartialEq)]
pub enum SplitSpec {
    /// Divide the total evenly among the participants.
    Equal { participants: Vec<String> },
    /// Caller supplies the absolute amount owed per participant.
    Exact { shares: Vec<(String, Money)> },
    /// Caller supplies a percentage (0-100, fractional allowed) per
    /// participant.
    Percentage { shares: Vec<(String, f64)> },
}

impl SplitSpec {
    #[must_use]
    pub fn mode(&self) -> SplitMode {
        match self {
            Self::Equal { .. } => SplitMode::Equal,
            Self::Exact { .. } => SplitMode::Exact,
            Self::Percentage { .. } => SplitMode::Percentage,
        }
    }

    /// Participant user ids, in input order.
    pub fn participants(&self) -> impl Iterator<Item = &str> {
        let ids: Vec<&str> = match self {
            Self::Equal { participants } => participants.iter().map(String::as_str).collect(),
            Self::Exact { shares } => shares.iter().map(|(id, _)| id.as_str()).collect(),
            Self::Percentage { shares } => shares.iter().map(|(id, _)| id.as_str()).collect(),
        };
        ids.into_iter()
    }
}

/// One participant's computed share of a cost.
#[derive(Clone, Debug, PartialEq)]
pub struct Share {
    pub user_id: String,
    pub amount: Money,
}

/// Computes per-participant shares that sum exactly to `total`.
///
/// - `total` must be positive, in the project currency.
/// - Equal: `floor(total/n)` each; the remainder minor units are handed out
///   one per participant starting from the **last** participant in input
///   order and moving backwards.
/// - Exact: shares are validated to sum exactly to `total` and returned
///   unchanged; any discrepancy is a [`SplitMismatch`](EngineError::SplitMismatch),
///   never silently corrected.
/// - Percentage: weights must sum to 100 within a small epsilon; every share
///   except the last is rounded half-up, the last absorbs the remainder.
pub fn compute_splits(total: Money, spec: &SplitSpec) -> Result<Vec<Share>, EngineError> {
    if !total.is_positive() {
        return Err(EngineError::InvalidAmount(
            "split total must be > 0".to_string(),
        ));
    }

    match spec {
        SplitSpec::Equal { participants } => equal_splits(total, participants),
        SplitSpec::Exact { shares } => exact_splits(total, shares),
        SplitSpec::Percentage { shares } => percentage_splits(total, shares),
    }
}

fn equal_splits(total: Money, participants: &[String]) -> Result<Vec<Share>, EngineError> {
    let n = participants.len();
    if n == 0 {
        return Err(EngineError::NoParticipants);
    }

    let n_i64 = n as i64;
    let base = total.minor() / n_i64;
    let remainder = total.minor() % n_i64;

    let mut shares: Vec<Share> = participants
        .iter()
        .map(|user_id| Share {
            user_id: user_id.clone(),
            amount: Money::new(base, total.currency()),
        })
        .collect();

    // Hand out the leftover minor units to the trailing participants, last
    // participant first.
    for k in 0..remainder as usize {
        let idx = n - 1 - k;
        shares[idx].amount = shares[idx]
            .amount
            .checked_add(Money::new(1, total.currency()))?;
    }

    Ok(shares)
}

fn exact_splits(total: Money, shares: &[(String, Money)]) -> Result<Vec<Share>, EngineError> {
    if shares.is_empty() {
        return Err(EngineError::NoParticipants);
    }

    for (user_id, amount) in shares {
        if amount.is_negative() {
            return Err(EngineError::InvalidAmount(format!(
                "negative share for {user_id}"
            )));
        }
    }

    let sum = Money::sum(total.currency(), shares.iter().map(|(_, amount)| *amount))?;
    if sum != total {
        return Err(EngineError::SplitMismatch(format!(
            "shares sum to {sum}, expected {total}"
        )));
    }

    Ok(shares
        .iter()
        .map(|(user_id, amount)| Share {
            user_id: user_id.clone(),
            amount: *amount,
        })
        .collect())
}

fn percentage_splits(total: Money, shares: &[(String, f64)]) -> Result<Vec<Share>, EngineError> {
    if shares.is_empty() {
        return Err(EngineError::NoParticipants);
    }

    let mut pct_sum = 0.0;
    for (user_id, pct) in shares {
        if !pct.is_finite() || *pct < 0.0 {
            return Err(EngineError::InvalidAmount(format!(
                "negative percentage for {user_id}"
            )));
        }
        pct_sum += pct;
    }
    if (pct_sum - 100.0).abs() > PERCENT_EPSILON {
        return Err(EngineError::SplitMismatch(format!(
            "percentages sum to {pct_sum}, expected 100"
        )));
    }

    let mut out = Vec::with_capacity(shares.len());
    let mut assigned = Money::zero(total.currency());

    for (user_id, pct) in &shares[..shares.len() - 1] {
        let amount = total.multiply_by_ratio(pct / 100.0)?;
        assigned = assigned.checked_add(amount)?;
        out.push(Share {
            user_id: user_id.clone(),
            amount,
        });
    }

    // The last participant absorbs the rounding remainder so the shares sum
    // to the total exactly.
    let (last_user, _) = &shares[shares.len() - 1];
    let last_amount = total.checked_sub(assigned)?;
    if last_amount.is_negative() {
        return Err(EngineError::SplitMismatch(
            "rounded shares exceed the total".to_string(),
        ));
    }
    out.push(Share {
        user_id: last_user.clone(),
        amount: last_amount,
    });

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Currency;

    fn usd(minor: i64) -> Money {
        Money::new(minor, Currency::Usd)
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn equal_three_way_remainder_goes_last() {
        let shares = compute_splits(
            usd(100_00),
            &SplitSpec::Equal {
                participants: ids(&["a", "b", "c"]),
            },
        )
        .unwrap();

        let amounts: Vec<i64> = shares.iter().map(|s| s.amount.minor()).collect();
        assert_eq!(amounts, vec![33_33, 33_33, 33_34]);
        assert_eq!(amounts.iter().sum::<i64>(), 100_00);
    }

    #[test]
    fn equal_sum_always_exact_and_within_one_minor_unit() {
        for total in [1, 7, 99, 100, 1001, 99_999] {
            for n in 1..=7usize {
                let participants: Vec<String> = (0..n).map(|i| format!("user-{i}")).collect();
                let shares =
                    compute_splits(usd(total), &SplitSpec::Equal { participants }).unwrap();

                assert_eq!(shares.len(), n);
                let sum: i64 = shares.iter().map(|s| s.amount.minor()).sum();
                assert_eq!(sum, total);
                let base = total / n as i64;
                for share in &shares {
                    assert!(share.amount.minor() >= 0);
                    assert!((share.amount.minor() - base).abs() <= 1);
                }
            }
        }
    }

    #[test]
    fn equal_single_participant_takes_everything() {
        let shares = compute_splits(
            usd(12_34),
            &SplitSpec::Equal {
                participants: ids(&["solo"]),
            },
        )
        .unwrap();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].amount.minor(), 12_34);
    }

    #[test]
    fn equal_no_participants_fails() {
        let err = compute_splits(
            usd(100),
            &SplitSpec::Equal {
                participants: Vec::new(),
            },
        )
        .unwrap_err();
        assert_eq!(err, EngineError::NoParticipants);
    }

    #[test]
    fn non_positive_total_fails() {
        for total in [0, -100] {
            let err = compute_splits(
                usd(total),
                &SplitSpec::Equal {
                    participants: ids(&["a"]),
                },
            )
            .unwrap_err();
            assert!(matches!(err, EngineError::InvalidAmount(_)));
        }
    }

    #[test]
    fn exact_valid_shares_returned_unchanged() {
        let shares = compute_splits(
            usd(50_00),
            &SplitSpec::Exact {
                shares: vec![
                    ("a".to_string(), usd(12_50)),
                    ("b".to_string(), usd(37_50)),
                ],
            },
        )
        .unwrap();
        assert_eq!(shares[0].amount.minor(), 12_50);
        assert_eq!(shares[1].amount.minor(), 37_50);
    }

    #[test]
    fn exact_mismatch_is_surfaced_not_corrected() {
        let err = compute_splits(
            usd(50_00),
            &SplitSpec::Exact {
                shares: vec![
                    ("a".to_string(), usd(10_00)),
                    ("b".to_string(), usd(10_00)),
                ],
            },
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::SplitMismatch(_)));
    }

    #[test]
    fn exact_negative_share_fails() {
        let err = compute_splits(
            usd(50_00),
            &SplitSpec::Exact {
                shares: vec![
                    ("a".to_string(), usd(60_00)),
                    ("b".to_string(), usd(-10_00)),
                ],
            },
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }

    #[test]
    fn exact_wrong_currency_fails() {
        let err = compute_splits(
            usd(50_00),
            &SplitSpec::Exact {
                shares: vec![("a".to_string(), Money::new(50_00, Currency::Eur))],
            },
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::CurrencyMismatch(_)));
    }

    #[test]
    fn percentage_sixty_forty() {
        let shares = compute_splits(
            usd(50_00),
            &SplitSpec::Percentage {
                shares: vec![("a".to_string(), 60.0), ("b".to_string(), 40.0)],
            },
        )
        .unwrap();
        let amounts: Vec<i64> = shares.iter().map(|s| s.amount.minor()).collect();
        assert_eq!(amounts, vec![30_00, 20_00]);
    }

    #[test]
    fn percentage_last_absorbs_rounding() {
        // 33.33 / 33.33 / 33.34 over 100.00: the first two round, the last
        // takes the rest so the sum stays exact.
        let shares = compute_splits(
            usd(100_00),
            &SplitSpec::Percentage {
                shares: vec![
                    ("a".to_string(), 33.33),
                    ("b".to_string(), 33.33),
                    ("c".to_string(), 33.34),
                ],
            },
        )
        .unwrap();
        let sum: i64 = shares.iter().map(|s| s.amount.minor()).sum();
        assert_eq!(sum, 100_00);
        assert_eq!(shares[0].amount.minor(), 33_33);
        assert_eq!(shares[1].amount.minor(), 33_33);
        assert_eq!(shares[2].amount.minor(), 33_34);
    }

    #[test]
    fn percentage_not_summing_to_hundred_fails() {
        let err = compute_splits(
            usd(100_00),
            &SplitSpec::Percentage {
                shares: vec![("a".to_string(), 60.0), ("b".to_string(), 30.0)],
            },
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::SplitMismatch(_)));
    }

    #[test]
    fn percentage_negative_weight_fails() {
        let err = compute_splits(
            usd(100_00),
            &SplitSpec::Percentage {
                shares: vec![("a".to_string(), 120.0), ("b".to_string(), -20.0)],
            },
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }

    #[test]
    fn percentage_single_participant_takes_everything() {
        let shares = compute_splits(
            usd(99_99),
            &SplitSpec::Percentage {
                shares: vec![("solo".to_string(), 100.0)],
            },
        )
        .unwrap();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].amount.minor(), 99_99);
    }

    #[test]
    fn mode_round_trips_through_storage_tag() {
        for mode in [SplitMode::Equal, SplitMode::Exact, SplitMode::Percentage] {
            assert_eq!(SplitMode::try_from(mode.as_str()).unwrap(), mode);
        }
        assert!(SplitMode::try_from("weighted").is_err());
    }
}
