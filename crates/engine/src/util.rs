//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! parsing and mapping logic so the engine enforces consistent invariants.

use crate::{Currency, EngineError};

/// Parse a currency code stored in the DB into a strongly typed `Currency`.
pub(crate) fn model_currency(value: &str) -> Result<Currency, EngineError> {
    Currency::try_from(value)
        .map_err(|_| EngineError::Validation(format!("invalid currency: {value}")))
}
