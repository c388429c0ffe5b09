//! Validated calculator input and the form sanitizers that produce it.
//!
//! The TUI form and the CLI flags both end up here, so the rules for
//! "what is a usable submission" live in one place.

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Earliest year the World Bank CPI series starts.
pub const MIN_START_YEAR: i32 = 1960;

/// Longest digit run accepted for the amount field.
pub const MAX_PRINCIPAL_DIGITS: usize = 14;

/// User-supplied parameters for one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorInput {
    pub country_code: String,
    pub principal: f64,
    pub start_year: i32,
}

impl CalculatorInput {
    /// Validate a submission against the current year.
    ///
    /// - `country_code` must be an ISO alpha-2 or alpha-3 code (normalized to upper case)
    /// - `principal` must be finite and `> 0`
    /// - `start_year` must lie in `[1960, current_year - 1]`
    pub fn new(
        country_code: &str,
        principal: f64,
        start_year: i32,
        current_year: i32,
    ) -> Result<Self, DataError> {
        let country_code = normalize_country_code(country_code)?;

        if !(principal.is_finite() && principal > 0.0) {
            return Err(DataError::InvalidInput(format!(
                "Amount must be a positive number (got {principal})."
            )));
        }

        let last_year = current_year - 1;
        if !(MIN_START_YEAR..=last_year).contains(&start_year) {
            return Err(DataError::InvalidInput(format!(
                "Start year must be between {MIN_START_YEAR} and {last_year} (got {start_year})."
            )));
        }

        Ok(Self {
            country_code,
            principal,
            start_year,
        })
    }
}

/// Normalize an ISO country code (`us` -> `US`, ` fra ` -> `FRA`).
pub fn normalize_country_code(raw: &str) -> Result<String, DataError> {
    let code = raw.trim();
    let valid_len = matches!(code.len(), 2 | 3);
    if !valid_len || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DataError::InvalidInput(format!(
            "Country must be an ISO alpha-2 or alpha-3 code (got '{code}')."
        )));
    }
    Ok(code.to_ascii_uppercase())
}

/// Digits-only amount sanitization.
///
/// Everything except `0-9` is stripped, the digit run is cut to
/// `MAX_PRINCIPAL_DIGITS`, and an empty or zero result yields `None`.
pub fn sanitize_principal(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(MAX_PRINCIPAL_DIGITS)
        .collect();
    let value = digits.parse::<u64>().ok()?;
    if value == 0 {
        return None;
    }
    Some(value as f64)
}

/// Clamp a start year into `[1960, current_year - 1]`.
pub fn clamp_start_year(year: i32, current_year: i32) -> i32 {
    let last_year = (current_year - 1).max(MIN_START_YEAR);
    year.clamp(MIN_START_YEAR, last_year)
}
