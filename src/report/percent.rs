//! Rounded missing-data percentages

use serde::Serialize;
use std::fmt;

/// Share of missing entries, or an explicit marker when the denominator is zero
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum PercentMissing {
    Percent(f64),
    NotApplicable,
}

impl PercentMissing {
    /// `round(100 * missing / total, decimals)`, not applicable when `total` is 0
    pub fn of(missing: usize, total: usize, decimals: i32) -> Self {
        if total == 0 {
            return Self::NotApplicable;
        }
        Self::Percent(round_to(100.0 * missing as f64 / total as f64, decimals))
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Percent(value) => Some(*value),
            Self::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Self::Percent(_))
    }
}

impl fmt::Display for PercentMissing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(value) => write!(f, "{}", value),
            Self::NotApplicable => f.write_str("N/A"),
        }
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
