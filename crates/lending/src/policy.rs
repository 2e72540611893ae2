//! Lending rules that vary per deployment.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use libris_core::{DomainError, DomainResult};

/// Default loan period and renewal extension, in days.
pub const DEFAULT_PERIOD_DAYS: u32 = 14;

/// Upper bound for a loan period or a single renewal, in days (ten calendar years).
pub const MAX_PERIOD_DAYS: u32 = 3_600;

/// What happens to the first waiting reservation when its item comes back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FulfillmentPolicy {
    /// Notify the waiting patron and leave the reservation active. A later
    /// return of the same item notifies the same patron again.
    #[default]
    NotifyOnly,
    /// Notify the waiting patron and deactivate the reservation.
    AutoDeactivate,
}

impl FulfillmentPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            FulfillmentPolicy::NotifyOnly => "notify-only",
            FulfillmentPolicy::AutoDeactivate => "auto-deactivate",
        }
    }
}

impl FromStr for FulfillmentPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "notify-only" => Ok(FulfillmentPolicy::NotifyOnly),
            "auto-deactivate" => Ok(FulfillmentPolicy::AutoDeactivate),
            other => Err(DomainError::validation(format!(
                "unknown fulfillment policy '{other}' (expected notify-only or auto-deactivate)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LendingPolicy {
    /// Days between borrow date and due date.
    pub loan_period_days: u32,
    /// Days a renewal adds to the due date.
    pub renewal_days: u32,
    pub fulfillment: FulfillmentPolicy,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            loan_period_days: DEFAULT_PERIOD_DAYS,
            renewal_days: DEFAULT_PERIOD_DAYS,
            fulfillment: FulfillmentPolicy::NotifyOnly,
        }
    }
}

impl LendingPolicy {
    pub fn validate(&self) -> DomainResult<()> {
        check_period("loan period", self.loan_period_days)?;
        check_period("renewal period", self.renewal_days)
    }
}

/// Reject zero-day and over-long periods.
pub(crate) fn check_period(what: &str, days: u32) -> DomainResult<()> {
    if days == 0 {
        return Err(DomainError::validation(format!("{what} must be at least one day")));
    }
    if days > MAX_PERIOD_DAYS {
        return Err(DomainError::validation(format!(
            "{what} of {days} days exceeds the {MAX_PERIOD_DAYS}-day limit"
        )));
    }
    Ok(())
}
