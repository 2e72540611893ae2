//! Runtime configuration.
//!
//! Values come from `LIBRIS_*` environment variables; anything unset falls back
//! to the defaults, anything unparseable falls back too but logs a warning.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use libris_core::DomainResult;
use libris_lending::{FulfillmentPolicy, LendingPolicy};

pub const ENV_LOAN_PERIOD_DAYS: &str = "LIBRIS_LOAN_PERIOD_DAYS";
pub const ENV_RENEWAL_DAYS: &str = "LIBRIS_RENEWAL_DAYS";
pub const ENV_FULFILLMENT_POLICY: &str = "LIBRIS_FULFILLMENT_POLICY";
pub const ENV_NOTIFICATION_LIMIT: &str = "LIBRIS_NOTIFICATION_LIMIT";

/// How many notifications `recent_notifications` shows by default.
pub const DEFAULT_NOTIFICATION_VIEW_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConfig {
    pub lending: LendingPolicy,
    pub notification_view_limit: usize,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            lending: LendingPolicy::default(),
            notification_view_limit: DEFAULT_NOTIFICATION_VIEW_LIMIT,
        }
    }
}

impl LibraryConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (env, file, test map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            lending: LendingPolicy {
                loan_period_days: parse_or(
                    &lookup,
                    ENV_LOAN_PERIOD_DAYS,
                    defaults.lending.loan_period_days,
                ),
                renewal_days: parse_or(&lookup, ENV_RENEWAL_DAYS, defaults.lending.renewal_days),
                fulfillment: parse_or::<FulfillmentPolicy>(
                    &lookup,
                    ENV_FULFILLMENT_POLICY,
                    defaults.lending.fulfillment,
                ),
            },
            notification_view_limit: parse_or(
                &lookup,
                ENV_NOTIFICATION_LIMIT,
                defaults.notification_view_limit,
            ),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        self.lending.validate()
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + core::fmt::Debug,
    T::Err: core::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|e| {
        tracing::warn!(key, value = %raw, error = %e, "invalid setting; using default {default:?}");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = LibraryConfig::from_lookup(|_| None);
        assert_eq!(config, LibraryConfig::default());
        assert_eq!(config.notification_view_limit, 10);
    }

    #[test]
    fn values_are_read_from_lookup() {
        let config = LibraryConfig::from_lookup(lookup_from(&[
            (ENV_LOAN_PERIOD_DAYS, "21"),
            (ENV_RENEWAL_DAYS, " 7 "),
            (ENV_FULFILLMENT_POLICY, "auto-deactivate"),
            (ENV_NOTIFICATION_LIMIT, "25"),
        ]));
        assert_eq!(config.lending.loan_period_days, 21);
        assert_eq!(config.lending.renewal_days, 7);
        assert_eq!(config.lending.fulfillment, FulfillmentPolicy::AutoDeactivate);
        assert_eq!(config.notification_view_limit, 25);
    }

    #[test]
    fn unparseable_values_fall_back_to_defaults() {
        let config = LibraryConfig::from_lookup(lookup_from(&[
            (ENV_LOAN_PERIOD_DAYS, "two weeks"),
            (ENV_FULFILLMENT_POLICY, "sometimes"),
        ]));
        assert_eq!(config.lending.loan_period_days, 14);
        assert_eq!(config.lending.fulfillment, FulfillmentPolicy::NotifyOnly);
    }

    #[test]
    fn zero_loan_period_fails_validation() {
        let config = LibraryConfig::from_lookup(lookup_from(&[(ENV_LOAN_PERIOD_DAYS, "0")]));
        assert!(config.validate().is_err());
    }
}
