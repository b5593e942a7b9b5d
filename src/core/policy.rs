// src/core/policy.rs
//! Restriction policy evaluation
//!
//! One configured restricted-address prefix, matched case-insensitively on
//! the captured side only. The configured prefix is used exactly as stored;
//! an upper-case prefix therefore never matches. That asymmetry is the
//! shipped behavior and is kept on purpose.

use std::sync::{Arc, Mutex, PoisonError};

/// Whether a captured address falls under the restricted prefix.
///
/// The captured address is lowercased before the prefix check; the prefix is
/// not. An empty captured address is never restricted.
pub fn is_restricted(captured_address: &str, restricted_prefix: &str) -> bool {
    if captured_address.is_empty() {
        return false;
    }
    captured_address
        .to_lowercase()
        .starts_with(restricted_prefix)
}

/// Source of the current restricted-address prefix.
///
/// The prefix is owned by the external configuration collaborator and may
/// change between notifications, so the pipeline reads it fresh on every
/// evaluation. `None` means no restriction is configured.
pub trait PolicySource: Send + Sync {
    fn restricted_prefix(&self) -> Option<String>;
}

/// Fixed prefix, resolved once at construction.
#[derive(Debug, Clone)]
pub struct StaticPolicy {
    prefix: Option<String>,
}

impl StaticPolicy {
    /// An empty prefix counts as "nothing configured".
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: (!prefix.is_empty()).then_some(prefix),
        }
    }
}

impl PolicySource for StaticPolicy {
    fn restricted_prefix(&self) -> Option<String> {
        self.prefix.clone()
    }
}

/// Prefix shared with an external owner that may rewrite it at any time.
#[derive(Debug, Clone, Default)]
pub struct SharedPolicy {
    prefix: Arc<Mutex<String>>,
}

impl SharedPolicy {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Arc::new(Mutex::new(prefix.into())),
        }
    }

    /// Replace the configured prefix; an empty string clears the restriction.
    pub fn set(&self, prefix: impl Into<String>) {
        *self
            .prefix
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = prefix.into();
    }
}

impl PolicySource for SharedPolicy {
    fn restricted_prefix(&self) -> Option<String> {
        let prefix = self
            .prefix
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        (!prefix.is_empty()).then_some(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively_on_the_captured_side() {
        assert!(is_restricted("HTTP://BAD.EXAMPLE/x", "http://bad.example"));
        assert!(is_restricted("http://bad.example/x", "http://bad.example"));
    }

    #[test]
    fn non_matching_address_is_allowed() {
        assert!(!is_restricted("http://good.example", "http://bad.example"));
    }

    #[test]
    fn empty_address_is_never_restricted() {
        assert!(!is_restricted("", "http://bad.example"));
        assert!(!is_restricted("", ""));
    }

    #[test]
    fn configured_prefix_is_not_normalized() {
        // The captured side is lowercased, the configured side is not, so an
        // upper-case prefix can never match.
        assert!(!is_restricted("HTTP://BAD.EXAMPLE/x", "HTTP://BAD.EXAMPLE"));
    }

    #[test]
    fn static_policy_treats_empty_as_unconfigured() {
        assert_eq!(StaticPolicy::new("").restricted_prefix(), None);
        assert_eq!(
            StaticPolicy::new("http://bad.example").restricted_prefix(),
            Some("http://bad.example".to_string())
        );
    }

    #[test]
    fn shared_policy_reads_the_latest_value() {
        let policy = SharedPolicy::new("http://bad.example");
        assert_eq!(
            policy.restricted_prefix(),
            Some("http://bad.example".to_string())
        );

        policy.set("http://worse.example");
        assert_eq!(
            policy.restricted_prefix(),
            Some("http://worse.example".to_string())
        );

        policy.set("");
        assert_eq!(policy.restricted_prefix(), None);
    }
}
