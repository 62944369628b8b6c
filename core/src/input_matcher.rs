//! `InputMatcher`: value matching over [`MatchingData`].
//!
//! # Available Matchers
//!
//! - [`ExactMatcher`]: exact string equality
//! - [`PrefixMatcher`]: string prefix

use std::fmt::Debug;

use crate::MatchingData;

/// Matches extracted values.
///
/// Implementors only decide on a single string; [`matches`](Self::matches) lifts that to
/// every [`MatchingData`] shape: `None` never matches, a `List` matches when any element
/// does.
///
/// # Example
///
/// ```
/// use rewire::{InputMatcher, MatchingData, PrefixMatcher};
///
/// let matcher = PrefixMatcher::new("traefik.ingress.kubernetes.io/");
/// let keys = MatchingData::List(vec![
///     "kubernetes.io/ingress.class".into(),
///     "traefik.ingress.kubernetes.io/router.tls".into(),
/// ]);
/// assert!(matcher.matches(&keys));
/// assert!(!matcher.matches(&MatchingData::None));
/// ```
pub trait InputMatcher: Send + Sync + Debug {
    /// Check one string value.
    fn matches_str(&self, value: &str) -> bool;

    /// Check extracted data.
    fn matches(&self, data: &MatchingData) -> bool {
        data.values().any(|v| self.matches_str(v))
    }
}

/// Exact string equality (case-sensitive, no trimming).
#[derive(Debug, Clone)]
pub struct ExactMatcher {
    expected: String,
}

impl ExactMatcher {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    #[must_use]
    pub fn expected(&self) -> &str {
        &self.expected
    }
}

impl InputMatcher for ExactMatcher {
    fn matches_str(&self, value: &str) -> bool {
        value == self.expected
    }
}

/// String prefix.
#[derive(Debug, Clone)]
pub struct PrefixMatcher {
    prefix: String,
}

impl PrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl InputMatcher for PrefixMatcher {
    fn matches_str(&self, value: &str) -> bool {
        value.starts_with(&self.prefix)
    }
}
