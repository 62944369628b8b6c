//! `MatchingData`: the value that flows from a `DataInput` to an `InputMatcher`.

/// Data extracted from a manifest for matching.
///
/// # Variants
///
/// - `None`: nothing to match (absent class, absent annotation)
/// - `String`: a single value
/// - `List`: several values; a matcher matches when **any** value matches
///
/// `None` and an empty `List` never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MatchingData {
    #[default]
    None,
    String(String),
    List(Vec<String>),
}

impl MatchingData {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The value of a `String`, `None` otherwise.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Every value carried, in order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let values: &[String] = match self {
            Self::None => &[],
            Self::String(s) => std::slice::from_ref(s),
            Self::List(list) => list,
        };
        values.iter().map(String::as_str)
    }
}

impl From<&str> for MatchingData {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for MatchingData {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Option<String>> for MatchingData {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::None, Self::String)
    }
}

impl From<Vec<String>> for MatchingData {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}
