//! Predicate: boolean expressions over `DataInput`s.
//!
//! Predicates combine [`DataInput`] and [`InputMatcher`] into conditions that compose with
//! OR. They are pure: evaluation reads the [`Detection`] and nothing else.

use std::fmt::Debug;

use crate::{DataInput, Detection, InputMatcher};

/// A single condition: a [`DataInput`] checked by an [`InputMatcher`].
///
/// # None → false
///
/// If the input yields [`MatchingData::None`](crate::MatchingData::None), the predicate is
/// `false`. Absent data never satisfies a condition.
pub struct SinglePredicate {
    input: Box<dyn DataInput>,
    matcher: Box<dyn InputMatcher>,
}

impl SinglePredicate {
    #[must_use]
    pub fn new(input: Box<dyn DataInput>, matcher: Box<dyn InputMatcher>) -> Self {
        Self { input, matcher }
    }

    pub fn evaluate(&self, detection: &Detection<'_>) -> bool {
        let data = self.input.get(detection);
        !data.is_none() && self.matcher.matches(&data)
    }
}

impl Debug for SinglePredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SinglePredicate")
            .field("input", &self.input)
            .field("matcher", &self.matcher)
            .finish()
    }
}

/// Composite predicate.
///
/// - `Single`: one condition
/// - `Or`: any must match (short-circuits on the first `true`); an empty `Or` is `false`
#[derive(Debug)]
pub enum Predicate {
    Single(SinglePredicate),
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Shorthand for `Predicate::Single(SinglePredicate::new(input, matcher))`.
    #[must_use]
    pub fn single(input: impl DataInput + 'static, matcher: impl InputMatcher + 'static) -> Self {
        Self::Single(SinglePredicate::new(Box::new(input), Box::new(matcher)))
    }

    pub fn evaluate(&self, detection: &Detection<'_>) -> bool {
        match self {
            Self::Single(p) => p.evaluate(detection),
            Self::Or(predicates) => predicates.iter().any(|p| p.evaluate(detection)),
        }
    }
}
