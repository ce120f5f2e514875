//! Extraction of a catalog exercise from generated text.

use repcoach_core::types::{normalize, Exercise};

use crate::catalog::ExerciseCatalog;

/// Finds which catalog exercise, if any, a generated response is about.
///
/// Implementations must only ever return entries of the given catalog.
pub trait NameMatcher: Send + Sync {
    fn extract<'a>(&self, response: &str, catalog: &'a ExerciseCatalog) -> Option<&'a Exercise>;
}

/// Literal substring matcher.
///
/// The response is normalized the same way catalog entries are, then each
/// entry is tested in listing order for case-insensitive containment. The
/// first hit wins.
///
/// Containment is not token-aware: a short name such as `Row` also matches
/// inside `Narrow`. Swap in another [`NameMatcher`] for boundary-aware
/// matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringMatcher;

impl NameMatcher for SubstringMatcher {
    fn extract<'a>(&self, response: &str, catalog: &'a ExerciseCatalog) -> Option<&'a Exercise> {
        let haystack = normalize(response).to_lowercase();
        catalog
            .iter()
            .find(|exercise| haystack.contains(&exercise.key.to_lowercase()))
    }
}
