use std::cmp::Ordering;

use crate::util;

/// Selectors order and optionally truncate the candidate list.
pub trait Selector<Q, C>: Send + Sync {
    /// Default selection: sort, then truncate to `size()` if set.
    fn select(&self, query: &Q, candidates: Vec<C>) -> Vec<C> {
        let mut sorted = self.sort(query, candidates);
        if let Some(limit) = self.size() {
            sorted.truncate(limit);
        }
        sorted
    }

    /// Decide if this selector should run for the given query.
    fn enable(&self, _query: &Q) -> bool {
        true
    }

    /// Ordering of two candidates under the query.
    fn compare(&self, query: &Q, a: &C, b: &C) -> Ordering;

    /// Stable sort by `compare`: equal candidates keep their input order.
    fn sort(&self, query: &Q, candidates: Vec<C>) -> Vec<C> {
        let mut sorted = candidates;
        sorted.sort_by(|a, b| self.compare(query, a, b));
        sorted
    }

    /// Optionally provide a maximum number of candidates to select.
    fn size(&self) -> Option<usize> {
        None
    }

    /// Returns a stable name for logging.
    fn name(&self) -> &str {
        util::short_type_name(std::any::type_name::<Self>())
    }
}
