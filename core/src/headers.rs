//! Default headers and the strategy that merges them with per-call overrides.

use crate::http::HeaderSet;

/// Headers sent with every request unless a caller overrides them.
pub fn default_headers() -> HeaderSet {
    HeaderSet::from([("content-type", "application/json")])
}

/// Combine `defaults` with `overrides`; on a name collision the override wins.
pub fn merge_headers(defaults: &HeaderSet, overrides: &HeaderSet) -> HeaderSet {
    let mut merged = defaults.clone();
    merged.extend(overrides.iter());
    merged
}

/// Strategy for combining the client's default headers with the headers a
/// caller passes to a single request.
pub trait HeaderMerger: Send + Sync {
    fn merge(&self, defaults: &HeaderSet, overrides: &HeaderSet) -> HeaderSet;
}

/// Overrides replace defaults key by key. Used unless another merger is
/// injected.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverrideMerger;

impl HeaderMerger for OverrideMerger {
    fn merge(&self, defaults: &HeaderSet, overrides: &HeaderSet) -> HeaderSet {
        merge_headers(defaults, overrides)
    }
}
