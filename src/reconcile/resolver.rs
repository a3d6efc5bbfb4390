//! Cheapest-retailer resolution.

use super::normalizer::parse_price;
use crate::api::{ComparisonSet, RetailerResult};
use tracing::debug;

/// Yields found results whose price normalizes, with their position in the set.
fn priced_positions(set: &ComparisonSet) -> impl Iterator<Item = (usize, &RetailerResult, u64)> {
    set.iter().enumerate().filter(|(_, r)| r.found).filter_map(|(i, r)| {
        let raw = r.price.as_deref().unwrap_or_default();
        match parse_price(raw) {
            Ok(price) => Some((i, r, price)),
            Err(e) => {
                debug!("Excluding {} from comparison: {} ({:?})", r.retailer, e, raw);
                None
            }
        }
    })
}

/// Yields found results whose price normalizes, paired with that price.
pub fn priced_results(set: &ComparisonSet) -> impl Iterator<Item = (&RetailerResult, u64)> {
    priced_positions(set).map(|(_, r, price)| (r, price))
}

/// Returns the position of the found result with the lowest valid price.
///
/// Ties go to the earliest result in the set.
pub fn cheapest_position(set: &ComparisonSet) -> Option<usize> {
    // min_by_key keeps the first of equal minimums
    priced_positions(set).min_by_key(|&(_, _, price)| price).map(|(i, _, _)| i)
}

/// Returns the found result with the lowest valid price, with that price.
pub fn cheapest(set: &ComparisonSet) -> Option<(&RetailerResult, u64)> {
    priced_positions(set)
        .min_by_key(|&(_, _, price)| price)
        .map(|(_, r, price)| (r, price))
}

/// Returns the identifier of the cheapest retailer, or None when no found
/// result carries a usable price.
pub fn cheapest_retailer(set: &ComparisonSet) -> Option<&str> {
    cheapest(set).map(|(r, _)| r.retailer.as_str())
}
