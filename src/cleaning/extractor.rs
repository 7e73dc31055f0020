use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

use crate::guide;
use crate::reference::ZipReferenceSet;

/// Tokens of the guide's addresses that should be treated as zip codes.
///
/// A token qualifies when it is an exact member of `reference` and occurs at
/// least `frequency_threshold` times across all addresses of the guide. A
/// guide without `Cities[0].pois` yields the empty set.
pub fn extract_zip_tokens(
    guide: &Value,
    reference: &ZipReferenceSet,
    frequency_threshold: usize,
) -> BTreeSet<String> {
    let Some(addresses) = guide::addresses(guide) else {
        return BTreeSet::new();
    };

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in addresses.iter().flat_map(|address| address.split_whitespace()) {
        if reference.contains(token) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count >= frequency_threshold)
        .map(|(token, _)| token.to_string())
        .collect()
}
