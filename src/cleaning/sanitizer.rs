use serde_json::Value;
use std::collections::BTreeSet;

use crate::guide;

/// Counts gathered while rewriting a guide's addresses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeStats {
    pub addresses_visited: usize,
    pub addresses_rewritten: usize,
    pub tokens_removed: usize,
    pub trailing_numbers_dropped: usize,
}

/// Remove zip tokens from every `Cities[0].pois[*].address.address` in place.
///
/// After the zip tokens are gone, a remaining last token made only of digits
/// is dropped too (once per address). That second rule does not consult the
/// reference set, so it also strips a trailing suite or house number.
///
/// Returns `None` and leaves the guide untouched when it has no
/// `Cities[0].pois` list.
pub fn sanitize_addresses(guide: &mut Value, zip_tokens: &BTreeSet<String>) -> Option<SanitizeStats> {
    let pois = guide::pois_mut(guide)?;
    let mut stats = SanitizeStats::default();

    for address in pois.iter_mut().filter_map(guide::poi_address_mut) {
        stats.addresses_visited += 1;

        let mut tokens: Vec<&str> = address
            .split_whitespace()
            .filter(|token| !zip_tokens.contains(*token))
            .collect();
        let after_zip_removal = tokens.len();
        stats.tokens_removed += address.split_whitespace().count() - after_zip_removal;

        if tokens.last().is_some_and(|last| is_all_digits(last)) {
            tokens.pop();
            stats.trailing_numbers_dropped += 1;
        }

        let cleaned = tokens.join(" ");
        if cleaned != *address {
            stats.addresses_rewritten += 1;
            *address = cleaned;
        }
    }

    Some(stats)
}

fn is_all_digits(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn zips(codes: &[&str]) -> BTreeSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    fn single(address: &str) -> Value {
        json!({"Cities": [{"pois": [{"name": "poi", "address": {"address": address}}]}]})
    }

    fn first_address(guide: &Value) -> &str {
        guide["Cities"][0]["pois"][0]["address"]["address"].as_str().unwrap()
    }

    #[test]
    fn test_removes_every_occurrence() {
        let mut guide = single("123 Main St 90210 90210");
        let stats = sanitize_addresses(&mut guide, &zips(&["90210"])).unwrap();

        assert_eq!(first_address(&guide), "123 Main St");
        assert_eq!(stats.tokens_removed, 2);
        assert_eq!(stats.trailing_numbers_dropped, 0);
        assert_eq!(stats.addresses_rewritten, 1);
    }

    #[test]
    fn test_zip_in_the_middle() {
        let mut guide = single("Hollywood 90028 Walk of Fame");
        sanitize_addresses(&mut guide, &zips(&["90028"])).unwrap();
        assert_eq!(first_address(&guide), "Hollywood Walk of Fame");
    }

    #[test]
    fn test_trailing_digits_dropped_without_candidate() {
        let mut guide = single("7 Pine Rd 99999");
        let stats = sanitize_addresses(&mut guide, &BTreeSet::new()).unwrap();

        assert_eq!(first_address(&guide), "7 Pine Rd");
        assert_eq!(stats.tokens_removed, 0);
        assert_eq!(stats.trailing_numbers_dropped, 1);
    }

    #[test]
    fn test_trailing_rule_fires_once() {
        let mut guide = single("Suite 12 34 90210");
        let stats = sanitize_addresses(&mut guide, &zips(&["90210"])).unwrap();

        assert_eq!(first_address(&guide), "Suite 12");
        assert_eq!(stats.trailing_numbers_dropped, 1);
    }

    #[test]
    fn test_trailing_rule_needs_only_digits() {
        let mut guide = single("Unit 4B");
        sanitize_addresses(&mut guide, &BTreeSet::new()).unwrap();
        assert_eq!(first_address(&guide), "Unit 4B");

        let mut guide = single("Route 66-A");
        sanitize_addresses(&mut guide, &BTreeSet::new()).unwrap();
        assert_eq!(first_address(&guide), "Route 66-A");
    }

    #[test]
    fn test_address_that_is_only_numbers() {
        let mut guide = single("90210");
        sanitize_addresses(&mut guide, &zips(&["90210"])).unwrap();
        assert_eq!(first_address(&guide), "");

        let mut guide = single("42");
        sanitize_addresses(&mut guide, &BTreeSet::new()).unwrap();
        assert_eq!(first_address(&guide), "");
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        let mut guide = single("  1 Ocean   Ave\t90401 ");
        sanitize_addresses(&mut guide, &zips(&["90401"])).unwrap();
        assert_eq!(first_address(&guide), "1 Ocean Ave");
    }

    #[test]
    fn test_unchanged_address_is_not_counted() {
        let mut guide = single("1 Ocean Ave");
        let stats = sanitize_addresses(&mut guide, &zips(&["90401"])).unwrap();
        assert_eq!(stats.addresses_visited, 1);
        assert_eq!(stats.addresses_rewritten, 0);
    }

    #[test]
    fn test_poi_without_address_is_untouched() {
        let mut guide = json!({"Cities": [{"pois": [
            {"name": "Bare"},
            {"name": "Partial", "address": {"city": "Seattle", "zip": "98101"}},
            {"name": "Numeric", "address": {"address": 98101}}
        ]}]});
        let before = guide.clone();

        let stats = sanitize_addresses(&mut guide, &zips(&["98101"])).unwrap();

        assert_eq!(guide, before);
        assert_eq!(stats, SanitizeStats::default());
    }

    #[test]
    fn test_missing_structure_returns_none() {
        let mut guide = json!({"title": "No cities here"});
        let before = guide.clone();

        assert!(sanitize_addresses(&mut guide, &zips(&["90210"])).is_none());
        assert_eq!(guide, before);
    }

    #[test]
    fn test_other_cities_are_untouched() {
        let mut guide = json!({"Cities": [
            {"pois": [{"address": {"address": "1 A St 90210"}}]},
            {"pois": [{"address": {"address": "2 B St 90210"}}]}
        ]});
        sanitize_addresses(&mut guide, &zips(&["90210"])).unwrap();

        assert_eq!(guide["Cities"][0]["pois"][0]["address"]["address"], "1 A St");
        assert_eq!(guide["Cities"][1]["pois"][0]["address"]["address"], "2 B St 90210");
    }
}
