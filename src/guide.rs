//! Accessors for the parts of a guide document that zip cleaning touches.
//!
//! A guide is kept as a plain `serde_json::Value` so that every field we do
//! not target round-trips untouched. The only path read or written is
//! `Cities[0].pois[*].address.address`; each accessor returns `None` instead
//! of failing when a level of that path is absent.

use serde_json::Value;

use crate::constants::{ADDRESS_KEY, CITIES_KEY, POIS_KEY};

/// POI list of the first city, or `None` when the guide has no such structure
pub fn pois(guide: &Value) -> Option<&Vec<Value>> {
    guide
        .get(CITIES_KEY)?
        .as_array()?
        .first()?
        .get(POIS_KEY)?
        .as_array()
}

/// Mutable counterpart of [`pois`]
pub fn pois_mut(guide: &mut Value) -> Option<&mut Vec<Value>> {
    guide
        .get_mut(CITIES_KEY)?
        .as_array_mut()?
        .first_mut()?
        .get_mut(POIS_KEY)?
        .as_array_mut()
}

/// Free-text postal address of a POI (`address.address`), if it is a string
pub fn poi_address(poi: &Value) -> Option<&str> {
    poi.get(ADDRESS_KEY)?.get(ADDRESS_KEY)?.as_str()
}

pub fn poi_address_mut(poi: &mut Value) -> Option<&mut String> {
    match poi.get_mut(ADDRESS_KEY)?.get_mut(ADDRESS_KEY)? {
        Value::String(address) => Some(address),
        _ => None,
    }
}

/// All addresses of the guide in POI order.
///
/// `None` means the guide has no `Cities[0].pois` list; POIs without an
/// address are skipped.
pub fn addresses(guide: &Value) -> Option<Vec<&str>> {
    pois(guide).map(|pois| pois.iter().filter_map(poi_address).collect())
}
