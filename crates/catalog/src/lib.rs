//! Place dataset: the `Location` value type, text search ranking and
//! nearest-entry lookup over a static coordinate table.

pub mod countries;

use std::cmp::Ordering;

use foundation::math::{haversine_km, is_valid_lat_lng};
use serde::{Deserialize, Serialize};

pub use countries::CountryCatalog;

/// Upper bound on text-search results.
pub const MAX_SEARCH_RESULTS: usize = 10;

/// A named point on the globe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    /// ISO-style short code; empty for places resolved outside the dataset.
    #[serde(default)]
    pub code: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital: Option<String>,
}

impl Location {
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, CatalogError> {
        if !is_valid_lat_lng(latitude, longitude) {
            return Err(CatalogError::InvalidCoordinates {
                lat: latitude,
                lng: longitude,
            });
        }
        Ok(Self {
            name: name.into(),
            code: code.into(),
            latitude,
            longitude,
            capital: None,
        })
    }

    pub fn with_capital(mut self, capital: impl Into<String>) -> Self {
        self.capital = Some(capital.into());
        self
    }

    pub fn has_valid_coordinates(&self) -> bool {
        is_valid_lat_lng(self.latitude, self.longitude)
    }
}

/// Result of a nearest-entry query.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestPlace {
    pub location: Location,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    InvalidCoordinates { lat: f64, lng: f64 },
    Corrupt(String),
    Io(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::InvalidCoordinates { lat, lng } => {
                write!(f, "coordinates out of range: lat {lat}, lng {lng}")
            }
            CatalogError::Corrupt(msg) => write!(f, "catalog data corrupt: {msg}"),
            CatalogError::Io(msg) => write!(f, "catalog io error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Read-only place dataset.
pub trait PlaceCatalog {
    /// Every entry, in dataset order.
    fn all(&self) -> &[Location];

    /// Case-insensitive substring search on name or code, ranked by
    /// [`rank_matches`] and capped at [`MAX_SEARCH_RESULTS`].
    fn search_by_text(&self, text: &str) -> Vec<Location> {
        rank_matches(self.all(), text, MAX_SEARCH_RESULTS)
    }

    /// Closest entry by great-circle distance, `None` for an empty dataset.
    fn nearest_to(&self, lat: f64, lng: f64) -> Option<NearestPlace> {
        nearest_in(self.all(), lat, lng)
    }

    fn by_code(&self, code: &str) -> Option<&Location> {
        self.all().iter().find(|l| l.code == code)
    }
}

/// Filters and orders `entries` against `text`.
///
/// Ordering contract:
/// - Entries whose name starts with the query come before entries that only
///   contain it (in the name or the code).
/// - Within each group, names are ordered by [`compare_names`].
/// - An empty or whitespace-only query matches nothing.
pub fn rank_matches<'a>(
    entries: impl IntoIterator<Item = &'a Location>,
    text: &str,
    limit: usize,
) -> Vec<Location> {
    let term = text.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<(bool, &Location)> = entries
        .into_iter()
        .filter_map(|loc| {
            let name = loc.name.to_lowercase();
            if name.contains(&term) || loc.code.to_lowercase().contains(&term) {
                Some((name.starts_with(&term), loc))
            } else {
                None
            }
        })
        .collect();

    hits.sort_by(|(a_prefix, a), (b_prefix, b)| {
        b_prefix
            .cmp(a_prefix)
            .then_with(|| compare_names(&a.name, &b.name))
    });

    hits.into_iter()
        .take(limit)
        .map(|(_, loc)| loc.clone())
        .collect()
}

/// Human ordering for place names: case-insensitive first, then by exact text
/// so the order is total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let fold = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<String>();
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

/// Linear scan for the entry closest to `(lat, lng)`. Ties keep the earlier entry.
pub fn nearest_in<'a>(
    entries: impl IntoIterator<Item = &'a Location>,
    lat: f64,
    lng: f64,
) -> Option<NearestPlace> {
    let mut best: Option<(f64, &Location)> = None;
    for loc in entries {
        let d = haversine_km(lat, lng, loc.latitude, loc.longitude);
        if best.is_none_or(|(best_d, _)| d < best_d) {
            best = Some((d, loc));
        }
    }
    best.map(|(distance_km, loc)| NearestPlace {
        location: loc.clone(),
        distance_km,
    })
}
