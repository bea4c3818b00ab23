use serde::Deserialize;

use crate::{CatalogError, Location, PlaceCatalog};

/// `(code, name, capital, lat, lng)`: one representative centroid per country.
const COUNTRIES: &[(&str, &str, &str, f64, f64)] = &[
    ("AD", "Andorra", "Andorra la Vella", 42.5063, 1.5218),
    ("AE", "United Arab Emirates", "Abu Dhabi", 23.4241, 53.8478),
    ("AR", "Argentina", "Buenos Aires", -38.4161, -63.6167),
    ("AT", "Austria", "Vienna", 47.5162, 14.5501),
    ("AU", "Australia", "Canberra", -25.2744, 133.7751),
    ("BE", "Belgium", "Brussels", 50.5039, 4.4699),
    ("BG", "Bulgaria", "Sofia", 42.7339, 25.4858),
    ("BR", "Brazil", "Brasília", -14.2350, -51.9253),
    ("BY", "Belarus", "Minsk", 53.7098, 27.9534),
    ("CA", "Canada", "Ottawa", 56.1304, -106.3468),
    ("CH", "Switzerland", "Bern", 46.8182, 8.2275),
    ("CL", "Chile", "Santiago", -35.6751, -71.5430),
    ("CN", "China", "Beijing", 35.8617, 104.1954),
    ("CO", "Colombia", "Bogotá", 4.5709, -74.2973),
    ("CZ", "Czech Republic", "Prague", 49.8175, 15.4730),
    ("DE", "Germany", "Berlin", 51.1657, 10.4515),
    ("DK", "Denmark", "Copenhagen", 56.2639, 9.5018),
    ("EE", "Estonia", "Tallinn", 58.5953, 25.0136),
    ("EG", "Egypt", "Cairo", 26.8206, 30.8025),
    ("ES", "Spain", "Madrid", 40.4637, -3.7492),
    ("FI", "Finland", "Helsinki", 61.9241, 25.7482),
    ("FR", "France", "Paris", 46.2276, 2.2137),
    ("GB", "United Kingdom", "London", 55.3781, -3.4360),
    ("GI", "Gibraltar", "Gibraltar", 36.1408, -5.3536),
    ("GR", "Greece", "Athens", 39.0742, 21.8243),
    ("HK", "Hong Kong", "City of Victoria", 22.3193, 114.1694),
    ("HR", "Croatia", "Zagreb", 45.1, 15.2),
    ("HU", "Hungary", "Budapest", 47.1625, 19.5033),
    ("ID", "Indonesia", "Jakarta", -0.7893, 113.9213),
    ("IE", "Ireland", "Dublin", 53.4129, -8.2439),
    ("IL", "Israel", "Jerusalem", 31.0461, 34.8516),
    ("IM", "Isle of Man", "Douglas", 54.2361, -4.5481),
    ("IN", "India", "New Delhi", 20.5937, 78.9629),
    ("IS", "Iceland", "Reykjavik", 64.9631, -19.0208),
    ("IT", "Italy", "Rome", 41.8719, 12.5674),
    ("JP", "Japan", "Tokyo", 36.2048, 138.2529),
    ("KE", "Kenya", "Nairobi", -0.0236, 37.9062),
    ("KR", "South Korea", "Seoul", 35.9078, 127.7669),
    ("LI", "Liechtenstein", "Vaduz", 47.1660, 9.5554),
    ("LT", "Lithuania", "Vilnius", 55.1694, 23.8813),
    ("LV", "Latvia", "Riga", 56.8796, 24.6032),
    ("MC", "Monaco", "Monaco", 43.7384, 7.4246),
    ("MX", "Mexico", "Mexico City", 23.6345, -102.5528),
    ("MY", "Malaysia", "Kuala Lumpur", 4.2105, 101.9758),
    ("NG", "Nigeria", "Abuja", 9.0820, 8.6753),
    ("NL", "Netherlands", "Amsterdam", 52.1326, 5.2913),
    ("NO", "Norway", "Oslo", 60.4720, 8.4689),
    ("NZ", "New Zealand", "Wellington", -40.9006, 174.8860),
    ("PE", "Peru", "Lima", -9.1900, -75.0152),
    ("PH", "Philippines", "Manila", 12.8797, 121.7740),
    ("PL", "Poland", "Warsaw", 51.9194, 19.1451),
    ("PT", "Portugal", "Lisbon", 39.3999, -8.2245),
    ("RO", "Romania", "Bucharest", 45.9432, 24.9668),
    ("RS", "Serbia", "Belgrade", 44.0165, 21.0059),
    ("RU", "Russia", "Moscow", 61.5240, 105.3188),
    ("SA", "Saudi Arabia", "Riyadh", 23.8859, 45.0792),
    ("SE", "Sweden", "Stockholm", 60.1282, 18.6435),
    ("SG", "Singapore", "Singapore", 1.3521, 103.8198),
    ("SI", "Slovenia", "Ljubljana", 46.1512, 14.9955),
    ("SK", "Slovakia", "Bratislava", 48.6690, 19.6990),
    ("SM", "San Marino", "City of San Marino", 43.9424, 12.4578),
    ("TH", "Thailand", "Bangkok", 15.8700, 100.9925),
    ("TR", "Turkey", "Ankara", 38.9637, 35.2433),
    ("TW", "Taiwan", "Taipei", 23.6978, 120.9605),
    ("UA", "Ukraine", "Kyiv", 48.3794, 31.1656),
    ("US", "United States", "Washington D.C.", 37.0902, -95.7129),
    ("VA", "Vatican City", "Vatican City", 41.9029, 12.4534),
    ("VE", "Venezuela", "Caracas", 6.4238, -66.5897),
    ("VN", "Vietnam", "Hanoi", 14.0583, 108.2772),
    ("ZA", "South Africa", "Pretoria", -30.5595, 22.9375),
];

/// Country dataset backed by a static centroid table or a JSON document.
#[derive(Debug, Clone, Default)]
pub struct CountryCatalog {
    entries: Vec<Location>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<Location>),
    Wrapped { countries: Vec<Location> },
}

impl CountryCatalog {
    /// The bundled country table.
    pub fn builtin() -> Self {
        let entries = COUNTRIES
            .iter()
            .map(|&(code, name, capital, latitude, longitude)| Location {
                name: name.to_string(),
                code: code.to_string(),
                latitude,
                longitude,
                capital: Some(capital.to_string()),
            })
            .collect();
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a catalog from already-validated locations.
    pub fn from_locations(entries: Vec<Location>) -> Result<Self, CatalogError> {
        if let Some(bad) = entries.iter().find(|l| !l.has_valid_coordinates()) {
            return Err(CatalogError::InvalidCoordinates {
                lat: bad.latitude,
                lng: bad.longitude,
            });
        }
        Ok(Self { entries })
    }

    /// Parses either a bare JSON array of locations or `{"countries": [...]}`.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let doc = serde_json::from_str::<CatalogDocument>(raw)
            .map_err(|e| CatalogError::Corrupt(e.to_string()))?;
        let entries = match doc {
            CatalogDocument::List(entries) => entries,
            CatalogDocument::Wrapped { countries } => countries,
        };
        Self::from_locations(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PlaceCatalog for CountryCatalog {
    fn all(&self) -> &[Location] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(hits: Vec<Location>) -> Vec<String> {
        hits.into_iter().map(|l| l.name).collect()
    }

    #[test]
    fn builtin_table_is_valid_and_unique() {
        let catalog = CountryCatalog::builtin();
        assert_eq!(catalog.len(), COUNTRIES.len());
        assert!(catalog.all().iter().all(Location::has_valid_coordinates));
        let mut codes: Vec<_> = catalog.all().iter().map(|l| l.code.as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), catalog.len());
    }

    #[test]
    fn united_lists_prefix_matches_alphabetically() {
        let catalog = CountryCatalog::builtin();
        assert_eq!(
            names(catalog.search_by_text("United")),
            vec!["United Arab Emirates", "United Kingdom", "United States"]
        );
    }

    #[test]
    fn substring_matches_follow_prefix_matches() {
        let catalog = CountryCatalog::builtin();
        // No name starts with "land", so the whole list is alphabetical.
        let hits = names(catalog.search_by_text("land"));
        assert!(hits.iter().all(|n| n.to_lowercase().contains("land")));
        assert_eq!(hits[0], "Finland");
        assert!(hits.contains(&"Switzerland".to_string()));

        let hits = names(catalog.search_by_text("ni"));
        // Prefix group: Nigeria; then substring matches alphabetically.
        assert_eq!(hits[0], "Nigeria");
        let rest = &hits[1..];
        let mut sorted = rest.to_vec();
        sorted.sort_by(|a, b| crate::compare_names(a, b));
        assert_eq!(rest, sorted.as_slice());
    }

    #[test]
    fn jap_finds_japan_only() {
        let catalog = CountryCatalog::builtin();
        let hits = catalog.search_by_text("Jap");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Japan");
        assert_eq!(hits[0].latitude, 36.2048);
        assert_eq!(hits[0].longitude, 138.2529);
        assert_eq!(hits[0].capital.as_deref(), Some("Tokyo"));
    }

    #[test]
    fn search_matches_codes_case_insensitively() {
        let catalog = CountryCatalog::builtin();
        let hits = names(catalog.search_by_text("gb"));
        assert_eq!(hits, vec!["United Kingdom"]);
    }

    #[test]
    fn nearest_at_exact_entry_has_zero_distance() {
        let catalog = CountryCatalog::builtin();
        let nearest = catalog.nearest_to(36.2048, 138.2529).expect("nearest");
        assert_eq!(nearest.location.code, "JP");
        assert_eq!(nearest.distance_km, 0.0);
    }

    #[test]
    fn nearest_picks_closest_centroid() {
        let catalog = CountryCatalog::builtin();
        // Lyon.
        let nearest = catalog.nearest_to(45.7623, 4.8228).expect("nearest");
        assert_eq!(nearest.location.name, "France");
        assert!(nearest.distance_km > 0.0);
    }

    #[test]
    fn nearest_is_by_centroid_not_border() {
        // Paris sits closer to Belgium's centroid than to France's.
        let catalog = CountryCatalog::builtin();
        let nearest = catalog.nearest_to(48.8584, 2.2945).expect("nearest");
        assert_eq!(nearest.location.code, "BE");
    }

    #[test]
    fn empty_catalog_has_no_nearest() {
        assert!(CountryCatalog::empty().nearest_to(0.0, 0.0).is_none());
    }

    #[test]
    fn lookup_by_code() {
        let catalog = CountryCatalog::builtin();
        assert_eq!(catalog.by_code("NZ").map(|l| l.name.as_str()), Some("New Zealand"));
        assert!(catalog.by_code("XX").is_none());
    }

    #[test]
    fn parses_json_in_both_shapes() {
        let list = r#"[{"name":"Atlantis","code":"AT","latitude":10.0,"longitude":-30.0}]"#;
        let wrapped = r#"{"countries":[{"name":"Atlantis","latitude":10.0,"longitude":-30.0,"capital":"Poseidonis"}]}"#;
        let a = CountryCatalog::from_json(list).expect("list");
        let b = CountryCatalog::from_json(wrapped).expect("wrapped");
        assert_eq!(a.all()[0].name, "Atlantis");
        assert_eq!(b.all()[0].capital.as_deref(), Some("Poseidonis"));
    }

    #[test]
    fn json_with_bad_coordinates_is_rejected() {
        let raw = r#"[{"name":"Nowhere","latitude":120.0,"longitude":0.0}]"#;
        assert_eq!(
            CountryCatalog::from_json(raw).unwrap_err(),
            CatalogError::InvalidCoordinates { lat: 120.0, lng: 0.0 }
        );
        assert!(matches!(
            CountryCatalog::from_json("not json"),
            Err(CatalogError::Corrupt(_))
        ));
    }
}
