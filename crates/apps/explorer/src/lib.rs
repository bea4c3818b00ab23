//! Globe explorer: wires the place search and the camera flight engine
//! behind a command line, with a headless surface standing in for the globe.

pub mod commands;
pub mod config;
pub mod flythrough;
pub mod places;

use camera::FlightError;
use catalog::CatalogError;

#[derive(Debug)]
pub enum ExplorerError {
    Config(String),
    Catalog(CatalogError),
    Flight(FlightError),
    /// Nothing was committed for the given text.
    NoMatch(String),
    /// The flight stopped before landing on the named place.
    FlightCancelled(String),
}

impl std::fmt::Display for ExplorerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExplorerError::Config(msg) => write!(f, "invalid configuration: {msg}"),
            ExplorerError::Catalog(err) => write!(f, "{err}"),
            ExplorerError::Flight(err) => write!(f, "{err}"),
            ExplorerError::NoMatch(text) => write!(f, "no place matches \"{text}\""),
            ExplorerError::FlightCancelled(name) => write!(f, "flight to {name} did not land"),
        }
    }
}

impl std::error::Error for ExplorerError {}

impl From<CatalogError> for ExplorerError {
    fn from(err: CatalogError) -> Self {
        ExplorerError::Catalog(err)
    }
}

impl From<FlightError> for ExplorerError {
    fn from(err: FlightError) -> Self {
        ExplorerError::Flight(err)
    }
}
