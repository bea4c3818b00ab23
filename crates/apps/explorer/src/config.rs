use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use catalog::{CatalogError, CountryCatalog};
use clap::{Parser, Subcommand};
use search::{Predictor, SessionConfig};
use tracing::info;

use crate::ExplorerError;
use crate::places::{DEFAULT_PLACES_URL, GooglePlacesPredictor};

#[derive(Parser, Debug)]
#[command(author, version, about = "Search for a place and fly the globe camera to it")]
pub struct Cli {
    /// Google Places API key; without one only the built-in dataset is searched
    #[arg(long, env = "GLOBE_PLACES_API_KEY", hide_env_values = true)]
    pub places_api_key: Option<String>,

    /// Base URL of the Places API
    #[arg(long, env = "GLOBE_PLACES_URL", default_value = DEFAULT_PLACES_URL)]
    pub places_url: String,

    /// JSON dataset replacing the built-in country table
    #[arg(long, env = "GLOBE_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Headless frame rate
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Remote requests slower than this count as empty
    #[arg(long, default_value_t = 3000)]
    pub predict_timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the merged suggestion list for TEXT
    Search { text: String },

    /// Commit a suggestion for TEXT and fly the camera there
    Fly {
        text: String,

        /// Row to commit instead of the first one
        #[arg(long)]
        pick: Option<usize>,
    },
}

impl Cli {
    pub fn frame_interval_ms(&self) -> Result<f64, ExplorerError> {
        if self.fps == 0 || self.fps > 1000 {
            return Err(ExplorerError::Config(format!(
                "--fps must be between 1 and 1000, got {}",
                self.fps
            )));
        }
        Ok(1000.0 / f64::from(self.fps))
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            predict_timeout: Duration::from_millis(self.predict_timeout_ms),
            ..SessionConfig::default()
        }
    }

    /// The remote lane, if a non-blank key was given.
    pub fn predictor(&self) -> Option<Arc<dyn Predictor>> {
        let key = self.places_api_key.as_deref().map(str::trim)?;
        if key.is_empty() {
            return None;
        }
        info!(url = %self.places_url, "remote place predictions enabled");
        Some(Arc::new(GooglePlacesPredictor::new(&self.places_url, key)))
    }

    pub async fn load_catalog(&self) -> Result<CountryCatalog, ExplorerError> {
        let Some(path) = &self.catalog else {
            return Ok(CountryCatalog::builtin());
        };
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CatalogError::Io(format!("{}: {e}", path.display())))?;
        let catalog = CountryCatalog::from_json(&raw)?;
        info!(path = %path.display(), entries = catalog.len(), "loaded place dataset");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["globe_explorer"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).expect("valid args")
    }

    #[test]
    fn fly_with_pick_and_defaults() {
        let cli = parse(&["fly", "united", "--pick", "2"]);
        assert_eq!(
            cli.command,
            Command::Fly {
                text: "united".into(),
                pick: Some(2)
            }
        );
        assert_eq!(cli.fps, 60);
        assert_eq!(cli.session_config().predict_timeout, Duration::from_millis(3000));
    }

    #[test]
    fn frame_rate_must_be_positive() {
        let cli = parse(&["--fps", "0", "search", "x"]);
        assert!(matches!(cli.frame_interval_ms(), Err(ExplorerError::Config(_))));
        let cli = parse(&["--fps", "10", "search", "x"]);
        assert_eq!(cli.frame_interval_ms().expect("interval"), 100.0);
    }

    #[test]
    fn blank_key_leaves_remote_lane_off() {
        let cli = parse(&["--places-api-key", "  ", "search", "x"]);
        assert!(cli.predictor().is_none());
        let cli = parse(&["--places-api-key", "k", "search", "x"]);
        assert!(cli.predictor().is_some());
    }

    #[tokio::test]
    async fn missing_dataset_file_is_an_io_error() {
        let cli = parse(&["--catalog", "/nonexistent/places.json", "search", "x"]);
        let err = cli.load_catalog().await.unwrap_err();
        assert!(matches!(err, ExplorerError::Catalog(CatalogError::Io(_))));
    }
}
