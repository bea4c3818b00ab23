//! Remote prediction lane.
//!
//! A predictor turns free text into opaque [`Prediction`]s and, on request,
//! resolves one of them to coordinates. Both calls are best-effort: callers
//! treat any error as "no remote results".

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Opaque token identifying a prediction to its predictor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PredictionId(pub String);

/// An unresolved candidate place.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub id: PredictionId,
    pub description: String,
}

/// Coordinates for a resolved prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlace {
    pub lat: f64,
    pub lng: f64,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictorError {
    /// No predictor configured.
    Unavailable,
    /// Network or API failure while predicting.
    RequestFailed(String),
    /// Detail lookup for a chosen prediction failed.
    ResolveFailed(String),
}

impl std::fmt::Display for PredictorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PredictorError::Unavailable => write!(f, "no place predictor configured"),
            PredictorError::RequestFailed(msg) => write!(f, "prediction request failed: {msg}"),
            PredictorError::ResolveFailed(msg) => write!(f, "prediction resolve failed: {msg}"),
        }
    }
}

impl std::error::Error for PredictorError {}

/// External place predictor.
///
/// Implementations must be `Send + Sync` for use across async tasks.
/// Methods return boxed futures for dyn-compatibility.
pub trait Predictor: Send + Sync {
    fn predict(&self, text: String) -> BoxFuture<'_, Result<Vec<Prediction>, PredictorError>>;

    fn resolve(&self, prediction: Prediction) -> BoxFuture<'_, Result<ResolvedPlace, PredictorError>>;
}

/// Predictor answering from a fixed table.
///
/// Matches are case-insensitive substrings of the description. Useful offline
/// and for exercising the remote lane deterministically.
#[derive(Debug, Clone, Default)]
pub struct StaticPredictor {
    places: Vec<(Prediction, ResolvedPlace)>,
    delay: Option<Duration>,
    fail_predict: bool,
    fail_resolve: bool,
}

impl StaticPredictor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, id: &str, lat: f64, lng: f64, name: &str) -> Self {
        self.places.push((
            Prediction {
                id: PredictionId(id.to_string()),
                description: name.to_string(),
            },
            ResolvedPlace {
                lat,
                lng,
                display_name: name.to_string(),
            },
        ));
        self
    }

    /// Every answer arrives after `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing_predict(mut self) -> Self {
        self.fail_predict = true;
        self
    }

    pub fn failing_resolve(mut self) -> Self {
        self.fail_resolve = true;
        self
    }

    async fn wait(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Predictor for StaticPredictor {
    fn predict(&self, text: String) -> BoxFuture<'_, Result<Vec<Prediction>, PredictorError>> {
        Box::pin(async move {
            self.wait().await;
            if self.fail_predict {
                return Err(PredictorError::RequestFailed("static predictor offline".into()));
            }
            let needle = text.trim().to_lowercase();
            Ok(self
                .places
                .iter()
                .filter(|(p, _)| !needle.is_empty() && p.description.to_lowercase().contains(&needle))
                .map(|(p, _)| p.clone())
                .collect())
        })
    }

    fn resolve(&self, prediction: Prediction) -> BoxFuture<'_, Result<ResolvedPlace, PredictorError>> {
        Box::pin(async move {
            self.wait().await;
            if self.fail_resolve {
                return Err(PredictorError::ResolveFailed("static predictor offline".into()));
            }
            self.places
                .iter()
                .find(|(p, _)| p.id == prediction.id)
                .map(|(_, place)| place.clone())
                .ok_or_else(|| PredictorError::ResolveFailed(format!("unknown id {}", prediction.id.0)))
        })
    }
}
