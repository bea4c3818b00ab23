//! Google Places as the remote prediction lane.
//!
//! `predict` is Place Autocomplete, `resolve` is Place Details restricted to
//! the geometry and name fields.

use search::{BoxFuture, Prediction, PredictionId, Predictor, PredictorError, ResolvedPlace};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_PLACES_URL: &str = "https://maps.googleapis.com/maps/api";

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<AutocompletePrediction>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AutocompletePrediction {
    place_id: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    result: Option<DetailsResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    #[serde(default)]
    name: Option<String>,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

fn status_error(status: &str, message: Option<String>) -> String {
    match message {
        Some(msg) => format!("{status}: {msg}"),
        None => status.to_string(),
    }
}

/// Parses an autocomplete body. `ZERO_RESULTS` is an empty answer, not an error.
pub fn parse_autocomplete(body: &str) -> Result<Vec<Prediction>, PredictorError> {
    let resp: AutocompleteResponse = serde_json::from_str(body)
        .map_err(|e| PredictorError::RequestFailed(format!("bad autocomplete body: {e}")))?;
    match resp.status.as_str() {
        "OK" | "ZERO_RESULTS" => Ok(resp
            .predictions
            .into_iter()
            .map(|p| Prediction {
                id: PredictionId(p.place_id),
                description: p.description,
            })
            .collect()),
        status => Err(PredictorError::RequestFailed(status_error(status, resp.error_message))),
    }
}

/// Parses a details body; `fallback_name` labels results that carry no name.
pub fn parse_details(body: &str, fallback_name: &str) -> Result<ResolvedPlace, PredictorError> {
    let resp: DetailsResponse = serde_json::from_str(body)
        .map_err(|e| PredictorError::ResolveFailed(format!("bad details body: {e}")))?;
    if resp.status != "OK" {
        return Err(PredictorError::ResolveFailed(status_error(&resp.status, resp.error_message)));
    }
    let result = resp
        .result
        .ok_or_else(|| PredictorError::ResolveFailed("details without result".into()))?;
    Ok(ResolvedPlace {
        lat: result.geometry.location.lat,
        lng: result.geometry.location.lng,
        display_name: result.name.unwrap_or_else(|| fallback_name.to_string()),
    })
}

pub struct GooglePlacesPredictor {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GooglePlacesPredictor {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String, String> {
        let url = format!("{}/{path}", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {e}"))?;
        if !resp.status().is_success() {
            return Err(format!("HTTP error: {}", resp.status()));
        }
        resp.text()
            .await
            .map_err(|e| format!("failed to read response: {e}"))
    }
}

impl Predictor for GooglePlacesPredictor {
    fn predict(&self, text: String) -> BoxFuture<'_, Result<Vec<Prediction>, PredictorError>> {
        Box::pin(async move {
            let body = self
                .get_text("place/autocomplete/json", &[("input", text.as_str())])
                .await
                .map_err(PredictorError::RequestFailed)?;
            let predictions = parse_autocomplete(&body)?;
            debug!(input = %text, count = predictions.len(), "autocomplete answered");
            Ok(predictions)
        })
    }

    fn resolve(&self, prediction: Prediction) -> BoxFuture<'_, Result<ResolvedPlace, PredictorError>> {
        Box::pin(async move {
            let body = self
                .get_text(
                    "place/details/json",
                    &[("place_id", prediction.id.0.as_str()), ("fields", "geometry,name")],
                )
                .await
                .map_err(PredictorError::ResolveFailed)?;
            parse_details(&body, &prediction.description)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn autocomplete_predictions_keep_order() {
        let body = r#"{
            "status": "OK",
            "predictions": [
                {"place_id": "ChIJD7fiBh9u5kcRYJSMaMOCCwQ", "description": "Paris, France", "types": ["locality"]},
                {"place_id": "ChIJmysnFgZYSoYRSfPTL2YJuck", "description": "Paris, TX, USA"}
            ]
        }"#;
        let got = parse_autocomplete(body).expect("parse");
        let names: Vec<_> = got.iter().map(|p| p.description.as_str()).collect();
        assert_eq!(names, vec!["Paris, France", "Paris, TX, USA"]);
        assert_eq!(got[0].id, PredictionId("ChIJD7fiBh9u5kcRYJSMaMOCCwQ".into()));
    }

    #[test]
    fn zero_results_is_empty_not_error() {
        let got = parse_autocomplete(r#"{"status": "ZERO_RESULTS", "predictions": []}"#);
        assert_eq!(got, Ok(vec![]));
    }

    #[test]
    fn denied_request_is_an_error() {
        let got = parse_autocomplete(
            r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#,
        );
        assert_eq!(
            got,
            Err(PredictorError::RequestFailed(
                "REQUEST_DENIED: The provided API key is invalid.".into()
            ))
        );
        assert!(matches!(
            parse_autocomplete("<html>"),
            Err(PredictorError::RequestFailed(_))
        ));
    }

    #[test]
    fn details_yield_coordinates() {
        let body = r#"{
            "status": "OK",
            "result": {"name": "Eiffel Tower", "geometry": {"location": {"lat": 48.8583701, "lng": 2.2944813}}}
        }"#;
        let place = parse_details(body, "fallback").expect("parse");
        assert_eq!(place.display_name, "Eiffel Tower");
        assert_eq!((place.lat, place.lng), (48.8583701, 2.2944813));

        let unnamed = r#"{"status": "OK", "result": {"geometry": {"location": {"lat": 1.0, "lng": 2.0}}}}"#;
        assert_eq!(parse_details(unnamed, "Somewhere").expect("parse").display_name, "Somewhere");
    }

    #[test]
    fn details_failures_are_resolve_errors() {
        assert!(matches!(
            parse_details(r#"{"status": "NOT_FOUND"}"#, "x"),
            Err(PredictorError::ResolveFailed(_))
        ));
        assert!(matches!(
            parse_details(r#"{"status": "OK"}"#, "x"),
            Err(PredictorError::ResolveFailed(_))
        ));
    }
}
