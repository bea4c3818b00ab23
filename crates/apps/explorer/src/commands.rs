//! The `search` and `fly` subcommands, minus the printing.

use camera::FlightOutcome;
use catalog::{Location, PlaceCatalog};
use search::{Key, SearchSession};
use tokio::sync::mpsc;
use tracing::debug;

use crate::ExplorerError;
use crate::flythrough::{FlightReport, HeadlessDriver};

/// One printed suggestion row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub index: usize,
    pub label: String,
    pub remote: bool,
}

/// Types `text` and waits for the remote lane, if any, to answer.
pub async fn suggest<C: PlaceCatalog>(session: &mut SearchSession<C>, text: &str) -> Vec<Row> {
    session.focus();
    session.input(text);
    session.settle().await;
    session
        .controller()
        .list()
        .iter()
        .enumerate()
        .map(|(index, row)| Row {
            index,
            label: row.label().to_string(),
            remote: row.is_remote(),
        })
        .collect()
}

/// Commits row `pick` (or whatever Enter would take) for `text`.
pub async fn choose<C: PlaceCatalog>(
    session: &mut SearchSession<C>,
    selected: &mut mpsc::UnboundedReceiver<Location>,
    text: &str,
    pick: Option<usize>,
) -> Result<Location, ExplorerError> {
    let rows = suggest(session, text).await;
    debug!(rows = rows.len(), "suggestions ready");
    match pick {
        Some(index) => session.click(index),
        None => session.key(Key::Enter),
    }
    session.settle().await;
    selected
        .try_recv()
        .map_err(|_| ExplorerError::NoMatch(text.to_string()))
}

pub async fn fly<C: PlaceCatalog>(
    session: &mut SearchSession<C>,
    selected: &mut mpsc::UnboundedReceiver<Location>,
    driver: &mut HeadlessDriver,
    text: &str,
    pick: Option<usize>,
) -> Result<FlightReport, ExplorerError> {
    let location = choose(session, selected, text, pick).await?;
    let report = driver.fly(&location)?;
    if report.outcome == FlightOutcome::Cancelled {
        return Err(ExplorerError::FlightCancelled(location.name));
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camera::FlightConfig;
    use catalog::CountryCatalog;
    use pretty_assertions::assert_eq;
    use search::{Predictor, SessionConfig, StaticPredictor};
    use std::sync::Arc;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[tokio::test(start_paused = true)]
    async fn typing_jap_and_pressing_enter_lands_over_japan() {
        let (mut session, mut selected) =
            SearchSession::new(CountryCatalog::builtin(), None, SessionConfig::default());
        let mut driver = HeadlessDriver::new(FlightConfig::default(), 100.0);

        let rows = suggest(&mut session, "Jap").await;
        assert_eq!(
            rows,
            vec![Row {
                index: 0,
                label: "Japan".into(),
                remote: false
            }]
        );

        let report = fly(&mut session, &mut selected, &mut driver, "Jap", None)
            .await
            .expect("flight");
        assert_eq!(report.destination.name, "Japan");
        assert_eq!(
            (report.destination.latitude, report.destination.longitude),
            (36.2048, 138.2529)
        );
        assert_eq!(report.outcome, FlightOutcome::Completed);
        assert_eq!(report.phases.len(), 3);
        assert_close(report.duration_ms, 3700.0);
        assert_close(report.final_pose.lat, 36.2048);
        assert_close(report.final_pose.lng, 138.2529);
        assert_close(report.final_pose.altitude, 1.5);
        assert_eq!(session.controller().text(), "Japan");
    }

    #[tokio::test(start_paused = true)]
    async fn picking_a_remote_row_flies_to_resolved_coordinates() {
        let predictor: Arc<dyn Predictor> = Arc::new(
            StaticPredictor::new().with_place("opera", -33.8568, 151.2153, "Sydney Opera House"),
        );
        let (mut session, mut selected) = SearchSession::new(
            CountryCatalog::builtin(),
            Some(predictor),
            SessionConfig::default(),
        );
        let mut driver = HeadlessDriver::new(FlightConfig::default(), 100.0);

        let rows = suggest(&mut session, "opera").await;
        assert_eq!(rows.len(), 1);
        assert!(rows[0].remote);

        let report = fly(&mut session, &mut selected, &mut driver, "opera", Some(0))
            .await
            .expect("flight");
        assert_eq!(report.destination.name, "Australia");
        assert_close(report.final_pose.lat, -33.8568);
        assert_close(report.final_pose.lng, 151.2153);
    }

    #[tokio::test(start_paused = true)]
    async fn flight_that_never_lands_is_an_error() {
        let (mut session, mut selected) =
            SearchSession::new(CountryCatalog::builtin(), None, SessionConfig::default());
        let mut driver = HeadlessDriver::new(FlightConfig::default(), 100.0).with_frame_budget(3);
        let err = fly(&mut session, &mut selected, &mut driver, "Jap", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExplorerError::FlightCancelled(name) if name == "Japan"));
    }

    #[tokio::test(start_paused = true)]
    async fn no_match_is_reported() {
        let (mut session, mut selected) =
            SearchSession::new(CountryCatalog::builtin(), None, SessionConfig::default());
        let err = choose(&mut session, &mut selected, "qqqq", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExplorerError::NoMatch(text) if text == "qqqq"));
    }
}
