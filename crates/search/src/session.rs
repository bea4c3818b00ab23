//! Async driver for [`SuggestionController`].
//!
//! Predictor calls and the blur grace delay run as tokio tasks whose results
//! are fed back into the controller one at a time, so the controller itself
//! only ever sees a single timeline. Committed locations come out of the
//! receiver returned by [`SearchSession::new`], one message per commit.

use std::sync::Arc;
use std::time::Duration;

use catalog::{Location, PlaceCatalog};
use foundation::time::Time;
use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinSet};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::controller::{
    Commit, Key, PredictRequest, QueryId, ResolveRequest, ResolveTicket, SuggestConfig,
    SuggestionController,
};
use crate::predictor::{Prediction, Predictor, PredictorError, ResolvedPlace};

pub const DEFAULT_PREDICT_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub suggest: SuggestConfig,
    /// A prediction or resolve that takes longer counts as failed.
    pub predict_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            suggest: SuggestConfig::default(),
            predict_timeout: DEFAULT_PREDICT_TIMEOUT,
        }
    }
}

#[derive(Debug)]
enum SessionMsg {
    Predictions {
        query: QueryId,
        result: Result<Vec<Prediction>, PredictorError>,
    },
    Resolved {
        ticket: ResolveTicket,
        result: Result<ResolvedPlace, PredictorError>,
    },
    BlurElapsed {
        at: Time,
    },
}

pub struct SearchSession<C> {
    controller: SuggestionController<C>,
    predictor: Option<Arc<dyn Predictor>>,
    predict_timeout: Duration,
    selected_tx: mpsc::UnboundedSender<Location>,
    tasks: JoinSet<SessionMsg>,
    predict_task: Option<AbortHandle>,
    origin: Instant,
}

impl<C: PlaceCatalog> SearchSession<C> {
    /// Without a predictor the remote lane is absent and the session never
    /// spawns a prediction task.
    pub fn new(
        catalog: C,
        predictor: Option<Arc<dyn Predictor>>,
        config: SessionConfig,
    ) -> (Self, mpsc::UnboundedReceiver<Location>) {
        let mut controller = SuggestionController::new(catalog, config.suggest);
        if predictor.is_some() {
            controller = controller.with_remote_lane();
        }
        let (selected_tx, selected_rx) = mpsc::unbounded_channel();
        let session = Self {
            controller,
            predictor,
            predict_timeout: config.predict_timeout,
            selected_tx,
            tasks: JoinSet::new(),
            predict_task: None,
            origin: Instant::now(),
        };
        (session, selected_rx)
    }

    pub fn controller(&self) -> &SuggestionController<C> {
        &self.controller
    }

    /// Milliseconds since the session was created.
    pub fn now(&self) -> Time {
        Time::from_millis(self.origin.elapsed().as_secs_f64() * 1000.0)
    }

    pub fn input(&mut self, text: &str) {
        if let Some(task) = self.predict_task.take() {
            task.abort();
        }
        if let Some(request) = self.controller.on_input(text) {
            self.spawn_predict(request);
        }
    }

    pub fn key(&mut self, key: Key) {
        if let Some(commit) = self.controller.on_key(key) {
            self.dispatch(commit);
        }
    }

    pub fn click(&mut self, index: usize) {
        if let Some(commit) = self.controller.select(index) {
            self.dispatch(commit);
        }
    }

    pub fn focus(&mut self) {
        self.controller.on_focus();
    }

    pub fn blur(&mut self) {
        let now = self.now();
        self.controller.on_blur(now);
        let Some(at) = self.controller.next_timer_due() else {
            return;
        };
        let wait = Duration::from_secs_f64(at.since(now) / 1000.0);
        self.tasks.spawn(async move {
            tokio::time::sleep(wait).await;
            SessionMsg::BlurElapsed { at }
        });
    }

    /// Waits for the next background result and applies it.
    ///
    /// Returns `false` once nothing is outstanding.
    pub async fn next_update(&mut self) -> bool {
        loop {
            match self.tasks.join_next().await {
                None => return false,
                Some(Ok(msg)) => {
                    self.apply(msg);
                    return true;
                }
                Some(Err(err)) if err.is_cancelled() => continue,
                Some(Err(err)) => {
                    debug!(error = %err, "search task failed");
                    continue;
                }
            }
        }
    }

    /// Applies background results until none are outstanding.
    pub async fn settle(&mut self) {
        while self.next_update().await {}
    }

    pub fn has_outstanding(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Cancels every pending task; later input is ignored.
    pub fn stop(&mut self) {
        self.controller.stop();
        self.tasks.abort_all();
        self.predict_task = None;
    }

    fn dispatch(&mut self, commit: Commit) {
        match commit {
            Commit::Selected(location) => self.emit(location),
            Commit::Resolve(request) => self.spawn_resolve(request),
        }
    }

    fn emit(&mut self, location: Location) {
        info!(name = %location.name, lat = location.latitude, lng = location.longitude, "location selected");
        if self.selected_tx.send(location).is_err() {
            debug!("selection receiver dropped");
        }
    }

    fn apply(&mut self, msg: SessionMsg) {
        match msg {
            SessionMsg::Predictions { query, result } => {
                self.controller.on_predictions(query, result);
            }
            SessionMsg::Resolved { ticket, result } => {
                if let Some(location) = self.controller.on_resolved(ticket, result) {
                    self.emit(location);
                }
            }
            SessionMsg::BlurElapsed { at } => {
                let now = self.now();
                self.controller.advance(Time(at.0.max(now.0)));
            }
        }
    }

    fn spawn_predict(&mut self, request: PredictRequest) {
        let Some(predictor) = self.predictor.clone() else {
            self.controller
                .on_predictions(request.query, Err(PredictorError::Unavailable));
            return;
        };
        let timeout = self.predict_timeout;
        let PredictRequest { query, text } = request;
        let handle = self.tasks.spawn(async move {
            let result = match tokio::time::timeout(timeout, predictor.predict(text)).await {
                Ok(result) => result,
                Err(_) => Err(PredictorError::RequestFailed("timed out".into())),
            };
            SessionMsg::Predictions { query, result }
        });
        self.predict_task = Some(handle);
    }

    fn spawn_resolve(&mut self, request: ResolveRequest) {
        let Some(predictor) = self.predictor.clone() else {
            self.controller
                .on_resolved(request.ticket, Err(PredictorError::Unavailable));
            return;
        };
        let timeout = self.predict_timeout;
        let ResolveRequest { ticket, prediction } = request;
        self.tasks.spawn(async move {
            let result = match tokio::time::timeout(timeout, predictor.resolve(prediction)).await {
                Ok(result) => result,
                Err(_) => Err(PredictorError::ResolveFailed("timed out".into())),
            };
            SessionMsg::Resolved { ticket, result }
        });
    }
}
