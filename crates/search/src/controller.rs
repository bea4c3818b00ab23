//! Suggestion state machine.
//!
//! The controller never awaits anything. Remote work leaves it as a request
//! value ([`PredictRequest`], [`ResolveRequest`]) and comes back through
//! [`SuggestionController::on_predictions`] / [`SuggestionController::on_resolved`],
//! tagged with the id it was issued under. Anything tagged with an id that is
//! no longer current is dropped, so late answers can't resurrect a list the
//! user already cleared or committed.

use catalog::{Location, PlaceCatalog, rank_matches};
use foundation::math::is_valid_lat_lng;
use foundation::time::Time;
use runtime::{TimerId, TimerQueue};
use tracing::{debug, warn};

use crate::list::{Suggestion, SuggestionList};
use crate::predictor::{Prediction, PredictorError, ResolvedPlace};

pub const MAX_LOCAL_SUGGESTIONS: usize = 10;
pub const BLUR_HIDE_DELAY_MS: f64 = 200.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SuggestConfig {
    pub max_local: usize,
    /// Grace period between losing focus and hiding the list, so a pointer
    /// selection that caused the blur still lands.
    pub blur_hide_delay_ms: f64,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            max_local: MAX_LOCAL_SUGGESTIONS,
            blur_hide_delay_ms: BLUR_HIDE_DELAY_MS,
        }
    }
}

/// Generation of the text query a prediction request belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryId(pub u64);

/// Identifies one pending remote commit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResolveTicket(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictRequest {
    pub query: QueryId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolveRequest {
    pub ticket: ResolveTicket,
    pub prediction: Prediction,
}

/// What a commit produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    /// A local row: the location is final.
    Selected(Location),
    /// A remote row: resolve it, then feed the answer to `on_resolved`.
    Resolve(ResolveRequest),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Other,
}

impl Key {
    /// Maps DOM-style key names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "Enter" => Key::Enter,
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SuggestState {
    Idle,
    Querying,
    Showing,
}

/// Failures on the remote lane that never reach the user.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    Predictor(PredictorError),
    /// The dataset had no entry to label a resolved place with.
    NearestLookupEmpty,
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::Predictor(err) => write!(f, "{err}"),
            SearchError::NearestLookupEmpty => write!(f, "no dataset entry near resolved place"),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<PredictorError> for SearchError {
    fn from(err: PredictorError) -> Self {
        SearchError::Predictor(err)
    }
}

/// Labels a resolved place with its nearest dataset entry.
///
/// The coordinates stay those of the resolved place; name, code and capital
/// come from the dataset.
pub fn label_with_nearest<C: PlaceCatalog + ?Sized>(
    catalog: &C,
    place: &ResolvedPlace,
) -> Result<Location, SearchError> {
    let nearest = catalog
        .nearest_to(place.lat, place.lng)
        .ok_or(SearchError::NearestLookupEmpty)?;
    Ok(Location {
        name: nearest.location.name,
        code: nearest.location.code,
        latitude: place.lat,
        longitude: place.lng,
        capital: nearest.location.capital,
    })
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ControllerTimer {
    BlurHide,
}

pub struct SuggestionController<C> {
    catalog: C,
    config: SuggestConfig,
    remote_lane: bool,
    running: bool,
    text: String,
    list: SuggestionList,
    visible: bool,
    awaiting_remote: bool,
    query: QueryId,
    pending_resolve: Option<ResolveTicket>,
    next_ticket: u64,
    timers: TimerQueue<ControllerTimer>,
    blur_timer: Option<TimerId>,
}

impl<C: PlaceCatalog> SuggestionController<C> {
    /// Local-only controller; see [`SuggestionController::with_remote_lane`].
    pub fn new(catalog: C, config: SuggestConfig) -> Self {
        Self {
            catalog,
            config,
            remote_lane: false,
            running: true,
            text: String::new(),
            list: SuggestionList::default(),
            visible: false,
            awaiting_remote: false,
            query: QueryId(0),
            pending_resolve: None,
            next_ticket: 0,
            timers: TimerQueue::new(),
            blur_timer: None,
        }
    }

    /// Issue a [`PredictRequest`] alongside every local search.
    pub fn with_remote_lane(mut self) -> Self {
        self.remote_lane = true;
        self
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Tears down: drops pending timers, in-flight queries and resolves.
    ///
    /// Answers that arrive afterwards are ignored. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.running = false;
        self.invalidate_query();
        self.pending_resolve = None;
        self.timers.cancel_all();
        self.blur_timer = None;
        self.visible = false;
        self.list.clear_selection();
    }

    /// Ranked dataset matches for `text`, capped at `max_local`.
    pub fn query_local(&self, text: &str) -> Vec<Location> {
        rank_matches(self.catalog.all(), text, self.config.max_local)
    }

    /// The input text changed.
    ///
    /// Rebuilds the list from local matches immediately. Returns the remote
    /// request to run when the remote lane is on and the text is not blank.
    pub fn on_input(&mut self, text: &str) -> Option<PredictRequest> {
        if !self.running {
            return None;
        }
        self.text = text.to_string();
        self.invalidate_query();
        self.pending_resolve = None;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.list = SuggestionList::default();
            self.visible = false;
            return None;
        }

        let local = self.query_local(trimmed);
        self.replace_list(SuggestionList::new(local, Vec::new()));

        if !self.remote_lane {
            return None;
        }
        self.awaiting_remote = true;
        Some(PredictRequest {
            query: self.query,
            text: trimmed.to_string(),
        })
    }

    /// Applies a prediction answer. Returns `true` if the list was rebuilt.
    pub fn on_predictions(
        &mut self,
        query: QueryId,
        result: Result<Vec<Prediction>, PredictorError>,
    ) -> bool {
        if !self.running || !self.awaiting_remote || query != self.query {
            debug!(query = query.0, current = self.query.0, "dropping superseded predictions");
            return false;
        }
        self.awaiting_remote = false;

        match result {
            Ok(predictions) => {
                let list = std::mem::take(&mut self.list).with_remote(predictions);
                self.replace_list(list);
                true
            }
            Err(err) => {
                debug!(error = %err, "remote lane empty");
                false
            }
        }
    }

    pub fn on_key(&mut self, key: Key) -> Option<Commit> {
        if !self.running || !self.visible || self.list.is_empty() {
            return None;
        }
        match key {
            Key::ArrowDown => {
                self.list.select_next();
                None
            }
            Key::ArrowUp => {
                self.list.select_prev();
                None
            }
            Key::Enter => {
                let index = self.list.commit_index()?;
                self.commit(index)
            }
            Key::Escape => {
                self.visible = false;
                self.list.clear_selection();
                None
            }
            Key::Other => None,
        }
    }

    /// Pointer selection of row `index`.
    pub fn select(&mut self, index: usize) -> Option<Commit> {
        if !self.running || !self.visible {
            return None;
        }
        self.commit(index)
    }

    /// Answer for a remote commit. Returns the location to emit, if any.
    pub fn on_resolved(
        &mut self,
        ticket: ResolveTicket,
        result: Result<ResolvedPlace, PredictorError>,
    ) -> Option<Location> {
        if !self.running || self.pending_resolve != Some(ticket) {
            debug!(ticket = ticket.0, "dropping stale resolve");
            return None;
        }
        self.pending_resolve = None;

        let place = match result {
            Ok(place) if is_valid_lat_lng(place.lat, place.lng) => place,
            Ok(place) => {
                warn!(lat = place.lat, lng = place.lng, "resolved place out of range");
                return None;
            }
            Err(err) => {
                warn!(error = %err, "abandoning remote commit");
                return None;
            }
        };

        let location = label_with_nearest(&self.catalog, &place).unwrap_or_else(|err| {
            debug!(error = %err, label = %place.display_name, "using predictor label");
            Location {
                name: place.display_name.clone(),
                code: String::new(),
                latitude: place.lat,
                longitude: place.lng,
                capital: None,
            }
        });
        Some(self.finish_commit(location))
    }

    pub fn on_focus(&mut self) {
        if !self.running {
            return;
        }
        self.cancel_blur();
        if !self.text.trim().is_empty() && !self.list.is_empty() {
            self.visible = true;
        }
    }

    /// Focus left the input at `now`; the list hides after the grace delay
    /// unless something else dismissed it first.
    pub fn on_blur(&mut self, now: Time) {
        if !self.running {
            return;
        }
        self.cancel_blur();
        let due = now.after_millis(self.config.blur_hide_delay_ms);
        self.blur_timer = Some(self.timers.schedule(due, ControllerTimer::BlurHide));
    }

    /// Fires timers due at `now`.
    pub fn advance(&mut self, now: Time) {
        for (id, timer) in self.timers.pop_due(now) {
            match timer {
                ControllerTimer::BlurHide => {
                    if self.blur_timer != Some(id) {
                        continue;
                    }
                    self.blur_timer = None;
                    if self.visible {
                        self.visible = false;
                        self.list.clear_selection();
                    }
                }
            }
        }
    }

    pub fn next_timer_due(&self) -> Option<Time> {
        self.timers.next_due()
    }

    pub fn state(&self) -> SuggestState {
        if self.visible {
            SuggestState::Showing
        } else if self.awaiting_remote {
            SuggestState::Querying
        } else {
            SuggestState::Idle
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.list.selected()
    }

    pub fn list(&self) -> &SuggestionList {
        &self.list
    }

    pub fn is_resolving(&self) -> bool {
        self.pending_resolve.is_some()
    }

    pub fn has_remote_lane(&self) -> bool {
        self.remote_lane
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    fn commit(&mut self, index: usize) -> Option<Commit> {
        let commit = match self.list.get(index)? {
            Suggestion::Local(loc) => Commit::Selected(loc.clone()),
            Suggestion::Remote(pred) => {
                let ticket = ResolveTicket(self.next_ticket);
                self.next_ticket = self.next_ticket.wrapping_add(1);
                Commit::Resolve(ResolveRequest {
                    ticket,
                    prediction: pred.clone(),
                })
            }
        };

        self.cancel_blur();
        self.invalidate_query();
        match commit {
            Commit::Selected(loc) => Some(Commit::Selected(self.finish_commit(loc))),
            Commit::Resolve(req) => {
                self.visible = false;
                self.list.clear_selection();
                self.pending_resolve = Some(req.ticket);
                Some(Commit::Resolve(req))
            }
        }
    }

    fn finish_commit(&mut self, location: Location) -> Location {
        self.text = location.name.clone();
        self.visible = false;
        self.list.clear_selection();
        self.pending_resolve = None;
        location
    }

    fn replace_list(&mut self, list: SuggestionList) {
        self.list = list;
        self.visible = !self.list.is_empty();
    }

    fn invalidate_query(&mut self) {
        self.query = QueryId(self.query.0.wrapping_add(1));
        self.awaiting_remote = false;
    }

    fn cancel_blur(&mut self) {
        if let Some(id) = self.blur_timer.take() {
            self.timers.cancel(id);
        }
    }
}
