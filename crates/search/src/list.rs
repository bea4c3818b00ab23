use catalog::Location;

use crate::predictor::Prediction;

/// Borrowed view of one row of a [`SuggestionList`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Suggestion<'a> {
    Local(&'a Location),
    Remote(&'a Prediction),
}

impl<'a> Suggestion<'a> {
    pub fn label(&self) -> &'a str {
        match *self {
            Suggestion::Local(loc) => &loc.name,
            Suggestion::Remote(pred) => &pred.description,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Suggestion::Remote(_))
    }
}

/// Local matches followed by remote predictions, with one selection cursor
/// over the concatenation `[local.., remote..]`.
///
/// `selected == None` means "nothing highlighted"; a commit then takes the
/// first row. The list is only ever replaced whole, never patched, so a new
/// list always starts with no selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionList {
    local: Vec<Location>,
    remote: Vec<Prediction>,
    selected: Option<usize>,
}

impl SuggestionList {
    pub fn new(local: Vec<Location>, remote: Vec<Prediction>) -> Self {
        Self {
            local,
            remote,
            selected: None,
        }
    }

    pub fn local(&self) -> &[Location] {
        &self.local
    }

    pub fn remote(&self) -> &[Prediction] {
        &self.remote
    }

    pub fn len(&self) -> usize {
        self.local.len() + self.remote.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Suggestion<'_>> {
        if index < self.local.len() {
            return Some(Suggestion::Local(&self.local[index]));
        }
        self.remote
            .get(index - self.local.len())
            .map(Suggestion::Remote)
    }

    pub fn iter(&self) -> impl Iterator<Item = Suggestion<'_>> + '_ {
        self.local
            .iter()
            .map(Suggestion::Local)
            .chain(self.remote.iter().map(Suggestion::Remote))
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Moves the cursor down one row, stopping at the last row.
    pub fn select_next(&mut self) {
        if self.is_empty() {
            return;
        }
        let last = self.len() - 1;
        self.selected = Some(match self.selected {
            None => 0,
            Some(i) => (i + 1).min(last),
        });
    }

    /// Moves the cursor up one row; above the first row means no selection.
    pub fn select_prev(&mut self) {
        self.selected = match self.selected {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Row a commit would take: the selection, else the first row.
    pub fn commit_index(&self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        Some(self.selected.filter(|i| *i < self.len()).unwrap_or(0))
    }

    /// Same lists with the remote lane swapped out; selection resets.
    pub fn with_remote(self, remote: Vec<Prediction>) -> Self {
        Self::new(self.local, remote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::PredictionId;
    use pretty_assertions::assert_eq;

    fn loc(name: &str) -> Location {
        Location::new(name, "", 0.0, 0.0).expect("valid")
    }

    fn pred(id: &str, text: &str) -> Prediction {
        Prediction {
            id: PredictionId(id.to_string()),
            description: text.to_string(),
        }
    }

    fn three() -> SuggestionList {
        SuggestionList::new(vec![loc("A"), loc("B")], vec![pred("p1", "C")])
    }

    #[test]
    fn indexes_the_concatenation() {
        let list = three();
        assert_eq!(list.len(), 3);
        let labels: Vec<_> = list.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
        assert!(list.get(2).expect("row").is_remote());
        assert!(list.get(3).is_none());
    }

    #[test]
    fn arrow_down_clamps_at_last_row() {
        let mut list = three();
        let mut seen = vec![list.selected()];
        for _ in 0..4 {
            list.select_next();
            seen.push(list.selected());
        }
        assert_eq!(seen, vec![None, Some(0), Some(1), Some(2), Some(2)]);
    }

    #[test]
    fn arrow_up_stops_at_no_selection() {
        let mut list = three();
        list.select_next();
        list.select_next();
        let mut seen = Vec::new();
        for _ in 0..3 {
            list.select_prev();
            seen.push(list.selected());
        }
        assert_eq!(seen, vec![Some(0), None, None]);
    }

    #[test]
    fn commit_defaults_to_first_row() {
        let mut list = three();
        assert_eq!(list.commit_index(), Some(0));
        list.select_next();
        list.select_next();
        assert_eq!(list.commit_index(), Some(1));
        assert_eq!(SuggestionList::default().commit_index(), None);
    }

    #[test]
    fn empty_list_ignores_navigation() {
        let mut list = SuggestionList::default();
        list.select_next();
        assert_eq!(list.selected(), None);
    }

    #[test]
    fn swapping_remote_lane_resets_selection() {
        let mut list = three();
        list.select_next();
        let list = list.with_remote(vec![pred("p2", "D"), pred("p3", "E")]);
        assert_eq!(list.selected(), None);
        assert_eq!(list.len(), 4);
        assert_eq!(list.local().len(), 2);
    }
}
