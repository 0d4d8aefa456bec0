use shared::{
    domain::{SearchResultItem, SelectedTerm},
    fhir::Bundle,
};

use crate::gateway::SearchResults;

/// Everything the workflow knows about the current record cycle.
#[derive(Debug, Default, Clone)]
pub struct Session {
    query: String,
    results: SearchResults,
    selection: Option<SelectedTerm>,
    bundle: Option<Bundle>,
}

impl Session {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn results(&self) -> &SearchResults {
        &self.results
    }

    pub fn show_results(&mut self, results: SearchResults) {
        self.results = results;
    }

    pub fn clear_results(&mut self) {
        self.results = SearchResults::default();
    }

    pub fn selection(&self) -> Option<&SelectedTerm> {
        self.selection.as_ref()
    }

    /// Replaces the current selection; any bundle built from the previous one is dropped.
    pub fn select(&mut self, term: SelectedTerm) {
        self.selection = Some(term);
        self.bundle = None;
    }

    pub fn translated_selection(&self) -> Option<&SelectedTerm> {
        self.selection.as_ref().filter(|term| term.is_translated())
    }

    pub fn bundle(&self) -> Option<&Bundle> {
        self.bundle.as_ref()
    }

    pub fn store_bundle(&mut self, bundle: Bundle) {
        self.bundle = Some(bundle);
    }

    pub fn take_bundle(&mut self) -> Option<Bundle> {
        self.bundle.take()
    }

    /// The displayed source-system entry with `code`; target entries never match.
    pub fn listed_source(&self, code: &str) -> Option<&SearchResultItem> {
        self.results.source.iter().find(|item| item.code == code)
    }

    /// Starts a fresh record cycle; the query text is kept.
    pub fn reset_record(&mut self) {
        self.selection = None;
        self.bundle = None;
    }
}
