//! Record workflow: search, select, translate, generate, submit.

use std::sync::Arc;

use serde::Serialize;
use shared::domain::{SearchResultItem, SelectedTerm};
use tokio::{
    sync::{broadcast, mpsc},
    time::Instant,
};
use tracing::{debug, info, warn};

use crate::{
    config::ClientSettings,
    error::{GatewayError, PreconditionError, WorkflowError},
    gateway::{HttpGateway, RemoteGateway, SearchResults},
    notice::{Notice, NoticeBoard},
    record::{IdGenerator, RecordBuilder, SubjectName, UuidIdGenerator},
    search::{DueSearch, QueryDecision, SearchController},
    session::Session,
    ClientEvent,
};

const SEARCH_FAILED: &str = "Search failed. Could not connect to the server.";
const TRANSLATE_FAILED: &str = "Could not translate the selected NAMASTE code.";
const BUNDLE_GENERATED: &str = "FHIR record generated.";
const SUBMITTING: &str = "Submitting record...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Idle,
    Searching,
    TermSelected,
    BundleGenerated,
    Submitting,
    Submitted,
    Failed,
}

impl WorkflowState {
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkflowState::Submitted | WorkflowState::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    QueryChanged(String),
    /// Only source-system results are selectable.
    Select(SearchResultItem),
    Generate,
    Submit,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::QueryChanged(_) => "query_changed",
            Action::Select(_) => "select",
            Action::Generate => "generate",
            Action::Submit => "submit",
        }
    }
}

enum Internal {
    SearchDue(DueSearch),
    SearchFinished {
        query: String,
        outcome: Result<SearchResults, GatewayError>,
    },
}

pub struct Workflow<I: IdGenerator = UuidIdGenerator> {
    gateway: Arc<dyn RemoteGateway>,
    builder: RecordBuilder<I>,
    search: SearchController,
    notices: NoticeBoard,
    session: Session,
    state: WorkflowState,
    searches_in_flight: usize,
    events: broadcast::Sender<ClientEvent>,
    inbox_tx: mpsc::UnboundedSender<Internal>,
    inbox_rx: mpsc::UnboundedReceiver<Internal>,
}

impl Workflow<UuidIdGenerator> {
    pub fn from_settings(settings: &ClientSettings) -> Self {
        let gateway = HttpGateway::new(
            settings.api_base_url.clone(),
            settings.bearer_token.clone(),
        );
        let subject = SubjectName {
            family: settings.subject_family.clone(),
            given: settings.subject_given.clone(),
        };
        Workflow::new(
            Arc::new(gateway),
            RecordBuilder::new(UuidIdGenerator, subject),
            SearchController::new(settings.debounce(), settings.min_query_chars),
            NoticeBoard::new(settings.notice_ttl()),
        )
    }
}

impl<I: IdGenerator> Workflow<I> {
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        builder: RecordBuilder<I>,
        search: SearchController,
        notices: NoticeBoard,
    ) -> Self {
        let (events, _) = broadcast::channel(256);
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Self {
            gateway,
            builder,
            search,
            notices,
            session: Session::default(),
            state: WorkflowState::Idle,
            searches_in_flight: 0,
            events,
            inbox_tx,
            inbox_rx,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn active_notice(&self) -> Option<&Notice> {
        self.notices.active(Instant::now())
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    pub async fn dispatch(&mut self, action: Action) -> Result<WorkflowState, WorkflowError> {
        debug!(action = action.name(), state = ?self.state, "workflow: dispatch");
        match action {
            Action::QueryChanged(text) => {
                self.query_changed(text);
                Ok(self.state)
            }
            Action::Select(item) => self.select(item).await,
            Action::Generate => self.generate(),
            Action::Submit => self.submit().await,
        }
    }

    /// Applies the next debounce or search completion, waiting for one if none is queued.
    pub async fn step(&mut self) -> bool {
        match self.inbox_rx.recv().await {
            Some(internal) => {
                self.apply(internal);
                true
            }
            None => false,
        }
    }

    /// Drives the workflow until the command channel closes.
    pub async fn run(mut self, mut commands: mpsc::Receiver<Action>) {
        loop {
            let expiry = self.notices.expires_at();
            tokio::select! {
                command = commands.recv() => match command {
                    Some(action) => {
                        let name = action.name();
                        if let Err(err) = self.dispatch(action).await {
                            debug!(action = name, error = %err, "workflow: action did not advance");
                        }
                    }
                    None => break,
                },
                Some(internal) = self.inbox_rx.recv() => self.apply(internal),
                _ = tokio::time::sleep_until(expiry.unwrap_or_else(Instant::now)), if expiry.is_some() => {
                    self.dismiss_expired_notice();
                }
            }
        }
        info!("workflow: command channel closed");
    }

    fn query_changed(&mut self, text: String) {
        let tx = self.inbox_tx.clone();
        let decision = self.search.on_query_changed(&text, move |due| {
            let _ = tx.send(Internal::SearchDue(due));
        });
        self.session.set_query(text);
        if decision == QueryDecision::Cleared {
            self.session.clear_results();
            self.emit(ClientEvent::ResultsCleared);
        }
    }

    fn apply(&mut self, internal: Internal) {
        match internal {
            Internal::SearchDue(due) => self.start_search(due),
            Internal::SearchFinished { query, outcome } => self.finish_search(query, outcome),
        }
    }

    fn start_search(&mut self, due: DueSearch) {
        if !self.search.is_current(due.generation) {
            debug!(generation = due.generation, "workflow: dropping superseded search");
            return;
        }

        match self.state {
            WorkflowState::Submitted | WorkflowState::Failed => {
                info!(state = ?self.state, "workflow: new query restarts record cycle");
                self.session.reset_record();
                self.transition(WorkflowState::Searching);
            }
            WorkflowState::Idle => self.transition(WorkflowState::Searching),
            _ => {}
        }

        self.session.clear_results();
        self.emit(ClientEvent::ResultsCleared);
        self.searches_in_flight += 1;
        if self.searches_in_flight == 1 {
            self.emit(ClientEvent::Loading(true));
        }

        // Overlapping searches are not ordered: whichever finishes last is displayed.
        let gateway = Arc::clone(&self.gateway);
        let tx = self.inbox_tx.clone();
        let query = due.query;
        tokio::spawn(async move {
            let outcome = gateway.search(&query).await;
            let _ = tx.send(Internal::SearchFinished { query, outcome });
        });
    }

    fn finish_search(&mut self, query: String, outcome: Result<SearchResults, GatewayError>) {
        self.searches_in_flight = self.searches_in_flight.saturating_sub(1);
        if self.searches_in_flight == 0 {
            self.emit(ClientEvent::Loading(false));
        }

        match outcome {
            Ok(results) => {
                info!(
                    query,
                    source = results.source.len(),
                    target = results.target.len(),
                    "workflow: search results"
                );
                self.session.show_results(results.clone());
                self.emit(ClientEvent::ResultsUpdated(results));
            }
            Err(err) => {
                warn!(query, error = %err, "workflow: search failed");
                self.notify(Notice::error(SEARCH_FAILED));
            }
        }

        if self.state == WorkflowState::Searching && self.searches_in_flight == 0 {
            self.transition(WorkflowState::Idle);
        }
    }

    async fn select(&mut self, item: SearchResultItem) -> Result<WorkflowState, WorkflowError> {
        let Some(item) = self.session.listed_source(&item.code).cloned() else {
            return Err(self.reject(PreconditionError::NotListed { code: item.code }));
        };

        self.search.cancel();
        self.session.set_query("");
        self.session.clear_results();
        self.emit(ClientEvent::ResultsCleared);

        let Some(translation) = self.gateway.translate(&item.code).await else {
            self.notify(Notice::error(TRANSLATE_FAILED));
            return Err(WorkflowError::TranslationUnavailable { code: item.code });
        };

        info!(
            code = %item.code,
            target_code = %translation.target_code,
            "workflow: term selected"
        );
        let term = SelectedTerm::new(item).with_translation(translation);
        self.session.select(term.clone());
        self.emit(ClientEvent::TermSelected(term));
        self.transition(WorkflowState::TermSelected);
        Ok(self.state)
    }

    fn generate(&mut self) -> Result<WorkflowState, WorkflowError> {
        let Some(term) = self.session.translated_selection() else {
            return Err(self.reject(PreconditionError::NoTranslatedSelection));
        };
        let bundle = match self.builder.build(term) {
            Ok(bundle) => bundle,
            Err(err) => return Err(self.reject(err)),
        };

        match self.state {
            WorkflowState::BundleGenerated => {
                info!("workflow: regenerating bundle for current selection")
            }
            state if state.is_terminal() => {
                info!(state = ?state, "workflow: new record cycle from current selection")
            }
            _ => {}
        }

        self.session.store_bundle(bundle.clone());
        self.emit(ClientEvent::BundleGenerated(Box::new(bundle)));
        self.notify(Notice::success(BUNDLE_GENERATED));
        self.transition(WorkflowState::BundleGenerated);
        Ok(self.state)
    }

    async fn submit(&mut self) -> Result<WorkflowState, WorkflowError> {
        let Some(bundle) = self.session.take_bundle() else {
            return Err(self.reject(PreconditionError::NoGeneratedBundle));
        };

        self.notify(Notice::info(SUBMITTING));
        self.transition(WorkflowState::Submitting);

        match self.gateway.submit(&bundle).await {
            Ok(receipt) => {
                self.notify(Notice::success(receipt.message.clone()));
                self.emit(ClientEvent::Submitted(receipt));
                self.transition(WorkflowState::Submitted);
                Ok(self.state)
            }
            Err(err) => {
                warn!(error = %err, auth = err.is_auth(), "workflow: submission failed");
                self.notify(Notice::error(err.submit_notice()));
                self.transition(WorkflowState::Failed);
                Err(err.into())
            }
        }
    }

    fn reject(&mut self, err: PreconditionError) -> WorkflowError {
        warn!(state = ?self.state, error = %err, "workflow: action rejected");
        self.notify(Notice::error(err.notice()));
        err.into()
    }

    fn transition(&mut self, to: WorkflowState) {
        let from = self.state;
        if from == to {
            return;
        }
        info!(from = ?from, to = ?to, "workflow: transition");
        self.state = to;
        self.emit(ClientEvent::StateChanged { from, to });
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.post(notice.clone(), Instant::now());
        self.emit(ClientEvent::Notice(notice));
    }

    fn dismiss_expired_notice(&mut self) {
        if let Some(notice) = self.notices.sweep(Instant::now()) {
            debug!(message = %notice.message, "workflow: notice expired");
            self.emit(ClientEvent::NoticeDismissed(notice));
        }
    }

    fn emit(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
