use shared::{domain::SelectedTerm, fhir::Bundle, protocol::SubmitResponse};

pub mod config;
pub mod error;
pub mod gateway;
pub mod notice;
pub mod record;
pub mod search;
pub mod session;
pub mod workflow;

pub use config::{load_settings, ClientSettings};
pub use error::{GatewayError, PreconditionError, WorkflowError};
pub use gateway::{HttpGateway, RemoteGateway, SearchResults};
pub use notice::{Notice, NoticeBoard, Severity};
pub use record::{IdGenerator, RecordBuilder, SequenceIdGenerator, SubjectName, UuidIdGenerator};
pub use search::SearchController;
pub use session::Session;
pub use workflow::{Action, Workflow, WorkflowState};

/// Everything a front end needs to render, published by the workflow as it happens.
#[derive(Debug, Clone)]
pub enum ClientEvent {
    StateChanged {
        from: WorkflowState,
        to: WorkflowState,
    },
    Loading(bool),
    ResultsCleared,
    ResultsUpdated(SearchResults),
    TermSelected(SelectedTerm),
    BundleGenerated(Box<Bundle>),
    Submitted(SubmitResponse),
    Notice(Notice),
    /// The notice's display duration elapsed.
    NoticeDismissed(Notice),
}
