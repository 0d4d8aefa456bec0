use thiserror::Error;

pub const SUBMIT_FALLBACK_DETAIL: &str = "Server responded with an error.";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response status {status}")]
    BadResponse { status: u16 },
    #[error("malformed response body: {0}")]
    Malformed(String),
    #[error("authorization failed")]
    Auth,
    #[error("submission rejected with status {status}: {detail}")]
    Submit { status: u16, detail: String },
}

impl GatewayError {
    /// Message shown to the user when a submission fails with this error.
    pub fn submit_notice(&self) -> String {
        match self {
            GatewayError::Auth => "Authorization failed. Check token.".to_string(),
            GatewayError::Submit { detail, .. } => detail.clone(),
            GatewayError::BadResponse { .. } | GatewayError::Malformed(_) => {
                SUBMIT_FALLBACK_DETAIL.to_string()
            }
            GatewayError::Network(_) => {
                "Submission failed. Could not connect to the server.".to_string()
            }
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, GatewayError::Auth)
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            GatewayError::Malformed(value.to_string())
        } else if let Some(status) = value.status() {
            GatewayError::BadResponse {
                status: status.as_u16(),
            }
        } else {
            GatewayError::Network(value.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("no translated term is selected")]
    NoTranslatedSelection,
    #[error("no bundle has been generated in this cycle")]
    NoGeneratedBundle,
    #[error("term {code} is not among the displayed NAMASTE results")]
    NotListed { code: String },
}

impl PreconditionError {
    pub fn notice(&self) -> &'static str {
        match self {
            PreconditionError::NoTranslatedSelection => "Please select a valid NAMASTE term first.",
            PreconditionError::NoGeneratedBundle => "Please generate a bundle first.",
            PreconditionError::NotListed { .. } => {
                "Please choose a term from the NAMASTE search results."
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
    #[error("translation unavailable for code {code}")]
    TranslationUnavailable { code: String },
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
