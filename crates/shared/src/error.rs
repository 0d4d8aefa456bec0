use serde::{Deserialize, Serialize};

/// Error body returned by the backend on non-success responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub detail: Option<String>,
}

impl ApiError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
        }
    }

    pub fn detail_or(&self, fallback: &str) -> String {
        match self.detail.as_deref() {
            Some(detail) if !detail.trim().is_empty() => detail.to_string(),
            _ => fallback.to_string(),
        }
    }
}
