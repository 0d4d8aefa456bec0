use serde::{Deserialize, Serialize};

/// Canonical URL of the NAMASTE (AYUSH) code system that terms are searched and selected from.
pub const SOURCE_SYSTEM: &str = "http://sih.gov.in/fhir/namaste-codes";

pub const CONDITION_CLINICAL_SYSTEM: &str =
    "http://terminology.hl7.org/CodeSystem/condition-clinical";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub code: String,
    pub display: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl SearchResultItem {
    pub fn new(code: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display: display.into(),
            source: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_code: Option<String>,
    pub target_code: String,
    pub target_display: String,
    pub target_system: String,
}

/// A source-system term picked from the result list, plus its translation once known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedTerm {
    pub item: SearchResultItem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<Translation>,
}

impl SelectedTerm {
    pub fn new(item: SearchResultItem) -> Self {
        Self {
            item,
            translation: None,
        }
    }

    pub fn with_translation(mut self, translation: Translation) -> Self {
        self.translation = Some(translation);
        self
    }

    pub fn code(&self) -> &str {
        &self.item.code
    }

    pub fn display(&self) -> &str {
        &self.item.display
    }

    pub fn is_translated(&self) -> bool {
        self.translation.is_some()
    }
}
