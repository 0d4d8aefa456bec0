use std::sync::atomic::{AtomicU64, Ordering};

use shared::{
    domain::{SelectedTerm, CONDITION_CLINICAL_SYSTEM, SOURCE_SYSTEM},
    fhir::{
        Bundle, BundleEntry, CodeableConcept, Coding, Condition, HumanName, Patient, Reference,
        Resource,
    },
};
use uuid::Uuid;

use crate::error::PreconditionError;

/// Source of fresh local identifiers for generated resources.
pub trait IdGenerator: Send + Sync {
    fn next_token(&self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_token(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic tokens (`1`, `2`, ...) for reproducible bundles.
#[derive(Debug, Default)]
pub struct SequenceIdGenerator {
    next: AtomicU64,
}

impl IdGenerator for SequenceIdGenerator {
    fn next_token(&self) -> String {
        (self.next.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectName {
    pub family: String,
    pub given: Vec<String>,
}

impl Default for SubjectName {
    fn default() -> Self {
        Self {
            family: "Kumar".into(),
            given: vec!["Aditya".into()],
        }
    }
}

pub struct RecordBuilder<I: IdGenerator> {
    ids: I,
    subject: SubjectName,
}

impl<I: IdGenerator> RecordBuilder<I> {
    pub fn new(ids: I, subject: SubjectName) -> Self {
        Self { ids, subject }
    }

    /// Builds a two-entry transaction bundle: the subject, then a condition coded in both
    /// systems that references it.
    pub fn build(&self, term: &SelectedTerm) -> Result<Bundle, PreconditionError> {
        let translation = term
            .translation
            .as_ref()
            .ok_or(PreconditionError::NoTranslatedSelection)?;

        let patient_id = format!("patient-{}", self.ids.next_token());
        let condition_id = format!("condition-{}", self.ids.next_token());

        let patient = Patient {
            id: patient_id.clone(),
            name: vec![HumanName::official(
                self.subject.family.clone(),
                self.subject.given.clone(),
            )],
        };

        let condition = Condition {
            clinical_status: CodeableConcept {
                text: None,
                coding: vec![Coding {
                    system: CONDITION_CLINICAL_SYSTEM.to_string(),
                    code: "active".to_string(),
                    display: None,
                }],
            },
            code: CodeableConcept {
                text: Some(format!(
                    "Dual diagnosis: {} and {}",
                    term.display(),
                    translation.target_display
                )),
                coding: vec![
                    Coding {
                        system: SOURCE_SYSTEM.to_string(),
                        code: term.code().to_string(),
                        display: Some(term.display().to_string()),
                    },
                    Coding {
                        system: translation.target_system.clone(),
                        code: translation.target_code.clone(),
                        display: Some(translation.target_display.clone()),
                    },
                ],
            },
            subject: Reference::to_local(&patient_id),
        };

        Ok(Bundle::transaction(vec![
            BundleEntry::create(&patient_id, Resource::Patient(patient)),
            BundleEntry::create(&condition_id, Resource::Condition(condition)),
        ]))
    }
}

#[cfg(test)]
#[path = "tests/record_tests.rs"]
mod tests;
