//! Minimal FHIR R4 resource subset for transaction bundles carrying a dual-coded condition.

use serde::{Deserialize, Serialize};

pub const BUNDLE_RESOURCE_TYPE: &str = "Bundle";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BundleType {
    Transaction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub resource_type: String,
    #[serde(rename = "type")]
    pub bundle_type: BundleType,
    pub entry: Vec<BundleEntry>,
}

impl Bundle {
    pub fn transaction(entry: Vec<BundleEntry>) -> Self {
        Self {
            resource_type: BUNDLE_RESOURCE_TYPE.to_string(),
            bundle_type: BundleType::Transaction,
            entry,
        }
    }

    pub fn patient(&self) -> Option<&Patient> {
        self.entry.iter().find_map(|entry| match &entry.resource {
            Resource::Patient(patient) => Some(patient),
            _ => None,
        })
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.entry.iter().find_map(|entry| match &entry.resource {
            Resource::Condition(condition) => Some(condition),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    pub full_url: String,
    pub resource: Resource,
    pub request: BundleRequest,
}

impl BundleEntry {
    /// Entry that asks the server to create `resource`, addressed by a `urn:uuid:` placeholder.
    pub fn create(local_id: &str, resource: Resource) -> Self {
        let request = BundleRequest {
            method: HttpVerb::Post,
            url: resource.resource_type().to_string(),
        };
        Self {
            full_url: urn_for(local_id),
            resource,
            request,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleRequest {
    pub method: HttpVerb,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "resourceType")]
pub enum Resource {
    Patient(Patient),
    Condition(Condition),
}

impl Resource {
    pub fn resource_type(&self) -> &'static str {
        match self {
            Resource::Patient(_) => "Patient",
            Resource::Condition(_) => "Condition",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    #[serde(default)]
    pub name: Vec<HumanName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(rename = "use")]
    pub name_use: String,
    pub family: String,
    #[serde(default)]
    pub given: Vec<String>,
}

impl HumanName {
    pub fn official(family: impl Into<String>, given: Vec<String>) -> Self {
        Self {
            name_use: "official".to_string(),
            family: family.into(),
            given,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub clinical_status: CodeableConcept,
    pub code: CodeableConcept,
    pub subject: Reference,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub coding: Vec<Coding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    pub system: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub reference: String,
}

impl Reference {
    pub fn to_local(local_id: &str) -> Self {
        Self {
            reference: urn_for(local_id),
        }
    }
}

pub fn urn_for(local_id: &str) -> String {
    format!("urn:uuid:{local_id}")
}
