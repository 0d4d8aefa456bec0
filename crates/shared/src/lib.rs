pub mod domain;
pub mod error;
pub mod fhir;
pub mod protocol;
