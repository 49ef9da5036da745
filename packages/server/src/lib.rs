// PII Triage - API Core
//
// This crate masks personally identifiable information in email bodies and
// classifies the masked text into a business category.
//
// Layers: common/ holds the pure masking and classification logic, kernel/
// wires it to the model endpoints, server/ exposes it over HTTP.

pub mod common;
pub mod config;
pub mod kernel;
pub mod server;

pub use config::*;
