//! Serialization of the assembled document to YAML or JSON text.
//!
//! The reader itself never writes anywhere; callers decide what to do with
//! the returned string.

use crate::openapi_builder::OpenApiDocument;
use anyhow::{Context, Result};
use log::debug;

/// Serializes an OpenAPI document to YAML.
///
/// # Example
///
/// ```
/// use resource_openapi_reader::openapi_builder::OpenApiBuilder;
/// use resource_openapi_reader::serializer::serialize_yaml;
///
/// let document = OpenApiBuilder::new().build(Default::default());
/// let yaml = serialize_yaml(&document).unwrap();
/// assert!(yaml.contains("openapi: 3.0.1"));
/// ```
pub fn serialize_yaml(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize OpenAPI document to YAML")
}

/// Serializes an OpenAPI document to pretty-printed JSON.
pub fn serialize_json(doc: &OpenApiDocument) -> Result<String> {
    debug!("Serializing OpenAPI document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize OpenAPI document to JSON")
}
