//! Building the request body of an operation.

use super::content::{content_map, media_types_or};
use crate::config::ReaderConfig;
use crate::metadata::{RequestBodyMeta, TypeInfo};
use crate::openapi_builder::RequestBody;
use crate::schema_generator::SchemaRegistry;
use log::debug;

/// Build a request body.
///
/// `meta` is `None` for an implicit body (an un-annotated complex argument).
/// Content entries without a media type are keyed by `consumes`, falling back
/// to the configured default request media type.
pub fn build_request_body(
    meta: Option<&RequestBodyMeta>,
    body_type: Option<&TypeInfo>,
    consumes: &[String],
    registry: &mut dyn SchemaRegistry,
    config: &ReaderConfig,
) -> RequestBody {
    let media_types = media_types_or(Some(consumes), &config.default_request_media_type);
    let entries = meta.map(|m| m.content.as_slice()).unwrap_or(&[]);
    let content = content_map(entries, &media_types, body_type, registry);

    debug!(
        "Built request body with media types {:?}",
        content.keys().collect::<Vec<_>>()
    );
    RequestBody {
        description: meta.and_then(|m| m.description.clone()),
        content,
        required: meta.and_then(|m| m.required).unwrap_or(false),
    }
}
