//! Building the per-status response map of an operation.

use super::content::content_map;
use crate::config::ReaderConfig;
use crate::error::{ErrorKind, Result};
use crate::metadata::{ApiResponseMeta, TypeInfo};
use crate::openapi_builder::Response;
use crate::schema_generator::SchemaRegistry;
use indexmap::IndexMap;
use log::{debug, warn};

/// Build the responses of an operation; the result is never empty.
///
/// Every declared entry needs a description. Without any declared entry a
/// single `200` response carrying the configured default description is
/// synthesized. Content media types come from the entry itself, then from
/// `produces`, then the wildcard media type. Entries without a declared schema
/// describe `return_type`; with neither, the response carries no content.
pub fn build_responses(
    declared: &[ApiResponseMeta],
    produces: &[String],
    return_type: Option<&TypeInfo>,
    registry: &mut dyn SchemaRegistry,
    config: &ReaderConfig,
) -> Result<IndexMap<String, Response>> {
    let fallback_media = if produces.is_empty() {
        vec![config.response_wildcard_media_type.clone()]
    } else {
        produces.to_vec()
    };
    let return_type = return_type.filter(|t| !t.is_unit());

    let mut responses = IndexMap::new();
    if declared.is_empty() {
        let content = return_type
            .map(|t| content_map(&[], &fallback_media, Some(t), registry));
        responses.insert(
            "200".to_string(),
            Response {
                description: config.default_response_description.clone(),
                content,
            },
        );
        return Ok(responses);
    }

    for entry in declared {
        let key = entry.key();
        let description = entry
            .description
            .clone()
            .ok_or_else(|| ErrorKind::MissingResponseDescription { status: key.clone() })?;

        let content = if !entry.content.is_empty() || return_type.is_some() {
            Some(content_map(&entry.content, &fallback_media, return_type, registry))
        } else {
            None
        };

        debug!("Built response {}", key);
        if responses
            .insert(key.clone(), Response { description, content })
            .is_some()
        {
            warn!("Response {} declared more than once, keeping the last one", key);
        }
    }
    Ok(responses)
}
