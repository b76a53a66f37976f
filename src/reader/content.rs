//! Media-type keyed content maps shared by parameters, request bodies and responses.

use crate::metadata::{ContentMeta, TypeInfo};
use crate::openapi_builder::MediaType;
use crate::schema_generator::SchemaRegistry;
use indexmap::IndexMap;

/// Build a content map from declared entries.
///
/// An entry without a media type is keyed by every fallback media type; an
/// entry without a schema uses `fallback_type`. An empty `entries` slice is
/// treated as one entry that declares neither.
pub fn content_map(
    entries: &[ContentMeta],
    fallback_media: &[String],
    fallback_type: Option<&TypeInfo>,
    registry: &mut dyn SchemaRegistry,
) -> IndexMap<String, MediaType> {
    let implicit = [ContentMeta::default()];
    let entries = if entries.is_empty() { &implicit[..] } else { entries };

    let mut content = IndexMap::new();
    for entry in entries {
        let schema = entry
            .schema
            .as_ref()
            .or(fallback_type)
            .map(|type_info| registry.register_or_reference(type_info));

        let media_types = match &entry.media_type {
            Some(media_type) => std::slice::from_ref(media_type),
            None => fallback_media,
        };
        for media_type in media_types {
            content.insert(
                media_type.clone(),
                MediaType {
                    schema: schema.clone(),
                },
            );
        }
    }
    content
}

/// `declared` when it names at least one media type, else the single `fallback`
pub fn media_types_or(declared: Option<&[String]>, fallback: &str) -> Vec<String> {
    match declared {
        Some(media_types) if !media_types.is_empty() => media_types.to_vec(),
        _ => vec![fallback.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema_generator::{Schema, SchemaGenerator};
    use crate::type_resolver::TypeResolver;

    fn registry() -> SchemaGenerator {
        SchemaGenerator::new(TypeResolver::new(&[]))
    }

    #[test]
    fn test_entry_media_type_wins() {
        let entries = vec![ContentMeta {
            media_type: Some("application/xml".to_string()),
            schema: Some(TypeInfo::new("String")),
        }];
        let fallback = vec!["application/json".to_string()];
        let content = content_map(&entries, &fallback, None, &mut registry());
        assert_eq!(content.keys().collect::<Vec<_>>(), vec!["application/xml"]);
        assert_eq!(
            content["application/xml"].schema,
            Some(Schema::of_type("string", None))
        );
    }

    #[test]
    fn test_implicit_entry_uses_fallbacks() {
        let fallback = vec!["application/json".to_string(), "text/plain".to_string()];
        let content = content_map(&[], &fallback, Some(&TypeInfo::new("bool")), &mut registry());
        assert_eq!(content.len(), 2);
        assert!(content["text/plain"].schema.is_some());
    }

    #[test]
    fn test_entry_without_schema_or_type() {
        let fallback = vec!["*/*".to_string()];
        let content = content_map(&[], &fallback, None, &mut registry());
        assert!(content["*/*"].schema.is_none());
    }

    #[test]
    fn test_media_types_or() {
        assert_eq!(media_types_or(None, "*/*"), vec!["*/*"]);
        assert_eq!(media_types_or(Some(&[]), "*/*"), vec!["*/*"]);
        let declared = vec!["text/plain".to_string()];
        assert_eq!(media_types_or(Some(&declared), "*/*"), vec!["text/plain"]);
    }
}
