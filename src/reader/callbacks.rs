//! Building callback groups: name -> expression -> nested path item.

use super::operation::OperationAssembler;
use crate::error::{ErrorKind, Result};
use crate::metadata::CallbackMeta;
use crate::openapi_builder::{Callback, PathItem};
use crate::schema_generator::SchemaRegistry;
use indexmap::IndexMap;
use log::debug;

/// Build the callbacks of an operation.
///
/// Each group becomes a path item keyed by its expression (or its name when no
/// expression is declared); nested operations go into the slot of their verb.
/// Groups sharing a name are merged into one callback.
pub fn build_callbacks(
    assembler: &OperationAssembler,
    groups: &[CallbackMeta],
    registry: &mut dyn SchemaRegistry,
    depth: usize,
) -> Result<IndexMap<String, Callback>> {
    let mut callbacks: IndexMap<String, Callback> = IndexMap::new();

    for group in groups {
        let expression = group.expression.as_deref().unwrap_or(&group.name);
        debug!(
            "Building callback {} ({}) at depth {}",
            group.name, expression, depth
        );

        let path_item = callbacks
            .entry(group.name.clone())
            .or_default()
            .entry(expression.to_string())
            .or_insert_with(PathItem::default);

        for declared in &group.operations {
            let Some((method, operation)) =
                assembler.assemble_callback_operation(declared, registry, depth)?
            else {
                continue;
            };
            path_item
                .set_operation(method, operation)
                .map_err(|_| ErrorKind::DuplicateOperation {
                    path: expression.to_string(),
                    method,
                })?;
        }
    }

    Ok(callbacks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReaderConfig;
    use crate::metadata::{
        Annotations, ApiResponseMeta, CallbackOperationMeta, HttpMethod, ParameterIn,
        ParameterMeta,
    };
    use crate::schema_generator::SchemaGenerator;
    use crate::type_resolver::TypeResolver;

    fn registry() -> SchemaGenerator {
        SchemaGenerator::new(TypeResolver::new(&[]))
    }

    fn subscription() -> CallbackMeta {
        CallbackMeta {
            name: "subscription".to_string(),
            expression: None,
            operations: vec![CallbackOperationMeta {
                method: Some(HttpMethod::Post),
                annotations: Annotations {
                    description: Some("payload data will be sent".to_string()),
                    ..Default::default()
                },
                parameters: vec![ParameterMeta {
                    name: Some("subscriptionId".to_string()),
                    location: Some(ParameterIn::Path),
                    ..Default::default()
                }],
                request_body: None,
            }],
        }
    }

    #[test]
    fn test_callback_keyed_by_name_without_expression() {
        let config = ReaderConfig::default();
        let assembler = OperationAssembler::new(&config);
        let callbacks = build_callbacks(&assembler, &[subscription()], &mut registry(), 1).unwrap();

        let path_item = &callbacks["subscription"]["subscription"];
        let post = path_item.post.as_ref().unwrap();
        assert_eq!(post.description.as_deref(), Some("payload data will be sent"));
        assert_eq!(post.parameters.len(), 1);
        assert!(post.parameters[0].required);
        assert!(post.responses.contains_key("200"));
    }

    #[test]
    fn test_nested_callbacks_recurse() {
        let mut outer = subscription();
        outer.expression = Some("{$request.body#/callbackUrl}".to_string());
        outer.operations[0].method = None;
        outer.operations[0].annotations.callbacks = Some(vec![CallbackMeta {
            name: "ack".to_string(),
            expression: Some("{$request.body#/ackUrl}".to_string()),
            operations: vec![CallbackOperationMeta {
                method: Some(HttpMethod::Put),
                ..Default::default()
            }],
        }]);

        let config = ReaderConfig::default();
        let assembler = OperationAssembler::new(&config);
        let callbacks = build_callbacks(&assembler, &[outer], &mut registry(), 1).unwrap();

        let post = callbacks["subscription"]["{$request.body#/callbackUrl}"]
            .post
            .as_ref()
            .unwrap();
        let nested = post.callbacks.as_ref().unwrap();
        assert!(nested["ack"]["{$request.body#/ackUrl}"].put.is_some());
    }

    #[test]
    fn test_nested_failure_propagates() {
        let mut group = subscription();
        group.operations[0].annotations.responses = Some(vec![ApiResponseMeta {
            status: Some("200".to_string()),
            ..Default::default()
        }]);
        let config = ReaderConfig::default();
        let assembler = OperationAssembler::new(&config);
        let err = build_callbacks(&assembler, &[group], &mut registry(), 1).unwrap_err();
        assert!(matches!(err, ErrorKind::MissingResponseDescription { .. }));
    }

    #[test]
    fn test_duplicate_verb_in_callback() {
        let mut group = subscription();
        group.operations.push(group.operations[0].clone());
        let config = ReaderConfig::default();
        let assembler = OperationAssembler::new(&config);
        let err = build_callbacks(&assembler, &[group], &mut registry(), 1).unwrap_err();
        assert_eq!(
            err,
            ErrorKind::DuplicateOperation {
                path: "subscription".to_string(),
                method: HttpMethod::Post,
            }
        );
    }
}
