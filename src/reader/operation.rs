//! Assembling one operation from everything declared for it.
//!
//! Resource methods and callback declarations go through the same
//! [`OperationAssembler::assemble_declaration`] entry point; callbacks recurse
//! into it with an increasing depth.

use super::callbacks::build_callbacks;
use super::parameters::{build_parameter, ParameterSource};
use super::request_body::build_request_body;
use super::responses::build_responses;
use crate::accessor::{ClassChain, MethodChain};
use crate::config::ReaderConfig;
use crate::error::Result;
use crate::metadata::{
    Annotations, ApiResponseMeta, CallbackMeta, CallbackOperationMeta, ExternalDocsMeta,
    HttpMethod, RequestBodyMeta, TypeInfo,
};
use crate::openapi_builder::{ExternalDocumentation, Operation};
use crate::resource::Argument;
use crate::schema_generator::SchemaRegistry;
use log::{debug, warn};

/// Everything an operation is assembled from, already resolved along the
/// lookup chains.
#[derive(Debug, Default)]
pub struct Declaration<'a> {
    pub operation_id: Option<&'a str>,
    pub summary: Option<&'a str>,
    pub description: Option<&'a str>,
    pub deprecated: bool,
    pub tags: Vec<String>,
    pub external_docs: Option<&'a ExternalDocsMeta>,
    pub parameters: Vec<ParameterSource<'a>>,
    pub request_body: Option<BodySource<'a>>,
    pub responses: &'a [ApiResponseMeta],
    /// Type returned by the method, used for responses without a schema
    pub return_type: Option<&'a TypeInfo>,
    pub produces: &'a [String],
    pub callbacks: &'a [CallbackMeta],
}

/// Where a request body comes from
#[derive(Debug, Clone, Copy)]
pub struct BodySource<'a> {
    /// `None` for an implicit body
    pub meta: Option<&'a RequestBodyMeta>,
    pub body_type: Option<&'a TypeInfo>,
    pub consumes: &'a [String],
}

/// Turns declarations into operations.
pub struct OperationAssembler<'c> {
    config: &'c ReaderConfig,
}

impl<'c> OperationAssembler<'c> {
    pub fn new(config: &'c ReaderConfig) -> Self {
        Self { config }
    }

    /// Assemble the operation of a resource method.
    ///
    /// Returns `None` when the method carries no HTTP-verb marker or is hidden.
    pub fn assemble(
        &self,
        class_chain: &ClassChain,
        method_chain: &MethodChain,
        registry: &mut dyn SchemaRegistry,
    ) -> Result<Option<(HttpMethod, Operation)>> {
        let Some(http_method) = method_chain.resolve(|a| a.http_method) else {
            return Ok(None);
        };
        let method = method_chain.method();
        if method_chain.resolve(|a| a.hidden).unwrap_or(false) {
            debug!("Skipping hidden method {}", method.name);
            return Ok(None);
        }

        let declaration = Self::method_declaration(class_chain, method_chain);
        let operation = self.assemble_declaration(&declaration, registry, 0)?;
        Ok(Some((http_method, operation)))
    }

    /// Assemble an operation nested in a callback group.
    ///
    /// Returns the verb (POST when undeclared) and the operation, or `None`
    /// when the declaration is hidden.
    pub fn assemble_callback_operation(
        &self,
        declared: &CallbackOperationMeta,
        registry: &mut dyn SchemaRegistry,
        depth: usize,
    ) -> Result<Option<(HttpMethod, Operation)>> {
        if declared.annotations.hidden.unwrap_or(false) {
            return Ok(None);
        }
        let http_method = declared.method.unwrap_or(HttpMethod::Post);
        let declaration = Self::callback_declaration(declared);
        let operation = self.assemble_declaration(&declaration, registry, depth)?;
        Ok(Some((http_method, operation)))
    }

    /// Shared assembly for top-level and nested operations
    pub fn assemble_declaration(
        &self,
        declaration: &Declaration,
        registry: &mut dyn SchemaRegistry,
        depth: usize,
    ) -> Result<Operation> {
        let parameters = declaration
            .parameters
            .iter()
            .map(|source| build_parameter(source, registry, self.config))
            .collect::<Result<Vec<_>>>()?;

        let request_body = declaration.request_body.map(|body| {
            build_request_body(body.meta, body.body_type, body.consumes, registry, self.config)
        });

        let responses = build_responses(
            declaration.responses,
            declaration.produces,
            declaration.return_type,
            registry,
            self.config,
        )?;

        let callbacks = if declaration.callbacks.is_empty() {
            None
        } else {
            Some(build_callbacks(self, declaration.callbacks, registry, depth + 1)?)
        };

        Ok(Operation {
            tags: declaration.tags.clone(),
            summary: declaration.summary.map(str::to_string),
            description: declaration.description.map(str::to_string),
            external_docs: declaration.external_docs.and_then(external_docs),
            operation_id: declaration.operation_id.map(str::to_string),
            parameters,
            request_body,
            responses,
            callbacks,
            deprecated: declaration.deprecated,
        })
    }

    fn method_declaration<'a>(
        class_chain: &ClassChain<'a>,
        method_chain: &MethodChain<'a>,
    ) -> Declaration<'a> {
        let method = method_chain.method();

        let deprecated = method_chain.resolve(|a| a.deprecated).unwrap_or(false)
            || class_chain.resolve(|a| a.deprecated).unwrap_or(false);

        let mut tags: Vec<String> = Vec::new();
        let class_tags = class_chain.resolve(|a| a.tags.as_ref());
        let method_tags = method_chain.resolve(|a| a.tags.as_ref());
        for tag in class_tags.into_iter().chain(method_tags).flatten() {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }

        let consumes = method_chain
            .resolve(|a| a.consumes.as_deref())
            .or_else(|| class_chain.resolve(|a| a.consumes.as_deref()))
            .unwrap_or(&[]);
        let produces = method_chain
            .resolve(|a| a.produces.as_deref())
            .or_else(|| class_chain.resolve(|a| a.produces.as_deref()))
            .unwrap_or(&[]);

        let arguments: Vec<&'a Argument> = (0..method.arguments.len())
            .filter_map(|index| method_chain.argument(index))
            .collect();
        let (parameters, request_body) =
            Self::classify_arguments(&method.name, &arguments, consumes);

        Declaration {
            operation_id: Some(
                method_chain
                    .resolve(|a| a.operation_id.as_deref())
                    .unwrap_or(method.name.as_str()),
            ),
            summary: method_chain.resolve(|a| a.summary.as_deref()),
            description: method_chain.resolve(|a| a.description.as_deref()),
            deprecated,
            tags,
            external_docs: method_chain
                .resolve(linked_docs)
                .or_else(|| class_chain.resolve(linked_docs)),
            parameters,
            request_body,
            responses: method_chain
                .resolve(|a| a.responses.as_deref())
                .unwrap_or(&[]),
            return_type: method.return_type.as_ref(),
            produces,
            callbacks: method_chain
                .resolve(|a| a.callbacks.as_deref())
                .unwrap_or(&[]),
        }
    }

    /// Split arguments into parameters and at most one request body.
    ///
    /// An argument with parameter metadata is a parameter even if it also
    /// declares a body. Without an explicit body, a single un-annotated
    /// argument of a complex type becomes the implicit body.
    fn classify_arguments<'a>(
        method_name: &str,
        arguments: &[&'a Argument],
        consumes: &'a [String],
    ) -> (Vec<ParameterSource<'a>>, Option<BodySource<'a>>) {
        let mut parameters = Vec::new();
        let mut request_body: Option<BodySource<'a>> = None;
        let mut implicit = Vec::new();

        for &argument in arguments {
            if argument.context {
                continue;
            }
            if let Some(source) = ParameterSource::from_argument(argument) {
                if argument.request_body.is_some() {
                    warn!(
                        "Argument {:?} of {} is both a parameter and a request body, using it as a parameter",
                        argument.name, method_name
                    );
                }
                parameters.push(source);
            } else if let Some(meta) = &argument.request_body {
                if request_body.is_some() {
                    warn!("{} declares more than one request body, keeping the first", method_name);
                    continue;
                }
                request_body = Some(BodySource {
                    meta: Some(meta),
                    body_type: Some(&argument.type_info),
                    consumes,
                });
            } else if !argument.type_info.is_simple() {
                implicit.push(argument);
            }
        }

        if request_body.is_none() {
            match implicit[..] {
                [argument] => {
                    request_body = Some(BodySource {
                        meta: None,
                        body_type: Some(&argument.type_info),
                        consumes,
                    });
                }
                [] => {}
                _ => debug!(
                    "{} has {} un-annotated complex arguments, none becomes the request body",
                    method_name,
                    implicit.len()
                ),
            }
        }

        (parameters, request_body)
    }

    fn callback_declaration(declared: &CallbackOperationMeta) -> Declaration<'_> {
        let annotations = &declared.annotations;
        Declaration {
            operation_id: annotations.operation_id.as_deref(),
            summary: annotations.summary.as_deref(),
            description: annotations.description.as_deref(),
            deprecated: annotations.deprecated.unwrap_or(false),
            tags: annotations.tags.clone().unwrap_or_default(),
            external_docs: annotations.external_docs.as_ref(),
            parameters: declared
                .parameters
                .iter()
                .map(ParameterSource::declared)
                .collect(),
            request_body: declared.request_body.as_ref().map(|meta| BodySource {
                meta: Some(meta),
                body_type: None,
                consumes: annotations.consumes.as_deref().unwrap_or(&[]),
            }),
            responses: annotations.responses.as_deref().unwrap_or(&[]),
            return_type: None,
            produces: annotations.produces.as_deref().unwrap_or(&[]),
            callbacks: annotations.callbacks.as_deref().unwrap_or(&[]),
        }
    }
}

/// Declared external docs that carry a url; others are skipped by the lookup
fn linked_docs(annotations: &Annotations) -> Option<&ExternalDocsMeta> {
    annotations
        .external_docs
        .as_ref()
        .filter(|docs| docs.url.is_some())
}

/// External docs need a url; a declaration without one is dropped
fn external_docs(declared: &ExternalDocsMeta) -> Option<ExternalDocumentation> {
    match &declared.url {
        Some(url) => Some(ExternalDocumentation {
            description: declared.description.clone(),
            url: url.clone(),
        }),
        None => {
            warn!("Ignoring external docs without a url");
            None
        }
    }
}
