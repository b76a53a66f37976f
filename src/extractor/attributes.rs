//! Parsing of the inert metadata attributes placed on resource structs,
//! traits, methods and arguments.
//!
//! A malformed attribute is logged and skipped; it never aborts extraction.

use crate::metadata::{
    Annotations, ApiResponseMeta, CallbackMeta, CallbackOperationMeta, ContentMeta,
    ExternalDocsMeta, HttpMethod, ParameterBinding, ParameterIn, ParameterMeta, RequestBodyMeta,
    TypeInfo,
};
use log::{debug, warn};
use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::{Attribute, LitStr, Token};

/// Metadata carried by a single method argument
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgumentAttributes {
    pub binding: Option<ParameterBinding>,
    pub parameter: Option<ParameterMeta>,
    pub request_body: Option<RequestBodyMeta>,
    pub context: bool,
}

/// Parse type- or method-level metadata
pub fn parse_annotations(attrs: &[Attribute]) -> Annotations {
    let mut annotations = Annotations::default();
    let mut verb_path = None;

    for attr in attrs {
        let Some(ident) = attr.path().get_ident() else {
            continue;
        };
        let name = ident.to_string();
        let parsed = match name.as_str() {
            "path" => attr.parse_args::<LitStr>().map(|lit| {
                annotations.path = Some(lit.value());
            }),
            "resource" => {
                annotations.resource = true;
                Ok(())
            }
            "operation" => {
                let mut scratch = annotations.clone();
                attr.parse_nested_meta(|meta| operation_field(&mut scratch, &meta))
                    .map(|_| annotations = scratch)
            }
            "tags" => string_list_args(attr).map(|tags| {
                annotations.tags = Some(tags);
            }),
            "deprecated" => {
                annotations.deprecated = Some(true);
                Ok(())
            }
            "external_docs" => {
                let mut docs = ExternalDocsMeta::default();
                attr.parse_nested_meta(|meta| external_docs_field(&mut docs, &meta))
                    .map(|_| annotations.external_docs = Some(docs))
            }
            "produces" => string_list_args(attr).map(|media_types| {
                annotations.produces = Some(media_types);
            }),
            "consumes" => string_list_args(attr).map(|media_types| {
                annotations.consumes = Some(media_types);
            }),
            "api_response" => {
                let mut response = ApiResponseMeta::default();
                attr.parse_nested_meta(|meta| api_response_field(&mut response, &meta))
                    .map(|_| {
                        annotations.responses.get_or_insert_with(Vec::new).push(response);
                    })
            }
            "callback" => {
                let mut callback = CallbackMeta::default();
                attr.parse_nested_meta(|meta| callback_field(&mut callback, &meta))
                    .map(|_| {
                        annotations.callbacks.get_or_insert_with(Vec::new).push(callback);
                    })
            }
            _ => match HttpMethod::from_marker(&name) {
                Some(method) => parse_verb(attr, method, &mut annotations, &mut verb_path),
                None => Ok(()),
            },
        };

        if let Err(e) = parsed {
            warn!("Ignoring malformed #[{}] attribute: {}", name, e);
        }
    }

    if annotations.path.is_none() {
        annotations.path = verb_path;
    }
    annotations
}

/// Parse the superclass named by `#[extends(Base)]`
pub fn parse_superclass(attrs: &[Attribute]) -> Option<String> {
    let attr = attrs.iter().find(|a| a.path().is_ident("extends"))?;
    match attr.parse_args::<syn::Path>() {
        Ok(path) => path.segments.last().map(|s| s.ident.to_string()),
        Err(e) => {
            warn!("Ignoring malformed #[extends] attribute: {}", e);
            None
        }
    }
}

/// Parse the metadata of a method argument
pub fn parse_argument_attributes(attrs: &[Attribute]) -> ArgumentAttributes {
    let mut parsed_attrs = ArgumentAttributes::default();

    for attr in attrs {
        let Some(ident) = attr.path().get_ident() else {
            continue;
        };
        let name = ident.to_string();
        let location = match name.as_str() {
            "path_param" => Some(ParameterIn::Path),
            "query_param" => Some(ParameterIn::Query),
            "header_param" => Some(ParameterIn::Header),
            "cookie_param" => Some(ParameterIn::Cookie),
            _ => None,
        };

        let parsed = if let Some(location) = location {
            binding_name(attr).map(|name| {
                parsed_attrs.binding = Some(ParameterBinding { location, name });
            })
        } else {
            match name.as_str() {
                "parameter" => {
                    let mut parameter = ParameterMeta::default();
                    attr.parse_nested_meta(|meta| parameter_field(&mut parameter, &meta))
                        .map(|_| parsed_attrs.parameter = Some(parameter))
                }
                "request_body" => {
                    let mut body = RequestBodyMeta::default();
                    if matches!(attr.meta, syn::Meta::List(_)) {
                        attr.parse_nested_meta(|meta| request_body_field(&mut body, &meta))
                            .map(|_| parsed_attrs.request_body = Some(body))
                    } else {
                        parsed_attrs.request_body = Some(body);
                        Ok(())
                    }
                }
                "context" => {
                    parsed_attrs.context = true;
                    Ok(())
                }
                _ => Ok(()),
            }
        };

        if let Err(e) = parsed {
            warn!("Ignoring malformed #[{}] argument attribute: {}", name, e);
        }
    }

    parsed_attrs
}

/// `#[get]` or `#[get("/fragment")]`
fn parse_verb(
    attr: &Attribute,
    method: HttpMethod,
    annotations: &mut Annotations,
    verb_path: &mut Option<String>,
) -> syn::Result<()> {
    if let Some(existing) = annotations.http_method {
        warn!("Ignoring #[{}]: already marked {}", method.as_str().to_lowercase(), existing);
        return Ok(());
    }
    if let syn::Meta::List(_) = attr.meta {
        let lit: LitStr = attr.parse_args()?;
        *verb_path = Some(lit.value());
    }
    annotations.http_method = Some(method);
    Ok(())
}

/// `#[path_param]` binds the argument identifier, `#[path_param("id")]` an explicit name
fn binding_name(attr: &Attribute) -> syn::Result<Option<String>> {
    match attr.meta {
        syn::Meta::Path(_) => Ok(None),
        _ => attr.parse_args::<LitStr>().map(|lit| Some(lit.value())),
    }
}

fn operation_field(annotations: &mut Annotations, meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.path.is_ident("summary") {
        annotations.summary = Some(string_value(meta)?);
    } else if meta.path.is_ident("description") {
        annotations.description = Some(string_value(meta)?);
    } else if meta.path.is_ident("operation_id") {
        annotations.operation_id = Some(string_value(meta)?);
    } else if meta.path.is_ident("deprecated") {
        annotations.deprecated = Some(flag_value(meta)?);
    } else if meta.path.is_ident("hidden") {
        annotations.hidden = Some(flag_value(meta)?);
    } else if meta.path.is_ident("tags") {
        annotations.tags = Some(string_list(meta)?);
    } else {
        skip_unknown(meta)?;
    }
    Ok(())
}

fn external_docs_field(docs: &mut ExternalDocsMeta, meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.path.is_ident("description") {
        docs.description = Some(string_value(meta)?);
    } else if meta.path.is_ident("url") {
        docs.url = Some(string_value(meta)?);
    } else {
        skip_unknown(meta)?;
    }
    Ok(())
}

fn api_response_field(response: &mut ApiResponseMeta, meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.path.is_ident("status") || meta.path.is_ident("response_code") {
        response.status = status_value(meta)?;
    } else if meta.path.is_ident("description") {
        response.description = Some(string_value(meta)?);
    } else if meta.path.is_ident("content") {
        response.content.push(content(meta)?);
    } else {
        skip_unknown(meta)?;
    }
    Ok(())
}

fn request_body_field(body: &mut RequestBodyMeta, meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.path.is_ident("description") {
        body.description = Some(string_value(meta)?);
    } else if meta.path.is_ident("required") {
        body.required = Some(flag_value(meta)?);
    } else if meta.path.is_ident("content") {
        body.content.push(content(meta)?);
    } else {
        skip_unknown(meta)?;
    }
    Ok(())
}

fn parameter_field(parameter: &mut ParameterMeta, meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.path.is_ident("name") {
        parameter.name = Some(string_value(meta)?);
    } else if meta.path.is_ident("in") || meta.path.is_ident("location") {
        let value = string_value(meta)?;
        let location = ParameterIn::parse(&value)
            .ok_or_else(|| meta.error(format!("unknown parameter location `{}`", value)))?;
        parameter.location = Some(location);
    } else if meta.path.is_ident("description") {
        parameter.description = Some(string_value(meta)?);
    } else if meta.path.is_ident("required") {
        parameter.required = Some(flag_value(meta)?);
    } else if meta.path.is_ident("deprecated") {
        parameter.deprecated = Some(flag_value(meta)?);
    } else if meta.path.is_ident("allow_empty_value") {
        parameter.allow_empty_value = Some(flag_value(meta)?);
    } else if meta.path.is_ident("allow_reserved") {
        parameter.allow_reserved = Some(flag_value(meta)?);
    } else if meta.path.is_ident("schema") {
        parameter.schema = Some(schema_value(meta)?);
    } else if meta.path.is_ident("content") {
        parameter.content.push(content(meta)?);
    } else {
        skip_unknown(meta)?;
    }
    Ok(())
}

fn callback_field(callback: &mut CallbackMeta, meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.path.is_ident("name") {
        callback.name = string_value(meta)?;
    } else if meta.path.is_ident("expression") || meta.path.is_ident("callback_url_expression") {
        callback.expression = Some(string_value(meta)?);
    } else if meta.path.is_ident("operation") {
        let mut operation = CallbackOperationMeta::default();
        meta.parse_nested_meta(|inner| callback_operation_field(&mut operation, &inner))?;
        callback.operations.push(operation);
    } else {
        skip_unknown(meta)?;
    }
    Ok(())
}

/// Fields of an operation nested in a callback; `callback(..)` recurses
fn callback_operation_field(
    operation: &mut CallbackOperationMeta,
    meta: &ParseNestedMeta,
) -> syn::Result<()> {
    let annotations = &mut operation.annotations;
    if meta.path.is_ident("method") {
        let value = string_or_ident(meta)?;
        let method = HttpMethod::from_marker(&value)
            .ok_or_else(|| meta.error(format!("unknown HTTP method `{}`", value)))?;
        operation.method = Some(method);
    } else if meta.path.is_ident("parameter") {
        let mut parameter = ParameterMeta::default();
        meta.parse_nested_meta(|inner| parameter_field(&mut parameter, &inner))?;
        operation.parameters.push(parameter);
    } else if meta.path.is_ident("request_body") {
        let mut body = RequestBodyMeta::default();
        meta.parse_nested_meta(|inner| request_body_field(&mut body, &inner))?;
        operation.request_body = Some(body);
    } else if meta.path.is_ident("api_response") {
        let mut response = ApiResponseMeta::default();
        meta.parse_nested_meta(|inner| api_response_field(&mut response, &inner))?;
        annotations.responses.get_or_insert_with(Vec::new).push(response);
    } else if meta.path.is_ident("callback") {
        let mut callback = CallbackMeta::default();
        meta.parse_nested_meta(|inner| callback_field(&mut callback, &inner))?;
        annotations.callbacks.get_or_insert_with(Vec::new).push(callback);
    } else if meta.path.is_ident("external_docs") {
        let mut docs = ExternalDocsMeta::default();
        meta.parse_nested_meta(|inner| external_docs_field(&mut docs, &inner))?;
        annotations.external_docs = Some(docs);
    } else if meta.path.is_ident("produces") {
        annotations.produces = Some(string_list(meta)?);
    } else if meta.path.is_ident("consumes") {
        annotations.consumes = Some(string_list(meta)?);
    } else {
        operation_field(annotations, meta)?;
    }
    Ok(())
}

/// `content(media_type = "..", schema = Type)`
fn content(meta: &ParseNestedMeta) -> syn::Result<ContentMeta> {
    let mut content = ContentMeta::default();
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("media_type") {
            content.media_type = Some(string_value(&inner)?);
        } else if inner.path.is_ident("schema") {
            content.schema = Some(schema_value(&inner)?);
        } else {
            skip_unknown(&inner)?;
        }
        Ok(())
    })?;
    Ok(content)
}

fn string_value(meta: &ParseNestedMeta) -> syn::Result<String> {
    let lit: LitStr = meta.value()?.parse()?;
    Ok(lit.value())
}

/// A bare key means `true`; `key = false` is spelled out
fn flag_value(meta: &ParseNestedMeta) -> syn::Result<bool> {
    if meta.input.peek(Token![=]) {
        let lit: syn::LitBool = meta.value()?.parse()?;
        Ok(lit.value)
    } else {
        Ok(true)
    }
}

/// `status = 200` or `status = "200"`; `"default"` selects the default entry
fn status_value(meta: &ParseNestedMeta) -> syn::Result<Option<String>> {
    let status = match meta.value()?.parse::<syn::Lit>()? {
        syn::Lit::Int(lit) => lit.base10_digits().to_string(),
        syn::Lit::Str(lit) => lit.value(),
        other => return Err(syn::Error::new(other.span(), "expected a status code")),
    };
    Ok(if status == "default" { None } else { Some(status) })
}

/// `schema = Type` or `schema = "Type"`
fn schema_value(meta: &ParseNestedMeta) -> syn::Result<TypeInfo> {
    let value = meta.value()?;
    let ty: syn::Type = if value.peek(LitStr) {
        let lit: LitStr = value.parse()?;
        lit.parse()?
    } else {
        value.parse()?
    };
    Ok(TypeInfo::from_syn_type(&ty))
}

/// `method = "post"` or `method = post`
fn string_or_ident(meta: &ParseNestedMeta) -> syn::Result<String> {
    let value = meta.value()?;
    if value.peek(LitStr) {
        let lit: LitStr = value.parse()?;
        Ok(lit.value())
    } else {
        let ident: syn::Ident = value.parse()?;
        Ok(ident.to_string())
    }
}

/// `key("a", "b")` inside a nested list
fn string_list(meta: &ParseNestedMeta) -> syn::Result<Vec<String>> {
    let content;
    syn::parenthesized!(content in meta.input);
    let list = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
    Ok(list.into_iter().map(|lit| lit.value()).collect())
}

/// `#[attr("a", "b")]`
fn string_list_args(attr: &Attribute) -> syn::Result<Vec<String>> {
    let list = attr.parse_args_with(Punctuated::<LitStr, Token![,]>::parse_terminated)?;
    Ok(list.into_iter().map(|lit| lit.value()).collect())
}

/// Consume the value of a key we do not understand
fn skip_unknown(meta: &ParseNestedMeta) -> syn::Result<()> {
    debug!(
        "Ignoring unknown metadata key `{}`",
        meta.path
            .get_ident()
            .map(|i| i.to_string())
            .unwrap_or_default()
    );
    if meta.input.peek(Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_unknown(&inner))?;
    }
    Ok(())
}
