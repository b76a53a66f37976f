//! Building a single parameter from declaration metadata and its binding.

use super::content::content_map;
use crate::config::ReaderConfig;
use crate::error::{ErrorKind, Result};
use crate::metadata::{ParameterBinding, ParameterIn, ParameterMeta, TypeInfo};
use crate::openapi_builder::Parameter;
use crate::resource::Argument;
use crate::schema_generator::SchemaRegistry;
use log::debug;

/// Metadata a parameter is built from
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterSource<'a> {
    pub meta: Option<&'a ParameterMeta>,
    pub binding: Option<&'a ParameterBinding>,
    /// Type of the bound value, when the parameter comes from an argument
    pub value_type: Option<&'a TypeInfo>,
    pub argument_name: Option<&'a str>,
}

impl<'a> ParameterSource<'a> {
    /// A parameter declared without an argument (callback declarations)
    pub fn declared(meta: &'a ParameterMeta) -> Self {
        Self {
            meta: Some(meta),
            ..Default::default()
        }
    }

    /// The parameter carried by `argument`, if it has parameter metadata
    pub fn from_argument(argument: &'a Argument) -> Option<Self> {
        if argument.binding.is_none() && argument.parameter.is_none() {
            return None;
        }
        Some(Self {
            meta: argument.parameter.as_ref(),
            binding: argument.binding.as_ref(),
            value_type: Some(&argument.type_info),
            argument_name: argument.name.as_deref(),
        })
    }

    /// Declared name, else the binding name (a bare binding marker binds
    /// the argument's own identifier)
    fn name(&self) -> Option<&'a str> {
        self.meta
            .and_then(|meta| meta.name.as_deref())
            .or_else(|| {
                let binding = self.binding?;
                binding.name.as_deref().or(self.argument_name)
            })
    }

    fn location(&self) -> ParameterIn {
        self.meta
            .and_then(|meta| meta.location)
            .or_else(|| self.binding.map(|binding| binding.location))
            .unwrap_or(ParameterIn::Query)
    }
}

/// Build a parameter.
///
/// Path parameters are always required. Declared content replaces the
/// inferred schema; the two never appear together.
pub fn build_parameter(
    source: &ParameterSource,
    registry: &mut dyn SchemaRegistry,
    config: &ReaderConfig,
) -> Result<Parameter> {
    let name = source.name().ok_or_else(|| ErrorKind::MissingParameterName {
        argument: source.argument_name.map(str::to_string),
    })?;
    let location = source.location();
    let meta = source.meta;
    let flag = |field: fn(&ParameterMeta) -> Option<bool>| meta.and_then(field).unwrap_or(false);

    let required = location == ParameterIn::Path || flag(|m| m.required);
    let declared_schema = meta.and_then(|m| m.schema.as_ref());
    let declared_content = meta.map(|m| m.content.as_slice()).unwrap_or(&[]);

    let (schema, content) = if declared_content.is_empty() {
        let schema = declared_schema
            .or(source.value_type)
            .map(|type_info| registry.register_or_reference(type_info));
        (schema, None)
    } else {
        let fallback = [config.response_wildcard_media_type.clone()];
        let fallback_type = declared_schema.or(source.value_type);
        (None, Some(content_map(declared_content, &fallback, fallback_type, registry)))
    };

    debug!("Built {} parameter {}", location.as_str(), name);
    Ok(Parameter {
        name: name.to_string(),
        location,
        description: meta.and_then(|m| m.description.clone()),
        required,
        deprecated: flag(|m| m.deprecated),
        allow_empty_value: flag(|m| m.allow_empty_value),
        allow_reserved: flag(|m| m.allow_reserved),
        schema,
        content,
    })
}
