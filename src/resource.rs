//! Resource model consumed by the reader.
//!
//! A resource type is a struct (the "class") or a trait (a capability-contract
//! implemented by structs). The reader never inspects Rust code directly; it only
//! sees this model through the [`MetadataProvider`] trait.

use crate::metadata::{Annotations, ParameterBinding, ParameterMeta, RequestBodyMeta, TypeInfo};
use log::debug;
use std::collections::HashMap;

/// Whether a resource type is a concrete struct or a trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Struct,
    Trait,
}

/// A type carrying class-level metadata and an ordered list of methods.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceType {
    pub name: String,
    pub kind: ResourceKind,
    pub annotations: Annotations,
    /// Name of the superclass (`#[extends(Base)]`)
    pub superclass: Option<String>,
    /// Implemented traits (or supertraits), in declaration order
    pub interfaces: Vec<String>,
    pub methods: Vec<ResourceMethod>,
    /// Whether the type is a scan candidate
    pub candidate: bool,
}

impl ResourceType {
    pub fn new(name: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            name: name.into(),
            kind,
            annotations: Annotations::default(),
            superclass: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            candidate: false,
        }
    }

    /// Find a method by name and arity
    pub fn find_method(&self, name: &str, arity: usize) -> Option<&ResourceMethod> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.arguments.len() == arity)
    }
}

/// A method of a resource type.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceMethod {
    pub name: String,
    pub annotations: Annotations,
    pub arguments: Vec<Argument>,
    /// Declared return type, `None` for unit
    pub return_type: Option<TypeInfo>,
    /// Whether the method has a body; only trait methods can lack one
    pub has_body: bool,
}

impl ResourceMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Annotations::default(),
            arguments: Vec::new(),
            return_type: None,
            has_body: false,
        }
    }
}

/// A typed method argument with its own metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// Identifier of the argument; `None` for `_` and destructuring patterns
    pub name: Option<String>,
    pub type_info: TypeInfo,
    pub binding: Option<ParameterBinding>,
    pub parameter: Option<ParameterMeta>,
    pub request_body: Option<RequestBodyMeta>,
    /// Injected context argument, never documented
    pub context: bool,
}

impl Argument {
    pub fn new(name: Option<String>, type_info: TypeInfo) -> Self {
        Self {
            name,
            type_info,
            binding: None,
            parameter: None,
            request_body: None,
            context: false,
        }
    }

    /// Whether any metadata at all is attached to this argument
    pub fn has_metadata(&self) -> bool {
        self.binding.is_some()
            || self.parameter.is_some()
            || self.request_body.is_some()
            || self.context
    }
}

/// Source of resource types for the reader.
pub trait MetadataProvider {
    /// Candidate resource types, in the order they should be scanned
    fn candidates(&self) -> Vec<&ResourceType>;

    /// Look up any known type (candidate or not) by name
    fn lookup(&self, name: &str) -> Option<&ResourceType>;
}

/// In-memory collection of resource types, preserving insertion order.
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    types: Vec<ResourceType>,
    index: HashMap<String, usize>,
}

impl ResourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a type; a later type with the same name replaces the earlier one in place
    pub fn insert(&mut self, resource: ResourceType) {
        if let Some(&idx) = self.index.get(&resource.name) {
            debug!("Replacing resource type {}", resource.name);
            self.types[idx] = resource;
        } else {
            self.index.insert(resource.name.clone(), self.types.len());
            self.types.push(resource);
        }
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut ResourceType> {
        let idx = *self.index.get(name)?;
        self.types.get_mut(idx)
    }

    pub fn types(&self) -> &[ResourceType] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl MetadataProvider for ResourceCatalog {
    fn candidates(&self) -> Vec<&ResourceType> {
        self.types
            .iter()
            .filter(|t| t.kind == ResourceKind::Struct && t.candidate)
            .collect()
    }

    fn lookup(&self, name: &str) -> Option<&ResourceType> {
        self.index.get(name).and_then(|&idx| self.types.get(idx))
    }
}
