//! Declarative metadata attached to resource types, methods and arguments.
//!
//! Every field is optional: metadata sources are sparse and the reader supplies
//! defaults for whatever is absent. A `None` means "not declared here", which lets
//! the accessor keep looking further up the lookup chain.

use serde::{Deserialize, Serialize};

/// HTTP verbs an operation can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// All verbs in path-item slot order
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    /// Parse a verb marker such as `get` or `POST`
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker.to_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "put" => Some(HttpMethod::Put),
            "post" => Some(HttpMethod::Post),
            "delete" => Some(HttpMethod::Delete),
            "options" => Some(HttpMethod::Options),
            "head" => Some(HttpMethod::Head),
            "patch" => Some(HttpMethod::Patch),
            "trace" => Some(HttpMethod::Trace),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter value travels in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterIn {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterIn {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "path" => Some(ParameterIn::Path),
            "query" => Some(ParameterIn::Query),
            "header" => Some(ParameterIn::Header),
            "cookie" => Some(ParameterIn::Cookie),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterIn::Path => "path",
            ParameterIn::Query => "query",
            ParameterIn::Header => "header",
            ParameterIn::Cookie => "cookie",
        }
    }
}

/// Type information extracted from Rust code for schema generation.
///
/// Captures the base type name together with the `Option`/`Vec` wrappers the
/// schema registry needs to unwrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    /// The base type name (e.g., "String", "Pet", "i32")
    pub name: String,
    /// Whether this is a generic type with type parameters
    pub is_generic: bool,
    /// Generic type arguments (e.g., for `Vec<String>`, contains TypeInfo for String)
    pub generic_args: Vec<TypeInfo>,
    /// Whether this type is wrapped in `Option<T>`
    pub is_option: bool,
    /// Whether this type is a `Vec<T>` (array type)
    pub is_vec: bool,
}

const PRIMITIVE_NAMES: &[&str] = &[
    "String", "str", "i8", "i16", "i32", "i64", "i128", "isize", "u8", "u16", "u32", "u64",
    "u128", "usize", "f32", "f64", "bool", "char",
];

impl TypeInfo {
    /// Create a new TypeInfo for a simple type
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_generic: false,
            generic_args: Vec::new(),
            is_option: false,
            is_vec: false,
        }
    }

    /// Create a TypeInfo for an `Option<T>` type
    pub fn option(inner: TypeInfo) -> Self {
        Self {
            name: inner.name.clone(),
            is_generic: false,
            generic_args: vec![inner],
            is_option: true,
            is_vec: false,
        }
    }

    /// Create a TypeInfo for a `Vec<T>` type
    pub fn vec(inner: TypeInfo) -> Self {
        Self {
            name: inner.name.clone(),
            is_generic: false,
            generic_args: vec![inner],
            is_option: false,
            is_vec: true,
        }
    }

    /// The unit type `()`
    pub fn unit() -> Self {
        Self::new("()")
    }

    pub fn is_unit(&self) -> bool {
        self.name == "()" && !self.is_option && !self.is_vec
    }

    /// True for primitives and collections/options of primitives.
    ///
    /// Anything else is "complex" and may implicitly become a request body.
    pub fn is_simple(&self) -> bool {
        if self.is_option || self.is_vec {
            return self.generic_args.iter().all(TypeInfo::is_simple);
        }
        self.is_unit() || PRIMITIVE_NAMES.contains(&self.name.as_str())
    }

    /// Extract TypeInfo from a `syn::Type`, looking through references
    pub fn from_syn_type(ty: &syn::Type) -> Self {
        match ty {
            syn::Type::Path(type_path) => Self::from_syn_path(&type_path.path),
            syn::Type::Reference(reference) => Self::from_syn_type(&reference.elem),
            syn::Type::Paren(paren) => Self::from_syn_type(&paren.elem),
            syn::Type::Group(group) => Self::from_syn_type(&group.elem),
            syn::Type::Slice(slice) => Self::vec(Self::from_syn_type(&slice.elem)),
            syn::Type::Array(array) => Self::vec(Self::from_syn_type(&array.elem)),
            syn::Type::Tuple(tuple) if tuple.elems.is_empty() => Self::unit(),
            _ => Self::new("Unknown"),
        }
    }

    fn from_syn_path(path: &syn::Path) -> Self {
        let Some(segment) = path.segments.last() else {
            return Self::new("Unknown");
        };
        let type_name = segment.ident.to_string();

        let mut generic_args = Vec::new();
        if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
            for arg in &args.args {
                if let syn::GenericArgument::Type(inner_ty) = arg {
                    generic_args.push(Self::from_syn_type(inner_ty));
                }
            }
        }

        match (type_name.as_str(), generic_args.first()) {
            ("Option", Some(inner)) => Self::option(inner.clone()),
            ("Vec", Some(inner)) => Self::vec(inner.clone()),
            _ => Self {
                name: type_name,
                is_generic: !generic_args.is_empty(),
                generic_args,
                is_option: false,
                is_vec: false,
            },
        }
    }
}

/// Metadata attached to a resource type or a method.
///
/// The same shape is used at both levels; fields that only make sense on one
/// level are simply never populated on the other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    /// HTTP-verb marker (`#[get]`, `#[post]`, ...)
    pub http_method: Option<HttpMethod>,
    /// Base path (type) or path fragment (method)
    pub path: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub operation_id: Option<String>,
    pub deprecated: Option<bool>,
    /// Hidden operations are never documented
    pub hidden: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub external_docs: Option<ExternalDocsMeta>,
    pub produces: Option<Vec<String>>,
    pub consumes: Option<Vec<String>>,
    pub responses: Option<Vec<ApiResponseMeta>>,
    pub callbacks: Option<Vec<CallbackMeta>>,
    /// Explicit resource marker for types without a base path
    pub resource: bool,
}

/// Declared external documentation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalDocsMeta {
    pub description: Option<String>,
    pub url: Option<String>,
}

/// One media-type entry of a declared content map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentMeta {
    pub media_type: Option<String>,
    pub schema: Option<TypeInfo>,
}

/// One declared response entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponseMeta {
    /// Status code, or `None` for the `default` entry
    pub status: Option<String>,
    pub description: Option<String>,
    pub content: Vec<ContentMeta>,
}

impl ApiResponseMeta {
    /// Key of this entry in the responses map
    pub fn key(&self) -> String {
        self.status.clone().unwrap_or_else(|| "default".to_string())
    }
}

/// Declared request body metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBodyMeta {
    pub description: Option<String>,
    pub required: Option<bool>,
    pub content: Vec<ContentMeta>,
}

/// Declared parameter metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterMeta {
    pub name: Option<String>,
    pub location: Option<ParameterIn>,
    pub description: Option<String>,
    pub required: Option<bool>,
    pub deprecated: Option<bool>,
    pub allow_empty_value: Option<bool>,
    pub allow_reserved: Option<bool>,
    pub schema: Option<TypeInfo>,
    pub content: Vec<ContentMeta>,
}

/// Binding of an argument to a request location (`#[path_param("id")]`, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterBinding {
    pub location: ParameterIn,
    /// Explicit binding name, or the argument's own identifier
    pub name: Option<String>,
}

/// A callback group: a name, a runtime expression and the nested operations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallbackMeta {
    pub name: String,
    pub expression: Option<String>,
    pub operations: Vec<CallbackOperationMeta>,
}

/// A method-like declaration nested inside a callback group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallbackOperationMeta {
    /// Verb of the nested operation; POST when not declared
    pub method: Option<HttpMethod>,
    pub annotations: Annotations,
    pub parameters: Vec<ParameterMeta>,
    pub request_body: Option<RequestBodyMeta>,
}
