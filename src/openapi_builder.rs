use crate::error::ErrorKind;
use crate::metadata::{HttpMethod, ParameterIn};
use crate::schema_generator::Schema;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// OpenAPI document builder
pub struct OpenApiBuilder {
    /// OpenAPI version written to the document header
    openapi: String,
    /// OpenAPI info section
    info: Info,
    /// Paths collection (URL path -> PathItem), in insertion order
    paths: IndexMap<String, PathItem>,
}

/// OpenAPI Info object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title
    pub title: String,
    /// API version
    pub version: String,
    /// API description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            title: "Generated API".to_string(),
            version: "1.0.0".to_string(),
            description: Some("API documentation generated from Rust code".to_string()),
        }
    }
}

/// OpenAPI PathItem object - represents all operations for a single path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Operation>,
}

impl PathItem {
    /// The operation in the slot for `method`
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Trace => self.trace.as_ref(),
        }
    }

    fn slot_mut(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Trace => &mut self.trace,
        }
    }

    /// Fill the slot for `method`; an occupied slot is left untouched and the
    /// rejected operation is handed back.
    pub fn set_operation(&mut self, method: HttpMethod, operation: Operation) -> Result<(), Operation> {
        let slot = self.slot_mut(method);
        if slot.is_some() {
            return Err(operation);
        }
        *slot = Some(operation);
        Ok(())
    }

    /// Occupied slots in slot order
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        HttpMethod::ALL
            .into_iter()
            .filter_map(move |method| self.operation(method).map(|op| (method, op)))
    }
}

/// OpenAPI Operation object - represents a single API operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "externalDocs", skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocumentation>,
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Parameters (path, query, header, cookie)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,
    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,
    /// Responses keyed by status code or `default`
    pub responses: IndexMap<String, Response>,
    /// Callbacks keyed by callback name; absent when none are declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callbacks: Option<IndexMap<String, Callback>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,
}

/// A callback: runtime expression -> path item of nested operations
pub type Callback = IndexMap<String, PathItem>;

/// OpenAPI Parameter object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    /// Parameter location (path, query, header, cookie)
    #[serde(rename = "in")]
    pub location: ParameterIn,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deprecated: bool,
    #[serde(rename = "allowEmptyValue", default, skip_serializing_if = "is_false")]
    pub allow_empty_value: bool,
    #[serde(rename = "allowReserved", default, skip_serializing_if = "is_false")]
    pub allow_reserved: bool,
    /// Inferred schema; never set together with `content`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, MediaType>>,
}

/// OpenAPI RequestBody object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Content types and their schemas
    pub content: IndexMap<String, MediaType>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
}

/// OpenAPI MediaType object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// OpenAPI Response object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, MediaType>>,
}

/// OpenAPI ExternalDocumentation object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalDocumentation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
}

/// OpenAPI Components object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Components {
    /// Schema definitions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemas: Option<IndexMap<String, Schema>>,
}

/// Complete OpenAPI document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: Info,
    pub paths: IndexMap<String, PathItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl OpenApiBuilder {
    /// Create a new OpenApiBuilder with default info
    pub fn new() -> Self {
        debug!("Initializing OpenApiBuilder");
        Self {
            openapi: "3.0.1".to_string(),
            info: Info::default(),
            paths: IndexMap::new(),
        }
    }

    /// Set custom info for the API
    pub fn with_info(mut self, info: Info) -> Self {
        self.info = info;
        self
    }

    /// Set the OpenAPI version written to the document
    pub fn with_openapi_version(mut self, version: impl Into<String>) -> Self {
        self.openapi = version.into();
        self
    }

    /// Insert an operation under an already normalized path.
    ///
    /// The first operation for a (path, verb) pair wins; a second one is
    /// rejected with `DuplicateOperation` and the document is left unchanged.
    pub fn insert_operation(
        &mut self,
        path: &str,
        method: HttpMethod,
        operation: Operation,
    ) -> Result<(), ErrorKind> {
        debug!("Adding operation: {} {}", method, path);
        let path_item = self.paths.entry(path.to_string()).or_default();
        path_item
            .set_operation(method, operation)
            .map_err(|_| ErrorKind::DuplicateOperation {
                path: path.to_string(),
                method,
            })
    }

    /// Number of distinct paths added so far
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Build the final OpenAPI document
    pub fn build(self, schemas: IndexMap<String, Schema>) -> OpenApiDocument {
        debug!("Building final OpenAPI document");

        let components = if !schemas.is_empty() {
            Some(Components {
                schemas: Some(schemas),
            })
        } else {
            None
        };

        OpenApiDocument {
            openapi: self.openapi,
            info: self.info,
            paths: self.paths,
            components,
        }
    }
}

impl Default for OpenApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}
