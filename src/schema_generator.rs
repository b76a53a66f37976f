//! Schema registry: turns data-model types into schemas and collects the named
//! definitions that end up under `components/schemas`.

use crate::metadata::TypeInfo;
use crate::type_resolver::{PrimitiveType, TypeKind, TypeResolver};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// OpenAPI Schema definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// The type of the schema (string, integer, object, array, etc.)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    /// Format for primitive types (e.g., "int32", "int64", "float", "double")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Properties for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
    /// Required field names for object types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Items schema for array types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Enum values for enum types
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Reference to another schema
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Schema {
    pub fn of_type(schema_type: &str, format: Option<&str>) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            format: format.map(str::to_string),
            ..Default::default()
        }
    }

    /// Untyped placeholder used for anything the registry cannot describe
    pub fn opaque() -> Self {
        Self::of_type("object", None)
    }

    pub fn array(items: Schema) -> Self {
        Self {
            schema_type: Some("array".to_string()),
            items: Some(Box::new(items)),
            ..Default::default()
        }
    }

    pub fn reference(name: &str) -> Self {
        Self {
            reference: Some(format!("#/components/schemas/{}", name)),
            ..Default::default()
        }
    }
}

/// Shared registry of schema definitions.
///
/// Registration is idempotent per type name and never fails: unknown types
/// degrade to [`Schema::opaque`].
pub trait SchemaRegistry {
    /// Register `type_info` (if it is a named model) and return the schema to
    /// embed at the use site: a reference for models, an inline schema otherwise.
    fn register_or_reference(&mut self, type_info: &TypeInfo) -> Schema;

    /// Snapshot of all named definitions registered so far
    fn schemas(&self) -> IndexMap<String, Schema>;
}

/// Schema generator - converts Rust data-model types to OpenAPI schemas
pub struct SchemaGenerator {
    /// Type resolver for looking up type definitions
    type_resolver: TypeResolver,
    /// Named definitions, in registration order
    schemas: IndexMap<String, Schema>,
    /// Models whose definition is being generated, to break reference cycles
    in_progress: HashSet<String>,
}

impl SchemaGenerator {
    /// Create a new SchemaGenerator with a TypeResolver
    pub fn new(type_resolver: TypeResolver) -> Self {
        debug!("Initializing SchemaGenerator");
        Self {
            type_resolver,
            schemas: IndexMap::new(),
            in_progress: HashSet::new(),
        }
    }

    /// Generate a schema for a TypeInfo
    pub fn generate_schema(&mut self, type_info: &TypeInfo) -> Schema {
        if type_info.is_option {
            if let Some(inner) = type_info.generic_args.first() {
                return self.generate_schema(inner);
            }
        }

        if type_info.is_vec {
            if let Some(inner) = type_info.generic_args.first() {
                return Schema::array(self.generate_schema(inner));
            }
        }

        if type_info.is_unit() {
            return Schema::opaque();
        }

        match self.type_resolver.resolve_type(&type_info.name).map(|r| r.kind) {
            Some(TypeKind::Primitive(prim)) => Self::primitive_to_schema(prim),
            Some(TypeKind::Struct(_)) | Some(TypeKind::Enum(_)) => {
                self.generate_model_schema(&type_info.name);
                Schema::reference(&type_info.name)
            }
            None => {
                debug!("Unknown type: {}, using object placeholder", type_info.name);
                Schema::opaque()
            }
        }
    }

    /// Convert a primitive type to an OpenAPI schema
    fn primitive_to_schema(primitive: PrimitiveType) -> Schema {
        match primitive {
            PrimitiveType::String => Schema::of_type("string", None),
            PrimitiveType::I32 => Schema::of_type("integer", Some("int32")),
            PrimitiveType::I64 => Schema::of_type("integer", Some("int64")),
            PrimitiveType::F32 => Schema::of_type("number", Some("float")),
            PrimitiveType::F64 => Schema::of_type("number", Some("double")),
            PrimitiveType::Bool => Schema::of_type("boolean", None),
        }
    }

    /// Generate the named definition of a struct or enum, first writer wins
    fn generate_model_schema(&mut self, type_name: &str) {
        if self.schemas.contains_key(type_name) || self.in_progress.contains(type_name) {
            return;
        }
        let Some(resolved) = self.type_resolver.resolve_type(type_name) else {
            return;
        };
        debug!("Generating model schema for: {}", type_name);
        self.in_progress.insert(type_name.to_string());

        let schema = match resolved.kind {
            TypeKind::Struct(struct_def) => {
                let mut properties = IndexMap::new();
                let mut required = Vec::new();
                for field in &struct_def.fields {
                    properties.insert(field.name.clone(), self.generate_schema(&field.type_info));
                    if !field.type_info.is_option {
                        required.push(field.name.clone());
                    }
                }
                Schema {
                    schema_type: Some("object".to_string()),
                    properties: Some(properties),
                    required: if required.is_empty() { None } else { Some(required) },
                    ..Default::default()
                }
            }
            TypeKind::Enum(enum_def) => Schema {
                schema_type: Some("string".to_string()),
                enum_values: Some(enum_def.variants),
                ..Default::default()
            },
            TypeKind::Primitive(prim) => Self::primitive_to_schema(prim),
        };

        self.in_progress.remove(type_name);
        self.schemas.entry(type_name.to_string()).or_insert(schema);
    }
}

impl SchemaRegistry for SchemaGenerator {
    fn register_or_reference(&mut self, type_info: &TypeInfo) -> Schema {
        self.generate_schema(type_info)
    }

    fn schemas(&self) -> IndexMap<String, Schema> {
        self.schemas.clone()
    }
}

/// A registry that can be shared between threads scanning resources in parallel.
///
/// Every registration goes through one mutex, so concurrent registration of the
/// same type still yields exactly one definition.
pub struct SharedSchemaRegistry<R> {
    inner: Mutex<R>,
}

impl<R: SchemaRegistry> SharedSchemaRegistry<R> {
    pub fn new(registry: R) -> Self {
        Self {
            inner: Mutex::new(registry),
        }
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: SchemaRegistry> SchemaRegistry for &SharedSchemaRegistry<R> {
    fn register_or_reference(&mut self, type_info: &TypeInfo) -> Schema {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .register_or_reference(type_info)
    }

    fn schemas(&self) -> IndexMap<String, Schema> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .schemas()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsedFile;
    use std::path::PathBuf;

    /// Helper function to create a SchemaGenerator from code
    fn create_generator_from_code(code: &str) -> SchemaGenerator {
        let syntax_tree = syn::parse_file(code).expect("Failed to parse test code");
        let type_resolver = TypeResolver::new(&[ParsedFile {
            path: PathBuf::from("test.rs"),
            syntax_tree,
        }]);
        SchemaGenerator::new(type_resolver)
    }

    #[test]
    fn test_primitive_types() {
        let mut generator = create_generator_from_code("");
        let schema = generator.generate_schema(&TypeInfo::new("i64"));
        assert_eq!(schema, Schema::of_type("integer", Some("int64")));
        let schema = generator.generate_schema(&TypeInfo::new("f32"));
        assert_eq!(schema.format.as_deref(), Some("float"));
        assert!(generator.schemas().is_empty());
    }

    #[test]
    fn test_vec_and_option() {
        let mut generator = create_generator_from_code("");
        let schema = generator.generate_schema(&TypeInfo::vec(TypeInfo::new("String")));
        assert_eq!(schema.schema_type.as_deref(), Some("array"));
        assert_eq!(schema.items.unwrap().schema_type.as_deref(), Some("string"));

        let schema = generator.generate_schema(&TypeInfo::option(TypeInfo::new("bool")));
        assert_eq!(schema.schema_type.as_deref(), Some("boolean"));
    }

    #[test]
    fn test_struct_registers_reference_and_nested_models() {
        let code = r#"
            pub struct Pet {
                pub id: u64,
                pub nickname: Option<String>,
                pub owner: Owner,
            }
            pub struct Owner {
                pub name: String,
            }
        "#;
        let mut generator = create_generator_from_code(code);
        let schema = generator.register_or_reference(&TypeInfo::new("Pet"));
        assert_eq!(schema.reference.as_deref(), Some("#/components/schemas/Pet"));

        let schemas = generator.schemas();
        let pet = &schemas["Pet"];
        assert_eq!(
            pet.required.as_deref(),
            Some(&["id".to_string(), "owner".to_string()][..])
        );
        assert!(schemas.contains_key("Owner"));
    }

    #[test]
    fn test_self_referencing_struct_terminates() {
        let code = r#"
            pub struct Category {
                pub name: String,
                pub children: Vec<Category>,
            }
        "#;
        let mut generator = create_generator_from_code(code);
        generator.register_or_reference(&TypeInfo::new("Category"));
        let schemas = generator.schemas();
        assert_eq!(schemas.len(), 1);
        let children = &schemas["Category"].properties.as_ref().unwrap()["children"];
        assert_eq!(
            children.items.as_ref().unwrap().reference.as_deref(),
            Some("#/components/schemas/Category")
        );
    }

    #[test]
    fn test_enum_schema() {
        let code = "pub enum Status { Available, Sold }";
        let mut generator = create_generator_from_code(code);
        generator.register_or_reference(&TypeInfo::new("Status"));
        let schemas = generator.schemas();
        assert_eq!(
            schemas["Status"].enum_values,
            Some(vec!["Available".to_string(), "Sold".to_string()])
        );
    }

    #[test]
    fn test_unknown_type_is_opaque() {
        let mut generator = create_generator_from_code("");
        let schema = generator.register_or_reference(&TypeInfo::new("HttpRequest"));
        assert_eq!(schema, Schema::opaque());
    }

    #[test]
    fn test_registration_is_idempotent() {
        let code = "pub struct Pet { pub id: u64 }";
        let mut generator = create_generator_from_code(code);
        let first = generator.register_or_reference(&TypeInfo::new("Pet"));
        let second = generator.register_or_reference(&TypeInfo::new("Pet"));
        assert_eq!(first, second);
        assert_eq!(generator.schemas().len(), 1);
    }

    #[test]
    fn test_shared_registry_from_threads() {
        let code = "pub struct Pet { pub id: u64 } pub struct Owner { pub name: String }";
        let shared = SharedSchemaRegistry::new(create_generator_from_code(code));

        std::thread::scope(|scope| {
            for name in ["Pet", "Owner", "Pet"] {
                let shared = &shared;
                scope.spawn(move || {
                    let mut registry = shared;
                    registry.register_or_reference(&TypeInfo::new(name));
                });
            }
        });

        let generator = shared.into_inner();
        assert_eq!(generator.schemas().len(), 2);
    }
}
