use crate::metadata::TypeInfo;
use crate::parser::ParsedFile;
use log::{debug, warn};
use std::collections::HashMap;

/// Type resolver - indexes data-model type definitions found in parsed files.
///
/// Definitions are extracted once at construction, so the resolver holds only
/// plain data and can be moved between threads.
pub struct TypeResolver {
    /// Resolved definitions by type name; the first definition of a name wins
    definitions: HashMap<String, ResolvedType>,
}

/// Resolved type information
#[derive(Debug, Clone)]
pub struct ResolvedType {
    /// The type name
    pub name: String,
    /// The kind of type (struct, enum, primitive, etc.)
    pub kind: TypeKind,
}

/// Type kind - represents different categories of types
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// A struct type with fields
    Struct(StructDef),
    /// An enum type with unit variants
    Enum(EnumDef),
    /// A primitive type (String, i32, etc.)
    Primitive(PrimitiveType),
}

/// Struct definition with fields
#[derive(Debug, Clone)]
pub struct StructDef {
    pub fields: Vec<FieldDef>,
}

/// Field definition in a struct
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name as serialized (after `#[serde(rename)]`)
    pub name: String,
    pub type_info: TypeInfo,
}

/// Enum definition with variants
#[derive(Debug, Clone)]
pub struct EnumDef {
    pub variants: Vec<String>,
}

/// Primitive types supported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    String,
    I32,
    I64,
    F32,
    F64,
    Bool,
}

/// Serde attributes that change the documented shape of a field
#[derive(Debug, Clone, Default)]
struct SerdeAttributes {
    rename: Option<String>,
    skip: bool,
}

impl TypeResolver {
    /// Create a new TypeResolver over parsed files
    pub fn new(parsed_files: &[ParsedFile]) -> Self {
        let mut definitions = HashMap::new();
        for parsed_file in parsed_files {
            Self::index_items(&parsed_file.syntax_tree.items, &mut definitions);
        }
        debug!(
            "Indexed {} type definitions from {} files",
            definitions.len(),
            parsed_files.len()
        );
        Self { definitions }
    }

    /// Resolve a type by name
    pub fn resolve_type(&self, type_name: &str) -> Option<ResolvedType> {
        if let Some(primitive) = Self::parse_primitive_type(type_name) {
            return Some(ResolvedType {
                name: type_name.to_string(),
                kind: TypeKind::Primitive(primitive),
            });
        }

        let resolved = self.definitions.get(type_name).cloned();
        if resolved.is_none() {
            warn!("Could not resolve type: {}", type_name);
        }
        resolved
    }

    /// Collect struct and enum definitions, descending into inline modules
    fn index_items(items: &[syn::Item], definitions: &mut HashMap<String, ResolvedType>) {
        for item in items {
            let resolved = match item {
                syn::Item::Struct(item_struct) => Self::parse_struct(item_struct),
                syn::Item::Enum(item_enum) => Self::parse_enum(item_enum),
                syn::Item::Mod(item_mod) => {
                    if let Some((_, nested)) = &item_mod.content {
                        Self::index_items(nested, definitions);
                    }
                    continue;
                }
                _ => continue,
            };
            definitions.entry(resolved.name.clone()).or_insert(resolved);
        }
    }

    fn parse_struct(item_struct: &syn::ItemStruct) -> ResolvedType {
        let mut fields = Vec::new();
        if let syn::Fields::Named(named_fields) = &item_struct.fields {
            for field in &named_fields.named {
                let Some(ident) = &field.ident else { continue };
                let serde_attrs = Self::parse_serde_attributes(&field.attrs);
                if serde_attrs.skip {
                    continue;
                }
                fields.push(FieldDef {
                    name: serde_attrs.rename.unwrap_or_else(|| ident.to_string()),
                    type_info: TypeInfo::from_syn_type(&field.ty),
                });
            }
        }

        ResolvedType {
            name: item_struct.ident.to_string(),
            kind: TypeKind::Struct(StructDef { fields }),
        }
    }

    fn parse_enum(item_enum: &syn::ItemEnum) -> ResolvedType {
        let variants = item_enum
            .variants
            .iter()
            .map(|v| {
                Self::parse_serde_attributes(&v.attrs)
                    .rename
                    .unwrap_or_else(|| v.ident.to_string())
            })
            .collect();

        ResolvedType {
            name: item_enum.ident.to_string(),
            kind: TypeKind::Enum(EnumDef { variants }),
        }
    }

    /// Parse `#[serde(rename = "..")]` and `#[serde(skip)]`
    fn parse_serde_attributes(attrs: &[syn::Attribute]) -> SerdeAttributes {
        let mut serde_attrs = SerdeAttributes::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
            let parsed = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    let value: syn::LitStr = meta.value()?.parse()?;
                    serde_attrs.rename = Some(value.value());
                } else if meta.path.is_ident("skip") {
                    serde_attrs.skip = true;
                } else if meta.input.peek(syn::Token![=]) {
                    let _: syn::Expr = meta.value()?.parse()?;
                }
                Ok(())
            });
            if let Err(e) = parsed {
                debug!("Ignoring unsupported serde attribute: {}", e);
            }
        }

        serde_attrs
    }

    /// Parse a primitive type name
    fn parse_primitive_type(type_name: &str) -> Option<PrimitiveType> {
        match type_name {
            "String" | "str" | "char" => Some(PrimitiveType::String),
            "i8" | "i16" | "i32" | "u8" | "u16" | "u32" => Some(PrimitiveType::I32),
            "i64" | "i128" | "isize" | "u64" | "u128" | "usize" => Some(PrimitiveType::I64),
            "f32" => Some(PrimitiveType::F32),
            "f64" => Some(PrimitiveType::F64),
            "bool" => Some(PrimitiveType::Bool),
            _ => None,
        }
    }
}
