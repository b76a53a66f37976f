//! Resource extraction: builds the resource catalog from parsed source files.
//!
//! Resources are plain Rust items annotated with inert attributes. Structs are
//! resource types, traits are the contracts they implement, and the methods of
//! both inherent and trait `impl` blocks belong to the implementing struct.
//!
//! # Example
//!
//! ```no_run
//! use resource_openapi_reader::extractor::ResourceExtractor;
//! use resource_openapi_reader::parser::AstParser;
//! use std::path::Path;
//!
//! let parsed = AstParser::parse_file(Path::new("src/resources.rs")).unwrap();
//! let catalog = ResourceExtractor::extract(&[parsed]);
//! println!("Found {} resource types", catalog.len());
//! ```

pub mod attributes;

use crate::metadata::TypeInfo;
use crate::parser::ParsedFile;
use crate::resource::{Argument, ResourceCatalog, ResourceKind, ResourceMethod, ResourceType};
use attributes::{parse_annotations, parse_argument_attributes, parse_superclass};
use log::{debug, info};
use syn::visit::Visit;

/// Extracts resource types from parsed files
pub struct ResourceExtractor;

impl ResourceExtractor {
    /// Build the catalog of every struct and trait in `parsed_files`.
    ///
    /// Types keep source order across files. `impl` blocks are applied after
    /// all types are known, so an impl may precede its struct.
    pub fn extract(parsed_files: &[ParsedFile]) -> ResourceCatalog {
        let mut collector = ItemCollector::default();
        for parsed_file in parsed_files {
            debug!("Collecting resource items from {}", parsed_file.path.display());
            collector.visit_file(&parsed_file.syntax_tree);
        }

        let mut catalog = ResourceCatalog::new();
        for item in collector.types {
            let resource = match item {
                TypeItem::Struct(item_struct) => Self::struct_resource(item_struct),
                TypeItem::Trait(item_trait) => Self::trait_resource(item_trait),
            };
            catalog.insert(resource);
        }

        for item_impl in collector.impls {
            Self::apply_impl(&mut catalog, item_impl);
        }

        info!("Extracted {} resource types", catalog.len());
        catalog
    }

    fn struct_resource(item_struct: &syn::ItemStruct) -> ResourceType {
        let mut resource = ResourceType::new(item_struct.ident.to_string(), ResourceKind::Struct);
        resource.annotations = parse_annotations(&item_struct.attrs);
        resource.superclass = parse_superclass(&item_struct.attrs);
        resource.candidate = resource.annotations.path.is_some() || resource.annotations.resource;
        resource
    }

    fn trait_resource(item_trait: &syn::ItemTrait) -> ResourceType {
        let mut resource = ResourceType::new(item_trait.ident.to_string(), ResourceKind::Trait);
        resource.annotations = parse_annotations(&item_trait.attrs);
        resource.interfaces = item_trait
            .supertraits
            .iter()
            .filter_map(|bound| match bound {
                syn::TypeParamBound::Trait(trait_bound) => last_ident(&trait_bound.path),
                _ => None,
            })
            .collect();
        resource.methods = item_trait
            .items
            .iter()
            .filter_map(|item| match item {
                syn::TraitItem::Fn(trait_fn) => {
                    let mut method = Self::method(&trait_fn.attrs, &trait_fn.sig);
                    method.has_body = trait_fn.default.is_some();
                    Some(method)
                }
                _ => None,
            })
            .collect();
        resource
    }

    /// Attach the methods of an impl block (and its trait) to the implementing struct
    fn apply_impl(catalog: &mut ResourceCatalog, item_impl: &syn::ItemImpl) {
        let syn::Type::Path(self_ty) = item_impl.self_ty.as_ref() else {
            return;
        };
        let Some(self_name) = last_ident(&self_ty.path) else {
            return;
        };
        let Some(resource) = catalog.get_mut(&self_name) else {
            debug!("Skipping impl for unknown type {}", self_name);
            return;
        };

        if let Some((_, trait_path, _)) = &item_impl.trait_ {
            if let Some(trait_name) = last_ident(trait_path) {
                if !resource.interfaces.contains(&trait_name) {
                    resource.interfaces.push(trait_name);
                }
            }
        }

        for item in &item_impl.items {
            if let syn::ImplItem::Fn(impl_fn) = item {
                let mut method = Self::method(&impl_fn.attrs, &impl_fn.sig);
                method.has_body = true;
                resource.methods.push(method);
            }
        }
    }

    fn method(attrs: &[syn::Attribute], sig: &syn::Signature) -> ResourceMethod {
        let mut method = ResourceMethod::new(sig.ident.to_string());
        method.annotations = parse_annotations(attrs);
        method.return_type = Self::return_type(&sig.output);
        method.arguments = sig
            .inputs
            .iter()
            .filter_map(|input| match input {
                syn::FnArg::Typed(pat_type) => Some(Self::argument(pat_type)),
                syn::FnArg::Receiver(_) => None,
            })
            .collect();
        method
    }

    fn argument(pat_type: &syn::PatType) -> Argument {
        let name = match pat_type.pat.as_ref() {
            syn::Pat::Ident(pat_ident) => Some(pat_ident.ident.to_string()),
            _ => None,
        };
        let parsed = parse_argument_attributes(&pat_type.attrs);
        let mut argument = Argument::new(name, TypeInfo::from_syn_type(&pat_type.ty));
        argument.binding = parsed.binding;
        argument.parameter = parsed.parameter;
        argument.request_body = parsed.request_body;
        argument.context = parsed.context;
        argument
    }

    /// Declared return type with `Result<T, _>` unwrapped; unit is `None`
    fn return_type(output: &syn::ReturnType) -> Option<TypeInfo> {
        let syn::ReturnType::Type(_, ty) = output else {
            return None;
        };
        let mut type_info = TypeInfo::from_syn_type(ty);
        if type_info.name == "Result" && type_info.is_generic {
            type_info = type_info.generic_args.into_iter().next()?;
        }
        if type_info.is_unit() {
            None
        } else {
            Some(type_info)
        }
    }
}

fn last_ident(path: &syn::Path) -> Option<String> {
    path.segments.last().map(|segment| segment.ident.to_string())
}

enum TypeItem<'ast> {
    Struct(&'ast syn::ItemStruct),
    Trait(&'ast syn::ItemTrait),
}

/// Collects type definitions and impl blocks, descending into inline modules
#[derive(Default)]
struct ItemCollector<'ast> {
    types: Vec<TypeItem<'ast>>,
    impls: Vec<&'ast syn::ItemImpl>,
}

impl<'ast> Visit<'ast> for ItemCollector<'ast> {
    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        self.types.push(TypeItem::Struct(node));
    }

    fn visit_item_trait(&mut self, node: &'ast syn::ItemTrait) {
        self.types.push(TypeItem::Trait(node));
    }

    fn visit_item_impl(&mut self, node: &'ast syn::ItemImpl) {
        self.impls.push(node);
    }

    fn visit_item_fn(&mut self, _node: &'ast syn::ItemFn) {
        // items local to function bodies are never resources
    }
}
