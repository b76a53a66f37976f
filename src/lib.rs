//! Resource OpenAPI Reader - assemble OpenAPI operations from annotated resources.
//!
//! Resources are Rust structs (and the traits they implement) carrying inert
//! metadata attributes: base paths, HTTP-verb markers, summaries, parameters,
//! request bodies, responses and callbacks. The reader resolves that scattered
//! metadata along the type hierarchy and assembles one operation per method.
//!
//! # Architecture
//!
//! 1. [`parser`] - parses resource source files with `syn`
//! 2. [`extractor`] - turns parsed files into a [`resource::ResourceCatalog`]
//! 3. [`accessor`] - ordered metadata lookup across types, superclasses and traits
//! 4. [`reader`] - builders for parameters, request bodies, responses and
//!    callbacks, the operation assembler and the top-level [`reader::Reader`]
//! 5. [`schema_generator`] - the schema registry shared by all builders
//! 6. [`openapi_builder`] - the output document model
//! 7. [`serializer`] - YAML and JSON output
//!
//! # Example Usage
//!
//! ```no_run
//! use resource_openapi_reader::{
//!     config::ReaderConfig,
//!     extractor::ResourceExtractor,
//!     parser::AstParser,
//!     reader::Reader,
//!     schema_generator::SchemaGenerator,
//!     serializer::serialize_yaml,
//!     type_resolver::TypeResolver,
//! };
//! use std::path::PathBuf;
//!
//! let files = vec![PathBuf::from("src/pets.rs")];
//! let parsed: Vec<_> = AstParser::parse_files(&files)
//!     .into_iter()
//!     .filter_map(Result::ok)
//!     .collect();
//!
//! let catalog = ResourceExtractor::extract(&parsed);
//! let mut registry = SchemaGenerator::new(TypeResolver::new(&parsed));
//! let outcome = Reader::new(ReaderConfig::default()).read(&catalog, &mut registry);
//!
//! for error in &outcome.errors {
//!     eprintln!("{}", error);
//! }
//! println!("{}", serialize_yaml(&outcome.document).unwrap());
//! ```

pub mod accessor;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod metadata;
pub mod openapi_builder;
pub mod parser;
pub mod reader;
pub mod resource;
pub mod schema_generator;
pub mod serializer;
pub mod type_resolver;
