//! The reader: walks candidate resource types and assembles the document.
//!
//! A scan never aborts on a broken method. Every failure is collected as a
//! [`ReadError`] next to the document built from everything else.

pub mod callbacks;
pub mod content;
pub mod operation;
pub mod parameters;
pub mod paths;
pub mod request_body;
pub mod responses;

use crate::accessor::{ClassChain, MethodChain};
use crate::config::ReaderConfig;
use crate::error::{ReadError, Result};
use crate::metadata::HttpMethod;
use crate::openapi_builder::{OpenApiBuilder, OpenApiDocument, Operation};
use crate::resource::{MetadataProvider, ResourceMethod, ResourceType};
use crate::schema_generator::SchemaRegistry;
use log::{debug, info, warn};
use operation::OperationAssembler;

/// An assembled operation together with where it goes in the document
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOperation {
    pub path: String,
    pub http_method: HttpMethod,
    /// Name of the method the operation was assembled from
    pub method_name: String,
    pub operation: Operation,
}

/// Operations and failures of one resource type
#[derive(Debug, Clone, Default)]
pub struct ResourceScan {
    pub resource: String,
    pub operations: Vec<ReadOperation>,
    pub errors: Vec<ReadError>,
}

/// Result of a full scan
#[derive(Debug, Clone)]
pub struct ReadOutcome {
    pub document: OpenApiDocument,
    pub errors: Vec<ReadError>,
}

impl ReadOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct Reader {
    config: ReaderConfig,
}

impl Reader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Scan every candidate of `provider`, in the order it supplies them
    pub fn read<P: MetadataProvider + ?Sized>(
        &self,
        provider: &P,
        registry: &mut dyn SchemaRegistry,
    ) -> ReadOutcome {
        let candidates = provider.candidates();
        info!("Reading {} resource types", candidates.len());

        let scans: Vec<ResourceScan> = candidates
            .into_iter()
            .map(|resource| self.read_resource(provider, resource, registry))
            .collect();
        self.merge(scans, registry)
    }

    /// Assemble the operations of one resource type.
    ///
    /// Scans of different resource types are independent; only the registry
    /// is shared between them.
    pub fn read_resource<P: MetadataProvider + ?Sized>(
        &self,
        provider: &P,
        resource: &ResourceType,
        registry: &mut dyn SchemaRegistry,
    ) -> ResourceScan {
        debug!("Reading resource {}", resource.name);
        let class_chain = ClassChain::new(provider, resource);
        let mut scan = ResourceScan {
            resource: resource.name.clone(),
            ..Default::default()
        };

        for (declaring, method) in class_chain.methods() {
            match self.read_method(provider, &class_chain, declaring, method, registry) {
                Ok(Some(read)) => scan.operations.push(read),
                Ok(None) => debug!("{}::{} is not an operation", resource.name, method.name),
                Err(kind) => scan
                    .errors
                    .push(ReadError::new(&resource.name, &method.name, kind)),
            }
        }
        scan
    }

    /// Assemble a single method of `resource` outside of a full scan
    pub fn parse_method<P: MetadataProvider + ?Sized>(
        &self,
        provider: &P,
        resource: &ResourceType,
        method: &ResourceMethod,
        registry: &mut dyn SchemaRegistry,
    ) -> Result<Option<ReadOperation>> {
        let class_chain = ClassChain::new(provider, resource);
        self.read_method(provider, &class_chain, resource, method, registry)
    }

    /// Insert scanned operations into one document, in scan order.
    ///
    /// The first operation for a (path, verb) pair wins; later ones are
    /// reported as `DuplicateOperation`.
    pub fn merge(&self, scans: Vec<ResourceScan>, registry: &dyn SchemaRegistry) -> ReadOutcome {
        let mut builder = OpenApiBuilder::new()
            .with_info(self.config.info.clone())
            .with_openapi_version(self.config.openapi.clone());
        let mut errors = Vec::new();

        for scan in scans {
            errors.extend(scan.errors);
            for read in scan.operations {
                if let Err(kind) =
                    builder.insert_operation(&read.path, read.http_method, read.operation)
                {
                    warn!("{}::{}: {}", scan.resource, read.method_name, kind);
                    errors.push(ReadError::new(&scan.resource, &read.method_name, kind));
                }
            }
        }

        info!(
            "Read {} paths, {} failures",
            builder.path_count(),
            errors.len()
        );
        ReadOutcome {
            document: builder.build(registry.schemas()),
            errors,
        }
    }

    fn read_method<P: MetadataProvider + ?Sized>(
        &self,
        provider: &P,
        class_chain: &ClassChain,
        declaring: &ResourceType,
        method: &ResourceMethod,
        registry: &mut dyn SchemaRegistry,
    ) -> Result<Option<ReadOperation>> {
        let method_chain = MethodChain::new(provider, declaring, method);
        if method_chain.resolve(|a| a.http_method).is_none() {
            return Ok(None);
        }
        if method_chain.resolve(|a| a.hidden).unwrap_or(false) {
            debug!("Skipping hidden method {}", method.name);
            return Ok(None);
        }

        let path = paths::resolve_path(
            class_chain.resolve(|a| a.path.as_deref()),
            method_chain.resolve(|a| a.path.as_deref()),
        )?;

        let assembler = OperationAssembler::new(&self.config);
        let Some((http_method, operation)) =
            assembler.assemble(class_chain, &method_chain, registry)?
        else {
            return Ok(None);
        };

        debug!("Assembled {} {} from {}", http_method, path, method.name);
        Ok(Some(ReadOperation {
            path,
            http_method,
            method_name: method.name.clone(),
            operation,
        }))
    }
}

impl Default for Reader {
    fn default() -> Self {
        Self::new(ReaderConfig::default())
    }
}
