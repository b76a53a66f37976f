use crate::metadata::HttpMethod;

/// Result type alias for the operation builders
pub type Result<T> = std::result::Result<T, ErrorKind>;

/// Structural contract violations detected while assembling an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A parameter declaration has neither a declared name nor a binding name
    MissingParameterName { argument: Option<String> },
    /// A declared response entry carries no description
    MissingResponseDescription { status: String },
    /// The same (path, verb) pair was declared twice
    DuplicateOperation { path: String, method: HttpMethod },
    /// The joined path cannot be used as a path template
    MalformedPathExpression { path: String, reason: String },
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ErrorKind::MissingParameterName { argument: Some(argument) } => {
                write!(f, "parameter bound to argument `{}` has no name", argument)
            }
            ErrorKind::MissingParameterName { argument: None } => {
                write!(f, "parameter declaration has no name")
            }
            ErrorKind::MissingResponseDescription { status } => {
                write!(f, "response `{}` has no description", status)
            }
            ErrorKind::DuplicateOperation { path, method } => {
                write!(f, "operation {} {} is declared more than once", method, path)
            }
            ErrorKind::MalformedPathExpression { path, reason } => {
                write!(f, "malformed path `{}`: {}", path, reason)
            }
        }
    }
}

impl std::error::Error for ErrorKind {}

/// A failure tied to the resource type and method that caused it.
///
/// The reader collects these instead of aborting, so one broken method never
/// hides the operations of its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadError {
    /// Name of the resource type being scanned
    pub resource: String,
    /// Name of the offending method
    pub method: String,
    /// What went wrong
    pub kind: ErrorKind,
}

impl ReadError {
    pub fn new(resource: &str, method: &str, kind: ErrorKind) -> Self {
        Self {
            resource: resource.to_string(),
            method: method.to_string(),
            kind,
        }
    }
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}::{}: {}", self.resource, self.method, self.kind)
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
