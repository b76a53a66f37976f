use crate::openapi_builder::Info;

/// Settings for one reader pass
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderConfig {
    /// OpenAPI version written to the document header
    pub openapi: String,
    /// Document info section
    pub info: Info,
    /// Description of the response synthesized when a method declares none
    pub default_response_description: String,
    /// Request media type used when neither the body nor any consumes list names one
    pub default_request_media_type: String,
    /// Response media type used when neither the entry nor any produces list names one
    pub response_wildcard_media_type: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            openapi: "3.0.1".to_string(),
            info: Info::default(),
            default_response_description: "default response".to_string(),
            default_request_media_type: "application/json".to_string(),
            response_wildcard_media_type: "*/*".to_string(),
        }
    }
}

impl ReaderConfig {
    pub fn with_info(mut self, info: Info) -> Self {
        self.info = info;
        self
    }
}
