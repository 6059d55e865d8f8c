//! Error types for the catalog pipelines with context for reporting

use std::error::Error;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while flattening modlists, talking to Nexus or writing reports
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Transport-level HTTP failure
    #[error("HTTP request to '{url}' failed")]
    HttpRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("Request to '{url}' returned HTTP {status}")]
    HttpStatus {
        url: String,
        status: u16,
    },

    #[error("Request to '{url}' timed out (check network or increase the timeout)")]
    NetworkTimeout {
        url: String,
    },

    /// Body of a successful response could not be decoded
    #[error("Unexpected response from '{url}': {message}")]
    InvalidResponse {
        url: String,
        message: String,
    },

    /// File system I/O errors with file context
    #[error("File operation failed while {operation} '{path}'")]
    FileSystem {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in '{path}'")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to parse JSON from {context}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid URL '{url}': {suggestion}")]
    InvalidUrl {
        url: String,
        suggestion: String,
        #[source]
        source: url::ParseError,
    },

    /// Configuration errors
    #[error("Invalid configuration: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
        suggestion: Option<String>,
    },
}

/// Types of file operations for error context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    Read,
    Create,
    Append,
    Metadata,
    Rename,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Create => write!(f, "creating"),
            FileOperation::Append => write!(f, "appending to"),
            FileOperation::Metadata => write!(f, "reading metadata of"),
            FileOperation::Rename => write!(f, "moving into place"),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// Build a file system error for `path`
    pub fn file_system<P: Into<PathBuf>>(path: P, operation: FileOperation, source: std::io::Error) -> Self {
        CatalogError::FileSystem {
            path: path.into(),
            operation,
            source,
        }
    }

    /// Build a CSV error for `path`
    pub fn csv<P: Into<PathBuf>>(path: P, source: csv::Error) -> Self {
        CatalogError::Csv {
            path: path.into(),
            source,
        }
    }

    /// Wrap a reqwest error, keeping timeouts distinct
    pub fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            CatalogError::NetworkTimeout { url: url.to_string() }
        } else {
            CatalogError::HttpRequest {
                url: url.to_string(),
                source: error,
            }
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            CatalogError::HttpRequest { .. } => "http_request",
            CatalogError::HttpStatus { .. } => "http_status",
            CatalogError::NetworkTimeout { .. } => "network_timeout",
            CatalogError::InvalidResponse { .. } => "invalid_response",
            CatalogError::FileSystem { .. } => "file_system",
            CatalogError::Csv { .. } => "csv",
            CatalogError::Json { .. } => "json",
            CatalogError::InvalidUrl { .. } => "invalid_url",
            CatalogError::Configuration { .. } => "configuration",
        }
    }

    /// Get user-friendly suggestion for resolving the error
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            CatalogError::HttpStatus { status: 401 | 403, .. } => {
                Some("Check that NEXUS_API_KEY holds a valid personal API key")
            }
            CatalogError::HttpStatus { status: 404, .. } => {
                Some("Check the game domain name and mod id")
            }
            CatalogError::HttpStatus { status: 429, .. } => {
                Some("The Nexus API rate limit was reached, wait for the hourly reset")
            }
            CatalogError::NetworkTimeout { .. } => {
                Some("Check your internet connection or try increasing the timeout value")
            }
            CatalogError::InvalidUrl { suggestion, .. } => Some(suggestion),
            CatalogError::Configuration { suggestion, .. } => suggestion.as_deref(),
            _ => None,
        }
    }

    /// Create a detailed error report for debugging
    pub fn detailed_report(&self) -> String {
        let mut report = format!("Error: {}\n", self);
        report.push_str(&format!("Category: {}\n", self.category()));

        if let Some(suggestion) = self.suggestion() {
            report.push_str(&format!("Suggestion: {}\n", suggestion));
        }

        if let Some(source) = self.source() {
            report.push_str(&format!("Root cause: {}\n", source));
        }

        report
    }
}

impl From<url::ParseError> for CatalogError {
    fn from(error: url::ParseError) -> Self {
        let suggestion = match error {
            url::ParseError::EmptyHost => "URL must have a valid hostname",
            url::ParseError::InvalidPort => "Port number must be between 1 and 65535",
            url::ParseError::RelativeUrlWithoutBase => "URL must be absolute (include http:// or https://)",
            _ => "Check URL format and try again",
        }.to_string();

        CatalogError::InvalidUrl {
            url: "<unparseable>".to_string(),
            suggestion,
            source: error,
        }
    }
}
