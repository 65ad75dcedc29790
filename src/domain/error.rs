use std::io;

use thiserror::Error;

/// Library-wide error type for mathplan operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Configuration file parsed but holds an invalid value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No API key in the environment or the `.env` file.
    #[error("API key is missing. Run 'mathplan configure' or set {0}.")]
    ApiKeyMissing(String),

    /// Grade level outside the supported range.
    #[error("Please provide a grade level between 1 and 5 (got {0}).")]
    InvalidGrade(i64),

    /// Duration label that does not start with a positive minute count.
    #[error(
        "Invalid duration format '{0}'. \
         Please specify the duration in minutes (e.g., '30 minutes')."
    )]
    InvalidDuration(String),

    /// The completion service call failed.
    ///
    /// `status` is `None` for transport failures where no response arrived.
    /// `retry_after_ms` carries the service's `Retry-After` hint.
    #[error("Generation failed: {message}")]
    GenerationFailed { message: String, status: Option<u16>, retry_after_ms: Option<u64> },

    /// The completion service did not answer within the configured timeout.
    #[error("Generation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Model output that could not be parsed.
    #[error("Failed to parse {what}: {details}")]
    ParseError { what: String, details: String },

    /// Topic selection outside the research batch.
    #[error("Invalid topic selection {index}: batch holds {len} topic(s)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Reference document with an extension the store cannot read.
    #[error("Unsupported file format {0}")]
    UnsupportedDocumentFormat(String),

    /// Reference document id not present in the store.
    #[error("Document '{0}' not found")]
    DocumentNotFound(String),

    /// Text extraction from a PDF or DOCX file failed.
    #[error("Failed to extract text from {path}: {reason}")]
    DocumentExtraction { path: String, reason: String },

    /// Writing a PDF failed.
    #[error("Error generating PDF at {path}: {reason}")]
    PdfExport { path: String, reason: String },

    /// Prompt template rendering failed.
    #[error("Prompt rendering failed for '{template}': {reason}")]
    PromptRender { template: String, reason: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    /// A completion failure without a `Retry-After` hint.
    pub fn generation_failed<S: Into<String>>(message: S, status: Option<u16>) -> Self {
        AppError::GenerationFailed { message: message.into(), status, retry_after_ms: None }
    }

    pub fn parse_error(what: impl Into<String>, details: impl Into<String>) -> Self {
        AppError::ParseError { what: what.into(), details: details.into() }
    }

    /// Whether a completion call that failed this way may succeed when repeated.
    ///
    /// Timeouts, transport failures, 408, 429 and 5xx responses are transient.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Timeout { .. } => true,
            AppError::GenerationFailed { status: None, .. } => true,
            AppError::GenerationFailed { status: Some(code), .. } => {
                matches!(code, 408 | 429) || *code >= 500
            }
            _ => false,
        }
    }

    /// Delay requested by the service before the next attempt.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            AppError::GenerationFailed { retry_after_ms, .. } => *retry_after_ms,
            _ => None,
        }
    }

    /// Whether this error came from request validation, before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::InvalidGrade(_) | AppError::InvalidDuration(_))
    }

    /// Provide an `io::ErrorKind`-like view for callers that branch on failure class.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::Configuration(_)
            | AppError::InvalidConfig(_)
            | AppError::InvalidGrade(_)
            | AppError::InvalidDuration(_)
            | AppError::ParseError { .. }
            | AppError::IndexOutOfRange { .. }
            | AppError::UnsupportedDocumentFormat(_)
            | AppError::PromptRender { .. }
            | AppError::TomlParseError(_) => io::ErrorKind::InvalidInput,
            AppError::ApiKeyMissing(_) | AppError::DocumentNotFound(_) => io::ErrorKind::NotFound,
            AppError::Timeout { .. } => io::ErrorKind::TimedOut,
            AppError::GenerationFailed { .. }
            | AppError::DocumentExtraction { .. }
            | AppError::PdfExport { .. } => io::ErrorKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_flagged() {
        assert!(AppError::InvalidGrade(7).is_validation());
        assert!(AppError::InvalidDuration("soon".into()).is_validation());
        assert!(!AppError::Timeout { seconds: 5 }.is_validation());
    }

    #[test]
    fn unsupported_format_message_matches_import_contract() {
        let err = AppError::UnsupportedDocumentFormat(".odt".into());
        assert_eq!(err.to_string(), "Unsupported file format .odt");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn transient_failures() {
        assert!(AppError::Timeout { seconds: 1 }.is_transient());
        assert!(AppError::generation_failed("connection reset", None).is_transient());
        assert!(AppError::generation_failed("slow down", Some(429)).is_transient());
        assert!(AppError::generation_failed("bad gateway", Some(502)).is_transient());
        assert!(!AppError::generation_failed("invalid api key", Some(401)).is_transient());
        assert!(!AppError::InvalidGrade(9).is_transient());
    }

    #[test]
    fn retry_hint_stays_out_of_the_message() {
        let err = AppError::GenerationFailed {
            message: "Rate limited".into(),
            status: Some(429),
            retry_after_ms: Some(2000),
        };
        assert_eq!(err.to_string(), "Generation failed: Rate limited");
        assert_eq!(err.retry_after_ms(), Some(2000));
    }

    #[test]
    fn timeout_maps_to_timed_out_kind() {
        assert_eq!(AppError::Timeout { seconds: 30 }.kind(), io::ErrorKind::TimedOut);
    }
}
