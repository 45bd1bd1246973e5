use std::fmt;

use thiserror::Error;

/// Closed set of store failure classes
///
/// The gateway maps HTTP statuses and PostgREST/Postgres error codes onto
/// these kinds so callers never have to inspect message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// Missing or rejected credentials
    Unauthorized,
    /// The collection (table) does not exist in the store
    CollectionNotFound,
    /// A referenced record does not exist
    ForeignKeyViolation,
    /// The store could not be reached at all
    Unreachable,
    /// Any other non-success response
    Rejected,
    /// The response was not the expected shape
    Decode,
}

impl StoreErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::CollectionNotFound => "collection_not_found",
            Self::ForeignKeyViolation => "foreign_key_violation",
            Self::Unreachable => "unreachable",
            Self::Rejected => "rejected",
            Self::Decode => "decode_error",
        }
    }
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every persistence gateway operation
#[derive(Debug, Clone, Error)]
#[error("Store error ({kind}): {message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    /// Backend error code when one was reported (e.g. `PGRST205`, `23503`)
    pub code: Option<String>,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn collection_not_found(collection: &str) -> Self {
        Self::new(
            StoreErrorKind::CollectionNotFound,
            format!("Could not find the table '{}'", collection),
        )
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Decode, message)
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_connect() || err.is_timeout() || err.is_request() {
            StoreErrorKind::Unreachable
        } else if err.is_decode() {
            StoreErrorKind::Decode
        } else {
            StoreErrorKind::Rejected
        };
        Self::new(kind, err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(format!("JSON error: {}", err))
    }
}

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Caller-level validation failure
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Persistence gateway failure
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Model capability returned an error status
    #[error("Model error ({status}): {message}")]
    ModelError { status: u16, message: String },
    /// HTTP request error talking to the model
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),
}

impl AppError {
    /// Kind of the underlying store failure, if this is one
    pub fn store_kind(&self) -> Option<StoreErrorKind> {
        match self {
            Self::Store(err) => Some(err.kind),
            _ => None,
        }
    }
}

/// How a failure during startup should be presented to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupFailure {
    /// Credentials missing, invalid or the store is unreachable
    Configuration,
    /// The expected tables are absent
    Schema,
    /// Anything else
    Other,
}

impl StartupFailure {
    pub fn classify(err: &AppError) -> Self {
        match err {
            AppError::ConfigError(_) => Self::Configuration,
            AppError::Store(store) => match store.kind {
                StoreErrorKind::CollectionNotFound => Self::Schema,
                StoreErrorKind::Unauthorized | StoreErrorKind::Unreachable => Self::Configuration,
                _ => Self::Other,
            },
            _ => Self::Other,
        }
    }

    /// Remediation steps shown alongside the raw error
    pub fn remediation(&self) -> &'static [&'static str] {
        match self {
            Self::Configuration => &[
                "Database not configured.",
                "Set SUPABASE_URL and SUPABASE_KEY in the environment or in tracker.toml ([store] url / api_key).",
            ],
            Self::Schema => &[
                "Tables missing in Supabase. Create them first:",
                "1. Open the Supabase dashboard for your project",
                "2. Go to SQL Editor, paste and run the contents of supabase/schema.sql",
            ],
            Self::Other => &["Unexpected error while connecting to the store."],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let error = StoreError::collection_not_found("runs").with_code("PGRST205");
        assert_eq!(
            error.to_string(),
            "Store error (collection_not_found): Could not find the table 'runs'"
        );
        assert_eq!(error.code.as_deref(), Some("PGRST205"));
    }

    #[test]
    fn test_app_error_is_transparent_for_store() {
        let error: AppError = StoreError::new(StoreErrorKind::Unauthorized, "Invalid API key").into();
        assert_eq!(error.to_string(), "Store error (unauthorized): Invalid API key");
        assert_eq!(error.store_kind(), Some(StoreErrorKind::Unauthorized));
    }

    #[test]
    fn test_startup_classification() {
        let schema: AppError = StoreError::collection_not_found("projects").into();
        assert_eq!(StartupFailure::classify(&schema), StartupFailure::Schema);

        let auth: AppError = StoreError::new(StoreErrorKind::Unauthorized, "JWT expired").into();
        assert_eq!(StartupFailure::classify(&auth), StartupFailure::Configuration);

        let config = AppError::ConfigError("store.url is empty".to_string());
        assert_eq!(StartupFailure::classify(&config), StartupFailure::Configuration);

        let fk: AppError = StoreError::new(StoreErrorKind::ForeignKeyViolation, "fk").into();
        assert_eq!(StartupFailure::classify(&fk), StartupFailure::Other);
    }

    #[test]
    fn test_remediation_mentions_schema_file() {
        let lines = StartupFailure::Schema.remediation();
        assert!(lines.iter().any(|l| l.contains("supabase/schema.sql")));
    }
}
