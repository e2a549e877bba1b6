use recon_core_types::RunId;
use thiserror::Error;

/// Result type alias using the canonical ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// raised or collected by the reconciliation engine. Each kind maps to a
/// stable error code that can be used for programmatic error handling,
/// testing, and report rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    InvalidConfig,
    InvalidDocument,
    NotFound,

    // Comparison / ordering
    /// A record's own `asset_id` field disagrees with the key it was filed under
    IdentifierMismatch,
    /// An identifier cannot be turned into a natural sort key
    UncomparableKey,

    // Validation taxonomy
    /// Container cannot be parsed as the expected shape (always critical)
    Structural,
    /// Required field missing or value outside its closed set
    Schema,
    /// Cross-entry consistency violation
    Semantic,
    /// Stored content hash disagrees with the recomputed one
    Integrity,
    /// Recoverable ambiguity, e.g. a `modify` without old/new values
    ToleranceAmbiguity,
    /// Mapped field values disagree between source and target
    SyncMismatch,

    // Integration/IO
    Io,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::InvalidDocument => "ERR_INVALID_DOCUMENT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::IdentifierMismatch => "ERR_IDENTIFIER_MISMATCH",
            ExErrorKind::UncomparableKey => "ERR_UNCOMPARABLE_KEY",
            ExErrorKind::Structural => "ERR_STRUCTURAL",
            ExErrorKind::Schema => "ERR_SCHEMA",
            ExErrorKind::Semantic => "ERR_SEMANTIC",
            ExErrorKind::Integrity => "ERR_INTEGRITY",
            ExErrorKind::ToleranceAmbiguity => "ERR_TOLERANCE_AMBIGUITY",
            ExErrorKind::SyncMismatch => "ERR_SYNC_MISMATCH",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// This error type provides a structured representation of errors with
/// classification fields for programmatic handling and rich context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    asset_id: Option<String>,
    field: Option<String>,
    path: Option<String>,
    line: Option<usize>,
    run_id: Option<RunId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            asset_id: None,
            field: None,
            path: None,
            line: None,
            run_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add asset identifier context
    pub fn with_asset_id(mut self, id: impl Into<String>) -> Self {
        self.asset_id = Some(id.into());
        self
    }

    /// Add field name context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add file path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add line number context (1-based)
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Add run correlation context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the asset identifier context, if any
    pub fn asset_id(&self) -> Option<&str> {
        self.asset_id.as_deref()
    }

    /// Get the field name context, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Get the file path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the line context, if any
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Get the run correlation id, if any
    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(asset_id) = &self.asset_id {
            write!(f, " (asset_id: {})", asset_id)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(line) = self.line {
            write!(f, " (line: {})", line)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for reconciliation operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconError {
    // ===== Document Errors =====
    /// A difference document line could not be interpreted
    #[error("Document parse error at line {line}: {reason}")]
    DocumentParse { line: usize, reason: String },

    /// A difference document has no `asset_id:` header
    #[error("Document is missing its asset_id header")]
    MissingDocumentHeader,

    // ===== Comparison Errors =====
    /// Record filed under one key carries a different `asset_id`
    #[error("Record filed under {key} carries asset_id {record_id}")]
    IdentifierMismatch { key: String, record_id: String },

    /// Record content is unusable for comparison
    #[error("Invalid record: {reason}")]
    InvalidRecord { reason: String },

    // ===== Ordering Errors =====
    /// Identifier cannot be ordered
    #[error("Uncomparable sort key at position {index}: {reason}")]
    UncomparableKey { index: usize, reason: String },

    // ===== Configuration Errors =====
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Generic Errors =====
    #[error("Not found: {path}")]
    NotFound { path: String },

    #[error("IO error on {path}: {message}")]
    Io { path: String, message: String },

    /// Serialization error (JSON/TOML/CSV encoding or decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl ReconError {
    /// Build an IO error from a std::io::Error, mapping NotFound distinctly
    pub fn io(path: impl Into<String>, err: &std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            ReconError::NotFound { path }
        } else {
            ReconError::Io {
                path,
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for ReconError {
    fn from(err: serde_json::Error) -> Self {
        ReconError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from ReconError to ExError
impl From<ReconError> for ExError {
    fn from(err: ReconError) -> Self {
        match err {
            ReconError::DocumentParse { line, reason } => {
                ExError::new(ExErrorKind::InvalidDocument)
                    .with_op("parse_document")
                    .with_line(line)
                    .with_message(reason)
            }
            ReconError::MissingDocumentHeader => ExError::new(ExErrorKind::InvalidDocument)
                .with_op("parse_document")
                .with_message("missing asset_id header"),
            ReconError::IdentifierMismatch { key, record_id } => {
                ExError::new(ExErrorKind::IdentifierMismatch)
                    .with_asset_id(key)
                    .with_field(recon_core_types::schema::FIELD_ASSET_ID)
                    .with_message(format!("record carries asset_id {}", record_id))
            }
            ReconError::InvalidRecord { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }
            ReconError::UncomparableKey { index, reason } => {
                ExError::new(ExErrorKind::UncomparableKey)
                    .with_op("sort")
                    .with_message(format!("position {}: {}", index, reason))
            }
            ReconError::InvalidConfig { reason } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(reason)
            }
            ReconError::NotFound { path } => ExError::new(ExErrorKind::NotFound)
                .with_path(path)
                .with_message("file not found"),
            ReconError::Io { path, message } => ExError::new(ExErrorKind::Io)
                .with_path(path)
                .with_message(message),
            ReconError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ReconError::from(err).into()
    }
}
