use thiserror::Error;

use crate::model::RecordState;

/// Result type alias using ModelError
pub type Result<T> = std::result::Result<T, ModelError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by modelkit is classified by one of these kinds.
/// Each kind maps to a stable error code usable by callers, tests and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    /// A value crossing the store boundary failed validation (unknown enum tag, oversized text)
    Validation,
    /// The database rejected a write because of a unique, check or key constraint
    ConstraintViolation,
    /// Required connection configuration is missing or malformed
    Configuration,
    /// An unloaded attribute was read after its owning session ended
    DetachedAccess,
    /// An unloaded attribute was read while the session is still open
    NotLoaded,
    /// A record was used in a way its lifecycle state does not allow
    InvalidState,
    NotFound,

    // Integration/IO
    Persistence,
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Validation => "ERR_VALIDATION",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::Configuration => "ERR_CONFIGURATION",
            ExErrorKind::DetachedAccess => "ERR_DETACHED_ACCESS",
            ExErrorKind::NotLoaded => "ERR_NOT_LOADED",
            ExErrorKind::InvalidState => "ERR_INVALID_STATE",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification (`kind`) for programmatic handling plus the
/// operation, record and constraint involved for diagnostics.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    constraint: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            constraint: None,
            message: String::new(),
            source: None,
        }
    }

    /// Set the operation name
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Set the record identifier
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Set the name of the violated constraint (e.g. `uq_simplemodel_col_1`)
    pub fn with_constraint(mut self, name: impl Into<String>) -> Self {
        self.constraint = Some(name.into());
        self
    }

    /// Set the error message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the source error
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

    /// Get the operation name, if set
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the record identifier, if set
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the violated constraint name, if known
    pub fn constraint(&self) -> Option<&str> {
        self.constraint.as_deref()
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
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(constraint) = &self.constraint {
            write!(f, " (constraint: {})", constraint)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
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

/// Domain errors raised by the model layer before anything reaches the database
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A stored or supplied tag is not a member of the enumeration
    #[error("'{tag}' is not a valid {enum_name}")]
    InvalidTag { enum_name: &'static str, tag: String },

    /// A text attribute is longer than its column allows
    #[error("{column} is {len} characters long, the maximum is {max}")]
    TooLong {
        column: &'static str,
        len: usize,
        max: usize,
    },

    /// The attribute was never loaded and the owning session is gone
    #[error("attribute '{attr}' of {model} is not loaded and its session has ended")]
    Detached {
        model: &'static str,
        attr: &'static str,
        id: Option<i64>,
    },

    /// The attribute was never loaded; refresh the record through its session
    #[error("attribute '{attr}' of {model} is not loaded")]
    NotLoaded {
        model: &'static str,
        attr: &'static str,
        id: Option<i64>,
    },

    /// The record's lifecycle state does not allow the requested action
    #[error("cannot {action} a {state} {model}")]
    InvalidState {
        model: &'static str,
        state: RecordState,
        action: &'static str,
    },
}

impl ModelError {
    /// The record id the error refers to, when there is one
    fn record_id(&self) -> Option<i64> {
        match self {
            ModelError::Detached { id, .. } | ModelError::NotLoaded { id, .. } => *id,
            _ => None,
        }
    }
}

/// Convert domain errors into the structured facility
impl From<ModelError> for ExError {
    fn from(err: ModelError) -> Self {
        let (kind, op) = match &err {
            ModelError::InvalidTag { .. } => (ExErrorKind::Validation, "decode_tag"),
            ModelError::TooLong { .. } => (ExErrorKind::Validation, "validate_record"),
            ModelError::Detached { .. } => (ExErrorKind::DetachedAccess, "read_attribute"),
            ModelError::NotLoaded { .. } => (ExErrorKind::NotLoaded, "read_attribute"),
            ModelError::InvalidState { .. } => (ExErrorKind::InvalidState, "stage_record"),
        };

        let mut ex = ExError::new(kind).with_op(op).with_message(err.to_string());
        if let Some(id) = err.record_id() {
            ex = ex.with_entity_id(id.to_string());
        }
        ex
    }
}
