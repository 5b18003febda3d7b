//! Error types for schemaform
//!
//! Unsupported schema entries and failed validations are not errors: the
//! former surface as diagnostics, the latter as [`Validity`](crate::Validity)
//! values attached to a field.

use thiserror::Error;

/// Schemaform error type
#[derive(Error, Debug)]
pub enum FormsError {
    /// A `button` entry was declared without a click handler
    #[error("button '{0}' has type 'button' but no click handler was registered")]
    MissingButtonHandler(String),

    /// Change or lookup for a field the session does not know
    #[error("field not found: {0}")]
    FieldNotFound(String),

    /// Click routed to a button the session does not know
    #[error("button not found: {0}")]
    ButtonNotFound(String),

    /// Change input shape does not match the field type
    #[error("invalid change for field '{field}': {reason}")]
    InvalidChange { field: String, reason: String },

    /// Checkbox group toggle outside the option range
    #[error("option index {index} out of range for field '{field}' ({len} options)")]
    OptionOutOfRange {
        field: String,
        index: usize,
        len: usize,
    },

    /// Radio value that is not one of the declared options
    #[error("'{value}' is not an option of field '{field}'")]
    UnknownOption { field: String, value: String },

    /// Operation on a destroyed session
    #[error("form session has been destroyed")]
    SessionDestroyed,

    /// Builder draft index out of range
    #[error("draft index {index} out of range ({len} drafts)")]
    DraftOutOfRange { index: usize, len: usize },

    /// Attempt to remove the only remaining draft
    #[error("the last remaining draft cannot be removed")]
    LastDraft,

    /// Attempt to remove the only remaining option of a draft
    #[error("the last remaining option cannot be removed")]
    LastOption,

    /// Index into a draft's options or attributes out of range
    #[error("{what} index {index} out of range")]
    EntryOutOfRange { what: &'static str, index: usize },

    /// HTML attribute outside the supported list
    #[error("unsupported HTML attribute: {0}")]
    UnsupportedAttribute(String),

    /// Draft patch that does not apply to the draft's current type
    #[error("patch does not apply: {0}")]
    PatchMismatch(String),

    /// Finalize refused while drafts are incomplete or names collide
    #[error("cannot finalize: {0}")]
    InvalidDraft(String),

    /// External handler reported a failure
    #[error("handler error: {0}")]
    Handler(String),

    /// Schema serialization failure
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for schemaform
pub type Result<T> = std::result::Result<T, FormsError>;
