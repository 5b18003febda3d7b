//! Schemaform
//!
//! Schema-driven form state engine and form builder.
//!
//! ## Architecture
//!
//! - **Domain Layer**: schema records, value objects, stateless services
//!   and the session aggregates
//! - **Ports Layer**: handler traits the host implements
//! - **Application Layer**: schema-keyed session hosting
//!
//! ## Features
//!
//! - Classification of a flat schema into fields, buttons and discarded entries
//! - Value map with per-type initialization, update and reset rules
//! - Input masking with `#` placeholders
//! - Cross-field equality and file acceptance validation
//! - Interactive schema builder producing the same schema format
//!
//! Rendering is left to the host: sessions expose values, validity and
//! render commands, and consume change events.

#![warn(clippy::all)]

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

// Re-exports for convenience
pub use application::FormMount;
pub use config::{BuilderConfig, FormConfig};
pub use domain::aggregates::{
    BuilderSession, BuilderState, DraftOptions, DraftPatch, FieldDraft, FormSession,
    FormSessionBuilder, FormState, HtmlAttribute,
};
pub use domain::events::{BuilderEvent, DiscardedEntry, FormEvent, RenderCommand};
pub use domain::schema::{
    parse_schema, schema_key, ButtonSpec, CheckboxOption, DiscardReason, FieldKind, FieldSpec,
    SchemaEntry,
};
pub use domain::services::{Classified, CrossFieldValidator, FieldStateStore, SchemaClassifier};
pub use domain::value_objects::{
    mask, unmask, AcceptList, ButtonType, ChangeEvent, ChangeInput, FieldType, FieldValue,
    FileHandle, Mask, NormalizedChange, SchemaKey, SessionId, ValueMap, Validity,
};
pub use error::{FormsError, Result};
pub use ports::{ButtonHandler, FinalizeHandler, HandlerError, HandlerResult, SubmitHandler};
