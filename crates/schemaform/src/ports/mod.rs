//! Ports module
//!
//! Outbound interfaces the host implements to receive submitted values,
//! button clicks and finalized schemas. Plain closures implement them.

use thiserror::Error;

use crate::domain::schema::SchemaEntry;
use crate::domain::value_objects::ValueMap;
use crate::error::FormsError;

/// Failure reported by a host handler
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl From<HandlerError> for FormsError {
    fn from(e: HandlerError) -> Self {
        FormsError::Handler(e.0)
    }
}

pub type HandlerResult = std::result::Result<(), HandlerError>;

/// Receives the filled values of a submitted form
pub trait SubmitHandler {
    fn submit(&mut self, filled: &ValueMap) -> HandlerResult;
}

/// Runs when a `button`-typed entry is clicked
pub trait ButtonHandler {
    fn click(&mut self) -> HandlerResult;
}

/// Receives the schema produced by the builder
pub trait FinalizeHandler {
    fn finalize(&mut self, title: &str, schema: &[SchemaEntry]) -> HandlerResult;
}

impl<F> SubmitHandler for F
where
    F: FnMut(&ValueMap) -> HandlerResult,
{
    fn submit(&mut self, filled: &ValueMap) -> HandlerResult {
        self(filled)
    }
}

impl<F> ButtonHandler for F
where
    F: FnMut() -> HandlerResult,
{
    fn click(&mut self) -> HandlerResult {
        self()
    }
}

impl<F> FinalizeHandler for F
where
    F: FnMut(&str, &[SchemaEntry]) -> HandlerResult,
{
    fn finalize(&mut self, title: &str, schema: &[SchemaEntry]) -> HandlerResult {
        self(title, schema)
    }
}
