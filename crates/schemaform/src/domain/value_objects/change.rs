//! Change events raised by the rendering collaborator

use serde::{Deserialize, Serialize};

use super::file::FileHandle;
use super::mask::Mask;

/// Payload of a change notification
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeInput {
    /// New text of a text-like field, textarea, select or radio group
    Text(String),
    /// Index of the checkbox-group option that was clicked
    Toggle(usize),
    /// Checked state of a single checkbox
    Checked(bool),
    /// Current selection of a file field
    Files(Vec<FileHandle>),
}

/// A change notification for one named field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub field: String,
    pub input: ChangeInput,
}

impl ChangeEvent {
    pub fn new(field: impl Into<String>, input: ChangeInput) -> Self {
        Self {
            field: field.into(),
            input,
        }
    }

    pub fn text(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, ChangeInput::Text(value.into()))
    }

    pub fn toggle(field: impl Into<String>, index: usize) -> Self {
        Self::new(field, ChangeInput::Toggle(index))
    }

    pub fn checked(field: impl Into<String>, checked: bool) -> Self {
        Self::new(field, ChangeInput::Checked(checked))
    }

    pub fn files(field: impl Into<String>, files: Vec<FileHandle>) -> Self {
        Self::new(field, ChangeInput::Files(files))
    }
}

/// A change after unmasking
///
/// Built from a borrowed [`ChangeEvent`]; the caller's event is left as is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedChange {
    field: String,
    input: ChangeInput,
}

impl NormalizedChange {
    pub fn from_event(event: &ChangeEvent, mask: Option<&Mask>) -> Self {
        let input = match (&event.input, mask) {
            (ChangeInput::Text(masked), Some(mask)) => ChangeInput::Text(mask.strip(masked)),
            (input, _) => input.clone(),
        };
        Self {
            field: event.field.clone(),
            input,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn input(&self) -> &ChangeInput {
        &self.input
    }
}
