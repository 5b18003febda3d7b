//! Domain Events
//!
//! Events raised by the sessions to communicate state changes to the host
//! and the rendering collaborator.

use chrono::{DateTime, Utc};

use crate::domain::schema::{DiscardReason, SchemaEntry};
use crate::domain::value_objects::{FieldValue, SchemaKey, ValueMap, Validity};

/// Instruction for the rendering collaborator
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderCommand {
    /// Clear widget state the value map cannot describe (file pickers)
    ClearNativeState { field: String },
}

/// Entry left out of a form, with its position in the schema
#[derive(Clone, Debug, PartialEq)]
pub struct DiscardedEntry {
    pub position: usize,
    pub entry: SchemaEntry,
    pub reason: DiscardReason,
}

/// Form session events
#[derive(Clone, Debug)]
pub enum FormEvent {
    Mounted {
        schema_key: SchemaKey,
        fields: usize,
        buttons: usize,
        mounted_at: DateTime<Utc>,
    },

    EntriesDiscarded {
        entries: Vec<DiscardedEntry>,
    },

    FieldChanged {
        field: String,
        value: FieldValue,
    },

    ValidityChanged {
        field: String,
        validity: Validity,
    },

    Render(RenderCommand),

    Submitted {
        filled: ValueMap,
        handler_failed: bool,
        submitted_at: DateTime<Utc>,
    },

    Reset {
        reset_at: DateTime<Utc>,
    },

    ButtonClicked {
        button: String,
    },

    Destroyed {
        schema_key: SchemaKey,
    },
}

/// Builder session events
#[derive(Clone, Debug)]
pub enum BuilderEvent {
    DraftAdded {
        index: usize,
    },

    DraftRemoved {
        index: usize,
    },

    DraftUpdated {
        index: usize,
    },

    TitleChanged {
        title: String,
    },

    Finalized {
        title: String,
        entries: usize,
        finalized_at: DateTime<Utc>,
    },
}
