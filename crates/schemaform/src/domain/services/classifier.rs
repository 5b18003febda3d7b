//! Schema Classifier
//!
//! Splits a flat schema into fields, buttons and discarded entries in one
//! pass. Relative order inside each group follows the schema.

use tracing::warn;

use crate::domain::events::DiscardedEntry;
use crate::domain::schema::{ButtonSpec, DiscardReason, FieldSpec, SchemaEntry};

/// Result of classifying a schema
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classified {
    pub fields: Vec<FieldSpec>,
    pub buttons: Vec<ButtonSpec>,
    pub unsupported: Vec<DiscardedEntry>,
}

impl Classified {
    pub fn len(&self) -> usize {
        self.fields.len() + self.buttons.len() + self.unsupported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Field spec by name; the last duplicate wins, as in the value map
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .rev()
            .find(|f| f.name.as_deref() == Some(name))
    }
}

pub struct SchemaClassifier;

impl SchemaClassifier {
    /// Partition `schema`; never fails
    pub fn classify(schema: &[SchemaEntry]) -> Classified {
        let mut classified = Classified::default();

        for (position, entry) in schema.iter().enumerate() {
            match FieldSpec::from_entry(entry) {
                Ok(field) => classified.fields.push(field),
                Err(DiscardReason::UnknownType) => match ButtonSpec::from_entry(entry) {
                    Some(button) => classified.buttons.push(button),
                    None => classified.unsupported.push(DiscardedEntry {
                        position,
                        entry: entry.clone(),
                        reason: DiscardReason::UnknownType,
                    }),
                },
                Err(reason) => classified.unsupported.push(DiscardedEntry {
                    position,
                    entry: entry.clone(),
                    reason,
                }),
            }
        }

        classified
    }

    /// Emit the diagnostic for discarded entries, if any
    pub fn report_unsupported(unsupported: &[DiscardedEntry]) {
        if unsupported.is_empty() {
            return;
        }
        let types: Vec<&str> = unsupported.iter().map(|d| d.entry.kind.as_str()).collect();
        warn!(
            count = unsupported.len(),
            types = ?types,
            "Schema entries discarded"
        );
        for discarded in unsupported {
            warn!(
                position = discarded.position,
                entry_type = %discarded.entry.kind,
                name = ?discarded.entry.name,
                reason = %discarded.reason,
                "Unsupported schema entry"
            );
        }
    }
}
