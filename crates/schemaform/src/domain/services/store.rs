//! Field State Store
//!
//! Derives, updates and resets the value map. Every operation is pure: it
//! returns a new map and leaves its input untouched.

use crate::domain::events::RenderCommand;
use crate::domain::schema::{FieldKind, FieldSpec};
use crate::domain::value_objects::{ChangeInput, FieldValue, ValueMap};
use crate::error::{FormsError, Result};

pub struct FieldStateStore;

impl FieldStateStore {
    /// Initial value of a field of the given kind
    pub fn initial_value(kind: &FieldKind) -> FieldValue {
        match kind {
            FieldKind::Select { options } => {
                FieldValue::Text(options.first().cloned().unwrap_or_default())
            }
            FieldKind::Checkboxes { options } => FieldValue::Flags(vec![false; options.len()]),
            FieldKind::Checkbox => FieldValue::Checked(false),
            FieldKind::File { .. } => FieldValue::Files(Vec::new()),
            FieldKind::Text(_) | FieldKind::Textarea | FieldKind::Radios { .. } => {
                FieldValue::empty_text()
            }
        }
    }

    /// One entry per named field; a later duplicate overwrites an earlier one
    pub fn create_initial_values(fields: &[FieldSpec]) -> ValueMap {
        let mut values = ValueMap::new();
        for field in fields {
            if let Some(name) = &field.name {
                values.insert(name.clone(), Self::initial_value(&field.kind));
            }
        }
        values
    }

    /// New map with the value of `field` replaced according to `input`
    pub fn apply_update(
        map: &ValueMap,
        field: &FieldSpec,
        input: &ChangeInput,
    ) -> Result<ValueMap> {
        let name = field.name.as_deref().ok_or_else(|| FormsError::InvalidChange {
            field: field.id.clone().unwrap_or_default(),
            reason: "field has no name".into(),
        })?;

        let mismatch = || FormsError::InvalidChange {
            field: name.to_string(),
            reason: format!("unexpected input for a '{}' field", field.field_type()),
        };

        let value = match (&field.kind, input) {
            (FieldKind::File { .. }, ChangeInput::Files(files)) => FieldValue::Files(files.clone()),
            (FieldKind::Checkboxes { options }, ChangeInput::Toggle(index)) => {
                let mut flags = map
                    .get(name)
                    .and_then(FieldValue::as_flags)
                    .map(<[bool]>::to_vec)
                    .unwrap_or_else(|| vec![false; options.len()]);
                let flag = flags.get_mut(*index).ok_or_else(|| FormsError::OptionOutOfRange {
                    field: name.to_string(),
                    index: *index,
                    len: options.len(),
                })?;
                *flag = !*flag;
                FieldValue::Flags(flags)
            }
            (FieldKind::Checkbox, ChangeInput::Checked(checked)) => FieldValue::Checked(*checked),
            (FieldKind::Radios { options }, ChangeInput::Text(value)) => {
                if !value.is_empty() && !options.contains(value) {
                    return Err(FormsError::UnknownOption {
                        field: name.to_string(),
                        value: value.clone(),
                    });
                }
                FieldValue::Text(value.clone())
            }
            (
                FieldKind::Text(_) | FieldKind::Textarea | FieldKind::Select { .. },
                ChangeInput::Text(value),
            ) => FieldValue::Text(value.clone()),
            _ => return Err(mismatch()),
        };

        Ok(map.with_value(name, value))
    }

    /// Initial values again, plus commands clearing uncontrolled widgets
    pub fn reset(fields: &[FieldSpec]) -> (ValueMap, Vec<RenderCommand>) {
        let commands = fields
            .iter()
            .filter(|f| matches!(f.kind, FieldKind::File { .. }))
            .filter_map(|f| f.name.clone())
            .map(|field| RenderCommand::ClearNativeState { field })
            .collect();
        (Self::create_initial_values(fields), commands)
    }

    /// Only the entries a user actually filled
    pub fn snapshot_filled(map: &ValueMap) -> ValueMap {
        map.filled()
    }
}
