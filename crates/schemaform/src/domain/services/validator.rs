//! Cross-Field Validator
//!
//! Equality constraints between fields and file acceptance. Results are
//! [`Validity`] values, never errors.

use crate::config::FormConfig;
use crate::domain::schema::{FieldKind, FieldSpec};
use crate::domain::value_objects::{AcceptList, FieldValue, FileHandle, ValueMap, Validity};

/// Invalid with `message` unless `value` equals `other`
pub fn validate_equal_to(value: &FieldValue, other: &FieldValue, message: &str) -> Validity {
    if value == other {
        Validity::Valid
    } else {
        Validity::Invalid(message.to_string())
    }
}

/// Invalid with `message` if any file is outside `accept`
///
/// An empty accept list or an empty selection is always valid.
pub fn validate_file_accept(files: &[FileHandle], accept: &AcceptList, message: &str) -> Validity {
    if accept.is_empty() || files.iter().all(|f| accept.accepts(f)) {
        Validity::Valid
    } else {
        Validity::Invalid(message.to_string())
    }
}

/// Validator bound to a form's messages
#[derive(Clone, Debug)]
pub struct CrossFieldValidator {
    mismatch_message: String,
    file_format_message: String,
}

impl CrossFieldValidator {
    pub fn new(config: &FormConfig) -> Self {
        Self {
            mismatch_message: config.mismatch_message.clone(),
            file_format_message: config.file_format_message.clone(),
        }
    }

    /// Fields whose equality constraint involves `changed`, on either side
    pub fn dependents<'a>(
        fields: &'a [FieldSpec],
        changed: &'a str,
    ) -> impl Iterator<Item = &'a FieldSpec> + 'a {
        fields.iter().filter(move |f| match (&f.name, &f.equal_to) {
            (Some(name), Some(target)) => name == changed || target == changed,
            _ => false,
        })
    }

    /// Re-derive validity for every equality pair touching `changed`
    ///
    /// Returns `(dependent field name, validity)`. A constraint naming a
    /// field the map does not hold is skipped.
    pub fn revalidate_equality(
        &self,
        fields: &[FieldSpec],
        values: &ValueMap,
        changed: &str,
    ) -> Vec<(String, Validity)> {
        Self::dependents(fields, changed)
            .filter_map(|field| {
                let name = field.name.as_deref()?;
                let target = field.equal_to.as_deref()?;
                let value = values.get(name)?;
                let other = values.get(target)?;
                let message = field.err_msg().unwrap_or(&self.mismatch_message);
                Some((name.to_string(), validate_equal_to(value, other, message)))
            })
            .collect()
    }

    /// File acceptance for a file field; `None` for any other kind
    pub fn validate_files(&self, field: &FieldSpec, files: &[FileHandle]) -> Option<Validity> {
        match &field.kind {
            FieldKind::File { accept } => Some(validate_file_accept(
                files,
                accept,
                &self.file_format_message,
            )),
            _ => None,
        }
    }
}
