//! Session configuration
//!
//! Plain structs with defaults; hosts may deserialize them from their own
//! configuration sources.

use serde::{Deserialize, Serialize};

/// Form session configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Message used when an `equalTo` field has no `errMsg` of its own
    pub mismatch_message: String,
    /// Message attached to a file field holding a rejected file
    pub file_format_message: String,
    /// Emit a warning when schema entries are discarded
    pub warn_on_unsupported: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            mismatch_message: "Fields don't match".into(),
            file_format_message: "File format not supported".into(),
            warn_on_unsupported: true,
        }
    }
}

/// Builder session configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Refuse to finalize while drafts are incomplete or names collide
    pub block_invalid_finalize: bool,
    /// Validity message for a draft whose name is already taken
    pub duplicate_name_message: String,
    /// Label of the synthesized submit button
    pub submit_label: String,
    /// Label of the synthesized reset button
    pub reset_label: String,
    /// Exclusive upper bound of the random id suffix
    pub id_suffix_range: u32,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            block_invalid_finalize: true,
            duplicate_name_message: "This name has already been used!".into(),
            submit_label: "SUBMIT".into(),
            reset_label: "RESET".into(),
            id_suffix_range: 1000,
        }
    }
}
