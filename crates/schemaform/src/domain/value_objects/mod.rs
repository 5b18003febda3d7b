//! Value Objects module
//!
//! Immutable domain primitives shared by the form and builder sessions.

pub mod change;
pub mod field_type;
pub mod field_value;
pub mod file;
pub mod mask;

pub use change::{ChangeEvent, ChangeInput, NormalizedChange};
pub use field_type::{ButtonType, FieldType, UnknownType};
pub use field_value::{FieldValue, ValueMap};
pub use file::{file_list_label, AcceptList, FileHandle, NO_FILE_LABEL};
pub use mask::{mask, unmask, Mask, MASK_SLOT};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a mounted session
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content hash of a schema
///
/// Changes iff the serialized schema changes; hosts use it as the identity
/// of the session built from that schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaKey(i32);

impl SchemaKey {
    /// 32-bit string hash: `h = h * 31 + unit` over UTF-16 code units
    pub fn of_str(s: &str) -> Self {
        let hash = s
            .encode_utf16()
            .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32));
        Self(hash)
    }

    pub const fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validity of one field
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Validity {
    #[default]
    Valid,
    Invalid(String),
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Message of an invalid field
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(msg) => Some(msg),
        }
    }
}
