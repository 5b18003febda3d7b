//! Field and button type tags
//!
//! The closed sets of `type` values the engine understands. Anything else in
//! a schema is unsupported.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported input field type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Password,
    Tel,
    Url,
    Date,
    Range,
    Textarea,
    Select,
    Radios,
    Checkboxes,
    Checkbox,
    File,
}

impl FieldType {
    /// Every supported type, in declaration order
    pub const ALL: [FieldType; 13] = [
        Self::Text,
        Self::Email,
        Self::Password,
        Self::Tel,
        Self::Url,
        Self::Date,
        Self::Range,
        Self::Textarea,
        Self::Select,
        Self::Radios,
        Self::Checkboxes,
        Self::Checkbox,
        Self::File,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Tel => "tel",
            Self::Url => "url",
            Self::Date => "date",
            Self::Range => "range",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Radios => "radios",
            Self::Checkboxes => "checkboxes",
            Self::Checkbox => "checkbox",
            Self::File => "file",
        }
    }

    /// Types that carry an `options` list
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Select | Self::Radios | Self::Checkboxes)
    }

    /// Free-text types that may carry `mask` and `equalTo`
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Self::Text | Self::Email | Self::Password | Self::Url | Self::Tel
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = UnknownType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownType(s.to_string()))
    }
}

/// Button type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonType {
    /// Triggers the form's submit
    Submit,
    /// Triggers the form's reset
    Reset,
    /// Runs a host-supplied click handler
    Button,
}

impl ButtonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Reset => "reset",
            Self::Button => "button",
        }
    }
}

impl fmt::Display for ButtonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ButtonType {
    type Err = UnknownType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submit" => Ok(Self::Submit),
            "reset" => Ok(Self::Reset),
            "button" => Ok(Self::Button),
            other => Err(UnknownType(other.to_string())),
        }
    }
}

/// A `type` tag outside the supported set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown type: {0}")]
pub struct UnknownType(pub String);
