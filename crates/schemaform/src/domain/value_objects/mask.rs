//! Mask Value Object
//!
//! Bidirectional transform between the raw text a user typed and the masked
//! string shown in the widget. In a template, `#` marks a position filled
//! from the raw input; every other character is a literal separator.
//!
//! The two directions are asymmetric:
//! - [`Mask::apply`] walks the template and consumes raw input only at `#`.
//! - [`Mask::strip`] compares position by position and keeps a character
//!   only when it differs from the template character at the same index.
//!
//! A character that happens to equal the template literal at its position is
//! therefore dropped by [`Mask::strip`]. With `+39 ### ### ####`, pasting
//! `1399` into an empty field yields `19`: the `3` at index 1 and the `9` at
//! index 2 match the literals `3` and `9` and are lost.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder character of a mask template
pub const MASK_SLOT: char = '#';

/// Mask template
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mask(String);

impl Mask {
    /// Create a mask; an empty template yields `None`
    pub fn new(template: impl Into<String>) -> Option<Self> {
        let template = template.into();
        if template.is_empty() {
            None
        } else {
            Some(Self(template))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of `#` slots in the template
    pub fn slots(&self) -> usize {
        self.0.chars().filter(|&c| c == MASK_SLOT).count()
    }

    /// Render raw input through the template
    ///
    /// Stops as soon as either the input or the template runs out, so the
    /// result is never right-padded with trailing literals.
    pub fn apply(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        let mut input = raw.chars().peekable();
        let mut masked = String::with_capacity(self.0.len());

        for slot in self.0.chars() {
            if input.peek().is_none() {
                break;
            }
            if slot == MASK_SLOT {
                if let Some(c) = input.next() {
                    masked.push(c);
                }
            } else {
                masked.push(slot);
            }
        }

        masked
    }

    /// Recover raw input from a masked string, position by position
    pub fn strip(&self, masked: &str) -> String {
        let mut template = self.0.chars();
        masked
            .chars()
            .filter(|&c| template.next() != Some(c))
            .collect()
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mask `raw` with `template`; an empty template returns `raw` unchanged
pub fn mask(raw: &str, template: &str) -> String {
    match Mask::new(template) {
        Some(m) => m.apply(raw),
        None => raw.to_string(),
    }
}

/// Unmask `masked` with `template`; an empty template returns it unchanged
pub fn unmask(masked: &str, template: &str) -> String {
    match Mask::new(template) {
        Some(m) => m.strip(masked),
        None => masked.to_string(),
    }
}
