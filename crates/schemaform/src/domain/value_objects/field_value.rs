//! Field values and the per-session value map

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::file::FileHandle;

/// Current value of one field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text-like fields, textarea, select, radios
    Text(String),
    /// Single checkbox
    Checked(bool),
    /// Checkbox group, one flag per option
    Flags(Vec<bool>),
    /// File input
    Files(Vec<FileHandle>),
}

impl FieldValue {
    pub fn empty_text() -> Self {
        Self::Text(String::new())
    }

    /// Truthiness used when collecting filled fields
    ///
    /// Empty strings, empty sequences and `false` are falsy. A non-empty
    /// checkbox group is truthy even when every flag is off.
    pub fn is_filled(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::Checked(c) => *c,
            Self::Flags(flags) => !flags.is_empty(),
            Self::Files(files) => !files.is_empty(),
        }
    }

    pub fn as_flags(&self) -> Option<&[bool]> {
        match self {
            Self::Flags(flags) => Some(flags),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Checked(b)
    }
}

/// Mapping from field name to current value
///
/// Updates never mutate a map in place: [`ValueMap::with_value`] returns a
/// new map, so a reader holding the previous map keeps a consistent view.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueMap(BTreeMap<String, FieldValue>);

impl ValueMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Copy of this map with exactly one entry replaced
    pub fn with_value(&self, name: &str, value: FieldValue) -> Self {
        let mut next = self.0.clone();
        next.insert(name.to_string(), value);
        Self(next)
    }

    /// Copy holding only filled entries
    pub fn filled(&self) -> Self {
        self.iter()
            .filter(|(_, v)| v.is_filled())
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.0.insert(name.into(), value);
    }
}

impl FromIterator<(String, FieldValue)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_excludes_falsy_values() {
        let map: ValueMap = vec![
            ("a".to_string(), FieldValue::from("")),
            ("b".to_string(), FieldValue::from("x")),
            ("c".to_string(), FieldValue::Checked(false)),
            ("d".to_string(), FieldValue::Files(vec![FileHandle::new("1", 1, "")])),
            ("e".to_string(), FieldValue::Files(vec![])),
        ]
        .into_iter()
        .collect();

        let filled = map.filled();
        assert_eq!(filled.names().collect::<Vec<_>>(), vec!["b", "d"]);
    }

    #[test]
    fn test_checkbox_group_truthiness() {
        assert!(FieldValue::Flags(vec![false, false]).is_filled());
        assert!(!FieldValue::Flags(vec![]).is_filled());
    }

    #[test]
    fn test_with_value_leaves_original_untouched() {
        let before = ValueMap::new().with_value("name", "Ada".into());
        let after = before.with_value("name", "Grace".into());
        assert_eq!(before.get("name"), Some(&FieldValue::from("Ada")));
        assert_eq!(after.get("name"), Some(&FieldValue::from("Grace")));
    }

    #[test]
    fn test_value_map_serializes_as_plain_object() {
        let map = ValueMap::new()
            .with_value("name", "Ada".into())
            .with_value("privacy", FieldValue::Flags(vec![true, false]))
            .with_value("agree", true.into());
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"agree": true, "name": "Ada", "privacy": [true, false]})
        );
    }
}
