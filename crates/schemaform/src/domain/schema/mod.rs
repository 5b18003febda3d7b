//! Schema records
//!
//! A schema is an ordered array of plain records, the one interchange format
//! of the system. [`SchemaEntry`] preserves a record exactly as authored;
//! [`FieldSpec`] and [`ButtonSpec`] are the typed views the classifier
//! derives from supported entries.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::value_objects::{AcceptList, ButtonType, FieldType, Mask, SchemaKey};
use crate::error::Result;

pub const ATTR_TYPE: &str = "type";
pub const ATTR_OPTIONS: &str = "options";
pub const ATTR_MASK: &str = "mask";
pub const ATTR_EQUAL_TO: &str = "equalTo";
pub const ATTR_ACCEPT: &str = "accept";
pub const ATTR_ERR_MSG: &str = "errMsg";
pub const ATTR_VALUE: &str = "value";

/// One record of a schema, as authored
///
/// Deserialization never rejects a record: a `type`, `name` or `id` that is
/// missing or not a string stays among the attributes and `kind` is left
/// empty or the field `None`. A record that is not an object keeps its raw
/// value under the `value` attribute.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SchemaEntry {
    /// Empty when the record carries no string `type`
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Every other attribute, kept verbatim
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(Value::String(_)) => match map.remove(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

impl From<Value> for SchemaEntry {
    fn from(value: Value) -> Self {
        let mut attributes = match value {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert(ATTR_VALUE.to_string(), other);
                map
            }
        };
        Self {
            kind: take_string(&mut attributes, ATTR_TYPE).unwrap_or_default(),
            name: take_string(&mut attributes, "name"),
            id: take_string(&mut attributes, "id"),
            attributes,
        }
    }
}

impl<'de> Deserialize<'de> for SchemaEntry {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from)
    }
}

impl SchemaEntry {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            id: None,
            attributes: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// String attribute, if present and a string
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }
}

/// Parse a JSON schema array
///
/// Fails only when `json` is not an array; ill-formed records are kept and
/// end up unsupported when classified.
pub fn parse_schema(json: &str) -> Result<Vec<SchemaEntry>> {
    Ok(serde_json::from_str(json)?)
}

/// Deterministic content hash of a schema
pub fn schema_key(schema: &[SchemaEntry]) -> Result<SchemaKey> {
    let serialized = serde_json::to_string(schema)?;
    Ok(SchemaKey::of_str(&serialized))
}

/// Option of a checkbox group
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckboxOption {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub required: bool,
}

impl CheckboxOption {
    pub fn new(label: impl Into<String>, required: bool) -> Self {
        Self {
            label: label.into(),
            required,
        }
    }
}

/// Type-specific shape of a supported field
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// text, email, password, tel, url, date, range
    Text(FieldType),
    Textarea,
    Select { options: Vec<String> },
    Radios { options: Vec<String> },
    Checkboxes { options: Vec<CheckboxOption> },
    Checkbox,
    File { accept: AcceptList },
}

impl FieldKind {
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Text(ty) => *ty,
            Self::Textarea => FieldType::Textarea,
            Self::Select { .. } => FieldType::Select,
            Self::Radios { .. } => FieldType::Radios,
            Self::Checkboxes { .. } => FieldType::Checkboxes,
            Self::Checkbox => FieldType::Checkbox,
            Self::File { .. } => FieldType::File,
        }
    }
}

/// Typed view of a supported field entry
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    /// Value map key; fields without a name hold no value
    pub name: Option<String>,
    /// Presentation identifier, never a key
    pub id: Option<String>,
    pub kind: FieldKind,
    pub mask: Option<Mask>,
    /// Name of the field this one must equal
    pub equal_to: Option<String>,
    /// Descriptive and passthrough attributes, forwarded verbatim
    pub attributes: Map<String, Value>,
}

impl FieldSpec {
    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    pub fn err_msg(&self) -> Option<&str> {
        self.attributes.get(ATTR_ERR_MSG).and_then(Value::as_str)
    }

    /// Parse the typed view of an entry whose `type` is a field type
    pub fn from_entry(entry: &SchemaEntry) -> std::result::Result<Self, DiscardReason> {
        if entry.kind.is_empty() {
            return Err(DiscardReason::Malformed("record has no string 'type'".into()));
        }
        let field_type: FieldType = entry
            .kind
            .parse()
            .map_err(|_| DiscardReason::UnknownType)?;

        let kind = match field_type {
            FieldType::Textarea => FieldKind::Textarea,
            FieldType::Checkbox => FieldKind::Checkbox,
            FieldType::Select => FieldKind::Select {
                options: string_options(entry)?,
            },
            FieldType::Radios => FieldKind::Radios {
                options: string_options(entry)?,
            },
            FieldType::Checkboxes => FieldKind::Checkboxes {
                options: checkbox_options(entry)?,
            },
            FieldType::File => FieldKind::File {
                accept: entry
                    .attr_str(ATTR_ACCEPT)
                    .map(AcceptList::parse)
                    .unwrap_or_default(),
            },
            text => FieldKind::Text(text),
        };

        let mut attributes = entry.attributes.clone();
        for typed in [ATTR_OPTIONS, ATTR_MASK, ATTR_EQUAL_TO] {
            attributes.remove(typed);
        }

        Ok(Self {
            name: entry.name.clone().filter(|n| !n.is_empty()),
            id: entry.id.clone(),
            kind,
            mask: entry.attr_str(ATTR_MASK).and_then(Mask::new),
            equal_to: entry
                .attr_str(ATTR_EQUAL_TO)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            attributes,
        })
    }
}

fn string_options(entry: &SchemaEntry) -> std::result::Result<Vec<String>, DiscardReason> {
    let raw = entry
        .attributes
        .get(ATTR_OPTIONS)
        .ok_or_else(|| DiscardReason::Malformed(format!("'{}' requires options", entry.kind)))?;
    serde_json::from_value(raw.clone())
        .map_err(|e| DiscardReason::Malformed(format!("options must be strings: {}", e)))
}

fn checkbox_options(
    entry: &SchemaEntry,
) -> std::result::Result<Vec<CheckboxOption>, DiscardReason> {
    let raw = entry
        .attributes
        .get(ATTR_OPTIONS)
        .ok_or_else(|| DiscardReason::Malformed("'checkboxes' requires options".into()))?;
    serde_json::from_value(raw.clone()).map_err(|e| {
        DiscardReason::Malformed(format!("options must be {{label, required}} records: {}", e))
    })
}

/// Typed view of a button entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonSpec {
    pub kind: ButtonType,
    pub name: Option<String>,
    pub id: Option<String>,
    /// Caption shown on the button
    pub value: Option<String>,
}

impl ButtonSpec {
    pub fn from_entry(entry: &SchemaEntry) -> Option<Self> {
        let kind = entry.kind.parse().ok()?;
        Some(Self {
            kind,
            name: entry.name.clone(),
            id: entry.id.clone(),
            value: entry.attr_str(ATTR_VALUE).map(str::to_string),
        })
    }

    /// Key under which a click handler is registered: name, else id
    pub fn key(&self) -> Option<&str> {
        self.name.as_deref().or(self.id.as_deref())
    }
}

/// Why an entry was left out of the form
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiscardReason {
    /// `type` is neither a field nor a button type
    UnknownType,
    /// Supported type with an unusable payload
    Malformed(String),
}

impl std::fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownType => write!(f, "unsupported type"),
            Self::Malformed(reason) => write!(f, "malformed field: {}", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_round_trips_unknown_attributes() {
        let raw = json!({
            "type": "text",
            "name": "user",
            "id": "user-1",
            "maxLength": "10",
            "required": true
        });
        let entry: SchemaEntry = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(entry.kind, "text");
        assert_eq!(entry.attributes.get("maxLength"), Some(&json!("10")));
        assert_eq!(serde_json::to_value(&entry).unwrap(), raw);
    }

    #[test]
    fn test_select_field_spec() {
        let entry = SchemaEntry::new("select")
            .with_name("country")
            .with_attr("options", json!(["Italy", "USA"]))
            .with_attr("label", "Select your country");
        let spec = FieldSpec::from_entry(&entry).unwrap();
        assert_eq!(
            spec.kind,
            FieldKind::Select {
                options: vec!["Italy".into(), "USA".into()]
            }
        );
        assert!(!spec.attributes.contains_key("options"));
        assert_eq!(spec.attributes.get("label"), Some(&json!("Select your country")));
    }

    #[test]
    fn test_checkbox_options_default_required() {
        let entry = SchemaEntry::new("checkboxes")
            .with_name("privacy")
            .with_attr("options", json!([{"label": "a", "required": true}, {"label": "b"}]));
        let spec = FieldSpec::from_entry(&entry).unwrap();
        assert_eq!(
            spec.kind,
            FieldKind::Checkboxes {
                options: vec![CheckboxOption::new("a", true), CheckboxOption::new("b", false)]
            }
        );
    }

    #[test]
    fn test_select_without_options_is_malformed() {
        let entry = SchemaEntry::new("select").with_name("country");
        assert!(matches!(
            FieldSpec::from_entry(&entry),
            Err(DiscardReason::Malformed(_))
        ));
    }

    #[test]
    fn test_text_field_with_mask_and_equal_to() {
        let entry = SchemaEntry::new("password")
            .with_name("confirmPassword")
            .with_attr("equalTo", "password")
            .with_attr("errMsg", "The two password fields must be identical!");
        let spec = FieldSpec::from_entry(&entry).unwrap();
        assert_eq!(spec.kind, FieldKind::Text(FieldType::Password));
        assert_eq!(spec.equal_to.as_deref(), Some("password"));
        assert_eq!(spec.err_msg(), Some("The two password fields must be identical!"));
        assert!(spec.mask.is_none());
    }

    #[test]
    fn test_file_field_accept() {
        let entry = SchemaEntry::new("file")
            .with_name("cv")
            .with_attr("accept", ".pdf, .doc");
        let spec = FieldSpec::from_entry(&entry).unwrap();
        match spec.kind {
            FieldKind::File { accept } => assert_eq!(accept.tokens(), &[".pdf", ".doc"]),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_button_spec_key_falls_back_to_id() {
        let entry = SchemaEntry::new("button").with_id("custom-1").with_attr("value", "LOG");
        let button = ButtonSpec::from_entry(&entry).unwrap();
        assert_eq!(button.kind, ButtonType::Button);
        assert_eq!(button.key(), Some("custom-1"));
        assert_eq!(button.value.as_deref(), Some("LOG"));
    }

    #[test]
    fn test_schema_key_tracks_content() {
        let a = vec![SchemaEntry::new("text").with_name("a")];
        let b = vec![SchemaEntry::new("text").with_name("b")];
        assert_eq!(schema_key(&a).unwrap(), schema_key(&a.clone()).unwrap());
        assert_ne!(schema_key(&a).unwrap(), schema_key(&b).unwrap());
    }

    #[test]
    fn test_schema_key_tracks_order() {
        let x = SchemaEntry::new("text").with_name("x");
        let y = SchemaEntry::new("email").with_name("y");
        let forward = vec![x.clone(), y.clone()];
        let backward = vec![y, x];
        assert_ne!(schema_key(&forward).unwrap(), schema_key(&backward).unwrap());
    }

    #[test]
    fn test_ill_formed_records_still_parse() {
        let schema =
            parse_schema(r#"[{"type":"text","name":"a"},{"name":"orphan"},{"type":7,"name":"n"}]"#)
                .unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema[0].kind, "text");
        assert_eq!(schema[1].kind, "");
        assert_eq!(schema[1].name.as_deref(), Some("orphan"));
        assert_eq!(schema[2].kind, "");
        assert_eq!(schema[2].attributes.get("type"), Some(&json!(7)));
    }

    #[test]
    fn test_ill_formed_records_round_trip() {
        let raw = json!([{"type": 7, "name": "n"}, {"type": "text", "id": 3}, "loose"]);
        let schema: Vec<SchemaEntry> = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(schema[1].kind, "text");
        assert!(schema[1].id.is_none());
        assert_eq!(schema[2].attr_str("value"), Some("loose"));
        assert_eq!(
            serde_json::to_value(&schema[..2]).unwrap(),
            json!([{"type": 7, "name": "n"}, {"type": "text", "id": 3}])
        );
    }

    #[test]
    fn test_parse_schema_requires_array() {
        assert!(parse_schema(r#"{"type":"text"}"#).is_err());
    }

    #[test]
    fn test_parse_schema() {
        let schema = parse_schema(r#"[{"type":"text","name":"a"},{"type":"submit","value":"GO"}]"#)
            .unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema[1].attr_str("value"), Some("GO"));
    }
}
