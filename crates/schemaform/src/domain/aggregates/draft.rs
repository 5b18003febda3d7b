//! Field drafts edited by the builder

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::schema::{
    CheckboxOption, SchemaEntry, ATTR_EQUAL_TO, ATTR_ERR_MSG, ATTR_MASK, ATTR_OPTIONS,
};
use crate::domain::value_objects::FieldType;
use crate::error::{FormsError, Result};

/// HTML attributes a draft may carry besides its typed attributes
pub const SUPPORTED_HTML_ATTRIBUTES: [&str; 17] = [
    "accept",
    "autoComplete",
    "autoFocus",
    "capture",
    "dirname",
    "disabled",
    "form",
    "max",
    "maxLength",
    "min",
    "minLength",
    "multiple",
    "pattern",
    "placeholder",
    "readOnly",
    "size",
    "step",
];

/// A `{name, value}` pair spread onto the entry at finalize
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlAttribute {
    pub name: String,
    pub value: String,
}

/// Options of an option-bearing draft
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DraftOptions {
    /// select, radios
    Choices(Vec<String>),
    /// checkboxes
    Checkboxes(Vec<CheckboxOption>),
}

impl DraftOptions {
    /// One empty option of the shape `field_type` expects
    fn seed(field_type: FieldType) -> Option<Self> {
        match field_type {
            FieldType::Select | FieldType::Radios => Some(Self::Choices(vec![String::new()])),
            FieldType::Checkboxes => Some(Self::Checkboxes(vec![CheckboxOption::default()])),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Choices(c) => c.len(),
            Self::Checkboxes(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn to_value(&self) -> Value {
        match self {
            Self::Choices(c) => json!(c),
            Self::Checkboxes(c) => json!(c),
        }
    }
}

/// Edit applied to one draft
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DraftPatch {
    SetName(String),
    SetType(Option<FieldType>),
    ToggleRequired,
    SetLabel(String),
    SetInfo(String),
    SetErrMsg(String),
    SetMask(String),
    SetEqualTo(String),
    AddOption,
    SetOptionLabel { index: usize, label: String },
    ToggleOptionRequired(usize),
    RemoveOption(usize),
    AddAttribute,
    SetAttributeName { index: usize, name: String },
    SetAttributeValue { index: usize, value: String },
    RemoveAttribute(usize),
}

/// A field under construction
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<DraftOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equal_to: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err_msg: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_attribs: Vec<HtmlAttribute>,
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

impl FieldDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name and type are both set
    pub fn is_complete(&self) -> bool {
        self.name.is_some() && self.field_type.is_some()
    }

    fn is_text(&self) -> bool {
        self.field_type.map_or(false, |t| t.is_text())
    }

    fn has_options(&self) -> bool {
        self.field_type.map_or(false, |t| t.has_options())
    }

    /// Copy of this draft with `patch` applied
    ///
    /// `id_suffix` is used only when the patch sets a non-empty name.
    pub fn apply(&self, patch: &DraftPatch, id_suffix: u32) -> Result<Self> {
        let mut next = self.clone();
        match patch {
            DraftPatch::SetName(name) => {
                next.name = non_empty(name);
                next.id = next.name.as_ref().map(|n| format!("{}-{}", n, id_suffix));
            }
            DraftPatch::SetType(field_type) => next.change_type(*field_type),
            DraftPatch::ToggleRequired => {
                if self.field_type == Some(FieldType::Checkboxes) {
                    return Err(FormsError::PatchMismatch(
                        "checkbox groups mark individual options as required".into(),
                    ));
                }
                next.required = !next.required;
            }
            DraftPatch::SetLabel(label) => next.label = non_empty(label),
            DraftPatch::SetInfo(info) => next.info = non_empty(info),
            DraftPatch::SetErrMsg(msg) => next.err_msg = non_empty(msg),
            DraftPatch::SetMask(mask) => {
                next.require_text("mask")?;
                next.mask = non_empty(mask);
            }
            DraftPatch::SetEqualTo(target) => {
                next.require_text("equalTo")?;
                next.equal_to = non_empty(target);
            }
            DraftPatch::AddOption => match next.options_mut()? {
                DraftOptions::Choices(c) => c.push(String::new()),
                DraftOptions::Checkboxes(c) => c.push(CheckboxOption::default()),
            },
            DraftPatch::SetOptionLabel { index, label } => match next.options_mut()? {
                DraftOptions::Choices(c) => *option_at(c, *index)? = label.clone(),
                DraftOptions::Checkboxes(c) => option_at(c, *index)?.label = label.clone(),
            },
            DraftPatch::ToggleOptionRequired(index) => match next.options_mut()? {
                DraftOptions::Checkboxes(c) => {
                    let option = option_at(c, *index)?;
                    if option.label.is_empty() {
                        return Err(FormsError::PatchMismatch(
                            "option needs a label before it can be required".into(),
                        ));
                    }
                    option.required = !option.required;
                }
                DraftOptions::Choices(_) => {
                    return Err(FormsError::PatchMismatch(
                        "only checkbox options can be required".into(),
                    ))
                }
            },
            DraftPatch::RemoveOption(index) => {
                let options = next.options_mut()?;
                if options.len() <= 1 {
                    return Err(FormsError::LastOption);
                }
                match options {
                    DraftOptions::Choices(c) => {
                        option_at(c, *index)?;
                        c.remove(*index);
                    }
                    DraftOptions::Checkboxes(c) => {
                        option_at(c, *index)?;
                        c.remove(*index);
                    }
                }
            }
            DraftPatch::AddAttribute => next.additional_attribs.push(HtmlAttribute::default()),
            DraftPatch::SetAttributeName { index, name } => {
                if !name.is_empty() && !SUPPORTED_HTML_ATTRIBUTES.contains(&name.as_str()) {
                    return Err(FormsError::UnsupportedAttribute(name.clone()));
                }
                attribute_at(&mut next.additional_attribs, *index)?.name = name.clone();
            }
            DraftPatch::SetAttributeValue { index, value } => {
                let attribute = attribute_at(&mut next.additional_attribs, *index)?;
                if attribute.name.is_empty() {
                    return Err(FormsError::PatchMismatch(
                        "choose the attribute name before its value".into(),
                    ));
                }
                attribute.value = value.clone();
            }
            DraftPatch::RemoveAttribute(index) => {
                attribute_at(&mut next.additional_attribs, *index)?;
                next.additional_attribs.remove(*index);
            }
        }
        Ok(next)
    }

    fn change_type(&mut self, field_type: Option<FieldType>) {
        if self.field_type.is_some() && self.field_type != field_type {
            if self.has_options() {
                self.options = None;
            }
            if self.is_text() {
                self.mask = None;
                self.equal_to = None;
            }
        }
        self.field_type = field_type;
        if self.options.is_none() {
            self.options = field_type.and_then(DraftOptions::seed);
        }
    }

    fn require_text(&self, what: &str) -> Result<()> {
        if self.is_text() {
            Ok(())
        } else {
            Err(FormsError::PatchMismatch(format!(
                "'{}' applies only to text fields",
                what
            )))
        }
    }

    fn options_mut(&mut self) -> Result<&mut DraftOptions> {
        self.options
            .as_mut()
            .ok_or_else(|| FormsError::PatchMismatch("draft type has no options".into()))
    }

    /// Schema entry for this draft, with HTML attributes spread on top
    pub fn to_entry(&self) -> SchemaEntry {
        let mut entry = SchemaEntry::new(
            self.field_type
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
        );
        entry.name = self.name.clone();
        entry.id = self.id.clone();

        let attrs = &mut entry.attributes;
        if let Some(options) = &self.options {
            attrs.insert(ATTR_OPTIONS.into(), options.to_value());
        }
        if let Some(mask) = &self.mask {
            attrs.insert(ATTR_MASK.into(), json!(mask));
        }
        if let Some(target) = &self.equal_to {
            attrs.insert(ATTR_EQUAL_TO.into(), json!(target));
        }
        if self.required {
            attrs.insert("required".into(), json!(true));
        }
        if let Some(label) = &self.label {
            attrs.insert("label".into(), json!(label));
        }
        if let Some(info) = &self.info {
            attrs.insert("info".into(), json!(info));
        }
        if let Some(msg) = &self.err_msg {
            attrs.insert(ATTR_ERR_MSG.into(), json!(msg));
        }
        for attribute in self.additional_attribs.iter().filter(|a| !a.name.is_empty()) {
            attrs.insert(attribute.name.clone(), json!(attribute.value));
        }

        entry
    }
}

fn option_at<T>(options: &mut [T], index: usize) -> Result<&mut T> {
    options.get_mut(index).ok_or(FormsError::EntryOutOfRange {
        what: "option",
        index,
    })
}

fn attribute_at(attributes: &mut [HtmlAttribute], index: usize) -> Result<&mut HtmlAttribute> {
    attributes.get_mut(index).ok_or(FormsError::EntryOutOfRange {
        what: "attribute",
        index,
    })
}
