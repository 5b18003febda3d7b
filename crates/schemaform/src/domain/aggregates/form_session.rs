//! Form Session Aggregate
//!
//! One mounted form: owns the classified schema, the value map and the
//! per-field validity, and routes change, submit and reset events.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::FormConfig;
use crate::domain::events::{DiscardedEntry, FormEvent, RenderCommand};
use crate::domain::schema::{schema_key, ButtonSpec, FieldKind, FieldSpec, SchemaEntry};
use crate::domain::services::{Classified, CrossFieldValidator, FieldStateStore, SchemaClassifier};
use crate::domain::value_objects::{
    file_list_label, ButtonType, ChangeEvent, ChangeInput, FieldValue, NormalizedChange,
    SchemaKey, SessionId, ValueMap, Validity,
};
use crate::error::{FormsError, Result};
use crate::ports::{ButtonHandler, HandlerResult, SubmitHandler};

/// Lifecycle of a form session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormState {
    #[default]
    Uninitialized,
    Ready,
    Submitting,
    Resetting,
    Destroyed,
}

/// Builds a [`FormSession`] from a schema and host handlers
pub struct FormSessionBuilder {
    schema: Vec<SchemaEntry>,
    config: FormConfig,
    submit_handler: Option<Box<dyn SubmitHandler>>,
    button_handlers: HashMap<String, Box<dyn ButtonHandler>>,
}

impl FormSessionBuilder {
    pub fn config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    pub fn submit_handler(mut self, handler: impl SubmitHandler + 'static) -> Self {
        self.submit_handler = Some(Box::new(handler));
        self
    }

    pub fn on_submit<F>(self, f: F) -> Self
    where
        F: FnMut(&ValueMap) -> HandlerResult + 'static,
    {
        self.submit_handler(f)
    }

    /// Register the handler of a `button` entry, keyed by its name (or id)
    pub fn button_handler(
        mut self,
        button: impl Into<String>,
        handler: impl ButtonHandler + 'static,
    ) -> Self {
        self.button_handlers.insert(button.into(), Box::new(handler));
        self
    }

    pub fn on_click<F>(self, button: impl Into<String>, f: F) -> Self
    where
        F: FnMut() -> HandlerResult + 'static,
    {
        self.button_handler(button, f)
    }

    /// Classify the schema, check button handlers and derive initial values
    pub fn build(self) -> Result<FormSession> {
        let schema_key = schema_key(&self.schema)?;
        let classified = SchemaClassifier::classify(&self.schema);

        for button in classified.buttons.iter().filter(|b| b.kind == ButtonType::Button) {
            let key = button.key().unwrap_or_default();
            if !self.button_handlers.contains_key(key) {
                return Err(FormsError::MissingButtonHandler(key.to_string()));
            }
        }

        let mut session = FormSession {
            id: SessionId::new(),
            schema_key,
            state: FormState::Uninitialized,
            validator: CrossFieldValidator::new(&self.config),
            config: self.config,
            values: Arc::new(FieldStateStore::create_initial_values(&classified.fields)),
            validity: BTreeMap::new(),
            classified,
            submit_handler: self.submit_handler,
            button_handlers: self.button_handlers,
            events: Vec::new(),
        };
        session.mount();
        Ok(session)
    }
}

/// A live form built from one schema
pub struct FormSession {
    id: SessionId,
    schema_key: SchemaKey,
    state: FormState,
    config: FormConfig,
    classified: Classified,
    values: Arc<ValueMap>,
    validity: BTreeMap<String, Validity>,
    validator: CrossFieldValidator,
    submit_handler: Option<Box<dyn SubmitHandler>>,
    button_handlers: HashMap<String, Box<dyn ButtonHandler>>,
    events: Vec<FormEvent>,
}

impl FormSession {
    pub fn builder(schema: impl Into<Vec<SchemaEntry>>) -> FormSessionBuilder {
        FormSessionBuilder {
            schema: schema.into(),
            config: FormConfig::default(),
            submit_handler: None,
            button_handlers: HashMap::new(),
        }
    }

    fn mount(&mut self) {
        if !self.classified.unsupported.is_empty() {
            if self.config.warn_on_unsupported {
                SchemaClassifier::report_unsupported(&self.classified.unsupported);
            }
            self.events.push(FormEvent::EntriesDiscarded {
                entries: self.classified.unsupported.clone(),
            });
        }

        self.state = FormState::Ready;
        self.events.push(FormEvent::Mounted {
            schema_key: self.schema_key,
            fields: self.classified.fields.len(),
            buttons: self.classified.buttons.len(),
            mounted_at: Utc::now(),
        });

        info!(
            session_id = %self.id,
            schema_key = %self.schema_key,
            fields = self.classified.fields.len(),
            buttons = self.classified.buttons.len(),
            "Form session mounted"
        );
    }

    // Getters
    pub fn id(&self) -> &SessionId { &self.id }
    pub fn schema_key(&self) -> SchemaKey { self.schema_key }
    pub fn state(&self) -> FormState { self.state }
    pub fn fields(&self) -> &[FieldSpec] { &self.classified.fields }
    pub fn buttons(&self) -> &[ButtonSpec] { &self.classified.buttons }
    pub fn unsupported(&self) -> &[DiscardedEntry] { &self.classified.unsupported }

    /// Snapshot of the current value map
    pub fn values(&self) -> Arc<ValueMap> {
        Arc::clone(&self.values)
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Validity of a field; fields never validated are valid
    pub fn validity(&self, name: &str) -> Validity {
        self.validity.get(name).cloned().unwrap_or_default()
    }

    /// Text the collaborator shows for a field
    ///
    /// Masked text for text-like fields, the selection label for file
    /// fields, `None` for toggles.
    pub fn display_value(&self, name: &str) -> Option<String> {
        let field = self.classified.field(name)?;
        match self.values.get(name)? {
            FieldValue::Text(raw) => Some(match &field.mask {
                Some(mask) => mask.apply(raw),
                None => raw.clone(),
            }),
            FieldValue::Files(files) => Some(file_list_label(files)),
            FieldValue::Checked(_) | FieldValue::Flags(_) => None,
        }
    }

    /// Drain accumulated events
    pub fn take_events(&mut self) -> Vec<FormEvent> {
        std::mem::take(&mut self.events)
    }

    fn ensure_live(&self) -> Result<()> {
        if self.state == FormState::Destroyed {
            return Err(FormsError::SessionDestroyed);
        }
        Ok(())
    }

    /// Apply one change from the collaborator
    pub fn on_field_change(&mut self, event: &ChangeEvent) -> Result<()> {
        self.ensure_live()?;

        let field = self
            .classified
            .field(&event.field)
            .cloned()
            .ok_or_else(|| FormsError::FieldNotFound(event.field.clone()))?;

        let change = NormalizedChange::from_event(event, field.mask.as_ref());
        let mut next = FieldStateStore::apply_update(&self.values, &field, change.input())?;

        let file_validity = match change.input() {
            ChangeInput::Files(files) => self.validator.validate_files(&field, files),
            _ => None,
        };
        if matches!(file_validity, Some(Validity::Invalid(_))) {
            next = next.with_value(change.field(), FieldValue::Files(Vec::new()));
        }

        self.values = Arc::new(next);
        if let Some(value) = self.values.get(change.field()) {
            debug!(field = %change.field(), value = ?value, "Field changed");
            self.events.push(FormEvent::FieldChanged {
                field: change.field().to_string(),
                value: value.clone(),
            });
        }

        if let Some(validity) = file_validity {
            self.set_validity(change.field(), validity);
        }

        let revalidated =
            self.validator
                .revalidate_equality(&self.classified.fields, &self.values, change.field());
        for (name, validity) in revalidated {
            self.set_validity(&name, validity);
        }

        Ok(())
    }

    fn set_validity(&mut self, name: &str, validity: Validity) {
        let previous = self.validity(name);
        if previous == validity {
            return;
        }
        debug!(field = %name, valid = validity.is_valid(), "Validity changed");
        if validity.is_valid() {
            self.validity.remove(name);
        } else {
            self.validity.insert(name.to_string(), validity.clone());
        }
        self.events.push(FormEvent::ValidityChanged {
            field: name.to_string(),
            validity,
        });
    }

    /// Hand the filled values to the submit handler, then reset
    pub fn on_submit(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.state = FormState::Submitting;

        let filled = FieldStateStore::snapshot_filled(&self.values);
        let mut handler_failed = false;

        match self.submit_handler.as_mut() {
            Some(handler) => {
                if let Err(e) = handler.submit(&filled) {
                    warn!(session_id = %self.id, error = %e, "Submit handler failed");
                    handler_failed = true;
                }
            }
            None => debug!(session_id = %self.id, "No submit handler registered"),
        }

        info!(
            session_id = %self.id,
            filled = filled.len(),
            handler_failed,
            "Form submitted"
        );
        self.events.push(FormEvent::Submitted {
            filled,
            handler_failed,
            submitted_at: Utc::now(),
        });

        self.reset_values();
        Ok(())
    }

    /// Restore initial values and clear validity
    pub fn on_reset(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.reset_values();
        Ok(())
    }

    fn reset_values(&mut self) {
        self.state = FormState::Resetting;

        let (values, commands) = FieldStateStore::reset(&self.classified.fields);
        self.values = Arc::new(values);

        let invalid: Vec<String> = self.validity.keys().cloned().collect();
        for name in invalid {
            self.set_validity(&name, Validity::Valid);
        }

        self.events
            .extend(commands.into_iter().map(FormEvent::Render));
        self.events.push(FormEvent::Reset { reset_at: Utc::now() });
        debug!(session_id = %self.id, "Form reset");

        self.state = FormState::Ready;
    }

    /// Route a click on the button registered under `button`
    pub fn click(&mut self, button: &str) -> Result<()> {
        self.ensure_live()?;

        let kind = self
            .classified
            .buttons
            .iter()
            .find(|b| b.key() == Some(button))
            .map(|b| b.kind)
            .ok_or_else(|| FormsError::ButtonNotFound(button.to_string()))?;

        self.events.push(FormEvent::ButtonClicked {
            button: button.to_string(),
        });

        match kind {
            ButtonType::Submit => self.on_submit(),
            ButtonType::Reset => self.on_reset(),
            ButtonType::Button => {
                let handler = self
                    .button_handlers
                    .get_mut(button)
                    .ok_or_else(|| FormsError::MissingButtonHandler(button.to_string()))?;
                handler.click().map_err(|e| {
                    warn!(button = %button, error = %e, "Button handler failed");
                    FormsError::from(e)
                })
            }
        }
    }

    /// End the session; every later operation fails
    pub fn destroy(&mut self) {
        if self.state == FormState::Destroyed {
            return;
        }
        self.state = FormState::Destroyed;
        self.submit_handler = None;
        self.button_handlers.clear();
        self.events.push(FormEvent::Destroyed {
            schema_key: self.schema_key,
        });
        info!(session_id = %self.id, schema_key = %self.schema_key, "Form session destroyed");
    }

    /// True when any file field is present
    pub fn has_uncontrolled_fields(&self) -> bool {
        self.classified
            .fields
            .iter()
            .any(|f| matches!(f.kind, FieldKind::File { .. }))
    }
}

impl fmt::Debug for FormSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormSession")
            .field("id", &self.id)
            .field("schema_key", &self.schema_key)
            .field("state", &self.state)
            .field("values", &self.values)
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

/// Commands the collaborator must run after the latest reset
pub fn render_commands(events: &[FormEvent]) -> Vec<&RenderCommand> {
    events
        .iter()
        .filter_map(|e| match e {
            FormEvent::Render(cmd) => Some(cmd),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::FileHandle;
    use crate::ports::HandlerError;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn signup_schema() -> Vec<SchemaEntry> {
        vec![
            SchemaEntry::new("text").with_name("name"),
            SchemaEntry::new("select")
                .with_name("country")
                .with_attr("options", json!(["", "Italy", "USA"])),
            SchemaEntry::new("submit")
                .with_name("submit-btn")
                .with_attr("value", "SUBMIT"),
        ]
    }

    fn recorder() -> (Rc<RefCell<Vec<ValueMap>>>, impl FnMut(&ValueMap) -> HandlerResult) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        (calls, move |filled: &ValueMap| -> HandlerResult {
            sink.borrow_mut().push(filled.clone());
            Ok(())
        })
    }

    #[test]
    fn test_end_to_end_submit() {
        let (calls, handler) = recorder();
        let mut session = FormSession::builder(signup_schema())
            .on_submit(handler)
            .build()
            .unwrap();
        let initial = session.values();

        session.on_field_change(&ChangeEvent::text("name", "Ada")).unwrap();
        session.on_submit().unwrap();

        let calls = calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0],
            ValueMap::new().with_value("name", "Ada".into())
        );
        assert_eq!(*session.values(), *initial);
        assert_eq!(session.state(), FormState::Ready);
    }

    #[test]
    fn test_select_starts_on_first_option() {
        let schema = vec![SchemaEntry::new("select")
            .with_name("country")
            .with_attr("options", json!(["Italy", "USA"]))];
        let session = FormSession::builder(schema).build().unwrap();
        assert_eq!(session.value("country"), Some(&FieldValue::from("Italy")));
    }

    #[test]
    fn test_password_confirmation() {
        let schema = vec![
            SchemaEntry::new("password").with_name("password"),
            SchemaEntry::new("password")
                .with_name("confirmPassword")
                .with_attr("equalTo", "password")
                .with_attr("errMsg", "The two password fields must be identical!"),
        ];
        let mut session = FormSession::builder(schema).build().unwrap();

        session.on_field_change(&ChangeEvent::text("password", "Abc123")).unwrap();
        session
            .on_field_change(&ChangeEvent::text("confirmPassword", "Abc124"))
            .unwrap();
        assert_eq!(
            session.validity("confirmPassword"),
            Validity::Invalid("The two password fields must be identical!".into())
        );

        session
            .on_field_change(&ChangeEvent::text("confirmPassword", "Abc123"))
            .unwrap();
        assert!(session.validity("confirmPassword").is_valid());

        // changing the referenced side revalidates the dependent field
        session.on_field_change(&ChangeEvent::text("password", "Xyz")).unwrap();
        assert!(!session.validity("confirmPassword").is_valid());
        assert!(session.validity("password").is_valid());
    }

    #[test]
    fn test_file_accept_validation() {
        let schema = vec![SchemaEntry::new("file")
            .with_name("cv")
            .with_attr("accept", ".pdf, .doc")];
        let mut session = FormSession::builder(schema).build().unwrap();

        let pdf = FileHandle::new("x.pdf", 10, "application/pdf");
        session.on_field_change(&ChangeEvent::files("cv", vec![pdf.clone()])).unwrap();
        assert!(session.validity("cv").is_valid());
        assert_eq!(session.value("cv"), Some(&FieldValue::Files(vec![pdf])));

        let png = FileHandle::new("x.png", 10, "image/png");
        session.on_field_change(&ChangeEvent::files("cv", vec![png])).unwrap();
        assert_eq!(
            session.validity("cv"),
            Validity::Invalid("File format not supported".into())
        );
        assert_eq!(session.value("cv"), Some(&FieldValue::Files(vec![])));

        session.on_field_change(&ChangeEvent::files("cv", vec![])).unwrap();
        assert!(session.validity("cv").is_valid());
    }

    #[test]
    fn test_masked_field_stores_raw_value() {
        let schema = vec![SchemaEntry::new("tel")
            .with_name("phone")
            .with_attr("mask", "+39 ### ### ####")];
        let mut session = FormSession::builder(schema).build().unwrap();

        session
            .on_field_change(&ChangeEvent::text("phone", "+39 333 444 5555"))
            .unwrap();
        assert_eq!(session.value("phone"), Some(&FieldValue::from("3334445555")));
        assert_eq!(
            session.display_value("phone").as_deref(),
            Some("+39 333 444 5555")
        );
    }

    #[test]
    fn test_reset_clears_validity_and_file_widgets() {
        let schema = vec![
            SchemaEntry::new("file").with_name("cv").with_attr("accept", ".pdf"),
            SchemaEntry::new("reset").with_name("reset-btn"),
        ];
        let mut session = FormSession::builder(schema).build().unwrap();
        session
            .on_field_change(&ChangeEvent::files("cv", vec![FileHandle::new("a.exe", 1, "")]))
            .unwrap();
        session.take_events();

        session.click("reset-btn").unwrap();
        assert!(session.validity("cv").is_valid());

        let events = session.take_events();
        assert_eq!(
            render_commands(&events),
            vec![&RenderCommand::ClearNativeState { field: "cv".into() }]
        );
        assert!(events.iter().any(|e| matches!(e, FormEvent::Reset { .. })));
    }

    #[test]
    fn test_button_requires_handler() {
        let schema = vec![SchemaEntry::new("button").with_name("log")];
        let err = FormSession::builder(schema.clone()).build().unwrap_err();
        assert!(matches!(err, FormsError::MissingButtonHandler(ref b) if b == "log"));

        let clicks = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&clicks);
        let mut session = FormSession::builder(schema)
            .on_click("log", move || {
                *counter.borrow_mut() += 1;
                Ok(())
            })
            .build()
            .unwrap();
        session.click("log").unwrap();
        assert_eq!(*clicks.borrow(), 1);
    }

    #[test]
    fn test_button_handler_failure_is_returned() {
        let schema = vec![SchemaEntry::new("button").with_id("boom")];
        let mut session = FormSession::builder(schema)
            .on_click("boom", || Err(HandlerError::new("nope")))
            .build()
            .unwrap();
        assert!(matches!(session.click("boom"), Err(FormsError::Handler(_))));
        assert!(matches!(
            session.click("missing"),
            Err(FormsError::ButtonNotFound(_))
        ));
    }

    #[test]
    fn test_submit_handler_failure_still_resets() {
        let mut session = FormSession::builder(signup_schema())
            .on_submit(|_: &ValueMap| Err(HandlerError::new("offline")))
            .build()
            .unwrap();
        session.on_field_change(&ChangeEvent::text("name", "Ada")).unwrap();
        session.on_submit().unwrap();

        assert_eq!(session.value("name"), Some(&FieldValue::from("")));
        let failed = session.take_events().into_iter().any(|e| {
            matches!(e, FormEvent::Submitted { handler_failed: true, .. })
        });
        assert!(failed);
    }

    #[test]
    fn test_unsupported_entries_are_reported() {
        let mut schema = signup_schema();
        schema.push(SchemaEntry::new("color").with_name("fav"));
        let mut session = FormSession::builder(schema).build().unwrap();

        assert_eq!(session.unsupported().len(), 1);
        let discarded = session.take_events().into_iter().find_map(|e| match e {
            FormEvent::EntriesDiscarded { entries } => Some(entries),
            _ => None,
        });
        assert_eq!(discarded.map(|d| d[0].position), Some(3));
    }

    #[test]
    fn test_supported_subset_mounts_despite_bad_records() {
        let schema = crate::domain::schema::parse_schema(
            r#"[{"type":"text","name":"a"},{"name":"orphan"},{"type":7,"name":"n"}]"#,
        )
        .unwrap();
        let mut session = FormSession::builder(schema).build().unwrap();

        assert_eq!(session.fields().len(), 1);
        assert_eq!(session.unsupported().len(), 2);
        session.on_field_change(&ChangeEvent::text("a", "ok")).unwrap();
        assert_eq!(session.value("a"), Some(&FieldValue::from("ok")));
    }

    #[test]
    fn test_unknown_field_and_destroyed_session() {
        let mut session = FormSession::builder(signup_schema()).build().unwrap();
        assert!(matches!(
            session.on_field_change(&ChangeEvent::text("ghost", "x")),
            Err(FormsError::FieldNotFound(_))
        ));

        session.destroy();
        assert_eq!(session.state(), FormState::Destroyed);
        assert!(matches!(session.on_submit(), Err(FormsError::SessionDestroyed)));
        assert!(matches!(
            session.on_field_change(&ChangeEvent::text("name", "x")),
            Err(FormsError::SessionDestroyed)
        ));
    }

    #[test]
    fn test_values_snapshot_is_stable() {
        let mut session = FormSession::builder(signup_schema()).build().unwrap();
        let before = session.values();
        session.on_field_change(&ChangeEvent::text("name", "Ada")).unwrap();
        assert_eq!(before.get("name"), Some(&FieldValue::from("")));
        assert_eq!(session.value("name"), Some(&FieldValue::from("Ada")));
    }

    #[test]
    fn test_checkbox_group_toggle() {
        let schema = vec![SchemaEntry::new("checkboxes")
            .with_name("privacy")
            .with_attr("options", json!([{"label": "terms", "required": true}]))];
        let mut session = FormSession::builder(schema).build().unwrap();
        session.on_field_change(&ChangeEvent::toggle("privacy", 0)).unwrap();
        assert_eq!(session.value("privacy"), Some(&FieldValue::Flags(vec![true])));
        assert!(session.display_value("privacy").is_none());
        assert!(!session.has_uncontrolled_fields());
    }
}
