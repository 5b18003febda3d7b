//! Application layer
//!
//! Hosts a form session for a schema that may change over time. The
//! session is identified by the schema's content hash: the same content
//! keeps the live session, new content replaces it.

use tracing::info;

use crate::config::FormConfig;
use crate::domain::aggregates::{FormSession, FormSessionBuilder, FormState};
use crate::domain::schema::{schema_key, SchemaEntry};
use crate::error::{FormsError, Result};

/// Holder of at most one live form session
#[derive(Debug, Default)]
pub struct FormMount {
    config: FormConfig,
    session: Option<FormSession>,
}

impl FormMount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FormConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Session for `schema`, building one when the content changed
    ///
    /// `configure` registers handlers on a fresh session and is not called
    /// when the live session is kept.
    pub fn mount<F>(&mut self, schema: &[SchemaEntry], configure: F) -> Result<&mut FormSession>
    where
        F: FnOnce(FormSessionBuilder) -> FormSessionBuilder,
    {
        let key = schema_key(schema)?;
        let live = self
            .session
            .as_ref()
            .map_or(false, |s| s.schema_key() == key && s.state() != FormState::Destroyed);

        if !live {
            if let Some(mut previous) = self.session.take() {
                info!(
                    previous = %previous.schema_key(),
                    next = %key,
                    "Schema changed, remounting form"
                );
                previous.destroy();
            }
            let builder = FormSession::builder(schema.to_vec()).config(self.config.clone());
            self.session = Some(configure(builder).build()?);
        }

        self.session.as_mut().ok_or(FormsError::SessionDestroyed)
    }

    pub fn session(&self) -> Option<&FormSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut FormSession> {
        self.session.as_mut()
    }

    /// Destroy and release the hosted session
    pub fn unmount(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{ChangeEvent, FieldValue};

    fn schema(name: &str) -> Vec<SchemaEntry> {
        vec![SchemaEntry::new("text").with_name(name)]
    }

    #[test]
    fn test_same_content_keeps_session() {
        let mut mount = FormMount::new();
        let first = mount.mount(&schema("a"), |b| b).unwrap().id().clone();
        mount
            .session_mut()
            .unwrap()
            .on_field_change(&ChangeEvent::text("a", "kept"))
            .unwrap();

        let session = mount.mount(&schema("a"), |b| b).unwrap();
        assert_eq!(session.id(), &first);
        assert_eq!(session.value("a"), Some(&FieldValue::from("kept")));
    }

    #[test]
    fn test_new_content_replaces_session() {
        let mut mount = FormMount::new();
        let first = mount.mount(&schema("a"), |b| b).unwrap().id().clone();
        let session = mount.mount(&schema("b"), |b| b).unwrap();
        assert_ne!(session.id(), &first);
        assert!(session.value("a").is_none());
        assert_eq!(session.value("b"), Some(&FieldValue::from("")));
    }

    #[test]
    fn test_failed_build_leaves_mount_empty() {
        let mut mount = FormMount::new();
        mount.mount(&schema("a"), |b| b).unwrap();
        let broken = vec![SchemaEntry::new("button").with_name("log")];
        assert!(matches!(
            mount.mount(&broken, |b| b),
            Err(FormsError::MissingButtonHandler(_))
        ));
        assert!(mount.session().is_none());
    }

    #[test]
    fn test_unmount() {
        let mut mount = FormMount::new();
        mount.mount(&schema("a"), |b| b).unwrap();
        mount.unmount();
        assert!(mount.session().is_none());
    }
}
