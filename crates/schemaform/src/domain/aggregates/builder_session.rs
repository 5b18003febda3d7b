//! Builder Session Aggregate
//!
//! Interactive authoring of a schema: an ordered list of field drafts and
//! a title, finalized into schema entries for the host.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::BuilderConfig;
use crate::domain::events::BuilderEvent;
use crate::domain::schema::{SchemaEntry, ATTR_VALUE};
use crate::domain::value_objects::{ButtonType, SessionId, Validity};
use crate::error::{FormsError, Result};
use crate::ports::FinalizeHandler;

use super::draft::{DraftPatch, FieldDraft};

const SUBMIT_BUTTON: &str = "submit-btn";
const RESET_BUTTON: &str = "reset-btn";

/// Lifecycle of a builder session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BuilderState {
    #[default]
    Editing,
    Submitting,
}

/// Schema builder
#[derive(Debug)]
pub struct BuilderSession {
    id: SessionId,
    title: String,
    drafts: Arc<Vec<FieldDraft>>,
    state: BuilderState,
    config: BuilderConfig,
    events: Vec<BuilderEvent>,
}

impl Default for BuilderSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BuilderSession {
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    /// A builder holding one empty draft and an empty title
    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            id: SessionId::new(),
            title: String::new(),
            drafts: Arc::new(vec![FieldDraft::new()]),
            state: BuilderState::Editing,
            config,
            events: Vec::new(),
        }
    }

    // Getters
    pub fn id(&self) -> &SessionId { &self.id }
    pub fn title(&self) -> &str { &self.title }
    pub fn state(&self) -> BuilderState { self.state }
    pub fn len(&self) -> usize { self.drafts.len() }
    pub fn is_empty(&self) -> bool { self.drafts.is_empty() }

    /// Snapshot of the draft sequence
    pub fn drafts(&self) -> Arc<Vec<FieldDraft>> {
        Arc::clone(&self.drafts)
    }

    pub fn draft(&self, index: usize) -> Option<&FieldDraft> {
        self.drafts.get(index)
    }

    pub fn take_events(&mut self) -> Vec<BuilderEvent> {
        std::mem::take(&mut self.events)
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.drafts.len() {
            Ok(())
        } else {
            Err(FormsError::DraftOutOfRange {
                index,
                len: self.drafts.len(),
            })
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.events.push(BuilderEvent::TitleChanged {
            title: self.title.clone(),
        });
    }

    /// Append an empty draft, returning its index
    pub fn add_field(&mut self) -> usize {
        let mut drafts = self.drafts.as_ref().clone();
        drafts.push(FieldDraft::new());
        self.drafts = Arc::new(drafts);

        let index = self.drafts.len() - 1;
        debug!(index, "Draft added");
        self.events.push(BuilderEvent::DraftAdded { index });
        index
    }

    /// Remove draft `index`; the last remaining draft is kept
    pub fn remove_field(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if self.drafts.len() == 1 {
            return Err(FormsError::LastDraft);
        }

        let mut drafts = self.drafts.as_ref().clone();
        drafts.remove(index);
        self.drafts = Arc::new(drafts);

        debug!(index, "Draft removed");
        self.events.push(BuilderEvent::DraftRemoved { index });
        Ok(())
    }

    /// Replace draft `index` with `patch` applied to it
    pub fn update_field(&mut self, index: usize, patch: DraftPatch) -> Result<()> {
        self.check_index(index)?;

        let id_suffix = match patch {
            DraftPatch::SetName(_) => {
                rand::thread_rng().gen_range(0..self.config.id_suffix_range.max(1))
            }
            _ => 0,
        };
        let updated = self.drafts[index].apply(&patch, id_suffix)?;

        let mut drafts = self.drafts.as_ref().clone();
        drafts[index] = updated;
        self.drafts = Arc::new(drafts);

        debug!(index, patch = ?patch, "Draft updated");
        self.events.push(BuilderEvent::DraftUpdated { index });
        Ok(())
    }

    /// Names held by every draft other than `index`
    pub fn used_names(&self, index: usize) -> BTreeSet<String> {
        self.drafts
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .filter_map(|(_, d)| d.name.clone())
            .collect()
    }

    /// Invalid when draft `index` reuses another draft's name
    pub fn name_validity(&self, index: usize) -> Validity {
        match self.draft(index).and_then(|d| d.name.as_ref()) {
            Some(name) if self.used_names(index).contains(name) => {
                Validity::Invalid(self.config.duplicate_name_message.clone())
            }
            _ => Validity::Valid,
        }
    }

    /// Problems that block finalize, one line per draft
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (index, draft) in self.drafts.iter().enumerate() {
            if !draft.is_complete() {
                problems.push(format!("draft {} needs a name and a type", index));
            }
            if let Validity::Invalid(msg) = self.name_validity(index) {
                problems.push(format!("draft {}: {}", index, msg));
            }
        }
        problems
    }

    /// Finished schema: drafts followed by the submit and reset buttons
    pub fn to_schema(&self) -> Vec<SchemaEntry> {
        let mut schema: Vec<SchemaEntry> = self.drafts.iter().map(FieldDraft::to_entry).collect();
        schema.push(
            SchemaEntry::new(ButtonType::Submit.as_str())
                .with_name(SUBMIT_BUTTON)
                .with_id(SUBMIT_BUTTON)
                .with_attr(ATTR_VALUE, self.config.submit_label.clone()),
        );
        schema.push(
            SchemaEntry::new(ButtonType::Reset.as_str())
                .with_name(RESET_BUTTON)
                .with_id(RESET_BUTTON)
                .with_attr(ATTR_VALUE, self.config.reset_label.clone()),
        );
        schema
    }

    /// Hand the finished schema to `handler`, then start over
    ///
    /// On failure the drafts are kept so the user can retry.
    pub fn finalize(&mut self, mut handler: impl FinalizeHandler) -> Result<()> {
        if self.config.block_invalid_finalize {
            let problems = self.problems();
            if !problems.is_empty() {
                return Err(FormsError::InvalidDraft(problems.join("; ")));
            }
        }

        self.state = BuilderState::Submitting;
        let schema = self.to_schema();

        if let Err(e) = handler.finalize(&self.title, &schema) {
            warn!(session_id = %self.id, error = %e, "Finalize handler failed");
            self.state = BuilderState::Editing;
            return Err(e.into());
        }

        info!(
            session_id = %self.id,
            title = %self.title,
            entries = schema.len(),
            "Schema finalized"
        );
        self.events.push(BuilderEvent::Finalized {
            title: std::mem::take(&mut self.title),
            entries: schema.len(),
            finalized_at: Utc::now(),
        });

        self.drafts = Arc::new(vec![FieldDraft::new()]);
        self.state = BuilderState::Editing;
        Ok(())
    }
}
