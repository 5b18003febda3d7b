//! Aggregates module

pub mod builder_session;
pub mod draft;
pub mod form_session;

pub use builder_session::{BuilderSession, BuilderState};
pub use draft::{DraftOptions, DraftPatch, FieldDraft, HtmlAttribute, SUPPORTED_HTML_ATTRIBUTES};
pub use form_session::{render_commands, FormSession, FormSessionBuilder, FormState};
