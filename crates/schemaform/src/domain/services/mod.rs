//! Domain Services
//!
//! Stateless operations over schemas and value maps, orchestrated by the
//! session aggregates.

pub mod classifier;
pub mod store;
pub mod validator;

pub use classifier::{Classified, SchemaClassifier};
pub use store::FieldStateStore;
pub use validator::{validate_equal_to, validate_file_accept, CrossFieldValidator};
