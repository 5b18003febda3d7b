//! Domain module
//!
//! Schema records, value objects, stateless services and the two session
//! aggregates.

pub mod aggregates;
pub mod events;
pub mod schema;
pub mod services;
pub mod value_objects;

pub use aggregates::*;
pub use events::*;
pub use value_objects::*;
