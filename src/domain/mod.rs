//! Domain types and DTOs
//!
//! Request DTOs validate into `New*` records that are written to the store;
//! stored documents map back into `*Response` records.

pub mod bids;
pub mod companies;
pub mod document;
pub mod tenders;
pub mod validation;

// Re-export commonly used types
pub use bids::*;
pub use companies::*;
pub use document::{FromDocument, MappingError};
pub use tenders::*;
pub use validation::ValidationError;
