//! # KEDB Common Library
//!
//! Shared code for the KEDB document generator including:
//! - Error type and result alias
//! - Configuration loading
//! - The KEDB record model
//! - Identifier allocation (`KEDB0001`, `KEDB0002`, ...)
//! - Word document assembly
//! - Output directory storage

pub mod config;
pub mod document;
pub mod error;
pub mod numbering;
pub mod record;
pub mod store;
pub mod time;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Error, Result};
pub use numbering::KedbNumber;
pub use record::{ImageAttachment, IssueType, KedbRecord};
pub use store::DocumentStore;
