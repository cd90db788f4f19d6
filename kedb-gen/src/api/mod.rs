//! HTTP API handlers for kedb-gen

pub mod buildinfo;
pub mod documents;
pub mod generate;
pub mod health;
pub mod ui;

pub use buildinfo::get_build_info;
pub use documents::{document_routes, download_document, list_documents, next_number};
pub use generate::{generate_document, kedb_routes};
pub use health::health_routes;
pub use ui::{serve_app_js, serve_index, ui_routes};
