//! HTTP API for SnippetVault: snippet CRUD, public sharing and export.

pub mod api;
pub mod server;

pub use api::models::ApiResponse;
pub use server::http_server::{routes, start_api_server};
