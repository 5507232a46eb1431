pub mod handlers;
pub mod models;

pub use models::{ApiResponse, ExportRequest, RenderRequest};
