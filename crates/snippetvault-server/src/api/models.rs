//! Data models for API requests and responses.

use serde::{Deserialize, Serialize};
use snippetvault_core::{SnippetFile, ValueOverrides, Variable};

/// Standard API response format
#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Request model for exporting a stored snippet
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct ExportRequest {
    pub values: ValueOverrides,
}

/// Request model for rendering files that are not stored yet
#[derive(Deserialize)]
pub struct RenderRequest {
    pub files: Vec<SnippetFile>,
    #[serde(default)]
    pub variables: Vec<Variable>,
    #[serde(default)]
    pub values: ValueOverrides,
}
