//! Request handlers. Each one maps a core result onto an HTTP response
//! carrying an [`ApiResponse`] body.

use serde::Serialize;
use snippetvault_core::{
    export_snippet, format_files, ExportFormat, SnippetDraft, SnippetStore, ValueOverrides,
    VaultError,
};
use warp::http::{header, HeaderValue, StatusCode};
use warp::reply::{Reply, Response};

use super::models::{ApiResponse, ExportRequest, RenderRequest};

fn status_for(err: &VaultError) -> StatusCode {
    match err {
        VaultError::SnippetNotFound(_) => StatusCode::NOT_FOUND,
        VaultError::FileNotFound(_)
        | VaultError::VariableNotFound(_)
        | VaultError::InvalidVariableName(_)
        | VaultError::InvalidAssignment(_)
        | VaultError::Other(_) => StatusCode::BAD_REQUEST,
        VaultError::Io(_)
        | VaultError::Json(_)
        | VaultError::Archive(_)
        | VaultError::InvalidConfig(_)
        | VaultError::Clipboard(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &ApiResponse<T>) -> Response {
    warp::reply::with_status(warp::reply::json(body), status).into_response()
}

pub fn error_response(err: &VaultError) -> Response {
    let status = status_for(err);
    if status.is_server_error() {
        tracing::error!("request failed: {}", err);
    } else {
        tracing::debug!("request rejected: {}", err);
    }
    json_response(status, &ApiResponse::<()>::error(err.to_string()))
}

fn respond<T: Serialize>(status: StatusCode, result: snippetvault_core::Result<T>) -> Response {
    match result {
        Ok(data) => json_response(status, &ApiResponse::success(data)),
        Err(e) => error_response(&e),
    }
}

pub fn list_snippets(store: &SnippetStore) -> Response {
    respond(StatusCode::OK, store.list())
}

pub fn get_snippet(store: &SnippetStore, id: u64) -> Response {
    respond(StatusCode::OK, store.get(id))
}

pub fn create_snippet(store: &SnippetStore, draft: SnippetDraft) -> Response {
    respond(StatusCode::CREATED, store.create(draft))
}

pub fn update_snippet(store: &SnippetStore, id: u64, draft: SnippetDraft) -> Response {
    respond(StatusCode::OK, store.update(id, draft))
}

pub fn delete_snippet(store: &SnippetStore, id: u64) -> Response {
    respond(StatusCode::OK, store.delete(id))
}

pub fn list_public_snippets(store: &SnippetStore) -> Response {
    respond(StatusCode::OK, store.list_public())
}

/// Private snippets are reported as missing rather than forbidden.
pub fn get_public_snippet(store: &SnippetStore, id: u64) -> Response {
    let result = store.get(id).and_then(|snippet| {
        if snippet.is_public {
            Ok(snippet)
        } else {
            Err(VaultError::SnippetNotFound(id))
        }
    });
    respond(StatusCode::OK, result)
}

/// Concatenated text export, returned inside the JSON envelope.
pub fn export_text(store: &SnippetStore, id: u64, request: ExportRequest) -> Response {
    let result = store
        .get(id)
        .and_then(|snippet| export_snippet(&snippet, &request.values, ExportFormat::Text))
        .map(|artifact| String::from_utf8_lossy(&artifact.bytes).into_owned());
    respond(StatusCode::OK, result)
}

/// Zip export sent as a file attachment.
pub fn download_archive(store: &SnippetStore, id: u64, values: ValueOverrides) -> Response {
    let artifact = match store
        .get(id)
        .and_then(|snippet| export_snippet(&snippet, &values, ExportFormat::Zip))
    {
        Ok(artifact) => artifact,
        Err(e) => return error_response(&e),
    };

    let disposition = format!("attachment; filename=\"{}\"", artifact.filename);
    let mut response = Response::new(artifact.bytes.into());
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(artifact.content_type),
    );
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    response
}

/// Preview substitution for unsaved files.
pub fn render_files(request: RenderRequest) -> Response {
    let rendered = format_files(&request.files, &request.variables, &request.values);
    json_response(StatusCode::OK, &ApiResponse::success(rendered))
}
