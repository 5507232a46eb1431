//! HTTP server implementation for the SnippetVault API.

use crate::api::handlers;
use crate::api::models::{ApiResponse, ExportRequest, RenderRequest};
use crate::server::utils::{get_api_server_port, save_api_port};

use serde::de::DeserializeOwned;
use snippetvault_core::{Result, SnippetDraft, SnippetStore, ValueOverrides, VaultError};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

/// Largest JSON body accepted, in bytes.
const MAX_BODY_BYTES: u64 = 4 * 1024 * 1024;

fn with_store(
    store: Arc<SnippetStore>,
) -> impl Filter<Extract = (Arc<SnippetStore>,), Error = Infallible> + Clone {
    warp::any().map(move || store.clone())
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
where
    T: DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

/// Turn warp rejections into the same JSON envelope the handlers use.
async fn handle_rejection(err: Rejection) -> std::result::Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e))
    } else if let Some(e) = err.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, format!("Invalid query: {}", e))
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "Content-Length required".to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large".to_string())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "Expected an application/json body".to_string(),
        )
    } else if let Some(e) = err.find::<warp::filters::cors::CorsForbidden>() {
        (StatusCode::FORBIDDEN, e.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed".to_string())
    } else {
        tracing::error!("unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    Ok(handlers::json_response(
        status,
        &ApiResponse::<()>::error(message),
    ))
}

/// All API routes over `store`, with CORS and JSON error replies.
pub fn routes(
    store: Arc<SnippetStore>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    // CORS for development
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["Content-Type"])
        .allow_methods(vec!["GET", "POST", "DELETE", "PUT"]);

    let list_route = warp::path!("api" / "snippets")
        .and(warp::get())
        .and(with_store(store.clone()))
        .map(|store: Arc<SnippetStore>| handlers::list_snippets(&store));

    let get_route = warp::path!("api" / "snippets" / u64)
        .and(warp::get())
        .and(with_store(store.clone()))
        .map(|id: u64, store: Arc<SnippetStore>| handlers::get_snippet(&store, id));

    let create_route = warp::path!("api" / "snippets")
        .and(warp::post())
        .and(json_body::<SnippetDraft>())
        .and(with_store(store.clone()))
        .map(|draft: SnippetDraft, store: Arc<SnippetStore>| {
            handlers::create_snippet(&store, draft)
        });

    let update_route = warp::path!("api" / "snippets" / u64)
        .and(warp::put())
        .and(json_body::<SnippetDraft>())
        .and(with_store(store.clone()))
        .map(|id: u64, draft: SnippetDraft, store: Arc<SnippetStore>| {
            handlers::update_snippet(&store, id, draft)
        });

    let delete_route = warp::path!("api" / "snippets" / u64)
        .and(warp::delete())
        .and(with_store(store.clone()))
        .map(|id: u64, store: Arc<SnippetStore>| handlers::delete_snippet(&store, id));

    let public_list_route = warp::path!("api" / "public" / "snippets")
        .and(warp::get())
        .and(with_store(store.clone()))
        .map(|store: Arc<SnippetStore>| handlers::list_public_snippets(&store));

    let public_get_route = warp::path!("api" / "public" / "snippets" / u64)
        .and(warp::get())
        .and(with_store(store.clone()))
        .map(|id: u64, store: Arc<SnippetStore>| handlers::get_public_snippet(&store, id));

    let export_route = warp::path!("api" / "snippets" / u64 / "export")
        .and(warp::post())
        .and(json_body::<ExportRequest>())
        .and(with_store(store.clone()))
        .map(|id: u64, request: ExportRequest, store: Arc<SnippetStore>| {
            handlers::export_text(&store, id, request)
        });

    let download_route = warp::path!("api" / "snippets" / u64 / "download")
        .and(warp::get())
        .and(warp::query::<ValueOverrides>())
        .and(with_store(store))
        .map(|id: u64, values: ValueOverrides, store: Arc<SnippetStore>| {
            handlers::download_archive(&store, id, values)
        });

    let render_route = warp::path!("api" / "render")
        .and(warp::post())
        .and(json_body::<RenderRequest>())
        .map(handlers::render_files);

    // Health check endpoint
    let health_route = warp::path!("health").map(|| "SnippetVault API is running");

    list_route
        .or(get_route)
        .or(create_route)
        .or(update_route)
        .or(delete_route)
        .or(public_list_route)
        .or(public_get_route)
        .or(export_route)
        .or(download_route)
        .or(render_route)
        .or(health_route)
        .with(cors)
        .recover(handle_rejection)
}

/// Start the HTTP API server on the specified port
pub async fn start_api_server(store: Arc<SnippetStore>, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!(store = %store.path().display(), "serving snippets");

    let server = warp::serve(routes(store)).try_bind_with_graceful_shutdown(addr, async {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("received shutdown signal, stopping API server");
    });

    match server {
        Ok((addr, server)) => {
            // Save the port to file so we can find it later
            save_api_port(addr.port())?;
            println!("SnippetVault API listening on http://{}", addr);
            server.await;
            Ok(())
        }
        Err(e) => Err(VaultError::Other(format!(
            "Failed to bind to port {}: {}",
            port, e
        ))),
    }
}

/// Check the health of a running API server, returning its port
pub fn check_api_server_health() -> Result<u16> {
    let port = get_api_server_port()?;
    tracing::debug!(port, "checking API server");

    std::net::TcpStream::connect(("127.0.0.1", port))
        .map(|_| port)
        .map_err(|e| {
            VaultError::Other(format!(
                "Failed to connect to API server on port {}: {}",
                port, e
            ))
        })
}
