//! HTTP service boundary: a small axum app exposing the scoring pipeline.
//!
//! `GET /` is a liveness message, `POST /score_wallet` runs the pipeline.
//! Responses carry permissive CORS headers so browser dashboards can call
//! the service directly.

use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{extract::State, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::scoring::ScoringPipeline;
use crate::{Error, Result};

pub type SharedPipeline = Arc<ScoringPipeline>;

/// Request body for `POST /score_wallet`
#[derive(Debug, Deserialize)]
pub struct WalletRequest {
    pub wallet_address: String,
}

#[derive(Debug, Serialize)]
struct RootResponse {
    message: &'static str,
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse { message: "walletscore service is running" })
}

/// HTTP status for a pipeline error: upstream explorer trouble is a bad
/// gateway, everything else is on us.
fn status_for(error: &Error) -> StatusCode {
    match error {
        | Error::Fetch(_) | Error::Reqwest(_) => StatusCode::BAD_GATEWAY,
        | _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn score_wallet_handler(
    State(pipeline): State<SharedPipeline>,
    Json(request): Json<WalletRequest>,
) -> Response {
    match pipeline.score_wallet(&request.wallet_address).await {
        | Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        | Err(e) => {
            log::error!("scoring {} failed: {}", request.wallet_address, e);
            (status_for(&e), Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

/// Attach permissive CORS headers to every response. Preflight `OPTIONS`
/// requests are answered here with 204 instead of reaching the router,
/// which has no OPTIONS routes and would reject them with 405.
async fn cors<B>(request: Request<B>, next: Next<B>) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET, POST, OPTIONS"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    response
}

/// Build the application router
pub fn app(pipeline: SharedPipeline) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/score_wallet", post(score_wallet_handler))
        .layer(middleware::from_fn(cors))
        .with_state(pipeline)
}

/// Run the HTTP server until shutdown.
///
/// Call inside a Tokio runtime.
pub async fn run(pipeline: SharedPipeline, config: &ServerConfig) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| Error::Config(format!("invalid server address: {}", e)))?;

    log::info!("walletscore service listening on http://{}", addr);

    axum::Server::bind(&addr)
        .serve(app(pipeline).into_make_service())
        .await
        .map_err(|e| Error::Other(format!("server error: {}", e)))?;

    Ok(())
}
