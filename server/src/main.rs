use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use tmsearch::db::schema;
use tmsearch::{SearchEngine, SearchError, SearchRequest, SearchResponse, SqliteStore, Store};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Debug, Parser)]
struct ServerConfig {
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
    #[arg(long, env = "BIND_ADDRESS", default_value = "127.0.0.1:8080")]
    bind: String,
    #[arg(long, env = "MAX_CONNECTIONS", default_value_t = 10)]
    max_connections: u32,
    /// Create the store tables before serving. Harmless on a populated store.
    #[arg(long, default_value_t = false)]
    init_schema: bool,
}

#[derive(Clone)]
struct AppState {
    engine: SearchEngine<SqliteStore>,
}

#[derive(Debug)]
struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        let status = match &err {
            SearchError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            SearchError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        AppError::new(status, err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, AppError>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::parse();
    let bind_addr: SocketAddr = config
        .bind
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.bind))?;

    let pool = schema::connect(&config.database_url, config.max_connections)
        .await
        .context("failed to connect to the register store")?;
    if config.init_schema {
        schema::create_schema(&pool)
            .await
            .context("schema creation failed")?;
    }

    let state = AppState {
        engine: SearchEngine::new(SqliteStore::new(pool)),
    };

    let app = router(state);

    let listener = TcpListener::bind(bind_addr)
        .await
        .context("failed to bind TCP listener")?;

    info!(%bind_addr, "server starting");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server shutdown")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::warn!(?err, "failed to listen for CTRL+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => tracing::warn!(?err, "failed to listen for TERM signal"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/search", post(search))
        .route("/healthz", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn search(
    State(state): State<AppState>,
    request: Result<Json<SearchRequest>, JsonRejection>,
) -> ApiResult<Json<SearchResponse>> {
    let Json(request) = request?;
    let response = state.engine.search(&request).await?;
    Ok(Json(response))
}

async fn health_check(State(state): State<AppState>) -> ApiResult<&'static str> {
    state.engine.store().health_check().await?;
    Ok("ok")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, header};
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let pool = schema::connect("sqlite::memory:", 1)
            .await
            .expect("in-memory store");
        schema::create_schema(&pool).await.expect("schema");
        router(AppState {
            engine: SearchEngine::new(SqliteStore::new(pool)),
        })
    }

    fn post_search(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/search")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let app = test_router().await;
        let response = app
            .oneshot(post_search("{not json"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_search_field_is_a_bad_request() {
        let app = test_router().await;
        let body = r#"{"conditions": [{"field": "bogus", "raw_query": "x"}], "operator": "and"}"#;
        let response = app.oneshot(post_search(body)).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn well_formed_body_reaches_the_engine() {
        let app = test_router().await;
        let body =
            r#"{"conditions": [{"field": "display_text", "raw_query": "ソニー"}], "operator": "and"}"#;
        let response = app.oneshot(post_search(body)).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
