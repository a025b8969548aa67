//! HTTP surface of the bot: `GET /info` and `POST /event`.
//!
//! Successful answers are `201 Created` with a JSON body. Every failure,
//! including "nothing to say", is `417 Expectation Failed` with a plain-text
//! reason.

use crate::config::BotConfig;
use crate::core::{LanguageCatalog, Translator, UpstreamClient};
use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

#[derive(Clone)]
pub struct AppState {
    translator: Translator,
    config: Arc<BotConfig>,
}

impl AppState {
    pub fn new(config: Arc<BotConfig>, translator: Translator) -> Self {
        Self { translator, config }
    }

    /// State backed by a lazily populated [`LanguageCatalog`].
    pub fn with_catalog(
        config: Arc<BotConfig>,
        catalog: Arc<LanguageCatalog>,
        upstream: UpstreamClient,
    ) -> Self {
        Self::new(config, Translator::new(catalog, upstream))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    pub author: String,
    pub info: String,
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventRequest {
    pub text: String,
    pub username: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResponse {
    pub text: String,
    pub bot: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/info", get(info).fallback(method_not_allowed))
        .route("/event", post(event).fallback(method_not_allowed))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Serves until SIGINT/SIGTERM, then lets in-flight requests finish.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("🛑 Interrupt signal received, graceful shutdown"),
        _ = terminate => tracing::info!("🛑 Terminate signal received, graceful shutdown"),
    }
}

async fn log_request(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    tracing::info!(
        "{:<5} {}\t{:<12?}\t{}",
        method,
        response.status().as_u16(),
        start.elapsed(),
        uri
    );
    response
}

async fn info(State(state): State<AppState>) -> Response {
    created(&InfoResponse {
        author: state.config.bot.author.clone(),
        info: state.config.bot.info.clone(),
        commands: Vec::new(),
    })
}

async fn event(State(state): State<AppState>, body: Bytes) -> Response {
    // 空的請求主體視為空訊息
    let request = if body.is_empty() {
        EventRequest::default()
    } else {
        match serde_json::from_slice::<EventRequest>(&body) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!("JSON decode error: {}", e);
                return expectation_failed(format!("JSON decode error: {}", e));
            }
        }
    };

    match state
        .translator
        .translate(state.config.as_ref(), &request.text)
        .await
    {
        Ok(text) if text.is_empty() => expectation_failed("nothing".to_string()),
        Ok(text) => created(&EventResponse {
            text,
            bot: state.config.bot.name.clone(),
        }),
        Err(e) => {
            tracing::error!(
                "❌ Translation error: {} (Category: {:?}, Severity: {:?}, Retryable: {})",
                e,
                e.category(),
                e.severity(),
                e.is_retryable()
            );
            expectation_failed(e.to_string())
        }
    }
}

async fn method_not_allowed(method: Method) -> Response {
    expectation_failed(format!("{} method is not allowed", method))
}

fn created<T: Serialize>(value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => (
            StatusCode::CREATED,
            [(header::CONTENT_TYPE, JSON_CONTENT_TYPE)],
            body,
        )
            .into_response(),
        Err(e) => expectation_failed(format!("JSON encode error: {}", e)),
    }
}

fn expectation_failed(reason: String) -> Response {
    (StatusCode::EXPECTATION_FAILED, reason).into_response()
}
