//! HTTP server exposing windowed selection

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::{RelevanceClient, SelectError, SelectionEngine};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SelectionEngine>,
    pub relevance: Option<RelevanceClient>,
}

#[derive(Debug, Deserialize)]
pub struct WindowedSelectRequest {
    pub question: String,
    pub passages: Vec<String>,
    pub n: usize,
    pub step: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WindowedSelectResponse {
    pub selected: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RelevanceRequestHttp {
    pub question: String,
    pub context: String,
}

#[derive(Debug, Serialize)]
pub struct RelevanceResponseHttp {
    pub score: f64,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, error: &str, details: impl ToString) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            details: Some(details.to_string()),
        }),
    )
}

async fn windowed_select_handler(
    State(state): State<AppState>,
    Json(req): Json<WindowedSelectRequest>,
) -> Result<Json<WindowedSelectResponse>, HandlerError> {
    info!(
        "Received selection request: {} passages, n={}, step={}",
        req.passages.len(),
        req.n,
        req.step
    );

    match state
        .engine
        .windowed_select(&req.question, &req.passages, req.n, req.step)
        .await
    {
        Ok(selected) => Ok(Json(WindowedSelectResponse { selected })),
        Err(e @ SelectError::InvalidWindow { .. }) => {
            Err(error_response(StatusCode::BAD_REQUEST, "Invalid window parameters", e))
        }
        Err(e @ SelectError::DeadlineExceeded(_)) => {
            error!("Selection timed out: {}", e);
            Err(error_response(StatusCode::GATEWAY_TIMEOUT, "Selection deadline exceeded", e))
        }
        Err(e) => {
            error!("Selection failed: {:?}", e);
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, "Selection failed", e))
        }
    }
}

async fn relevance_handler(
    State(state): State<AppState>,
    Json(req): Json<RelevanceRequestHttp>,
) -> Result<Json<RelevanceResponseHttp>, HandlerError> {
    let client = state.relevance.as_ref().ok_or_else(|| {
        error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Relevance scoring disabled",
            "RELEVANCE_URL is not configured",
        )
    })?;

    match client.relevance(&req.question, &req.context).await {
        Ok(score) => Ok(Json(RelevanceResponseHttp { score })),
        Err(e) => {
            error!("Relevance scoring failed: {:?}", e);
            Err(error_response(StatusCode::BAD_GATEWAY, "Relevance scoring failed", e))
        }
    }
}

/// Health check handler
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "passage-select".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create and configure the HTTP router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/windowed_select", post(windowed_select_handler))
        .route("/relevance", post(relevance_handler))
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    info!("Starting passage-select server on {}", addr);

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DiagnosticSink, Passage, Select};
    use async_trait::async_trait;
    use std::time::Duration;

    /// Picks the first candidate of every window
    struct FirstOfWindow;

    #[async_trait]
    impl Select for FirstOfWindow {
        fn name(&self) -> &'static str {
            "first"
        }

        async fn select(
            &self,
            _question: &str,
            candidates: &[Passage],
            _existing: &[Passage],
            _sink: &dyn DiagnosticSink,
        ) -> Result<Vec<Passage>, SelectError> {
            Ok(candidates.iter().take(1).cloned().collect())
        }
    }

    /// Never answers within any reasonable deadline
    struct Stalled;

    #[async_trait]
    impl Select for Stalled {
        fn name(&self) -> &'static str {
            "stalled"
        }

        async fn select(
            &self,
            _question: &str,
            _candidates: &[Passage],
            _existing: &[Passage],
            _sink: &dyn DiagnosticSink,
        ) -> Result<Vec<Passage>, SelectError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Vec::new())
        }
    }

    async fn spawn_server(relevance: Option<RelevanceClient>) -> String {
        serve(SelectionEngine::new(Arc::new(FirstOfWindow)), relevance).await
    }

    async fn serve(engine: SelectionEngine, relevance: Option<RelevanceClient>) -> String {
        let state = AppState {
            engine: Arc::new(engine),
            relevance,
        };
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, create_router(state)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_windowed_select_endpoint() {
        let base = spawn_server(None).await;
        let response = reqwest::Client::new()
            .post(format!("{}/windowed_select", base))
            .json(&serde_json::json!({
                "question": "Q",
                "passages": ["a", "b", "c", "d"],
                "n": 2,
                "step": 2
            }))
            .send()
            .await
            .unwrap();

        assert!(response.status().is_success());
        let body: WindowedSelectResponse = response.json().await.unwrap();
        assert_eq!(body.selected, vec!["a".to_string(), "c".to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_window_is_bad_request() {
        let base = spawn_server(None).await;
        let response = reqwest::Client::new()
            .post(format!("{}/windowed_select", base))
            .json(&serde_json::json!({ "question": "Q", "passages": ["a"], "n": 0, "step": 1 }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn test_deadline_exceeded_is_gateway_timeout() {
        let engine =
            SelectionEngine::new(Arc::new(Stalled)).with_deadline(Duration::from_millis(50));
        let base = serve(engine, None).await;
        let response = reqwest::Client::new()
            .post(format!("{}/windowed_select", base))
            .json(&serde_json::json!({ "question": "Q", "passages": ["a"], "n": 1, "step": 1 }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 504);
    }

    #[tokio::test]
    async fn test_relevance_disabled_without_config() {
        let base = spawn_server(None).await;
        let response = reqwest::Client::new()
            .post(format!("{}/relevance", base))
            .json(&serde_json::json!({ "question": "Q", "context": "c" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 503);
    }
}
