#![deny(unsafe_code)]

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bhulekh_core::{MemoryStore, Operation, WorkflowEngine, WorkflowError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Host configuration.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Seed the demo citizens and applications at startup.
    pub seed_demo: bool,
}

#[derive(Clone)]
pub struct ServiceState {
    pub engine: Arc<WorkflowEngine<MemoryStore>>,
}

impl ServiceState {
    pub async fn bootstrap(config: ServiceConfig) -> Result<Self, WorkflowError> {
        let engine = WorkflowEngine::new(MemoryStore::new());
        if config.seed_demo {
            engine.seed_demo_records().await?;
        }
        Ok(Self {
            engine: Arc::new(engine),
        })
    }
}

pub fn build_router(state: ServiceState) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/v1/invoke", post(invoke))
        .with_state(state)
}

/// Wire request for the single invoke entrypoint: an operation name plus
/// its argument list, each argument a JSON object rendered as a string.
#[derive(Debug, Clone, Deserialize)]
pub struct InvokeRequest {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] WorkflowError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        let Self::Core(err) = self;
        match err {
            WorkflowError::UnknownOperation
            | WorkflowError::ArgumentCount
            | WorkflowError::Decode(_) => StatusCode::BAD_REQUEST,
            WorkflowError::CitizenNotFound | WorkflowError::ApplicationNotFound => {
                StatusCode::NOT_FOUND
            }
            WorkflowError::RejectedTransition { .. } | WorkflowError::PaymentAlreadyComplete => {
                StatusCode::CONFLICT
            }
            WorkflowError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Clone, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    store_backend: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "bhulekh-service",
        store_backend: "memory",
    })
}

async fn invoke(
    State(state): State<ServiceState>,
    Json(request): Json<InvokeRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let trace_id = Uuid::new_v4();
    let operation = Operation::parse(&request.function, &request.args).map_err(|err| {
        warn!(%trace_id, function = %request.function, %err, "invoke rejected");
        ApiError::from(err)
    })?;

    info!(%trace_id, operation = operation.name(), "invoke accepted");
    match state.engine.invoke(operation).await {
        Ok(payload) => Ok(Json(payload)),
        Err(err) => {
            warn!(%trace_id, %err, "invoke failed");
            Err(ApiError::from(err))
        }
    }
}
