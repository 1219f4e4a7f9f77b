//! Plain prompt profile: `POST /invocations` with `{"prompt": "..."}`, answered with the reply as
//! a JSON string.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use support_agents::AgentHandle;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct InvocationRequest {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug)]
pub struct InvocationError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for InvocationError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.status.as_u16(),
                "message": self.message,
            }
        }));
        (self.status, body).into_response()
    }
}

pub fn invocations_router(agent: Arc<dyn AgentHandle>) -> Router {
    Router::new()
        .route("/invocations", post(invoke))
        .with_state(agent)
}

async fn invoke(
    State(agent): State<Arc<dyn AgentHandle>>,
    Json(request): Json<InvocationRequest>,
) -> Result<Json<String>, InvocationError> {
    if request.prompt.trim().is_empty() {
        return Err(InvocationError {
            status: StatusCode::BAD_REQUEST,
            message: "prompt is required".to_string(),
        });
    }
    info!(agent_type = %agent.agent_type(), "step: invocation");
    agent.invoke(&request.prompt).await.map(Json).map_err(|e| {
        error!(error = %e, "Agent invocation failed");
        InvocationError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        }
    })
}
