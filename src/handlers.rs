use axum::{
    Json, Router,
    body::Bytes,
    extract::State as AxumState,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing,
};
use serde_json::json;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

use crate::SharedState;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", routing::get(root))
        .route("/invoke", routing::post(invoke))
        .route("/status", routing::get(status))
        .with_state(state)
}

pub async fn root() -> &'static str {
    "pipeline_notifier"
}

/// Returns process information. The webhook URL is never exposed.
pub async fn status(AxumState(state): AxumState<SharedState>) -> impl IntoResponse {
    let config = state.notifier.config();
    Json(json!({
        "server": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "started_at": state.started_at,
            "uptime_seconds": state.start_time.elapsed().as_secs(),
        },
        "config": {
            "pipeline_name": config.pipeline_name,
            "webhook_configured": !config.webhook_url.is_empty(),
        }
    }))
}

/// One invocation per request: the body is the pipeline event.
pub async fn invoke(AxumState(state): AxumState<SharedState>, body: Bytes) -> Response {
    let invocation_id = Uuid::now_v7();
    let span = info_span!("invocation", id = %invocation_id);

    async move {
        let event: serde_json::Value = match serde_json::from_slice(&body) {
            Ok(v) => v,
            Err(e) => {
                info!("Could not parse JSON body: {:?}", e);
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"status": "error", "message": "Event body is not JSON."})),
                )
                    .into_response();
            }
        };

        match state.notifier.handle(event).await {
            Ok(outcome) => Json(outcome).into_response(),
            Err(e) => {
                error!("Invocation failed: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({"status": "failed", "message": e.to_string()})),
                )
                    .into_response()
            }
        }
    }
    .instrument(span)
    .await
}
