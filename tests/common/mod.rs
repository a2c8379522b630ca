use axum::{
    Router,
    body::Bytes,
    extract::State as AxumState,
    http::{HeaderMap, StatusCode},
    routing,
};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// Request captured by the fake chat webhook
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub content_type: Option<String>,
    pub body: serde_json::Value,
}

#[derive(Clone)]
pub struct FakeWebhook {
    pub status: StatusCode,
    pub received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl FakeWebhook {
    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }
}

async fn receive(
    AxumState(hook): AxumState<FakeWebhook>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    hook.received
        .lock()
        .unwrap()
        .push(ReceivedRequest { content_type, body });
    hook.status
}

/// Serve `app` on an ephemeral local port.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Start a fake webhook answering every POST with `status`. Returns its URL.
pub async fn fake_webhook(status: StatusCode) -> (String, FakeWebhook) {
    let hook = FakeWebhook {
        status,
        received: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/hook", routing::post(receive))
        .with_state(hook.clone());
    let addr = serve(app).await;
    (format!("http://{}/hook", addr), hook)
}

pub fn failed_event() -> serde_json::Value {
    serde_json::json!({
        "time": "2024-01-01T00:00:00Z",
        "detail": {
            "state": "FAILED",
            "execution-trigger": {"author-id": "bob", "commit-id": "abc123"}
        }
    })
}
