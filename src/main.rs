use chrono::Utc;
use pipeline_notifier::handlers::router;
use pipeline_notifier::logging::setup_logging;
use pipeline_notifier::notifier::Notifier;
use pipeline_notifier::transport::HttpTransport;
use pipeline_notifier::{AppState, Settings};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let _log_guard = match setup_logging(settings.host.log_dir.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to set up logging: {}", e);
            std::process::exit(1);
        }
    };

    if !settings.notifier.is_complete() {
        // Invocations will answer with a configuration error until this is fixed
        warn!("Webhook URL or pipeline name is not configured");
    }

    let state = Arc::new(AppState {
        notifier: Notifier::new(settings.notifier, HttpTransport::new()),
        start_time: Instant::now(),
        started_at: Utc::now(),
    });

    let app = router(state);
    let bind_address = settings.host.bind_address;

    let listener = match tokio::net::TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", bind_address, e);
            std::process::exit(1);
        }
    };
    info!("Listening on {}", bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
