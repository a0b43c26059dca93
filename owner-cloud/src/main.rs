use std::sync::Arc;

use owner_cloud::api;
use owner_cloud::config::Config;
use owner_cloud::schedule::{ScheduleWorker, SystemClock};
use owner_cloud::state::AppState;
use owner_cloud::tasks::{BackgroundTasks, TaskKind};
use tokio_util::sync::CancellationToken;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = Config::from_env()?;
    tracing::info!(
        env = %config.environment,
        timezone = %config.timezone,
        "Starting owner-cloud"
    );

    let state = AppState::new(&config).await?;

    let shutdown = CancellationToken::new();
    let mut tasks = BackgroundTasks::with_token(shutdown.clone());

    let worker = ScheduleWorker::new(
        state.store.clone(),
        Arc::new(SystemClock::new(config.timezone)),
        state.live.clone(),
        config.schedule_interval,
        tasks.shutdown_token(),
    );
    tasks.spawn("schedule_worker", TaskKind::Periodic, worker.run());
    tasks.log_summary();

    let app = api::create_router(state, &config.client_url);
    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("owner-cloud HTTP listening on {http_addr}");

    let server_shutdown = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        server_shutdown.cancel();
    });

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .await;
    if let Err(e) = &result {
        tracing::error!("HTTP server error: {e}");
    }

    tasks.shutdown().await;
    result.map_err(Into::into)
}

/// `RUST_LOG` filter, `LOG_FORMAT=json` for structured output
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "owner_cloud=info,tower_http=info".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
