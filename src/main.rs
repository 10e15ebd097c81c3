use asset_api::{
    app_router, build_services,
    config::{init_tracing, load_config},
    db, events, AppState,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!(e)
    })?;
    init_tracing(config.log_level(), config.log_json);

    info!(
        environment = %config.environment,
        "starting asset-api v{}",
        env!("CARGO_PKG_VERSION")
    );

    let db = Arc::new(db::establish_connection_from_app_config(&config).await?);
    if config.auto_migrate {
        db::run_migrations(db.as_ref()).await?;
    }

    let (tx, rx) = mpsc::channel(config.event_channel_capacity);
    let event_sender = Arc::new(events::EventSender::new(tx));
    tokio::spawn(events::process_events(rx));

    let services = build_services(db.clone(), event_sender.clone(), &config);
    let state = AppState {
        db,
        config: config.clone(),
        event_sender: event_sender.as_ref().clone(),
        services,
    };

    let app = app_router(state);

    let addr = config.server_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("server error: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
