//! # ledbridged: LED bridge daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars) and initialise tracing
//! - Initialize the `SQLite` connection pool and run migrations
//! - Create the MQTT client, spawn the control loop, then start the sensor
//!   feed, so no reading can arrive before the worker exists
//! - Build the axum router around the query service and control handle
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use ledbridge_adapter_http_axum::router;
use ledbridge_adapter_http_axum::state::AppState;
use ledbridge_adapter_mqtt::MqttBridge;
use ledbridge_adapter_storage_sqlite_sqlx::{
    Database, SqliteActuatorRepository, SqliteControlLog, SqliteSensorRepository,
};
use ledbridge_app::control_loop::ControlLoop;
use ledbridge_app::event_bus::InProcessActuatorBus;
use ledbridge_app::ports::ActuatorPublisher;
use ledbridge_app::services::query_service::QueryService;

use crate::config::Config;

/// How long the worker gets to drain queued commands on shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    init_tracing(&config.logging.filter);

    let db = ledbridge_adapter_storage_sqlite_sqlx::Config {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await?;

    let result = if config.integrations.mqtt_enabled {
        let (publisher, bridge) = ledbridge_adapter_mqtt::connect(&config.mqtt);
        serve(&config, &db, publisher, Some(bridge)).await
    } else {
        tracing::warn!("MQTT disabled, commands stay in-process and no sensor feed is read");
        serve(&config, &db, InProcessActuatorBus::new(64), None).await
    };

    db.close().await;
    result
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {filter:?} ({err}), falling back to info");
        EnvFilter::new("info")
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

async fn serve<P>(
    config: &Config,
    db: &Database,
    publisher: P,
    bridge: Option<MqttBridge>,
) -> Result<(), Box<dyn std::error::Error>>
where
    P: ActuatorPublisher + Send + Sync + 'static,
{
    let pool = db.pool().clone();

    // Control loop
    let (control, worker) = ControlLoop::new(
        SqliteControlLog::new(pool.clone()),
        publisher,
        config.control_config(),
    )
    .spawn();

    // Sensor feed
    let bridge = bridge.map(|bridge| bridge.start(control.clone()));

    // HTTP
    let query_service = QueryService::new(
        SqliteSensorRepository::new(pool.clone()),
        SqliteActuatorRepository::new(pool),
    );
    let app = router::build(AppState::new(query_service, control));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "ledbridged listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(bridge) = bridge {
        bridge.shutdown().await;
    }
    // Every handle is gone now; the worker finishes what is queued and exits.
    if tokio::time::timeout(DRAIN_TIMEOUT, worker).await.is_err() {
        tracing::warn!("control loop did not drain in time");
    }

    served?;
    tracing::info!("ledbridged stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown requested");
}
