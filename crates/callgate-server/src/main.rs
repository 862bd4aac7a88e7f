//! callgate server binary.
//!
//! Loads the contact roster, wires the provider clients into the dispatcher
//! and serves the webhook routes with structured logging and graceful
//! shutdown on SIGTERM/SIGINT.

use callgate_directory::{ContactDirectory, SpreadsheetDirectory};
use callgate_dispatch::Dispatcher;
use callgate_prompt::DEFAULT_SYSTEM_PROMPT;
use callgate_server::{app, config, AppState};
use callgate_telephony::TwilioClient;
use callgate_voice::UltravoxClient;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

fn resolve_config_path() -> (Option<String>, &'static str) {
    if let Some(path) = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
    {
        return (Some(path), "cli-arg");
    }

    if let Ok(path) = std::env::var("CALLGATE_CONFIG_PATH") {
        if !path.trim().is_empty() {
            return (Some(path), "env-var");
        }
    }

    (None, "default")
}

#[tokio::main]
async fn main() {
    // A missing .env is the normal case in deployment.
    let dotenv = dotenvy::dotenv().ok();

    let (resolved_config_path, config_source) = resolve_config_path();
    let selected_config_path = resolved_config_path.as_deref().or(Some("config.toml"));

    let config = config::load_config(selected_config_path)
        .expect("failed to load configuration, the server cannot start without valid config");

    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        source = config_source,
        path = selected_config_path.unwrap_or("<none>"),
        dotenv = ?dotenv,
        "resolved startup configuration path"
    );

    let callback_base = config
        .callback_base()
        .expect("invalid server.public_url, set BASE_URL to the gateway's public address");

    if !config.voice.provider().is_configured() {
        tracing::warn!("voice provider api key not set, sessions will be rejected");
    }
    if !config.telephony.is_configured() {
        tracing::warn!("telephony credentials incomplete, outbound calls will be rejected");
    }

    let directory = Arc::new(SpreadsheetDirectory::load(
        &config.directory.path,
        config.directory.sheet_index,
    ));
    tracing::info!(
        path = %directory.source().display(),
        contacts = directory.len(),
        "contact directory ready"
    );

    let voice = Arc::new(UltravoxClient::new(config.voice.provider()));
    let telephony = Arc::new(TwilioClient::new(config.telephony.clone()));
    let session_template = config.voice.session_template(DEFAULT_SYSTEM_PROMPT);

    let dispatcher = Dispatcher::new(
        directory.clone(),
        voice.clone(),
        telephony,
        session_template.clone(),
        callback_base.clone(),
        config.telephony.phone_number.clone(),
    );

    let state = AppState {
        directory,
        voice,
        dispatcher: Arc::new(dispatcher),
        session_template,
    };

    let app = app(state);
    let addr = SocketAddr::new(config.server.host, config.server.port);

    tracing::info!(%addr, public_url = %callback_base, "starting callgate server");

    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind to address, is another process using this port?");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("callgate server shut down");
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
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
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
