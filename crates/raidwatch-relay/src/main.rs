//! raidwatch relay
//!
//! - Config: `RAIDWATCH_CONFIG` (default `raidwatch.yaml`)
//! - Control key: `CONTROL_PRIVATE_KEY` (hex Ed25519 seed)
//! - Logs every routing envelope until Ctrl-C / SIGTERM, then shuts down

use std::env;
use std::process::ExitCode;

use raidwatch_core::auth::DigestSigner;
use raidwatch_relay::{app_state::AppState, config, telemetry};

const DEFAULT_CONFIG_PATH: &str = "raidwatch.yaml";

#[tokio::main]
async fn main() -> ExitCode {
    let path = env::var("RAIDWATCH_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let cfg = match config::load_from_file(&path) {
        Ok(cfg) => cfg,
        Err(e) => {
            telemetry::init(None);
            tracing::error!(%path, error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };
    telemetry::init(Some(&cfg.logging));

    let Ok(key_hex) = env::var("CONTROL_PRIVATE_KEY") else {
        tracing::error!("CONTROL_PRIVATE_KEY is not set");
        return ExitCode::FAILURE;
    };
    let signer = match DigestSigner::from_hex(&key_hex) {
        Ok(signer) => signer,
        Err(e) => {
            tracing::error!(error = %e, "control key rejected");
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::new(cfg, signer) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "relay setup failed");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(url = %state.cfg().server.url, "raidwatch relay starting");
    state.start().await;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);
    let mut feed_open = true;
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            envelope = state.attack_feed().get(), if feed_open => match envelope {
                Some(batch) => {
                    for msg in &batch.messages {
                        tracing::info!(
                            username = %batch.username,
                            server = %batch.server,
                            routes = ?batch.routes,
                            "{msg}"
                        );
                    }
                }
                None => feed_open = false,
            },
        }
    }

    state.shutdown().await;
    tracing::info!("raidwatch relay stopped");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
