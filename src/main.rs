//! `firefox-kiosk` binary.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use firefox_kiosk::control::{self, AppState};
use firefox_kiosk::{Config, Driver, Result, TabCycleController, VideoCore, script};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    init_logging(&config);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Kiosk failed");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run(config: Config) -> Result<()> {
    let interval = config.interval()?;
    let options = config.firefox_options()?;
    let tabs = script::load(&config.script).await?;
    info!(tabs = tabs.len(), script = %config.script.display(), "Script loaded");

    // Bind before launching so a taken port fails fast.
    let listener = TcpListener::bind(config.http_addr).await?;

    let window = Driver::builder()
        .binary(&config.firefox)
        .extension(&config.extension)
        .options(options)
        .build()?
        .launch()
        .await?;

    let controller = TabCycleController::new(Arc::new(window));

    if let Err(e) = populate(&controller, &tabs).await {
        if let Err(close_error) = controller.close().await {
            warn!(error = %close_error, "Failed to close browser");
        }
        return Err(e);
    }
    controller.start_cycling(interval).await?;

    let shutdown = CancellationToken::new();

    let state = AppState::new(controller.clone(), Arc::new(VideoCore), interval);
    let http = tokio::spawn(control::http::serve(listener, state, shutdown.clone()));

    let mqtt = config.mqtt().map(|settings| {
        tokio::spawn(control::mqtt::run(
            settings,
            controller.clone(),
            interval,
            shutdown.clone(),
        ))
    });

    wait_for_signal().await;
    info!("Shutting down");
    shutdown.cancel();

    match http.await {
        Ok(Err(e)) => warn!(error = %e, "HTTP control API failed"),
        Err(e) => warn!(error = %e, "HTTP task panicked"),
        Ok(Ok(())) => {}
    }
    if let Some(mqtt) = mqtt
        && let Err(e) = mqtt.await
    {
        warn!(error = %e, "MQTT task panicked");
    }

    controller.close().await
}

async fn populate(controller: &TabCycleController, tabs: &[script::TabDefinition]) -> Result<()> {
    for tab in tabs {
        controller.register_tab(tab).await?;
    }
    controller.finish_startup().await
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = wait_for_ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                wait_for_ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    wait_for_ctrl_c().await;
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Ctrl-C handler unavailable");
        std::future::pending::<()>().await;
    }
}
