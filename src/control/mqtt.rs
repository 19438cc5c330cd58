//! MQTT control listener.
//!
//! Subscribes to one topic and treats each payload as a command:
//!
//! | Payload | Effect |
//! |---------|--------|
//! | `pause` | Stop cycling |
//! | `resume` | Start cycling |
//! | `next` | Show the next tab |
//! | `previous` | Show the previous tab |
//!
//! Payloads are trimmed and matched case-insensitively. Commands run one at a
//! time in arrival order on a separate task, so a slow switch never stalls
//! the MQTT event loop.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::kiosk::TabCycleController;

// ============================================================================
// Constants
// ============================================================================

/// Delay before reconnecting after a connection error.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// MQTT keep-alive interval.
const KEEP_ALIVE: Duration = Duration::from_secs(30);

/// Commands queued for the dispatcher before new ones are dropped.
const COMMAND_QUEUE: usize = 16;

/// Requests buffered between the client handle and the event loop.
const CLIENT_CAPACITY: usize = 10;

// ============================================================================
// MqttCommand
// ============================================================================

/// A control command received over MQTT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MqttCommand {
    /// Stop cycling.
    Pause,
    /// Start cycling.
    Resume,
    /// Show the next tab.
    Next,
    /// Show the previous tab.
    Previous,
}

impl MqttCommand {
    /// Parses a raw payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Mqtt`] for anything but the four known commands.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(payload)
            .map_err(|_| Error::mqtt("command payload is not UTF-8"))?;
        text.parse()
    }
}

impl FromStr for MqttCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pause" => Ok(Self::Pause),
            "resume" => Ok(Self::Resume),
            "next" => Ok(Self::Next),
            "previous" => Ok(Self::Previous),
            other => Err(Error::mqtt(format!("unknown command '{other}'"))),
        }
    }
}

impl fmt::Display for MqttCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Next => "next",
            Self::Previous => "previous",
        };
        f.write_str(name)
    }
}

/// Applies `command` to the controller.
///
/// `interval` is the cycle period used by [`MqttCommand::Resume`].
///
/// # Errors
///
/// Returns whatever the controller operation reports.
pub async fn dispatch(
    controller: &TabCycleController,
    command: MqttCommand,
    interval: Duration,
) -> Result<()> {
    match command {
        MqttCommand::Pause => {
            controller.pause_cycling().await;
        }
        MqttCommand::Resume => controller.start_cycling(interval).await?,
        MqttCommand::Next => {
            controller.switch_next().await?;
        }
        MqttCommand::Previous => {
            controller.switch_previous().await?;
        }
    }
    Ok(())
}

// ============================================================================
// MqttSettings
// ============================================================================

/// Broker connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttSettings {
    /// Broker host name.
    pub host: String,
    /// Broker port.
    pub port: u16,
    /// Topic carrying commands.
    pub topic: String,
    /// Client identifier presented to the broker.
    pub client_id: String,
}

impl MqttSettings {
    fn options(&self) -> MqttOptions {
        let mut options = MqttOptions::new(&self.client_id, &self.host, self.port);
        options.set_keep_alive(KEEP_ALIVE);
        options.set_clean_session(true);
        options
    }
}

// ============================================================================
// Listener
// ============================================================================

/// Listens for commands until `shutdown` is cancelled.
///
/// Connection errors are logged and retried after a fixed delay; the
/// subscription is renewed on every successful connect.
pub async fn run(
    settings: MqttSettings,
    controller: TabCycleController,
    interval: Duration,
    shutdown: CancellationToken,
) {
    let (client, mut event_loop) = AsyncClient::new(settings.options(), CLIENT_CAPACITY);
    let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE);

    let dispatcher = tokio::spawn(dispatch_loop(controller, command_rx, interval));

    info!(
        host = %settings.host,
        port = settings.port,
        topic = %settings.topic,
        "MQTT listener started"
    );

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,

            event = event_loop.poll() => {
                if let Err(e) = handle_event(event, &client, &settings.topic, &command_tx).await {
                    warn!(error = %e, delay_s = RECONNECT_DELAY.as_secs(), "MQTT connection lost");
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        _ = tokio::time::sleep(RECONNECT_DELAY) => {}
                    }
                }
            }
        }
    }

    if let Err(e) = client.try_disconnect() {
        debug!(error = %e, "MQTT disconnect failed");
    }
    drop(command_tx);
    let _ = dispatcher.await;
    info!("MQTT listener stopped");
}

async fn handle_event(
    event: std::result::Result<Event, rumqttc::ConnectionError>,
    client: &AsyncClient,
    topic: &str,
    commands: &mpsc::Sender<MqttCommand>,
) -> Result<()> {
    match event.map_err(|e| Error::mqtt(e.to_string()))? {
        Event::Incoming(Packet::ConnAck(_)) => {
            info!(topic, "MQTT connected");
            client
                .subscribe(topic, QoS::AtLeastOnce)
                .await
                .map_err(|e| Error::mqtt(e.to_string()))?;
        }

        Event::Incoming(Packet::Publish(publish)) => match MqttCommand::parse(&publish.payload) {
            Ok(command) => {
                debug!(%command, "MQTT command received");
                if commands.try_send(command).is_err() {
                    warn!(%command, "MQTT command dropped, dispatcher busy");
                }
            }
            Err(e) => warn!(error = %e, "Ignoring MQTT message"),
        },

        _ => {}
    }
    Ok(())
}

async fn dispatch_loop(
    controller: TabCycleController,
    mut commands: mpsc::Receiver<MqttCommand>,
    interval: Duration,
) {
    while let Some(command) = commands.recv().await {
        if let Err(e) = dispatch(&controller, command, interval).await {
            error!(%command, error = %e, "MQTT command failed");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
