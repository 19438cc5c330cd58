//! Element lookup and interaction.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex as ParkingMutex;
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::debug;

use crate::browser::selector::By;
use crate::error::{Error, Result};
use crate::identifiers::ElementId;
use crate::protocol::{Command, ElementCommand, Event, InputCommand, ParsedEvent};

use super::Tab;

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for wait_for_element (30 seconds).
pub(crate) const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Tab - Element Search
// ============================================================================

impl Tab {
    /// Finds an element that is already present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementNotFound`] if nothing matches.
    pub async fn find_element(&self, by: &By) -> Result<ElementId> {
        let command = Command::Element(ElementCommand::Find {
            strategy: by.strategy().to_string(),
            value: by.value().to_string(),
        });

        let response = self.send_command(command).await?;

        response
            .get_str("elementId")
            .map(ElementId::new)
            .ok_or_else(|| Error::element_not_found(by.to_string(), self.inner.tab_id))
    }

    /// Waits for an element to appear.
    ///
    /// Uses a DOM subscription (no polling). Times out after 30 seconds.
    pub async fn wait_for_element(&self, by: &By) -> Result<ElementId> {
        self.wait_for_element_timeout(by, DEFAULT_WAIT_TIMEOUT)
            .await
    }

    /// Waits for an element to appear, with a custom timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] if the element does not appear in time.
    pub async fn wait_for_element_timeout(
        &self,
        by: &By,
        timeout_duration: Duration,
    ) -> Result<ElementId> {
        debug!(
            tab_id = %self.inner.tab_id,
            strategy = by.strategy(),
            value = by.value(),
            timeout_ms = timeout_duration.as_millis() as u64,
            "Waiting for element"
        );

        let (tx, rx) = oneshot::channel::<ElementId>();
        let tx = Arc::new(ParkingMutex::new(Some(tx)));
        let expected_strategy = by.strategy().to_string();
        let expected_value = by.value().to_string();
        let expected_tab = self.inner.tab_id.as_u32();

        let handler_id = self.inner.connection.add_event_handler(Box::new(
            move |event: &Event| {
                if let ParsedEvent::ElementAdded {
                    strategy,
                    value,
                    element_id,
                    tab_id,
                } = event.parse()
                    && tab_id == expected_tab
                    && strategy == expected_strategy
                    && value == expected_value
                    && let Some(tx) = tx.lock().take()
                {
                    let _ = tx.send(ElementId::new(element_id));
                }
            },
        ));

        let command = Command::Element(ElementCommand::Subscribe {
            strategy: by.strategy().to_string(),
            value: by.value().to_string(),
            one_shot: true,
            timeout: Some(timeout_duration.as_millis() as u64),
        });

        let response = match self.send_command(command).await {
            Ok(response) => response,
            Err(e) => {
                self.inner.connection.remove_event_handler(handler_id);
                return Err(e);
            }
        };

        // Already present when subscribing.
        if let Some(element_id) = response.get_str("elementId") {
            self.inner.connection.remove_event_handler(handler_id);
            return Ok(ElementId::new(element_id));
        }

        let result = timeout(timeout_duration, rx).await;
        self.inner.connection.remove_event_handler(handler_id);

        match result {
            Ok(Ok(element_id)) => Ok(element_id),
            Ok(Err(_)) => Err(Error::ConnectionClosed),
            Err(_) => Err(Error::timeout(
                format!("wait_for({by})"),
                timeout_duration.as_millis() as u64,
            )),
        }
    }
}

// ============================================================================
// Tab - Element Interaction
// ============================================================================

impl Tab {
    /// Waits for an element and clicks it.
    pub async fn click(&self, by: &By) -> Result<()> {
        let element_id = self.wait_for_element(by).await?;
        debug!(tab_id = %self.inner.tab_id, %element_id, "Clicking element");
        self.call_method(&element_id, "click", vec![]).await?;
        Ok(())
    }

    /// Waits for an element, focuses it and types `text`.
    pub async fn type_text(&self, by: &By, text: &str) -> Result<()> {
        let element_id = self.wait_for_element(by).await?;
        debug!(tab_id = %self.inner.tab_id, %element_id, text_len = text.len(), "Typing text");

        self.call_method(&element_id, "focus", vec![]).await?;

        let command = Command::Input(InputCommand::TypeText {
            element_id,
            text: text.to_string(),
        });
        self.send_command(command).await?;
        Ok(())
    }

    /// Calls `element[name](...args)` and returns the result value.
    async fn call_method(&self, element_id: &ElementId, name: &str, args: Vec<Value>) -> Result<Value> {
        let command = Command::Element(ElementCommand::CallMethod {
            element_id: element_id.clone(),
            name: name.to_string(),
            args,
        });

        let response = self.send_command(command).await?;

        Ok(response
            .result
            .and_then(|v| v.get("value").cloned())
            .unwrap_or(Value::Null))
    }
}
