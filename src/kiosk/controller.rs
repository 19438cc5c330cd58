//! The tab cycle controller.
//!
//! [`TabCycleController`] is the single place that decides what the display
//! shows. The switch cycle, the HTTP handlers and the MQTT listener all call
//! into the same handle.
//!
//! # Serialization
//!
//! Every operation that reads or writes the current tab, the registry or the
//! cycle runs under one async switch lock, and a switch holds it from
//! activation until the status is published. A cycle tick that was superseded
//! while waiting for the lock does nothing.
//!
//! Read-only views (`is_cycling`, `current_tab`, `image_for`,
//! `known_tab_ids`) do not take the switch lock, so they answer promptly
//! while a slow switch is in flight.
//!
//! # Example
//!
//! ```ignore
//! let controller = TabCycleController::new(Arc::new(window));
//! for tab in &tabs {
//!     controller.register_tab(tab).await?;
//! }
//! controller.finish_startup().await?;
//! controller.start_cycling(Duration::from_secs(30)).await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::{Mutex, broadcast};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::backlight::DisplayStatus;
use crate::browser::BrowserDriver;
use crate::error::{Error, Result};
use crate::identifiers::TabId;
use crate::script::TabDefinition;

use super::cycle::SwitchCycle;
use super::images::{Image, ImageStore};
use super::registry::{Direction, TabRegistry};
use super::status::{StatusSink, StatusUpdate};

// ============================================================================
// Types
// ============================================================================

struct ControllerInner {
    driver: Arc<dyn BrowserDriver>,
    registry: RwLock<TabRegistry>,
    images: ImageStore,
    cycle: SwitchCycle,
    status: StatusSink,
    /// Serializes every state-changing operation.
    switch_lock: Mutex<()>,
    /// Written only while `switch_lock` is held.
    current: RwLock<Option<TabId>>,
}

// ============================================================================
// TabCycleController
// ============================================================================

/// Shared handle to the kiosk state.
///
/// Cloning is cheap; all clones control the same display.
#[derive(Clone)]
pub struct TabCycleController {
    inner: Arc<ControllerInner>,
}

impl fmt::Debug for TabCycleController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabCycleController")
            .field("tabs", &self.inner.registry.read().len())
            .field("current", &self.current_tab())
            .field("cycling", &self.is_cycling())
            .finish_non_exhaustive()
    }
}

impl TabCycleController {
    /// Creates a controller with an empty registry.
    #[must_use]
    pub fn new(driver: Arc<dyn BrowserDriver>) -> Self {
        Self {
            inner: Arc::new(ControllerInner {
                driver,
                registry: RwLock::new(TabRegistry::new()),
                images: ImageStore::new(),
                cycle: SwitchCycle::new(),
                status: StatusSink::new(),
                switch_lock: Mutex::new(()),
                current: RwLock::new(None),
            }),
        }
    }
}

// ============================================================================
// TabCycleController - Startup
// ============================================================================

impl TabCycleController {
    /// Creates a tab from its definition, runs its steps and stores its
    /// first screenshot.
    ///
    /// # Errors
    ///
    /// - [`Error::RegistrySealed`] after [`finish_startup`](Self::finish_startup)
    /// - [`Error::TabCreationFailed`] if the tab or one of its steps fails
    /// - [`Error::ScreenshotFailed`] if the first capture fails
    pub async fn register_tab(&self, definition: &TabDefinition) -> Result<TabId> {
        let _guard = self.inner.switch_lock.lock().await;

        let sealed = self.inner.registry.read().is_sealed();
        if sealed {
            return Err(Error::RegistrySealed);
        }

        let name = definition.name();
        info!(tab = %definition, "Registering tab");

        let actions = definition
            .actions()
            .map_err(|e| Error::tab_creation_failed(name, &e))?;

        let tab_id = self
            .inner
            .driver
            .create_tab(name, &actions)
            .await
            .map_err(|e| Error::tab_creation_failed(name, &e))?;

        let image = self
            .inner
            .driver
            .capture_screenshot(tab_id)
            .await
            .map_err(|e| Error::screenshot_failed(name, &e))?;

        self.inner.registry.write().append(tab_id)?;
        self.inner.images.put(tab_id, image);

        info!(name, %tab_id, "Tab registered");
        Ok(tab_id)
    }

    /// Freezes the registry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRegistry`] if no tab was registered.
    pub async fn finish_startup(&self) -> Result<()> {
        let _guard = self.inner.switch_lock.lock().await;
        let mut registry = self.inner.registry.write();
        registry.seal()?;
        info!(tabs = registry.len(), "Startup complete");
        Ok(())
    }
}

// ============================================================================
// TabCycleController - Switching
// ============================================================================

impl TabCycleController {
    /// Stops cycling and shows the next tab.
    pub async fn switch_next(&self) -> Result<TabId> {
        self.manual_switch(Direction::Forward).await
    }

    /// Stops cycling and shows the previous tab.
    pub async fn switch_previous(&self) -> Result<TabId> {
        self.manual_switch(Direction::Backward).await
    }

    /// Stops cycling and shows `tab_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTab`] if `tab_id` is not registered.
    pub async fn switch_to_id(&self, tab_id: TabId) -> Result<TabId> {
        let _guard = self.inner.switch_lock.lock().await;
        self.stop_cycle();

        self.inner.registry.read().find(tab_id)?;
        self.switch_to_locked(tab_id).await
    }

    /// Shows the next tab without touching the cycle.
    ///
    /// This is what each cycle tick does.
    pub async fn advance(&self) -> Result<TabId> {
        let _guard = self.inner.switch_lock.lock().await;
        self.advance_locked(Direction::Forward).await
    }

    async fn manual_switch(&self, direction: Direction) -> Result<TabId> {
        let _guard = self.inner.switch_lock.lock().await;
        self.stop_cycle();
        self.advance_locked(direction).await
    }

    async fn advance_locked(&self, direction: Direction) -> Result<TabId> {
        let current = self.current_tab();
        let target = self.inner.registry.read().next(current, direction)?;
        self.switch_to_locked(target).await
    }

    /// Activates, captures, then commits. Nothing is committed on failure.
    async fn switch_to_locked(&self, tab_id: TabId) -> Result<TabId> {
        debug!(%tab_id, "Switching tab");

        self.inner
            .driver
            .activate(tab_id)
            .await
            .map_err(|e| Error::activation_failed(tab_id, &e))?;

        let image = self
            .inner
            .driver
            .capture_screenshot(tab_id)
            .await
            .map_err(|e| Error::screenshot_failed(tab_id, &e))?;

        self.inner.images.put(tab_id, image);
        *self.inner.current.write() = Some(tab_id);
        self.publish_status();

        debug!(%tab_id, "Switched tab");
        Ok(tab_id)
    }
}

// ============================================================================
// TabCycleController - Cycling
// ============================================================================

impl TabCycleController {
    /// Starts (or restarts) automatic switching every `interval`.
    ///
    /// The first switch happens right away. A failing switch stops the cycle
    /// until it is started again.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyRegistry`] if there is nothing to cycle through
    /// - [`Error::Config`] if `interval` is zero
    pub async fn start_cycling(&self, interval: Duration) -> Result<()> {
        let _guard = self.inner.switch_lock.lock().await;

        let empty = self.inner.registry.read().is_empty();
        if empty {
            return Err(Error::EmptyRegistry);
        }

        let on_tick = {
            let weak = Arc::downgrade(&self.inner);
            move |token: CancellationToken| {
                let weak = Weak::clone(&weak);
                async move {
                    match weak.upgrade() {
                        Some(inner) => TabCycleController { inner }.tick(&token).await,
                        None => Ok(()),
                    }
                }
            }
        };

        let on_error = {
            let weak = Arc::downgrade(&self.inner);
            move |e: Error| {
                error!(error = %e, "Tab switching stopped");
                if let Some(inner) = weak.upgrade() {
                    TabCycleController { inner }.publish_status();
                }
            }
        };

        self.inner.cycle.start(interval, on_tick, on_error)?;
        info!(interval_ms = interval.as_millis() as u64, "Cycling started");
        self.publish_status();
        Ok(())
    }

    /// Stops automatic switching.
    ///
    /// Returns `true` if the cycle was running. Calling this repeatedly is
    /// harmless.
    pub async fn pause_cycling(&self) -> bool {
        let _guard = self.inner.switch_lock.lock().await;
        let stopped = self.inner.cycle.stop();
        if stopped {
            info!("Cycling paused");
        }
        self.publish_status();
        stopped
    }

    /// Returns whether the cycle is running.
    #[inline]
    #[must_use]
    pub fn is_cycling(&self) -> bool {
        self.inner.cycle.is_running()
    }

    async fn tick(&self, token: &CancellationToken) -> Result<()> {
        let _guard = self.inner.switch_lock.lock().await;
        if token.is_cancelled() {
            debug!("Skipping superseded tick");
            return Ok(());
        }
        self.advance_locked(Direction::Forward).await.map(|_| ())
    }

    /// Must be called with the switch lock held.
    fn stop_cycle(&self) {
        if self.inner.cycle.stop() {
            info!("Cycling stopped by manual switch");
            self.publish_status();
        }
    }
}

// ============================================================================
// TabCycleController - Views
// ============================================================================

impl TabCycleController {
    /// Returns the frontmost tab, if any switch has happened.
    #[inline]
    #[must_use]
    pub fn current_tab(&self) -> Option<TabId> {
        *self.inner.current.read()
    }

    /// Returns the registered tabs in rotation order.
    #[must_use]
    pub fn tabs(&self) -> Vec<TabId> {
        self.inner.registry.read().tabs().to_vec()
    }

    /// Returns the latest screenshot of `tab_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ImageNotFound`] if the tab was never captured.
    pub fn image_for(&self, tab_id: TabId) -> Result<Image> {
        self.inner
            .images
            .get(tab_id)
            .ok_or_else(|| Error::image_not_found(tab_id))
    }

    /// Returns the tabs that have a screenshot.
    #[must_use]
    pub fn known_tab_ids(&self) -> Vec<TabId> {
        self.inner.images.ids()
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn status(&self) -> StatusUpdate {
        StatusUpdate {
            is_tab_switching: self.is_cycling(),
            current_tab: self.current_tab(),
            backlight: None,
        }
    }

    /// Subscribes to status updates.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StatusUpdate> {
        self.inner.status.subscribe()
    }

    /// Publishes a backlight change alongside the current state.
    pub fn publish_backlight(&self, backlight: DisplayStatus) {
        self.inner.status.publish(StatusUpdate {
            backlight: Some(backlight),
            ..self.status()
        });
    }

    fn publish_status(&self) {
        self.inner.status.publish(self.status());
    }
}

// ============================================================================
// TabCycleController - Shutdown
// ============================================================================

impl TabCycleController {
    /// Stops cycling and shuts the browser down.
    pub async fn close(&self) -> Result<()> {
        let _guard = self.inner.switch_lock.lock().await;
        self.inner.cycle.stop();
        info!("Closing browser");
        self.inner.driver.close().await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::kiosk::testing::RecordingDriver;
    use crate::script::Step;

    fn id(n: u32) -> TabId {
        TabId::new(n).unwrap()
    }

    fn definition(name: &str) -> TabDefinition {
        TabDefinition::new(name, vec![Step::Go(format!("https://{name}.example"))])
    }

    /// Controller with `names.len()` tabs, numbered from 1, sealed.
    async fn controller(names: &[&str]) -> (Arc<RecordingDriver>, TabCycleController) {
        let driver = Arc::new(RecordingDriver::new());
        let controller = TabCycleController::new(Arc::clone(&driver) as Arc<dyn BrowserDriver>);
        for name in names {
            controller.register_tab(&definition(name)).await.unwrap();
        }
        controller.finish_startup().await.unwrap();
        (driver, controller)
    }

    #[test]
    fn test_controller_is_clone() {
        fn assert_clone<T: Clone + Send + Sync>() {}
        assert_clone::<TabCycleController>();
    }

    // ------------------------------------------------------------------------
    // Startup
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_register_stores_first_image() {
        let (_driver, controller) = controller(&["a", "b"]).await;

        assert_eq!(controller.tabs(), vec![id(1), id(2)]);
        assert_eq!(controller.image_for(id(1)).unwrap().data(), b"1-1");
        assert_eq!(controller.image_for(id(2)).unwrap().data(), b"2-2");
        assert_eq!(controller.current_tab(), None);
    }

    #[tokio::test]
    async fn test_register_after_startup_is_rejected() {
        let (_driver, controller) = controller(&["a"]).await;
        assert!(matches!(
            controller.register_tab(&definition("late")).await,
            Err(Error::RegistrySealed)
        ));
    }

    #[tokio::test]
    async fn test_finish_startup_needs_a_tab() {
        let controller = TabCycleController::new(Arc::new(RecordingDriver::new()));
        assert!(matches!(
            controller.finish_startup().await,
            Err(Error::EmptyRegistry)
        ));
    }

    #[tokio::test]
    async fn test_register_failures_are_wrapped() {
        let driver = Arc::new(RecordingDriver::new());
        let controller = TabCycleController::new(Arc::clone(&driver) as Arc<dyn BrowserDriver>);

        driver.fail_create(true);
        let err = controller.register_tab(&definition("grafana")).await.unwrap_err();
        assert!(matches!(err, Error::TabCreationFailed { ref name, .. } if name == "grafana"));

        driver.fail_create(false);
        driver.fail_capture(true);
        let err = controller.register_tab(&definition("grafana")).await.unwrap_err();
        assert!(matches!(err, Error::ScreenshotFailed { ref tab, .. } if tab == "grafana"));
        assert!(controller.tabs().is_empty());
    }

    // ------------------------------------------------------------------------
    // Switching
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_next_previous_and_direct_switching() {
        let (driver, controller) = controller(&["a", "b", "c"]).await;
        let (a, b, c) = (id(1), id(2), id(3));

        assert_eq!(controller.switch_next().await.unwrap(), a);
        assert_eq!(controller.current_tab(), Some(a));
        assert_eq!(controller.switch_next().await.unwrap(), b);
        assert_eq!(controller.switch_previous().await.unwrap(), a);
        assert_eq!(controller.switch_to_id(c).await.unwrap(), c);
        assert_eq!(controller.switch_next().await.unwrap(), a);

        assert_eq!(driver.activations(), vec![a, b, a, c, a]);
        assert_eq!(controller.current_tab(), Some(a));
    }

    #[tokio::test]
    async fn test_previous_from_unset_is_first() {
        let (_driver, controller) = controller(&["a", "b", "c"]).await;
        assert_eq!(controller.switch_previous().await.unwrap(), id(1));
        assert_eq!(controller.switch_previous().await.unwrap(), id(3));
    }

    #[tokio::test]
    async fn test_switch_to_unknown_tab() {
        let (driver, controller) = controller(&["a"]).await;
        assert!(matches!(
            controller.switch_to_id(id(42)).await,
            Err(Error::UnknownTab { .. })
        ));
        assert!(driver.activations().is_empty());
    }

    #[tokio::test]
    async fn test_activation_failure_changes_nothing() {
        let (driver, controller) = controller(&["a", "b"]).await;
        controller.switch_next().await.unwrap();
        let before_a = controller.image_for(id(1)).unwrap();
        let before_b = controller.image_for(id(2)).unwrap();

        driver.fail_activation_of(id(2));
        let err = controller.switch_next().await.unwrap_err();

        assert!(matches!(err, Error::ActivationFailed { .. }));
        assert_eq!(controller.current_tab(), Some(id(1)));
        assert_eq!(controller.image_for(id(1)).unwrap(), before_a);
        assert_eq!(controller.image_for(id(2)).unwrap(), before_b);
    }

    #[tokio::test]
    async fn test_screenshot_failure_keeps_current_tab() {
        let (driver, controller) = controller(&["a", "b"]).await;
        controller.switch_next().await.unwrap();

        driver.fail_capture(true);
        let err = controller.switch_next().await.unwrap_err();

        assert!(matches!(err, Error::ScreenshotFailed { .. }));
        assert_eq!(controller.current_tab(), Some(id(1)));
    }

    #[tokio::test]
    async fn test_switch_replaces_image() {
        let (_driver, controller) = controller(&["a"]).await;
        assert_eq!(controller.image_for(id(1)).unwrap().data(), b"1-1");

        controller.switch_next().await.unwrap();
        let image = controller.image_for(id(1)).unwrap();
        assert_eq!(image.tab_id(), id(1));
        assert_eq!(image.data(), b"1-2");
    }

    #[tokio::test]
    async fn test_image_for_unknown_tab() {
        let (_driver, controller) = controller(&["a"]).await;
        assert!(matches!(
            controller.image_for(id(9)),
            Err(Error::ImageNotFound { .. })
        ));
        assert_eq!(controller.known_tab_ids(), vec![id(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_switches_are_serialized() {
        let (driver, controller) = controller(&["a", "b", "c"]).await;
        controller.switch_next().await.unwrap();
        driver.slow_activation(Duration::from_millis(20));

        let (first, second, tick) = tokio::join!(
            controller.switch_next(),
            controller.switch_next(),
            controller.advance(),
        );
        first.unwrap();
        second.unwrap();
        tick.unwrap();

        assert_eq!(driver.max_in_flight(), 1);
        assert_eq!(driver.activations(), vec![id(1), id(2), id(3), id(1)]);
        assert_eq!(controller.current_tab(), Some(id(1)));
    }

    // ------------------------------------------------------------------------
    // Cycling
    // ------------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_cycling_wraps_around() {
        let (driver, controller) = controller(&["a", "b"]).await;

        controller.start_cycling(Duration::from_millis(50)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(controller.is_cycling());
        assert_eq!(driver.activations(), vec![id(1), id(2), id(1)]);
        assert_eq!(controller.current_tab(), Some(id(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_replaces_cycle() {
        let (driver, controller) = controller(&["a", "b"]).await;

        controller.start_cycling(Duration::from_millis(50)).await.unwrap();
        controller.start_cycling(Duration::from_secs(10)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert_eq!(driver.activations(), vec![id(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_twice() {
        let (driver, controller) = controller(&["a", "b"]).await;

        controller.start_cycling(Duration::from_millis(50)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(controller.pause_cycling().await);
        assert!(!controller.pause_cycling().await);
        assert!(!controller.is_cycling());

        let seen = driver.activations().len();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(driver.activations().len(), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_switch_stops_cycle() {
        let (_driver, controller) = controller(&["a", "b", "c"]).await;

        controller.start_cycling(Duration::from_millis(50)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(controller.is_cycling());

        controller.switch_next().await.unwrap();
        assert!(!controller.is_cycling());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_switch_queued_behind_start_pauses() {
        let (driver, controller) = controller(&["a", "b", "c"]).await;
        driver.slow_activation(Duration::from_millis(20));

        let busy = tokio::spawn({
            let controller = controller.clone();
            async move { controller.advance().await }
        });
        tokio::task::yield_now().await;

        let start = tokio::spawn({
            let controller = controller.clone();
            async move { controller.start_cycling(Duration::from_secs(60)).await }
        });
        tokio::task::yield_now().await;

        assert_eq!(controller.switch_next().await.unwrap(), id(2));
        busy.await.unwrap().unwrap();
        start.await.unwrap().unwrap();

        assert!(!controller.is_cycling());
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(driver.activations(), vec![id(1), id(2)]);
        assert_eq!(controller.current_tab(), Some(id(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_switches_race_live_cycle() {
        let (driver, controller) = controller(&["a", "b", "c"]).await;
        driver.slow_activation(Duration::from_millis(20));

        controller.start_cycling(Duration::from_millis(50)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let (restart, first, second) = tokio::join!(
            controller.start_cycling(Duration::from_millis(50)),
            controller.switch_next(),
            controller.switch_next(),
        );
        restart.unwrap();
        assert_eq!(first.unwrap(), id(2));
        assert_eq!(second.unwrap(), id(3));

        assert!(!controller.is_cycling());
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(driver.max_in_flight(), 1);
        assert_eq!(driver.activations(), vec![id(1), id(2), id(3)]);
        assert_eq!(controller.current_tab(), Some(id(3)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_waits_for_switch_and_stops_cycle() {
        let (driver, controller) = controller(&["a", "b"]).await;
        driver.slow_activation(Duration::from_millis(20));

        let busy = tokio::spawn({
            let controller = controller.clone();
            async move { controller.advance().await }
        });
        tokio::task::yield_now().await;

        let start = tokio::spawn({
            let controller = controller.clone();
            async move { controller.start_cycling(Duration::from_millis(50)).await }
        });
        tokio::task::yield_now().await;

        controller.close().await.unwrap();
        busy.await.unwrap().unwrap();
        start.await.unwrap().unwrap();

        assert!(!controller.is_cycling());
        assert!(driver.is_closed());
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(driver.activations(), vec![id(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_tick_stops_cycle() {
        let (driver, controller) = controller(&["a", "b"]).await;
        driver.fail_activation_of(id(1));
        let mut updates = controller.subscribe();

        controller.start_cycling(Duration::from_millis(50)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;

        assert!(!controller.is_cycling());
        assert!(driver.activations().is_empty());

        let mut last = None;
        while let Ok(update) = updates.try_recv() {
            last = Some(update);
        }
        assert_eq!(last.map(|u| u.is_tab_switching), Some(false));
    }

    #[tokio::test]
    async fn test_cycling_needs_tabs() {
        let controller = TabCycleController::new(Arc::new(RecordingDriver::new()));
        assert!(matches!(
            controller.start_cycling(Duration::from_secs(1)).await,
            Err(Error::EmptyRegistry)
        ));
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_switch_publishes_status() {
        let (_driver, controller) = controller(&["a", "b"]).await;
        let mut updates = controller.subscribe();

        controller.switch_next().await.unwrap();

        let update = updates.recv().await.unwrap();
        assert_eq!(update.current_tab, Some(id(1)));
        assert!(!update.is_tab_switching);
        assert_eq!(controller.status(), update);
    }

    #[tokio::test]
    async fn test_backlight_update_carries_state() {
        let (_driver, controller) = controller(&["a"]).await;
        controller.switch_next().await.unwrap();
        let mut updates = controller.subscribe();

        let backlight = DisplayStatus {
            display: 0,
            status: false,
        };
        controller.publish_backlight(backlight);

        let update = updates.recv().await.unwrap();
        assert_eq!(update.backlight, Some(backlight));
        assert_eq!(update.current_tab, Some(id(1)));
    }

    #[tokio::test]
    async fn test_close_stops_and_closes_driver() {
        let (driver, controller) = controller(&["a"]).await;
        controller.start_cycling(Duration::from_secs(30)).await.unwrap();

        controller.close().await.unwrap();

        assert!(!controller.is_cycling());
        assert!(driver.is_closed());
    }
}
