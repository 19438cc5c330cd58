//! Instrumented in-memory [`BrowserDriver`].

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::browser::{Action, BrowserDriver};
use crate::error::{Error, Result};
use crate::identifiers::TabId;

/// Records every activation and lets tests inject failures and latency.
///
/// Tabs are numbered from 1 in creation order. Each capture returns
/// `"<tab>-<n>"`, where `n` counts captures across all tabs.
#[derive(Default)]
pub(crate) struct RecordingDriver {
    next_tab: AtomicU32,
    captures: AtomicU32,
    activations: Mutex<Vec<TabId>>,
    failing_activation: Mutex<Vec<TabId>>,
    fail_create: AtomicBool,
    fail_capture: AtomicBool,
    activation_delay: Mutex<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    closed: AtomicBool,
}

impl RecordingDriver {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Tabs activated so far, in order.
    pub(crate) fn activations(&self) -> Vec<TabId> {
        self.activations.lock().clone()
    }

    /// Makes every later activation of `tab_id` fail.
    pub(crate) fn fail_activation_of(&self, tab_id: TabId) {
        self.failing_activation.lock().push(tab_id);
    }

    pub(crate) fn fail_create(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_capture(&self, fail: bool) {
        self.fail_capture.store(fail, Ordering::SeqCst);
    }

    /// Makes each activation take `delay`.
    pub(crate) fn slow_activation(&self, delay: Duration) {
        *self.activation_delay.lock() = delay;
    }

    /// Highest number of driver calls that overlapped.
    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl BrowserDriver for RecordingDriver {
    async fn create_tab(&self, name: &str, _actions: &[Action]) -> Result<TabId> {
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(Error::protocol(format!("navigation failed in {name}")));
        }
        let id = self.next_tab.fetch_add(1, Ordering::SeqCst) + 1;
        TabId::new(id).ok_or_else(|| Error::protocol("tab id overflow"))
    }

    async fn activate(&self, tab_id: TabId) -> Result<()> {
        self.enter();
        let delay = *self.activation_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let failing = self.failing_activation.lock().contains(&tab_id);
        self.leave();

        if failing {
            return Err(Error::protocol("No tab with id"));
        }
        self.activations.lock().push(tab_id);
        Ok(())
    }

    async fn capture_screenshot(&self, tab_id: TabId) -> Result<Vec<u8>> {
        if self.fail_capture.load(Ordering::SeqCst) {
            return Err(Error::protocol("captureVisibleTab failed"));
        }
        let n = self.captures.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("{tab_id}-{n}").into_bytes())
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
