//! Foreground Window Monitor
//!
//! Polls the OS foreground window on a background thread and reports every
//! change of focused window together with that window's minimized state.
//! The thread owns its last-observed handle; events reach the UI loop over a
//! crossbeam channel. A stop channel doubles as the poll sleep so shutdown is
//! immediate.

use crate::platform::{WindowHandle, WindowPlatform};
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default poll cadence
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Focus changed to `handle`, whose minimized state is `minimized`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusEvent {
    pub handle: WindowHandle,
    pub minimized: bool,
}

/// Last observed foreground window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusState {
    pub handle: WindowHandle,
    pub minimized: bool,
}

/// Change detection over successive foreground observations.
///
/// The first observation only seeds the state; afterwards an event is
/// produced whenever the handle differs from the previous one.
#[derive(Debug, Default)]
pub struct FocusTracker {
    last: Option<FocusState>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `handle` differs from the stored one
    pub fn is_change(&self, handle: WindowHandle) -> bool {
        self.last.map(|s| s.handle) != Some(handle)
    }

    /// Record an observation, returning an event on a handle change
    pub fn observe(&mut self, handle: WindowHandle, minimized: bool) -> Option<FocusEvent> {
        if !self.is_change(handle) {
            return None;
        }
        let seeded = self.last.is_some();
        self.last = Some(FocusState { handle, minimized });
        seeded.then_some(FocusEvent { handle, minimized })
    }

    pub fn state(&self) -> Option<FocusState> {
        self.last
    }
}

/// Run one poll cycle against the platform
fn poll_once(platform: &dyn WindowPlatform, tracker: &mut FocusTracker) -> Option<FocusEvent> {
    let handle = match platform.foreground_window() {
        Ok(Some(handle)) => handle,
        Ok(None) => return None,
        Err(e) => {
            warn!("[FocusMonitor] Foreground query failed: {}", e);
            return None;
        }
    };

    if !tracker.is_change(handle) {
        return None;
    }

    match platform.is_minimized(handle) {
        Ok(minimized) => tracker.observe(handle, minimized),
        Err(e) => {
            warn!("[FocusMonitor] Minimized query failed for {}: {}", handle, e);
            None
        }
    }
}

/// Handle to the running monitor thread. Dropping it stops the thread.
pub struct MonitorHandle {
    stop_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    /// Signal the poll loop to exit and wait for it
    pub fn stop(&mut self) {
        // Dropping the sender disconnects the stop channel
        if self.stop_tx.take().is_none() {
            return;
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("[FocusMonitor] Monitor thread panicked");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawn the monitor thread. Events arrive on the returned receiver.
pub fn spawn(
    platform: Arc<dyn WindowPlatform>,
    poll_interval: Duration,
) -> std::io::Result<(MonitorHandle, Receiver<FocusEvent>)> {
    let (event_tx, event_rx) = channel::unbounded::<FocusEvent>();
    let (stop_tx, stop_rx) = channel::bounded::<()>(1);

    let thread = thread::Builder::new()
        .name("focus-monitor".to_string())
        .spawn(move || {
            info!("[FocusMonitor] Started, polling every {:?}", poll_interval);
            let mut tracker = FocusTracker::new();
            loop {
                if let Some(event) = poll_once(platform.as_ref(), &mut tracker) {
                    debug!("[FocusMonitor] Focus changed: {:?}", event);
                    if event_tx.send(event).is_err() {
                        info!("[FocusMonitor] Event receiver closed, exiting");
                        break;
                    }
                }

                match stop_rx.recv_timeout(poll_interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            info!("[FocusMonitor] Stopped");
        })?;

    Ok((
        MonitorHandle {
            stop_tx: Some(stop_tx),
            thread: Some(thread),
        },
        event_rx,
    ))
}
