//! Background status sampler.
//!
//! A worker thread wakes about once a second, formats the wall clock and the
//! current position, and posts a [`StatusSnapshot`] into a single-slot mailbox.
//! The UI thread takes the newest snapshot on its next tick; older snapshots
//! that were never read are discarded.
//!
//! Positions come from a [`LocationSource`]. A source that has no fix returns
//! `None`; the status bar then keeps whatever location it showed last.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::Local;
use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use tracing::{debug, trace, warn};

use crate::config::STATUS_SLEEP_SLICE;
use crate::screen::StatusLine;

/// Clock layout in the status bar.
pub const CLOCK_FORMAT: &str = "%H:%M:%S %d/%m/%Y";

// =============================================================================
// Location
// =============================================================================

/// Position in decimal degrees, north and east positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fix {
    pub lat: f64,
    pub lon: f64,
}

impl Fix {
    /// Status bar text, six decimal places.
    pub fn to_status(self) -> String {
        format!("Lat:{:.6} Lon:{:.6}", self.lat, self.lon)
    }
}

/// Anything that can report the vehicle position.
pub trait LocationSource: Send {
    /// Current fix, or `None` when no position is available.
    fn fix(&mut self) -> Option<Fix>;
}

/// Always reports the same position.
#[derive(Clone, Copy, Debug)]
pub struct FixedLocation(pub Fix);

impl LocationSource for FixedLocation {
    fn fix(&mut self) -> Option<Fix> {
        Some(self.0)
    }
}

// =============================================================================
// Snapshot
// =============================================================================

/// One sample of the status bar text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub clock: String,
    /// `None` keeps the previous location on screen.
    pub location: Option<String>,
}

impl StatusSnapshot {
    /// Sample the local clock and `source`.
    pub fn sample(source: &mut dyn LocationSource) -> Self {
        Self { clock: Local::now().format(CLOCK_FORMAT).to_string(), location: source.fix().map(Fix::to_status) }
    }

    /// Copy into the status bar, keeping stale data for missing fields.
    pub fn apply(self, status: &mut StatusLine) {
        status.clock = self.clock;
        if let Some(location) = self.location {
            status.location = location;
        }
    }
}

// =============================================================================
// Sampler Thread
// =============================================================================

/// Handle to the sampler thread. Dropping it stops and joins the thread.
pub struct StatusSampler {
    mailbox: Receiver<StatusSnapshot>,
    active: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl StatusSampler {
    /// Start sampling `source` every `period`.
    pub fn spawn(source: Box<dyn LocationSource>, period: Duration) -> io::Result<Self> {
        let (tx, rx) = bounded(1);
        let active = Arc::new(AtomicBool::new(true));

        let worker = Worker { source, period, tx, overflow: rx.clone(), active: Arc::clone(&active), no_fix: false };
        let handle = thread::Builder::new().name("status".to_owned()).spawn(move || worker.run())?;
        debug!(?period, "status sampler started");

        Ok(Self { mailbox: rx, active, handle: Some(handle) })
    }

    /// Newest snapshot posted since the last call.
    pub fn latest(&self) -> Option<StatusSnapshot> {
        self.mailbox.try_iter().last()
    }

    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Relaxed) && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Clear the active flag and wait for the thread to exit.
    pub fn stop(&mut self) {
        self.active.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("status sampler panicked");
            } else {
                debug!("status sampler stopped");
            }
        }
    }
}

impl Drop for StatusSampler {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Worker {
    source: Box<dyn LocationSource>,
    period: Duration,
    tx: Sender<StatusSnapshot>,
    /// Receiving end used to evict an unread snapshot.
    overflow: Receiver<StatusSnapshot>,
    active: Arc<AtomicBool>,
    /// A missing fix has already been reported.
    no_fix: bool,
}

impl Worker {
    fn run(mut self) {
        while self.active.load(Ordering::Relaxed) {
            let started = Instant::now();
            let snapshot = StatusSnapshot::sample(self.source.as_mut());
            match (&snapshot.location, self.no_fix) {
                (None, false) => {
                    warn!("location source has no fix, keeping the last position");
                    self.no_fix = true;
                }
                (Some(_), true) => {
                    debug!("location fix restored");
                    self.no_fix = false;
                }
                _ => {}
            }
            self.post(snapshot);

            // Sleep in slices so stop() is honoured promptly
            while self.active.load(Ordering::Relaxed) {
                let elapsed = started.elapsed();
                if elapsed >= self.period {
                    break;
                }
                thread::sleep(STATUS_SLEEP_SLICE.min(self.period - elapsed));
            }
        }
    }

    /// Latest wins: replace an unread snapshot instead of blocking.
    fn post(&self, snapshot: StatusSnapshot) {
        match self.tx.try_send(snapshot) {
            Ok(()) => {}
            Err(TrySendError::Full(snapshot)) => {
                let _ = self.overflow.try_recv();
                if self.tx.try_send(snapshot).is_err() {
                    trace!("status snapshot dropped");
                }
            }
            Err(TrySendError::Disconnected(_)) => self.active.store(false, Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: Fix = Fix { lat: 51.5, lon: -2.0 };

    struct NoFix;

    impl LocationSource for NoFix {
        fn fix(&mut self) -> Option<Fix> {
            None
        }
    }

    // -------------------------------------------------------------------------
    // Snapshot
    // -------------------------------------------------------------------------

    #[test]
    fn test_snapshot_formats() {
        let snapshot = StatusSnapshot::sample(&mut FixedLocation(HOME));
        assert_eq!(snapshot.location.as_deref(), Some("Lat:51.500000 Lon:-2.000000"));
        assert_eq!(snapshot.clock.len(), "00:00:00 01/01/1973".len(), "clock {}", snapshot.clock);
    }

    #[test]
    fn test_apply_keeps_stale_location() {
        let mut status = StatusLine::default();
        status.location = "Lat:1.000000 Lon:2.000000".to_owned();
        StatusSnapshot::sample(&mut NoFix).apply(&mut status);
        assert_eq!(status.location, "Lat:1.000000 Lon:2.000000", "no fix keeps the old text");
        assert_ne!(status.clock, StatusLine::default().clock, "clock refreshed");
    }

    // -------------------------------------------------------------------------
    // Thread
    // -------------------------------------------------------------------------

    #[test]
    fn test_sampler_posts_and_stops() {
        let mut sampler =
            StatusSampler::spawn(Box::new(FixedLocation(HOME)), Duration::from_millis(10)).expect("spawn sampler");
        let deadline = Instant::now() + Duration::from_secs(2);
        let mut got = None;
        while got.is_none() && Instant::now() < deadline {
            got = sampler.latest();
            thread::sleep(Duration::from_millis(5));
        }
        assert!(got.is_some(), "a snapshot arrives");
        assert!(sampler.is_running());

        sampler.stop();
        assert!(!sampler.is_running(), "stopped after join");
    }

    #[test]
    fn test_mailbox_holds_only_latest() {
        let sampler =
            StatusSampler::spawn(Box::new(FixedLocation(HOME)), Duration::from_millis(1)).expect("spawn sampler");
        thread::sleep(Duration::from_millis(30));
        assert!(sampler.mailbox.len() <= 1, "single slot");
        drop(sampler);
    }
}
