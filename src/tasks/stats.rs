use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::channel::Channel;
use embassy_time::Instant;
use portable_atomic::{AtomicBool, Ordering};

use super::recovery::AcquisitionState;
use crate::config::{CONTROL_QUEUE_DEPTH, STATS_WINDOW_MS};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AcquisitionStats {
    pub total_samples: u32,
    pub error_count: u32,
    pub last_sample_time: Instant,
    /// Hz, recomputed once per window.
    pub sample_rate: f32,
    pub state: AcquisitionState,
}

impl AcquisitionStats {
    pub const fn new() -> Self {
        Self {
            total_samples: 0,
            error_count: 0,
            last_sample_time: Instant::from_ticks(0),
            sample_rate: 0.0,
            state: AcquisitionState::Init,
        }
    }
}

impl Default for AcquisitionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-window rate estimator.
///
/// The first recorded sample anchors the window. Once a sample lands at least one window
/// length after the anchor, the rate over the samples since the anchor is reported and that
/// sample becomes the new anchor.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateWindow {
    anchor: Option<Instant>,
    count: u32,
}

impl RateWindow {
    pub const fn new() -> Self {
        Self {
            anchor: None,
            count: 0,
        }
    }

    pub fn record(&mut self, at: Instant) -> Option<f32> {
        let Some(anchor) = self.anchor else {
            self.anchor = Some(at);
            return None;
        };

        self.count += 1;
        let elapsed_ms = at.saturating_duration_since(anchor).as_millis();
        if elapsed_ms < STATS_WINDOW_MS {
            return None;
        }

        let rate = self.count as f32 * 1000.0 / elapsed_ms as f32;
        self.anchor = Some(at);
        self.count = 0;
        Some(rate)
    }
}

/// Status/statistics surface shared between the acquisition task and everyone else.
///
/// Only the acquisition task writes the statistics. Other tasks read consistent snapshots
/// and post requests, which the task picks up at the top of its next cycle.
pub struct AcquisitionControl {
    stats: BlockingMutex<CriticalSectionRawMutex, Cell<AcquisitionStats>>,
    enable: Channel<CriticalSectionRawMutex, bool, CONTROL_QUEUE_DEPTH>,
    reset: AtomicBool,
}

impl AcquisitionControl {
    pub const fn new() -> Self {
        Self {
            stats: BlockingMutex::new(Cell::new(AcquisitionStats::new())),
            enable: Channel::new(),
            reset: AtomicBool::new(false),
        }
    }

    /// Copy of the whole statistics block, taken inside a critical section.
    pub fn stats(&self) -> AcquisitionStats {
        self.stats.lock(|cell| cell.get())
    }

    /// Ask the task to start or pause sampling. Requests are applied in order, so an
    /// off/on pair within one period still power-cycles the sensors.
    pub fn enable(&self, enabled: bool) -> Result<()> {
        self.enable
            .try_send(enabled)
            .map_err(|_| Error::QueueFull)
    }

    /// Ask the task to zero the sample/error counters and the rate.
    pub fn reset_stats(&self) {
        self.reset.store(true, Ordering::Release);
    }

    pub(crate) fn update_stats(&self, f: impl FnOnce(&mut AcquisitionStats)) {
        self.stats.lock(|cell| {
            let mut stats = cell.get();
            f(&mut stats);
            cell.set(stats);
        });
    }

    pub(crate) fn take_enable_request(&self) -> Option<bool> {
        self.enable.try_receive().ok()
    }

    pub(crate) fn take_reset_request(&self) -> bool {
        self.reset.swap(false, Ordering::AcqRel)
    }
}

impl Default for AcquisitionControl {
    fn default() -> Self {
        Self::new()
    }
}
