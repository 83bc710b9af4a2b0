use embassy_time::{Duration, Instant};

use crate::drivers::CompositeSample;

/// Per-second throughput of the consumer side, as seen from the queue.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SinkReport {
    pub samples: u32,
    /// Samples with no fresh IMU data, in percent.
    pub stale_percent: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct SinkWindow {
    start: Option<Instant>,
    samples: u32,
    stale: u32,
}

impl SinkWindow {
    pub const fn new() -> Self {
        Self {
            start: None,
            samples: 0,
            stale: 0,
        }
    }

    pub fn record(&mut self, sample: &CompositeSample) -> Option<SinkReport> {
        let start = *self.start.get_or_insert(sample.timestamp);
        self.samples += 1;
        if !sample.data_ready {
            self.stale += 1;
        }

        if sample.timestamp.saturating_duration_since(start) < Duration::from_secs(1) {
            return None;
        }

        let report = SinkReport {
            samples: self.samples,
            stale_percent: (self.stale * 100) / self.samples.max(1),
        };
        self.start = Some(sample.timestamp);
        self.samples = 0;
        self.stale = 0;
        Some(report)
    }
}

impl Default for SinkWindow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "stm32")]
mod firmware {
    use embassy_time::{Duration, Ticker};

    use super::SinkWindow;
    use crate::ipc::{ACQUISITION, SAMPLE_CH};

    #[embassy_executor::task]
    pub async fn stats_monitor_task() {
        info!("Acquisition monitor started");
        let mut ticker = Ticker::every(Duration::from_secs(1));
        loop {
            ticker.next().await;
            let s = ACQUISITION.stats();
            info!(
                "Acquisition: {:?}, {} samples, {} errors, {} Hz",
                s.state, s.total_samples, s.error_count, s.sample_rate
            );
        }
    }

    /// Drains the sample queue until a fusion consumer takes its place.
    #[embassy_executor::task]
    pub async fn sample_sink_task() {
        info!("Sample sink started");
        let mut window = SinkWindow::new();
        loop {
            let sample = SAMPLE_CH.receive().await;
            trace!(
                "accel={:?} gyro={:?} temp={}",
                sample.accel,
                sample.gyro,
                sample.temperature
            );
            if let Some(r) = window.record(&sample) {
                debug!("Sink: {} Hz, {}% stale", r.samples, r.stale_percent);
            }
        }
    }
}

#[cfg(feature = "stm32")]
pub use firmware::{sample_sink_task, stats_monitor_task};

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ms: u64, data_ready: bool) -> CompositeSample {
        let mut s = CompositeSample::new(Instant::from_millis(ms));
        s.data_ready = data_ready;
        s
    }

    #[test]
    fn reports_once_per_second() {
        let mut w = SinkWindow::new();
        for t in (0..1_000).step_by(10) {
            assert_eq!(w.record(&sample(t, true)), None);
        }
        assert_eq!(
            w.record(&sample(1_000, true)),
            Some(SinkReport {
                samples: 101,
                stale_percent: 0
            })
        );
        assert_eq!(w.record(&sample(1_010, true)), None);
    }

    #[test]
    fn counts_stale_samples() {
        let mut w = SinkWindow::new();
        w.record(&sample(0, false));
        w.record(&sample(500, true));
        w.record(&sample(600, true));
        let r = w.record(&sample(1_000, false)).unwrap();
        assert_eq!(r.samples, 4);
        assert_eq!(r.stale_percent, 50);
    }
}
