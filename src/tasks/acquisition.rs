use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Sender;
use embassy_time::{with_timeout, Duration, Instant, Timer};

use super::recovery::{AcquisitionState, FaultRecovery, Verdict};
use super::stats::{AcquisitionControl, RateWindow};
use crate::config::SAMPLE_SEND_TIMEOUT_MS;
use crate::drivers::{CompositeSample, SensorDriver};
use crate::error::{Error, Result};

/// Absolute-deadline schedule: each wake-up is the previous deadline plus the period,
/// so time spent inside a cycle never shifts the ones after it.
#[derive(Debug, Clone, Copy)]
pub struct DeadlineSchedule {
    next: Instant,
    period: Duration,
}

impl DeadlineSchedule {
    pub fn new(start: Instant, period: Duration) -> Self {
        Self {
            next: start,
            period,
        }
    }

    pub fn advance(&mut self) -> Instant {
        self.next += self.period;
        self.next
    }
}

/// Producer side of the sensor pipeline.
///
/// Owns the sensor set, samples it once per cycle, hands composite samples to the
/// downstream queue and keeps the shared statistics current.
pub struct Acquisition<'a, S, M: RawMutex, const N: usize> {
    sensors: S,
    samples: Sender<'a, M, CompositeSample, N>,
    control: &'a AcquisitionControl,
    recovery: FaultRecovery,
    window: RateWindow,
    enabled: bool,
    send_timeout: Duration,
    dropped: u32,
    reinit_failures: u32,
}

impl<'a, S: SensorDriver, M: RawMutex, const N: usize> Acquisition<'a, S, M, N> {
    pub fn new(
        sensors: S,
        samples: Sender<'a, M, CompositeSample, N>,
        control: &'a AcquisitionControl,
    ) -> Self {
        Self {
            sensors,
            samples,
            control,
            recovery: FaultRecovery::default(),
            window: RateWindow::new(),
            enabled: false,
            send_timeout: Duration::from_millis(SAMPLE_SEND_TIMEOUT_MS),
            dropped: 0,
            reinit_failures: 0,
        }
    }

    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }

    pub fn state(&self) -> AcquisitionState {
        self.recovery.state()
    }

    pub fn retries(&self) -> u8 {
        self.recovery.retries()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Zero the statistics and bring every sensor up from scratch.
    pub async fn init(&mut self) -> Result<()> {
        self.control.update_stats(|s| *s = Default::default());
        self.window = RateWindow::new();

        let res = self.sensors.init().await;
        self.recovery.init_finished(res.is_ok());
        self.publish_state();
        if let Err(e) = res {
            error!("Sensor initialization failed: {:?}", e);
        }
        res
    }

    /// Start or pause sampling. Repeating the current setting is a no-op.
    pub async fn enable(&mut self, enabled: bool) -> Result<()> {
        if enabled == self.enabled {
            return Ok(());
        }

        let res = self.sensors.set_power(enabled).await;
        if enabled {
            if res.is_ok() {
                self.enabled = true;
                self.recovery.set_enabled(true);
                info!("Sensor acquisition enabled");
            }
        } else {
            // Sampling stops even if the power-down write failed.
            self.enabled = false;
            self.recovery.set_enabled(false);
            info!("Sensor acquisition disabled");
        }

        if let Err(e) = res {
            warn!("Sensor power change failed: {:?}", e);
            self.control
                .update_stats(|s| s.error_count = s.error_count.wrapping_add(1));
        }
        self.publish_state();
        res
    }

    /// Enable sampling at task start. State becomes Running only if bring-up succeeded;
    /// otherwise it stays Error and the first cycle retries the bring-up.
    pub fn start(&mut self) {
        self.enabled = true;
        self.recovery.started();
        self.publish_state();
    }

    /// One acquisition cycle. `Ok` means a sample was delivered or sampling is paused.
    pub async fn run_cycle(&mut self) -> Result<()> {
        self.apply_requests().await;
        if !self.enabled {
            return Ok(());
        }

        // Nothing read from an unconfigured sensor is trusted.
        if !self.recovery.is_configured() {
            if let Err(e) = self.reinitialize().await {
                self.control
                    .update_stats(|s| s.error_count = s.error_count.wrapping_add(1));
                return Err(e);
            }
        }

        let mut sample = CompositeSample::new(Instant::now());
        match self.sensors.read(&mut sample).await {
            Ok(()) => {
                sample.valid = true;
                self.recovery.cycle_succeeded();
                self.deliver(sample).await
            }
            Err(e) => self.fail_cycle(e).await,
        }
    }

    /// Runs for the life of the firmware.
    pub async fn run(mut self, period: Duration) -> ! {
        self.start();
        info!(
            "Sensor acquisition task started - sampling at {}ms intervals",
            period.as_millis()
        );

        let mut schedule = DeadlineSchedule::new(Instant::now(), period);
        loop {
            let _ = self.run_cycle().await;
            Timer::at(schedule.advance()).await;
        }
    }

    async fn apply_requests(&mut self) {
        if self.control.take_reset_request() {
            self.control.update_stats(|s| {
                s.total_samples = 0;
                s.error_count = 0;
                s.sample_rate = 0.0;
            });
        }
        while let Some(enabled) = self.control.take_enable_request() {
            let _ = self.enable(enabled).await;
        }
    }

    async fn deliver(&mut self, sample: CompositeSample) -> Result<()> {
        if with_timeout(self.send_timeout, self.samples.send(sample))
            .await
            .is_err()
        {
            self.dropped = self.dropped.wrapping_add(1);
            if self.dropped % 100 == 1 {
                warn!("Sample queue full, dropped {} samples", self.dropped);
            }
            self.control
                .update_stats(|s| s.error_count = s.error_count.wrapping_add(1));
            return Err(Error::QueueFull);
        }

        let rate = self.window.record(sample.timestamp);
        let state = self.recovery.state();
        self.control.update_stats(|s| {
            s.total_samples = s.total_samples.wrapping_add(1);
            s.last_sample_time = sample.timestamp;
            if let Some(rate) = rate {
                s.sample_rate = rate;
            }
            s.state = state;
        });
        Ok(())
    }

    async fn fail_cycle(&mut self, e: Error) -> Result<()> {
        self.control
            .update_stats(|s| s.error_count = s.error_count.wrapping_add(1));

        match self.recovery.cycle_failed() {
            Verdict::Retry { attempt } => {
                debug!("Sensor read failed (attempt {}): {:?}", attempt, e);
                Err(e)
            }
            Verdict::Reinitialize => {
                warn!("Max sensor read retries exceeded, last error: {:?}", e);
                self.publish_state();
                let _ = self.reinitialize().await;
                Err(Error::RetryExhausted)
            }
        }
    }

    async fn reinitialize(&mut self) -> Result<()> {
        let res = self.sensors.init().await;
        self.recovery.reinit_finished(res.is_ok());
        self.publish_state();
        match res {
            Ok(()) => {
                self.reinit_failures = 0;
                info!("Sensor reinitialized successfully");
            }
            Err(e) => {
                self.reinit_failures = self.reinit_failures.wrapping_add(1);
                if self.reinit_failures % 100 == 1 {
                    error!(
                        "Sensor reinitialization failed ({} in a row): {:?}",
                        self.reinit_failures, e
                    );
                }
            }
        }
        res
    }

    fn publish_state(&self) {
        let state = self.recovery.state();
        self.control.update_stats(|s| s.state = state);
    }
}

#[cfg(feature = "stm32")]
mod firmware {
    use embassy_executor::{SpawnError, Spawner};
    use embassy_time::Duration;

    use crate::board::BoardAcquisition;
    use crate::config::SENSOR_SAMPLE_PERIOD_MS;

    #[embassy_executor::task]
    pub async fn acquisition_task(acquisition: BoardAcquisition) {
        acquisition
            .run(Duration::from_millis(SENSOR_SAMPLE_PERIOD_MS))
            .await
    }

    /// Task-creation entry point for bring-up.
    pub fn spawn_acquisition(
        spawner: &Spawner,
        acquisition: BoardAcquisition,
    ) -> Result<(), SpawnError> {
        spawner.spawn(acquisition_task(acquisition))
    }
}

#[cfg(feature = "stm32")]
pub use firmware::{acquisition_task, spawn_acquisition};
