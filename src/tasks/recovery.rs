//! Retry-then-reinitialize policy for the acquisition task.
//!
//! Pure state machine: no timing, no I/O. The task feeds it cycle outcomes and acts on
//! the verdicts.
//!
//! ```text
//! Init ──started──▶ Running ──N failures──▶ Error ──reinit ok──▶ Running
//!  │                 │  ▲                     └──reinit failed──▶ Error
//!  │ bring-up        │  │ enable
//!  │ failed  disable │  │ (Error instead while
//!  ▼                 ▼  │  the sensors are unconfigured)
//! Error            Stopped
//! ```
//!
//! Running is only reachable while the last bring-up succeeded.

use crate::config::SENSOR_MAX_RETRY_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquisitionState {
    Init,
    Running,
    Error,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Verdict {
    /// Transient; keep sampling. `attempt` counts consecutive failures so far.
    Retry { attempt: u8 },
    /// Threshold reached; the driver must be brought up again.
    Reinitialize,
}

#[derive(Debug, Clone, Copy)]
pub struct FaultRecovery {
    state: AcquisitionState,
    retries: u8,
    threshold: u8,
    configured: bool,
}

impl Default for FaultRecovery {
    fn default() -> Self {
        Self::new(SENSOR_MAX_RETRY_COUNT)
    }
}

impl FaultRecovery {
    pub const fn new(threshold: u8) -> Self {
        Self {
            state: AcquisitionState::Init,
            retries: 0,
            threshold,
            configured: false,
        }
    }

    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    pub fn retries(&self) -> u8 {
        self.retries
    }

    /// Whether the last init/reinit succeeded.
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    fn active_state(&self) -> AcquisitionState {
        if self.configured {
            AcquisitionState::Running
        } else {
            AcquisitionState::Error
        }
    }

    /// Result of the initial bring-up.
    pub fn init_finished(&mut self, ok: bool) {
        self.retries = 0;
        self.configured = ok;
        self.state = if ok {
            AcquisitionState::Init
        } else {
            AcquisitionState::Error
        };
    }

    pub fn started(&mut self) {
        self.state = self.active_state();
    }

    pub fn cycle_succeeded(&mut self) {
        self.retries = 0;
    }

    pub fn cycle_failed(&mut self) -> Verdict {
        self.retries = self.retries.saturating_add(1);
        if self.retries >= self.threshold {
            self.retries = 0;
            self.configured = false;
            self.state = AcquisitionState::Error;
            Verdict::Reinitialize
        } else {
            Verdict::Retry {
                attempt: self.retries,
            }
        }
    }

    /// Error is left only by a successful reinit.
    pub fn reinit_finished(&mut self, ok: bool) {
        self.retries = 0;
        self.configured = ok;
        self.state = self.active_state();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.state = if enabled {
            self.active_state()
        } else {
            AcquisitionState::Stopped
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_consecutive_failure_requests_reinit() {
        let mut r = FaultRecovery::default();
        r.init_finished(true);
        r.started();

        assert_eq!(r.cycle_failed(), Verdict::Retry { attempt: 1 });
        assert_eq!(r.cycle_failed(), Verdict::Retry { attempt: 2 });
        assert_eq!(r.state(), AcquisitionState::Running);
        assert_eq!(r.cycle_failed(), Verdict::Reinitialize);
        assert_eq!(r.state(), AcquisitionState::Error);
        assert!(!r.is_configured());
        assert_eq!(r.retries(), 0);
    }

    #[test]
    fn success_clears_the_streak() {
        let mut r = FaultRecovery::default();
        r.init_finished(true);
        r.started();
        r.cycle_failed();
        r.cycle_failed();
        r.cycle_succeeded();

        assert_eq!(r.retries(), 0);
        assert_eq!(r.cycle_failed(), Verdict::Retry { attempt: 1 });
    }

    #[test]
    fn reinit_outcome_decides_state() {
        let mut r = FaultRecovery::new(1);
        r.init_finished(true);
        r.started();

        assert_eq!(r.cycle_failed(), Verdict::Reinitialize);
        r.reinit_finished(false);
        assert_eq!(r.state(), AcquisitionState::Error);

        // Failures keep accumulating from zero while in Error.
        assert_eq!(r.cycle_failed(), Verdict::Reinitialize);
        r.reinit_finished(true);
        assert_eq!(r.state(), AcquisitionState::Running);
        assert_eq!(r.retries(), 0);
    }

    #[test]
    fn enable_toggles_running_and_stopped() {
        let mut r = FaultRecovery::default();
        r.init_finished(true);
        assert_eq!(r.state(), AcquisitionState::Init);

        r.set_enabled(false);
        assert_eq!(r.state(), AcquisitionState::Stopped);
        r.set_enabled(true);
        assert_eq!(r.state(), AcquisitionState::Running);
    }

    #[test]
    fn failed_bring_up_lands_in_error() {
        let mut r = FaultRecovery::default();
        r.init_finished(false);
        assert_eq!(r.state(), AcquisitionState::Error);
    }

    #[test]
    fn running_requires_a_configured_sensor() {
        let mut r = FaultRecovery::default();
        r.started();
        assert_eq!(r.state(), AcquisitionState::Error);

        r.init_finished(false);
        r.started();
        assert_eq!(r.state(), AcquisitionState::Error);

        // Pausing and resuming does not hide the fault.
        r.set_enabled(false);
        assert_eq!(r.state(), AcquisitionState::Stopped);
        r.set_enabled(true);
        assert_eq!(r.state(), AcquisitionState::Error);

        r.reinit_finished(true);
        assert!(r.is_configured());
        assert_eq!(r.state(), AcquisitionState::Running);
    }
}
