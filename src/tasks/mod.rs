pub mod acquisition;
pub mod monitor;
pub mod recovery;
pub mod stats;

pub use acquisition::{Acquisition, DeadlineSchedule};
#[cfg(feature = "stm32")]
pub use acquisition::{acquisition_task, spawn_acquisition};
pub use monitor::{SinkReport, SinkWindow};
#[cfg(feature = "stm32")]
pub use monitor::{sample_sink_task, stats_monitor_task};
pub use recovery::{AcquisitionState, FaultRecovery, Verdict};
pub use stats::{AcquisitionControl, AcquisitionStats, RateWindow};
