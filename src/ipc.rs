use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex as RawMutex, channel::Channel};

use crate::config::SAMPLE_QUEUE_DEPTH;
use crate::drivers::CompositeSample;
use crate::tasks::AcquisitionControl;

/* acquisition -> fusion */
pub static SAMPLE_CH: Channel<RawMutex, CompositeSample, SAMPLE_QUEUE_DEPTH> = Channel::new();

/* status, statistics and enable/reset requests */
pub static ACQUISITION: AcquisitionControl = AcquisitionControl::new();
