#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

#[cfg(feature = "stm32")]
pub mod board;
pub mod bus;
pub mod config;
pub mod drivers;
pub mod error;
pub mod ipc;
pub mod tasks;

#[cfg(test)]
mod mock;

#[cfg(feature = "stm32")]
pub use board::Board;
pub use bus::{BusHandle, SharedBus};
pub use drivers::{CompositeSample, SensorDriver};
pub use error::{Error, Result};
pub use tasks::{Acquisition, AcquisitionControl, AcquisitionState, AcquisitionStats};
