pub mod env;
pub mod imu;

pub use env::{HumidityStub, PressureStub};
pub use imu::{InertialSample, Lsm6dsl, SensorConfig};

use embassy_time::Instant;

use crate::error::Result;

/// One acquisition cycle's worth of data, handed downstream by value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CompositeSample {
    /// Cycle start.
    pub timestamp: Instant,
    /// m/s²
    pub accel: [f32; 3],
    /// rad/s
    pub gyro: [f32; 3],
    /// hPa
    pub pressure: f32,
    /// °C
    pub temperature: f32,
    /// %RH
    pub humidity: f32,
    pub data_ready: bool,
    /// Every constituent read succeeded this cycle.
    pub valid: bool,
}

impl CompositeSample {
    pub fn new(timestamp: Instant) -> Self {
        Self {
            timestamp,
            accel: [0.0; 3],
            gyro: [0.0; 3],
            pressure: 0.0,
            temperature: 0.0,
            humidity: 0.0,
            data_ready: false,
            valid: false,
        }
    }
}

/// What the acquisition task needs from any sensor on the node.
#[allow(async_fn_in_trait)]
pub trait SensorDriver {
    /// Full (re)initialization: identity, reset, configuration.
    async fn init(&mut self) -> Result<()>;

    /// Fill this sensor's fields of `sample`. Drivers with a data-ready flag check it
    /// here and report through `sample.data_ready`.
    async fn read(&mut self, sample: &mut CompositeSample) -> Result<()>;

    async fn set_power(&mut self, _enabled: bool) -> Result<()> {
        Ok(())
    }
}

// A tuple of drivers acts as one: members run in order and the first failure
// short-circuits the rest of the cycle.
macro_rules! sensor_chain {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: SensorDriver),+> SensorDriver for ($($name,)+) {
            async fn init(&mut self) -> Result<()> {
                $( self.$idx.init().await?; )+
                Ok(())
            }

            async fn read(&mut self, sample: &mut CompositeSample) -> Result<()> {
                $( self.$idx.read(sample).await?; )+
                Ok(())
            }

            async fn set_power(&mut self, enabled: bool) -> Result<()> {
                $( self.$idx.set_power(enabled).await?; )+
                Ok(())
            }
        }
    };
}

sensor_chain!(A: 0);
sensor_chain!(A: 0, B: 1);
sensor_chain!(A: 0, B: 1, C: 2);
sensor_chain!(A: 0, B: 1, C: 2, D: 3);
