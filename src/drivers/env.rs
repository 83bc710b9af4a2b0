//! Environmental sensors (LPS22HB pressure, HTS221 humidity).
//!
//! Placeholders until the real drivers land on the shared bus: they report fixed nominal
//! readings so the composite sample is fully populated.

use super::{CompositeSample, SensorDriver};
use crate::error::Result;

pub struct PressureStub {
    pub hpa: f32,
}

impl Default for PressureStub {
    fn default() -> Self {
        Self { hpa: 1013.25 }
    }
}

impl SensorDriver for PressureStub {
    async fn init(&mut self) -> Result<()> {
        Ok(())
    }

    async fn read(&mut self, sample: &mut CompositeSample) -> Result<()> {
        sample.pressure = self.hpa;
        Ok(())
    }
}

pub struct HumidityStub {
    pub relative_humidity: f32,
    /// Reported when the IMU had no fresh temperature this cycle.
    pub temperature: f32,
}

impl Default for HumidityStub {
    fn default() -> Self {
        Self {
            relative_humidity: 45.0,
            temperature: 22.0,
        }
    }
}

impl SensorDriver for HumidityStub {
    async fn init(&mut self) -> Result<()> {
        Ok(())
    }

    async fn read(&mut self, sample: &mut CompositeSample) -> Result<()> {
        sample.humidity = self.relative_humidity;
        if !sample.data_ready {
            sample.temperature = self.temperature;
        }
        Ok(())
    }
}
