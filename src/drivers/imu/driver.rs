//! LSM6DSL 6-axis IMU driver
//! ===========================================================

use bytemuck::{Pod, Zeroable};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Instant, Timer};
use embedded_hal_async::i2c::I2c;

use super::registers::*;
use crate::bus::{BusHandle, Direction};
use crate::config::SENSOR_RESET_SETTLE_MS;
use crate::drivers::{CompositeSample, SensorDriver};
use crate::error::{Error, Result};

const STANDARD_GRAVITY: f32 = 9.80665;
// Kept at five digits so converted rates match what downstream fusion was tuned against.
#[allow(clippy::approx_constant)]
const PI_5: f32 = 3.14159;

/* ------------------------------------------------------------------------- */
/*  Configuration                                                            */
/* ------------------------------------------------------------------------- */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    pub accel_odr: OutputDataRate,
    pub accel_scale: AccelScale,
    pub gyro_odr: OutputDataRate,
    pub gyro_scale: GyroScale,
    pub fifo_enable: bool,
}

impl SensorConfig {
    /// Operating point forced by `set_power(true)`.
    pub const POWER_ON: Self = Self {
        accel_odr: OutputDataRate::Hz104,
        accel_scale: AccelScale::G2,
        gyro_odr: OutputDataRate::Hz104,
        gyro_scale: GyroScale::Dps250,
        fifo_enable: false,
    };
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self::POWER_ON
    }
}

/// Physical units per LSB for the active full-scale selection.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sensitivity {
    /// mg / LSB
    pub accel: f32,
    /// mdps / LSB
    pub gyro: f32,
}

impl Sensitivity {
    /// Look up both coefficients from raw full-scale field values.
    /// Unknown selectors fall back to the ±2 g / ±250 dps coefficients.
    pub fn from_selectors(accel_fs: u8, gyro_fs: u8) -> Self {
        let accel = match accel_fs {
            x if x == AccelScale::G2.bits() => 0.061,
            x if x == AccelScale::G4.bits() => 0.122,
            x if x == AccelScale::G8.bits() => 0.244,
            x if x == AccelScale::G16.bits() => 0.488,
            _ => 0.061,
        };
        let gyro = match gyro_fs {
            x if x == GyroScale::Dps125.bits() => 4.375,
            x if x == GyroScale::Dps250.bits() => 8.75,
            x if x == GyroScale::Dps500.bits() => 17.50,
            x if x == GyroScale::Dps1000.bits() => 35.0,
            x if x == GyroScale::Dps2000.bits() => 70.0,
            _ => 8.75,
        };
        Self { accel, gyro }
    }

    pub fn for_config(config: &SensorConfig) -> Self {
        Self::from_selectors(config.accel_scale.bits(), config.gyro_scale.bits())
    }
}

impl Default for Sensitivity {
    fn default() -> Self {
        Self::for_config(&SensorConfig::POWER_ON)
    }
}

/* ------------------------------------------------------------------------- */
/*  Data                                                                     */
/* ------------------------------------------------------------------------- */

/// One burst starting at OUT_TEMP_L, each word little-endian.
#[repr(C)]
#[derive(Clone, Copy, Default, Zeroable, Pod)]
pub struct RawFrame {
    pub temperature: [u8; 2],
    pub gyro: [[u8; 2]; 3],
    pub accel: [[u8; 2]; 3],
}

impl RawFrame {
    pub fn temperature(&self) -> i16 {
        i16::from_le_bytes(self.temperature)
    }

    pub fn gyro(&self) -> [i16; 3] {
        self.gyro.map(i16::from_le_bytes)
    }

    pub fn accel(&self) -> [i16; 3] {
        self.accel.map(i16::from_le_bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InertialSample {
    /// m/s²
    pub accel: [f32; 3],
    /// rad/s
    pub gyro: [f32; 3],
    /// °C
    pub temperature: f32,
    /// False means nothing new since the previous read; not an error.
    pub data_ready: bool,
    pub timestamp: Instant,
}

impl InertialSample {
    fn not_ready(timestamp: Instant) -> Self {
        Self {
            accel: [0.0; 3],
            gyro: [0.0; 3],
            temperature: 0.0,
            data_ready: false,
            timestamp,
        }
    }
}

pub fn temperature_celsius(raw: i16) -> f32 {
    25.0 + raw as f32 / 256.0
}

pub fn accel_mps2(raw: i16, mg_per_lsb: f32) -> f32 {
    raw as f32 * mg_per_lsb * STANDARD_GRAVITY / 1000.0
}

pub fn gyro_rad_s(raw: i16, mdps_per_lsb: f32) -> f32 {
    raw as f32 * mdps_per_lsb * PI_5 / (180.0 * 1000.0)
}

/* ------------------------------------------------------------------------- */
/*  Main driver struct                                                       */
/* ------------------------------------------------------------------------- */
pub struct Lsm6dsl<'a, M: RawMutex, BUS> {
    bus: BusHandle<'a, M, BUS>,
    addr: u8,
    config: SensorConfig,
    sensitivity: Sensitivity,
}

impl<'a, M: RawMutex, BUS: I2c> Lsm6dsl<'a, M, BUS> {
    /// The device is not touched until `init`/`configure`.
    pub fn new(bus: BusHandle<'a, M, BUS>, addr: u8, config: SensorConfig) -> Self {
        Self {
            bus,
            addr,
            config,
            sensitivity: Sensitivity::default(),
        }
    }

    pub fn address(&self) -> u8 {
        self.addr
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    pub async fn identify(&mut self) -> Result<u8> {
        self.bus.read_register(self.addr, WHO_AM_I).await
    }

    /// Sets SW_RESET. The caller waits out the settle time before configuring.
    pub async fn reset(&mut self) -> Result<()> {
        self.bus
            .write_register(self.addr, CTRL3_C, CTRL3_C_SW_RESET)
            .await
    }

    pub async fn configure(&mut self, config: SensorConfig) -> Result<()> {
        self.bus
            .write_register(
                self.addr,
                CTRL1_XL,
                config.accel_odr.bits() | config.accel_scale.bits(),
            )
            .await?;
        self.bus
            .write_register(
                self.addr,
                CTRL2_G,
                config.gyro_odr.bits() | config.gyro_scale.bits(),
            )
            .await?;
        // IF_INC is the reset default; keep it so the 14-byte burst walks the output registers.
        self.bus
            .write_register(self.addr, CTRL3_C, CTRL3_C_BDU | CTRL3_C_IF_INC)
            .await?;

        self.config = config;
        self.sensitivity = Sensitivity::for_config(&config);
        debug!(
            "LSM6DSL configured: accel {} mg/LSB, gyro {} mdps/LSB",
            self.sensitivity.accel,
            self.sensitivity.gyro
        );
        Ok(())
    }

    pub async fn poll_status(&mut self) -> Result<StatusBits> {
        Ok(StatusBits(
            self.bus.read_register(self.addr, STATUS_REG).await?,
        ))
    }

    pub async fn read_sample(&mut self) -> Result<InertialSample> {
        let status = self.poll_status().await?;
        if !status.data_ready() {
            return Ok(InertialSample::not_ready(Instant::now()));
        }

        let mut frame = RawFrame::default();
        self.bus
            .transact(
                Direction::Read,
                self.addr,
                OUT_TEMP_L,
                bytemuck::bytes_of_mut(&mut frame),
            )
            .await?;

        Ok(self.convert(&frame, Instant::now()))
    }

    pub fn convert(&self, frame: &RawFrame, timestamp: Instant) -> InertialSample {
        let s = self.sensitivity;
        InertialSample {
            accel: frame.accel().map(|raw| accel_mps2(raw, s.accel)),
            gyro: frame.gyro().map(|raw| gyro_rad_s(raw, s.gyro)),
            temperature: temperature_celsius(frame.temperature()),
            data_ready: true,
            timestamp,
        }
    }

    /// Enabling forces 104 Hz / ±2 g / ±250 dps regardless of any earlier `configure`;
    /// disabling powers both sensors down.
    pub async fn set_power(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            let on = SensorConfig::POWER_ON;
            self.bus
                .write_register(self.addr, CTRL1_XL, on.accel_odr.bits() | on.accel_scale.bits())
                .await?;
            self.bus
                .write_register(self.addr, CTRL2_G, on.gyro_odr.bits() | on.gyro_scale.bits())
                .await?;
            self.sensitivity = Sensitivity::for_config(&on);
        } else {
            self.bus
                .write_register(self.addr, CTRL1_XL, OutputDataRate::PowerDown.bits())
                .await?;
            self.bus
                .write_register(self.addr, CTRL2_G, OutputDataRate::PowerDown.bits())
                .await?;
        }
        Ok(())
    }

    /// Raw write of CTRL4_C (interrupt masking / DRDY behaviour).
    pub async fn configure_interrupt(&mut self, bits: u8) -> Result<()> {
        self.bus.write_register(self.addr, CTRL4_C, bits).await
    }

    /// Identity check, soft reset, settle, apply the stored configuration.
    pub async fn init(&mut self) -> Result<()> {
        let id = self.identify().await?;
        if id != WHO_AM_I_VALUE {
            error!(
                "Invalid LSM6DSL ID: 0x{:02X}, expected 0x{:02X}",
                id, WHO_AM_I_VALUE
            );
            return Err(Error::IdentityMismatch { found: id });
        }

        self.reset().await?;
        Timer::after(Duration::from_millis(SENSOR_RESET_SETTLE_MS)).await;

        self.configure(self.config).await?;
        info!("LSM6DSL initialized at 0x{:02X}", self.addr);
        Ok(())
    }
}

impl<M: RawMutex, BUS: I2c> SensorDriver for Lsm6dsl<'_, M, BUS> {
    async fn init(&mut self) -> Result<()> {
        Lsm6dsl::init(self).await
    }

    async fn read(&mut self, sample: &mut CompositeSample) -> Result<()> {
        let imu = self.read_sample().await?;
        sample.data_ready = imu.data_ready;
        if imu.data_ready {
            sample.accel = imu.accel;
            sample.gyro = imu.gyro;
            sample.temperature = imu.temperature;
        }
        Ok(())
    }

    async fn set_power(&mut self, enabled: bool) -> Result<()> {
        Lsm6dsl::set_power(self, enabled).await
    }
}
