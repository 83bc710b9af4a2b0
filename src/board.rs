use embassy_stm32::mode::Async;
use embassy_stm32::time::Hertz;
use embassy_stm32::{bind_interrupts, i2c, peripherals, rcc, Config};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::bus::SharedBus;
use crate::config::{I2C_FREQUENCY_HZ, SAMPLE_QUEUE_DEPTH};
use crate::drivers::{HumidityStub, Lsm6dsl, PressureStub};
use crate::tasks::Acquisition;

bind_interrupts!(pub struct Irqs {
    I2C2 => i2c::EventInterruptHandler<peripherals::I2C2>,
            i2c::ErrorInterruptHandler<peripherals::I2C2>;
});

pub type BoardI2c = i2c::I2c<'static, Async>;
pub type BoardBus = SharedBus<CriticalSectionRawMutex, BoardI2c>;
pub type BoardSensors = (
    Lsm6dsl<'static, CriticalSectionRawMutex, BoardI2c>,
    PressureStub,
    HumidityStub,
);
pub type BoardAcquisition =
    Acquisition<'static, BoardSensors, CriticalSectionRawMutex, SAMPLE_QUEUE_DEPTH>;

pub struct Board {
    /// Sensor bus: LSM6DSL, LPS22HB, HTS221.
    pub i2c: BoardI2c,
}

impl Board {
    pub fn init() -> Self {
        let mut config = Config::default();

        // HSI16 -> PLL -> 64 MHz SYSCLK
        config.rcc.hsi = Some(rcc::Hsi {
            sys_div: rcc::HsiSysDiv::DIV1,
        });
        config.rcc.pll = Some(rcc::Pll {
            source: rcc::PllSource::HSI,
            prediv: rcc::PllPreDiv::DIV2,
            mul: rcc::PllMul::MUL16,
            divp: None,
            divq: None,
            divr: Some(rcc::PllRDiv::DIV2),
        });
        config.rcc.sys = rcc::Sysclk::PLL1_R;
        let p = embassy_stm32::init(config);

        // External pull-ups on the sensor board.
        let mut i2c_cfg = i2c::Config::default();
        i2c_cfg.sda_pullup = false;
        i2c_cfg.scl_pullup = false;

        let i2c = i2c::I2c::new(
            p.I2C2,
            p.PB10,
            p.PB11,
            Irqs,
            p.DMA1_CH7,
            p.DMA1_CH6,
            Hertz(I2C_FREQUENCY_HZ),
            i2c_cfg,
        );

        Self { i2c }
    }
}
