#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_sync::mutex::Mutex;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use sensor_node::{
    board::{Board, BoardBus},
    bus::BusHandle,
    drivers::{imu::registers::LSM6DSL_ADDRESS_LOW, HumidityStub, Lsm6dsl, PressureStub, SensorConfig},
    ipc::{ACQUISITION, SAMPLE_CH},
    tasks::{sample_sink_task, spawn_acquisition, stats_monitor_task, Acquisition},
};

static I2C_BUS: StaticCell<BoardBus> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Starting sensor node");
    let board = Board::init();
    let bus = I2C_BUS.init(Mutex::new(board.i2c));

    let imu = Lsm6dsl::new(
        BusHandle::new(bus),
        LSM6DSL_ADDRESS_LOW,
        SensorConfig::default(),
    );
    let sensors = (imu, PressureStub::default(), HumidityStub::default());
    let mut acquisition = Acquisition::new(sensors, SAMPLE_CH.sender(), &ACQUISITION);

    // A failed bring-up is logged by `init`; the task keeps retrying it, so start it either way.
    if acquisition.init().await.is_ok() {
        info!("Sensors initialized");
    }

    match spawn_acquisition(&spawner, acquisition) {
        Ok(()) => info!("Acquisition task spawned"),
        Err(_) => error!("Failed to spawn acquisition task"),
    }
    unwrap!(spawner.spawn(stats_monitor_task()));
    unwrap!(spawner.spawn(sample_sink_task()));

    core::future::pending::<()>().await;
}
