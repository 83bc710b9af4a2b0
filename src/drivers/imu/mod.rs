pub mod driver;
pub mod registers;

pub use driver::{InertialSample, Lsm6dsl, RawFrame, SensorConfig, Sensitivity};
pub use registers::{AccelScale, GyroScale, OutputDataRate, StatusBits};
