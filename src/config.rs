// Centralize all configuration constants
pub const SENSOR_SAMPLE_RATE_HZ: u32 = 100;
pub const SENSOR_SAMPLE_PERIOD_MS: u64 = 1000 / SENSOR_SAMPLE_RATE_HZ as u64;
pub const I2C_FREQUENCY_HZ: u32 = 100_000;

// Bus timing
pub const BUS_LOCK_TIMEOUT_MS: u64 = 100;
pub const BUS_TRANSFER_TIMEOUT_MS: u64 = 100;
pub const BUS_MAX_WRITE_LEN: usize = 16;

// Fault recovery
pub const SENSOR_MAX_RETRY_COUNT: u8 = 3;
pub const SENSOR_RESET_SETTLE_MS: u64 = 10;

// Downstream handoff
pub const SAMPLE_QUEUE_DEPTH: usize = 10;
pub const SAMPLE_SEND_TIMEOUT_MS: u64 = 10;

// Enable/disable requests waiting for the acquisition task
pub const CONTROL_QUEUE_DEPTH: usize = 4;

// Statistics
pub const STATS_WINDOW_MS: u64 = 1000;
