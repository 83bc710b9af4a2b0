use embedded_hal::i2c::ErrorKind;

pub type Result<T> = core::result::Result<T, Error>;

/// Everything the acquisition path can fail with.
///
/// Transport and driver errors travel up unchanged; only the acquisition task decides
/// between retrying, reinitializing and dropping the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Bus lock or transfer wait exceeded its bound.
    BusTimeout,
    /// Transfer failed on the wire (NACK, arbitration loss, ...).
    Bus(ErrorKind),
    /// Write payload larger than the transport's staging buffer.
    InvalidLength,
    /// WHO_AM_I did not match the expected device.
    IdentityMismatch { found: u8 },
    /// Downstream queue stayed full for the whole send window; sample dropped.
    QueueFull,
    /// Consecutive failures reached the retry threshold.
    RetryExhausted,
}

impl Error {
    pub fn from_bus<E: embedded_hal::i2c::Error>(e: E) -> Self {
        Self::Bus(e.kind())
    }
}
