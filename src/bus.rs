//! Shared two-wire register bus.
//!
//! Every device on the bus talks through a [`BusHandle`] that borrows one
//! [`SharedBus`]. A transaction holds the lock for exactly one register transfer;
//! the guard is dropped on every exit path, including errors and timeouts.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{with_timeout, Duration};
use embedded_hal_async::i2c::I2c;
use heapless::Vec;

use crate::config::{BUS_LOCK_TIMEOUT_MS, BUS_MAX_WRITE_LEN, BUS_TRANSFER_TIMEOUT_MS};
use crate::error::{Error, Result};

pub type SharedBus<M, BUS> = Mutex<M, BUS>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Read,
    Write,
}

#[derive(Debug, Clone, Copy)]
pub struct BusTimeouts {
    /// Longest wait for the bus lock before giving up without touching the bus.
    pub lock: Duration,
    /// Bound on a single addressed transfer once the lock is held.
    pub transfer: Duration,
}

impl Default for BusTimeouts {
    fn default() -> Self {
        Self {
            lock: Duration::from_millis(BUS_LOCK_TIMEOUT_MS),
            transfer: Duration::from_millis(BUS_TRANSFER_TIMEOUT_MS),
        }
    }
}

/// Injected handle onto the shared bus. Cheap to copy; one per driver.
pub struct BusHandle<'a, M: RawMutex, BUS> {
    bus: &'a SharedBus<M, BUS>,
    timeouts: BusTimeouts,
}

impl<M: RawMutex, BUS> Clone for BusHandle<'_, M, BUS> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: RawMutex, BUS> Copy for BusHandle<'_, M, BUS> {}

impl<'a, M: RawMutex, BUS: I2c> BusHandle<'a, M, BUS> {
    pub fn new(bus: &'a SharedBus<M, BUS>) -> Self {
        Self::with_timeouts(bus, BusTimeouts::default())
    }

    pub fn with_timeouts(bus: &'a SharedBus<M, BUS>, timeouts: BusTimeouts) -> Self {
        Self { bus, timeouts }
    }

    pub fn timeouts(&self) -> BusTimeouts {
        self.timeouts
    }

    /// One addressed register transfer under the bus lock.
    ///
    /// `Read` fills `buffer` starting at `register`; `Write` sends `buffer` to
    /// consecutive registers starting at `register`.
    pub async fn transact(
        &self,
        direction: Direction,
        address: u8,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<()> {
        if direction == Direction::Write && buffer.len() > BUS_MAX_WRITE_LEN {
            return Err(Error::InvalidLength);
        }

        let mut bus = with_timeout(self.timeouts.lock, self.bus.lock())
            .await
            .map_err(|_| Error::BusTimeout)?;

        let transfer = async {
            match direction {
                Direction::Read => bus.write_read(address, &[register], buffer).await,
                Direction::Write => {
                    let mut frame: Vec<u8, { BUS_MAX_WRITE_LEN + 1 }> = Vec::new();
                    // Cannot overflow: length checked on entry.
                    let _ = frame.push(register);
                    let _ = frame.extend_from_slice(buffer);
                    bus.write(address, &frame).await
                }
            }
        };

        match with_timeout(self.timeouts.transfer, transfer).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(Error::from_bus(e)),
            Err(_) => Err(Error::BusTimeout),
        }
    }

    pub async fn read_register(&self, address: u8, register: u8) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.transact(Direction::Read, address, register, &mut buf)
            .await?;
        Ok(buf[0])
    }

    pub async fn write_register(&self, address: u8, register: u8, value: u8) -> Result<()> {
        self.transact(Direction::Write, address, register, &mut [value])
            .await
    }
}
