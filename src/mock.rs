//! Mock register device for host tests.
//!
//! Behaves like a typical register-mapped I2C sensor: the first written byte sets the
//! register pointer, further written bytes land in consecutive registers, reads stream out
//! from the pointer with auto-increment. Every transaction is logged.

use std::vec::Vec;

use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I2cTransaction {
    Write { addr: u8, data: Vec<u8> },
    WriteRead { addr: u8, register: u8, read_len: usize },
    Read { addr: u8, len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError(pub ErrorKind);

impl embedded_hal_async::i2c::Error for MockError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

pub struct MockI2c {
    pub address: u8,
    pub registers: [u8; 128],
    transactions: Vec<I2cTransaction>,
    fail_remaining: usize,
}

impl MockI2c {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            registers: [0; 128],
            transactions: Vec::new(),
            fail_remaining: 0,
        }
    }

    pub fn with_register(mut self, register: u8, value: u8) -> Self {
        self.registers[register as usize] = value;
        self
    }

    pub fn load(&mut self, register: u8, bytes: &[u8]) {
        let start = register as usize;
        self.registers[start..start + bytes.len()].copy_from_slice(bytes);
    }

    /// NACK the next `count` transactions.
    pub fn fail_next(&mut self, count: usize) {
        self.fail_remaining = count;
    }

    pub fn transactions(&self) -> &[I2cTransaction] {
        &self.transactions
    }

    pub fn clear_transactions(&mut self) {
        self.transactions.clear();
    }

    pub fn reads_of(&self, register: u8) -> usize {
        self.transactions
            .iter()
            .filter(|t| matches!(t, I2cTransaction::WriteRead { register: r, .. } if *r == register))
            .count()
    }

    pub fn writes_to(&self, register: u8) -> Vec<u8> {
        self.transactions
            .iter()
            .filter_map(|t| match t {
                I2cTransaction::Write { data, .. } if data.first() == Some(&register) => {
                    data.get(1).copied()
                }
                _ => None,
            })
            .collect()
    }
}

impl ErrorType for MockI2c {
    type Error = MockError;
}

impl I2c for MockI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if self.fail_remaining > 0 {
            self.fail_remaining -= 1;
            return Err(MockError(ErrorKind::NoAcknowledge(
                NoAcknowledgeSource::Address,
            )));
        }
        if address != self.address {
            return Err(MockError(ErrorKind::NoAcknowledge(
                NoAcknowledgeSource::Address,
            )));
        }

        let mut pointer = 0usize;
        let mut last_write: Option<Vec<u8>> = None;
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    if let Some((&reg, payload)) = bytes.split_first() {
                        pointer = reg as usize;
                        for (i, b) in payload.iter().enumerate() {
                            self.registers[(pointer + i) % self.registers.len()] = *b;
                        }
                    }
                    last_write = Some(bytes.to_vec());
                }
                Operation::Read(buf) => {
                    for b in buf.iter_mut() {
                        *b = self.registers[pointer % self.registers.len()];
                        pointer += 1;
                    }
                    let entry = match last_write.take() {
                        Some(w) if w.len() == 1 => I2cTransaction::WriteRead {
                            addr: address,
                            register: w[0],
                            read_len: buf.len(),
                        },
                        _ => I2cTransaction::Read {
                            addr: address,
                            len: buf.len(),
                        },
                    };
                    self.transactions.push(entry);
                }
            }
        }
        if let Some(data) = last_write {
            self.transactions.push(I2cTransaction::Write {
                addr: address,
                data,
            });
        }
        Ok(())
    }
}
