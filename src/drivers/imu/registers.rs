//! LSM6DSL register map and field encodings.

// I2C addresses (SA0 low / high)
pub const LSM6DSL_ADDRESS_LOW: u8 = 0x6A;
pub const LSM6DSL_ADDRESS_HIGH: u8 = 0x6B;

pub const WHO_AM_I: u8 = 0x0F;
pub const CTRL1_XL: u8 = 0x10;
pub const CTRL2_G: u8 = 0x11;
pub const CTRL3_C: u8 = 0x12;
pub const CTRL4_C: u8 = 0x13;
pub const STATUS_REG: u8 = 0x1E;
pub const OUT_TEMP_L: u8 = 0x20;

pub const WHO_AM_I_VALUE: u8 = 0x6A;

// CTRL3_C bits
pub const CTRL3_C_SW_RESET: u8 = 0x01;
pub const CTRL3_C_IF_INC: u8 = 0x04;
pub const CTRL3_C_BDU: u8 = 0x40;

// STATUS_REG bits
pub const STATUS_XLDA: u8 = 0x01;
pub const STATUS_GDA: u8 = 0x02;
pub const STATUS_TDA: u8 = 0x04;

/// Temperature + gyro XYZ + accel XYZ, one burst from OUT_TEMP_L.
pub const BURST_LEN: usize = 14;

/// Output data rate, high nibble of CTRL1_XL / CTRL2_G. Same encoding for both sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum OutputDataRate {
    PowerDown = 0x00,
    Hz12_5 = 0x10,
    Hz26 = 0x20,
    Hz52 = 0x30,
    Hz104 = 0x40,
    Hz208 = 0x50,
    Hz416 = 0x60,
    Hz833 = 0x70,
    Hz1660 = 0x80,
    Hz3330 = 0x90,
    Hz6660 = 0xA0,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AccelScale {
    G2 = 0x00,
    G16 = 0x04,
    G4 = 0x08,
    G8 = 0x0C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum GyroScale {
    Dps250 = 0x00,
    Dps125 = 0x02,
    Dps500 = 0x04,
    Dps1000 = 0x08,
    Dps2000 = 0x0C,
}

impl OutputDataRate {
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

impl AccelScale {
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

impl GyroScale {
    pub const fn bits(self) -> u8 {
        self as u8
    }
}

/// Decoded STATUS_REG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusBits(pub u8);

impl StatusBits {
    pub fn accel_available(&self) -> bool {
        self.0 & STATUS_XLDA != 0
    }

    pub fn gyro_available(&self) -> bool {
        self.0 & STATUS_GDA != 0
    }

    pub fn temperature_available(&self) -> bool {
        self.0 & STATUS_TDA != 0
    }

    /// New motion data to burst-read.
    pub fn data_ready(&self) -> bool {
        self.accel_available() || self.gyro_available()
    }
}
