#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod channels;
pub mod config;
pub mod conversion;
pub mod device;
pub mod host;
pub mod interface;
pub mod registers;

// Re-export main types
pub use channels::{Channel, Channels, ReadSpan};
pub use config::{
    Config, DeviceConfig, Downsampling, MeasurementRange, OperatingMode, OutputDataRate,
    Oversampling, SetResetMode,
};
pub use conversion::{MagData, MagDataUT, MagSample};
pub use device::{ConfigSummary, ControlRegisters, DeviceState, MagStatus, Qmc5883pDriver};
pub use host::{Publisher, Scheduler};
pub use interface::I2cInterface;

/// QMC5883P 7-bit I2C address (fixed, 0x2C)
pub const I2C_ADDRESS: u8 = 0x2C;

/// Driver errors
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device
    ///
    /// Returned when a register write fails during `init()`. The driver is
    /// marked failed and stops touching the bus until `init()` succeeds.
    Bus(E),
    /// Reading the status register failed; the poll cycle was skipped
    StatusRead(E),
    /// Reading the data registers failed; the poll cycle was skipped
    DataRead(E),
    /// The device failed during initialization
    Failed,
    /// `init()` has not been called yet
    NotInitialized,
}

impl<E> Error<E> {
    /// Whether the error only affects the current poll cycle
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::StatusRead(_) | Self::DataRead(_))
    }
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
