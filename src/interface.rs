//! Bus interface implementation for the QMC5883P
//!
//! This module adapts an `embedded-hal` I2C bus to the `device-driver`
//! register traits. The QMC5883P only speaks I2C.

use crate::I2C_ADDRESS;

use device_driver::RegisterInterface;

/// Largest register write the interface issues (address byte excluded)
const MAX_WRITE_LEN: usize = 8;

/// I2C interface for the QMC5883P
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface with the fixed device address (0x2C)
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::default(i2c);
    /// let mut mag = Qmc5883pDriver::new(interface, Config::default());
    /// ```
    pub const fn default(i2c: I2C) -> Self {
        Self {
            i2c,
            address: I2C_ADDRESS,
        }
    }

    /// Create a new I2C interface with a custom device address
    ///
    /// Useful behind address translators or multiplexers.
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral
    /// * `address` - The 7-bit I2C device address
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// The 7-bit device address in use
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

/// Prefix register writes with the register address
fn write_buffer(address: u8, write_data: &[u8]) -> ([u8; MAX_WRITE_LEN + 1], usize) {
    let mut buffer = [0u8; MAX_WRITE_LEN + 1];
    buffer[0] = address;
    let len = write_data.len().min(MAX_WRITE_LEN);
    buffer[1..=len].copy_from_slice(&write_data[..len]);
    (buffer, len)
}

impl<I2C, E> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len() for I2C
        self.i2c.write_read(self.address, &[address], read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in write_data.len() for I2C
        let (buffer, len) = write_buffer(address, write_data);
        self.i2c.write(self.address, &buffer[..=len])
    }
}

#[cfg(feature = "async")]
impl<I2C, E> device_driver::AsyncRegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal_async::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len() for I2C
        self.i2c
            .write_read(self.address, &[address], read_data)
            .await
    }

    async fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in write_data.len() for I2C
        let (buffer, len) = write_buffer(address, write_data);
        self.i2c.write(self.address, &buffer[..=len]).await
    }
}
