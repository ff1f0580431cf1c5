//! Register definitions for the QMC5883P
//!
//! The QMC5883P exposes a flat, single-bank register map. Axis data is stored
//! little-endian (LSB first) in six consecutive registers starting at 0x01, so
//! a burst read from any axis LSB runs to the end of the Z block.
//!
//! ## Register Map
//! - **0x01..0x06**: X, Y, Z output data (LSB, MSB)
//! - **0x09**: Status (data ready, overflow)
//! - **0x0A**: Control 1 (mode, output data rate, oversampling, downsampling)
//! - **0x0B**: Control 2 (soft reset, self test, range, set/reset mode)
//! - **0x29**: Written with 0x06 during setup as listed in the datasheet example

/// X-axis output LSB register address (start of the data block)
pub const DATA_X_LSB: u8 = 0x01;

/// Y-axis output LSB register address
pub const DATA_Y_LSB: u8 = 0x03;

/// Z-axis output LSB register address
pub const DATA_Z_LSB: u8 = 0x05;

/// Value the datasheet setup example writes to register 0x29
pub const REG_29_INIT_VALUE: u8 = 0x06;

device_driver::create_device!(
    device_name: Qmc5883p,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = LE;
        }

        /// STATUS - Status Register (0x09)
        ///
        /// Reading this register clears the data ready flag.
        register Status {
            const ADDRESS = 0x09;
            const SIZE_BITS = 8;

            /// Data ready
            drdy: bool = 0,
            /// Data overflow
            ovfl: bool = 1,
            reserved_7_2: uint = 2..8,
        },

        /// CONTROL_1 - Mode, ODR, OSR and DSR (0x0A)
        register Control1 {
            const ADDRESS = 0x0A;
            const SIZE_BITS = 8;

            /// Operating mode (0=suspend, 1=normal, 2=single, 3=continuous)
            mode: uint = 0..2,
            /// Output data rate (0=10Hz, 1=50Hz, 2=100Hz, 3=200Hz)
            odr: uint = 2..4,
            /// Oversampling ratio (0=8, 1=4, 2=2, 3=1)
            osr: uint = 4..6,
            /// Downsampling ratio (0=1, 1=2, 2=4, 3=8)
            dsr: uint = 6..8,
        },

        /// CONTROL_2 - Range, set/reset mode, self test and soft reset (0x0B)
        register Control2 {
            const ADDRESS = 0x0B;
            const SIZE_BITS = 8;

            /// Set/reset mode (0=set and reset on, 1=set only, 2/3=off)
            set_reset_mode: uint = 0..2,
            /// Field range (0=30G, 1=12G, 2=8G, 3=2G)
            rng: uint = 2..4,
            reserved_5_4: uint = 4..6,
            /// Self test
            self_test: bool = 6,
            /// Soft reset
            soft_rst: bool = 7,
        },

        /// Register 0x29
        ///
        /// Not documented beyond the setup example, which writes 0x06 here.
        register Reg29 {
            const ADDRESS = 0x29;
            const SIZE_BITS = 8;

            value: uint = 0..8,
        }
    }
);

// Re-export commonly used types for convenience
pub use Qmc5883p as RegisterDevice;
