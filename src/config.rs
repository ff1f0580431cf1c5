//! Configuration types for the QMC5883P
//!
//! Every setting is a closed enumeration whose discriminant is the 2-bit value
//! stored in its control register field. `bits()` encodes, `from_bits()`
//! decodes; only the low two bits are considered when decoding.

use crate::channels::Channels;

/// Operating mode (CONTROL_1 bits 1..0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    /// Suspend (standby), no measurements
    Suspend = 0b00,
    /// Normal mode, measurements at the output data rate
    Normal = 0b01,
    /// Single measurement, returns to suspend afterwards
    Single = 0b10,
    /// Continuous measurement
    Continuous = 0b11,
}

impl OperatingMode {
    /// All modes in register order
    pub const ALL: [Self; 4] = [Self::Suspend, Self::Normal, Self::Single, Self::Continuous];

    /// Register field value
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode a register field value
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Suspend,
            0b01 => Self::Normal,
            0b10 => Self::Single,
            _ => Self::Continuous,
        }
    }
}

/// Output data rate (CONTROL_1 bits 3..2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputDataRate {
    /// 10 Hz
    Hz10 = 0b00,
    /// 50 Hz
    Hz50 = 0b01,
    /// 100 Hz
    Hz100 = 0b10,
    /// 200 Hz
    Hz200 = 0b11,
}

impl OutputDataRate {
    /// All rates, slowest first
    pub const ALL: [Self; 4] = [Self::Hz10, Self::Hz50, Self::Hz100, Self::Hz200];

    /// Register field value
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode a register field value
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Hz10,
            0b01 => Self::Hz50,
            0b10 => Self::Hz100,
            _ => Self::Hz200,
        }
    }

    /// Get the rate in Hz
    #[must_use]
    pub const fn hz(self) -> u16 {
        match self {
            Self::Hz10 => 10,
            Self::Hz50 => 50,
            Self::Hz100 => 100,
            Self::Hz200 => 200,
        }
    }

    /// Pick the slowest rate that still refreshes at least once per poll
    ///
    /// Falls back to 200 Hz when the poll interval is faster than every rate
    /// (including a zero interval).
    #[must_use]
    pub fn for_update_interval_ms(update_interval_ms: u32) -> Self {
        if update_interval_ms == 0 {
            return Self::Hz200;
        }
        let poll_hz = 1000.0 / update_interval_ms as f32;
        Self::ALL
            .into_iter()
            .find(|rate| f32::from(rate.hz()) >= poll_hz)
            .unwrap_or(Self::Hz200)
    }
}

/// Oversampling ratio (CONTROL_1 bits 5..4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oversampling {
    /// 8 samples per measurement
    X8 = 0b00,
    /// 4 samples per measurement
    X4 = 0b01,
    /// 2 samples per measurement
    X2 = 0b10,
    /// 1 sample per measurement
    X1 = 0b11,
}

impl Oversampling {
    /// All ratios in register order
    pub const ALL: [Self; 4] = [Self::X8, Self::X4, Self::X2, Self::X1];

    /// Register field value
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode a register field value
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::X8,
            0b01 => Self::X4,
            0b10 => Self::X2,
            _ => Self::X1,
        }
    }

    /// Number of internal samples averaged per measurement
    #[must_use]
    pub const fn ratio(self) -> u8 {
        match self {
            Self::X8 => 8,
            Self::X4 => 4,
            Self::X2 => 2,
            Self::X1 => 1,
        }
    }
}

/// Downsampling ratio, the second filter stage (CONTROL_1 bits 7..6)
///
/// Higher ratios lower the noise level at the cost of latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Downsampling {
    /// No downsampling
    X1 = 0b00,
    /// Downsample by 2
    X2 = 0b01,
    /// Downsample by 4
    X4 = 0b10,
    /// Downsample by 8
    X8 = 0b11,
}

impl Downsampling {
    /// All ratios in register order
    pub const ALL: [Self; 4] = [Self::X1, Self::X2, Self::X4, Self::X8];

    /// Register field value
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode a register field value
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::X1,
            0b01 => Self::X2,
            0b10 => Self::X4,
            _ => Self::X8,
        }
    }

    /// Downsampling factor
    #[must_use]
    pub const fn ratio(self) -> u8 {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X4 => 4,
            Self::X8 => 8,
        }
    }
}

/// Full-scale measurement range (CONTROL_2 bits 3..2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MeasurementRange {
    /// ±30 gauss (least sensitive, most range)
    G30 = 0b00,
    /// ±12 gauss
    G12 = 0b01,
    /// ±8 gauss
    G8 = 0b10,
    /// ±2 gauss (most sensitive, least range)
    G2 = 0b11,
}

impl MeasurementRange {
    /// All ranges in register order
    pub const ALL: [Self; 4] = [Self::G30, Self::G12, Self::G8, Self::G2];

    /// Register field value
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode a register field value
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::G30,
            0b01 => Self::G12,
            0b10 => Self::G8,
            _ => Self::G2,
        }
    }

    /// Get the full-scale value in gauss
    #[must_use]
    pub const fn max_gauss(self) -> u8 {
        match self {
            Self::G30 => 30,
            Self::G12 => 12,
            Self::G8 => 8,
            Self::G2 => 2,
        }
    }

    /// Get the scale factor in milligauss per LSB
    #[must_use]
    pub fn mg_per_lsb(self) -> f32 {
        crate::conversion::mg_per_lsb(self.bits())
    }
}

/// Set/reset mode (CONTROL_2 bits 1..0)
///
/// The driver always programs [`SetResetMode::SetAndReset`]; the other values
/// only show up when decoding a register read back from the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetResetMode {
    /// Set and reset both on
    SetAndReset = 0b00,
    /// Set only
    SetOnly = 0b01,
    /// Set and reset off
    Off = 0b10,
}

impl SetResetMode {
    /// Register field value
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode a register field value (0b10 and 0b11 both mean off)
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::SetAndReset,
            0b01 => Self::SetOnly,
            _ => Self::Off,
        }
    }
}

/// Device register configuration, written once during `init()`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// Operating mode
    pub mode: OperatingMode,
    /// Output data rate
    pub data_rate: OutputDataRate,
    /// Oversampling ratio
    pub oversampling: Oversampling,
    /// Downsampling ratio (noise level)
    pub downsampling: Downsampling,
    /// Full-scale range
    pub range: MeasurementRange,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            mode: OperatingMode::Normal,
            data_rate: OutputDataRate::Hz200,
            oversampling: Oversampling::X8,
            downsampling: Downsampling::X8,
            range: MeasurementRange::G30,
        }
    }
}

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Register settings
    pub device: DeviceConfig,
    /// Interval between `update()` calls in milliseconds
    pub update_interval_ms: u32,
    /// Output channels wired to a publisher
    pub channels: Channels,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: DeviceConfig::default(),
            update_interval_ms: 60_000,
            channels: Channels::ALL,
        }
    }
}

impl Config {
    /// Match the output data rate to the update interval
    ///
    /// See [`OutputDataRate::for_update_interval_ms`].
    #[must_use]
    pub fn with_auto_data_rate(mut self) -> Self {
        self.device.data_rate = OutputDataRate::for_update_interval_ms(self.update_interval_ms);
        self
    }
}
