//! Conversion from raw samples to physical units
//!
//! Samples are 16-bit two's complement, so full scale maps to ±32767 LSB.
//! The scale factor yields milligauss; 1 mG is 0.1 µT.

use crate::channels::{Channel, Channels, ReadSpan};
use crate::config::MeasurementRange;

/// Milligauss to microtesla
pub const MG_TO_UT: f32 = 0.1;

/// LSB count at full scale
const FULL_SCALE_LSB: f32 = 32767.0;

/// Scale factor in milligauss per LSB for a CONTROL_2 range field value
///
/// Values outside the 2-bit field yield NaN, which then shows up in every
/// converted output instead of a silently wrong unit.
#[must_use]
pub fn mg_per_lsb(range_bits: u8) -> f32 {
    match range_bits {
        0b11 => 2000.0 / FULL_SCALE_LSB,
        0b10 => 8000.0 / FULL_SCALE_LSB,
        0b01 => 12000.0 / FULL_SCALE_LSB,
        0b00 => 30000.0 / FULL_SCALE_LSB,
        _ => f32::NAN,
    }
}

/// Compass heading in degrees from horizontal field components
///
/// Range is (-180, 180], no wrap to 0..360 and no declination or tilt
/// correction. `0.0 - x` keeps a zero X positive so due south reads +180.
#[must_use]
pub fn heading_degrees(x: f32, y: f32) -> f32 {
    libm::atan2f(0.0 - x, y).to_degrees()
}

/// Magnetometer data (raw 16-bit values)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagData {
    /// X-axis magnetic field (raw)
    pub x: i16,
    /// Y-axis magnetic field (raw)
    pub y: i16,
    /// Z-axis magnetic field (raw)
    pub z: i16,
}

impl MagData {
    /// Decode a burst read of `span`
    ///
    /// Axes before the start of the span stay 0. `bytes` must hold at least
    /// `span.byte_len()` bytes.
    #[must_use]
    pub fn from_le_bytes(span: ReadSpan, bytes: &[u8]) -> Self {
        let mut axes = [0i16; 3];
        for (axis, pair) in axes[span.first_axis()..]
            .iter_mut()
            .zip(bytes.chunks_exact(2))
        {
            *axis = i16::from_le_bytes([pair[0], pair[1]]);
        }
        let [x, y, z] = axes;
        Self { x, y, z }
    }
}

/// Magnetometer data in microteslas (µT)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagDataUT {
    /// X-axis magnetic field in µT
    pub x: f32,
    /// Y-axis magnetic field in µT
    pub y: f32,
    /// Z-axis magnetic field in µT
    pub z: f32,
}

impl MagDataUT {
    /// Convert raw values with a scale factor in mG/LSB
    #[must_use]
    pub fn from_raw(raw: MagData, mg_per_lsb: f32) -> Self {
        Self {
            x: f32::from(raw.x) * mg_per_lsb * MG_TO_UT,
            y: f32::from(raw.y) * mg_per_lsb * MG_TO_UT,
            z: f32::from(raw.z) * mg_per_lsb * MG_TO_UT,
        }
    }

    /// Calculate the magnitude of the magnetic field vector
    ///
    /// Returns the magnitude in µT.
    #[must_use]
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// Heading in degrees, see [`heading_degrees`]
    #[must_use]
    pub fn heading(&self) -> f32 {
        heading_degrees(self.x, self.y)
    }
}

/// One converted sample
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagSample {
    /// Field strength in µT
    pub field: MagDataUT,
    /// Heading in degrees, only present when requested
    pub heading: Option<f32>,
}

impl MagSample {
    /// Convert a raw sample for the given range and channel set
    #[must_use]
    pub fn convert(raw: MagData, range: MeasurementRange, channels: Channels) -> Self {
        Self::convert_with_scale(raw, range.mg_per_lsb(), channels)
    }

    /// Convert a raw sample with an explicit scale factor in mG/LSB
    #[must_use]
    pub fn convert_with_scale(raw: MagData, mg_per_lsb: f32, channels: Channels) -> Self {
        let field = MagDataUT::from_raw(raw, mg_per_lsb);
        let heading = channels
            .contains(Channels::HEADING)
            .then(|| field.heading());
        Self { field, heading }
    }

    /// Value for an output channel
    ///
    /// `None` for the heading when it was not requested.
    #[must_use]
    pub const fn value(&self, channel: Channel) -> Option<f32> {
        match channel {
            Channel::X => Some(self.field.x),
            Channel::Y => Some(self.field.y),
            Channel::Z => Some(self.field.z),
            Channel::Heading => self.heading,
        }
    }
}
