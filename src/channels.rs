//! Output channels and the data register span they require

use crate::registers::{DATA_X_LSB, DATA_Y_LSB, DATA_Z_LSB};

/// A single output channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// X-axis field strength in µT
    X,
    /// Y-axis field strength in µT
    Y,
    /// Z-axis field strength in µT
    Z,
    /// Heading in degrees
    Heading,
}

impl Channel {
    /// All channels in publish order
    pub const ALL: [Self; 4] = [Self::X, Self::Y, Self::Z, Self::Heading];

    /// Human readable channel name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "X Axis",
            Self::Y => "Y Axis",
            Self::Z => "Z Axis",
            Self::Heading => "Heading",
        }
    }

    /// The matching flag in a [`Channels`] set
    #[must_use]
    pub const fn flag(self) -> Channels {
        match self {
            Self::X => Channels::X,
            Self::Y => Channels::Y,
            Self::Z => Channels::Z,
            Self::Heading => Channels::HEADING,
        }
    }
}

bitflags::bitflags! {
    /// Set of output channels a consumer wants
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Channels: u8 {
        /// X-axis field strength
        const X       = 1 << 0;
        /// Y-axis field strength
        const Y       = 1 << 1;
        /// Z-axis field strength
        const Z       = 1 << 2;
        /// Heading, computed from X and Y
        const HEADING = 1 << 3;
        /// Every channel
        const ALL = Self::X.bits() | Self::Y.bits() | Self::Z.bits() | Self::HEADING.bits();
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Channels {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Channels({=u8:#b})", self.bits());
    }
}

impl Channels {
    /// Check whether a single channel is part of the set
    #[must_use]
    pub const fn wants(self, channel: Channel) -> bool {
        self.contains(channel.flag())
    }

    /// Data register span needed to serve this set
    #[must_use]
    pub const fn read_span(self) -> ReadSpan {
        ReadSpan::for_channels(self)
    }
}

/// Contiguous block of data registers read in one burst
///
/// A span always ends at the Z MSB; only leading axes are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadSpan {
    first_axis: usize,
}

impl ReadSpan {
    /// Span starting at X, 6 bytes
    pub const XYZ: Self = Self { first_axis: 0 };
    /// Span starting at Y, 4 bytes
    pub const YZ: Self = Self { first_axis: 1 };
    /// Span starting at Z, 2 bytes
    pub const Z: Self = Self { first_axis: 2 };

    /// Pick the shortest span covering the requested channels
    ///
    /// Heading needs X and Y. An empty set still reads Z.
    #[must_use]
    pub const fn for_channels(channels: Channels) -> Self {
        if channels.intersects(Channels::X.union(Channels::HEADING)) {
            Self::XYZ
        } else if channels.contains(Channels::Y) {
            Self::YZ
        } else {
            Self::Z
        }
    }

    /// Index of the first axis read (0 = X, 1 = Y, 2 = Z)
    #[must_use]
    pub const fn first_axis(self) -> usize {
        self.first_axis
    }

    /// Register address the burst starts at
    #[must_use]
    pub const fn start_register(self) -> u8 {
        match self.first_axis {
            0 => DATA_X_LSB,
            1 => DATA_Y_LSB,
            _ => DATA_Z_LSB,
        }
    }

    /// Number of axes read
    #[must_use]
    pub const fn axis_count(self) -> usize {
        3 - self.first_axis
    }

    /// Number of bytes read
    #[must_use]
    pub const fn byte_len(self) -> usize {
        self.axis_count() * 2
    }
}
