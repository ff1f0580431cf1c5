//! Hooks into the host firmware
//!
//! The driver does not own a scheduler or a sensor registry. The host hands
//! them in through these traits.

use crate::channels::Channel;

/// Sink for converted values
pub trait Publisher {
    /// Publish a new value on an output channel
    fn publish(&mut self, channel: Channel, value: f32);
}

impl<F> Publisher for F
where
    F: FnMut(Channel, f32),
{
    fn publish(&mut self, channel: Channel, value: f32) {
        self(channel, value);
    }
}

/// Host main loop control
pub trait Scheduler {
    /// Interval of the host main loop in milliseconds
    fn loop_interval_ms(&self) -> u32;

    /// Ask the host to run its loop as fast as possible
    fn request_high_frequency(&mut self);

    /// Drop a previous [`request_high_frequency`](Scheduler::request_high_frequency)
    fn release_high_frequency(&mut self);
}
