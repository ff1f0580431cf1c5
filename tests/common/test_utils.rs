//! Test utilities and helper functions

use crate::common::mock_interface::MockInterface;
use qmc5883p::{Channel, Channels, Config, MeasurementRange, Publisher, Qmc5883pDriver, Scheduler};

/// Mock host scheduler
///
/// Tracks whether a high-frequency request is outstanding.
#[derive(Debug, Clone, Copy)]
pub struct MockScheduler {
    pub loop_interval_ms: u32,
    pub high_frequency: bool,
    pub requests: u32,
    pub releases: u32,
}

impl MockScheduler {
    /// Scheduler with the usual 16 ms host loop
    pub fn new() -> Self {
        Self::with_loop_interval(16)
    }

    pub fn with_loop_interval(loop_interval_ms: u32) -> Self {
        Self {
            loop_interval_ms,
            high_frequency: false,
            requests: 0,
            releases: 0,
        }
    }
}

impl Scheduler for MockScheduler {
    fn loop_interval_ms(&self) -> u32 {
        self.loop_interval_ms
    }

    fn request_high_frequency(&mut self) {
        self.high_frequency = true;
        self.requests += 1;
    }

    fn release_high_frequency(&mut self) {
        self.high_frequency = false;
        self.releases += 1;
    }
}

/// Publisher that records every value it receives
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    pub published: Vec<(Channel, f32)>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value published on a channel
    pub fn last(&self, channel: Channel) -> Option<f32> {
        self.published
            .iter()
            .rev()
            .find(|(c, _)| *c == channel)
            .map(|(_, v)| *v)
    }

    /// Channels in publish order
    pub fn channels(&self) -> Vec<Channel> {
        self.published.iter().map(|(c, _)| *c).collect()
    }
}

impl Publisher for RecordingPublisher {
    fn publish(&mut self, channel: Channel, value: f32) {
        self.published.push((channel, value));
    }
}

/// Configuration used by most tests: ±2 G, every channel, 1 s polling
pub fn default_config() -> Config {
    let mut config = Config::default();
    config.device.range = MeasurementRange::G2;
    config.update_interval_ms = 1000;
    config.channels = Channels::ALL;
    config
}

/// Create a mock driver for testing
/// Returns (driver, interface) where interface is a clone that shares state with the driver
pub fn create_mock_driver(config: Config) -> (Qmc5883pDriver<MockInterface>, MockInterface) {
    let interface = MockInterface::new();
    let interface_clone = interface.clone();
    let driver = Qmc5883pDriver::new(interface, config);
    (driver, interface_clone)
}

/// Create a mock driver and run `init()`
#[allow(dead_code)]
pub fn create_initialized_driver(
    config: Config,
) -> (Qmc5883pDriver<MockInterface>, MockInterface, MockScheduler) {
    let (mut driver, interface) = create_mock_driver(config);
    let mut scheduler = MockScheduler::new();
    driver
        .init(&mut scheduler)
        .expect("Failed to initialize mock driver");
    interface.clear_operations();
    (driver, interface, scheduler)
}

/// Assert that two floating point values are approximately equal
pub fn assert_float_eq(a: f32, b: f32, epsilon: f32) {
    let diff = (a - b).abs();
    assert!(
        diff < epsilon,
        "Values not equal within epsilon: {} vs {} (diff: {}, epsilon: {})",
        a,
        b,
        diff,
        epsilon
    );
}
