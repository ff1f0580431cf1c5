//! Tests for the data register span read per channel set

use crate::common::mock_interface::REG_STATUS;
use crate::common::{RecordingPublisher, create_initialized_driver, default_config};
use qmc5883p::{Channel, Channels};

/// Run one update and return the reads it issued
fn reads_for(channels: Channels) -> (Vec<(u8, usize)>, RecordingPublisher) {
    let mut config = default_config();
    config.channels = channels;
    let (mut driver, interface, _) = create_initialized_driver(config);
    let mut publisher = RecordingPublisher::new();

    interface.set_mag_data(1000, 2000, 3000);
    driver.update(&mut publisher).unwrap();

    (interface.reads(), publisher)
}

#[test]
fn test_all_channels_read_full_block() {
    let (reads, publisher) = reads_for(Channels::ALL);

    assert_eq!(reads, vec![(REG_STATUS, 1), (0x01, 6)]);
    assert_eq!(
        publisher.channels(),
        vec![Channel::X, Channel::Y, Channel::Z, Channel::Heading]
    );
}

#[test]
fn test_x_only_reads_full_block() {
    let (reads, publisher) = reads_for(Channels::X);

    assert_eq!(reads, vec![(REG_STATUS, 1), (0x01, 6)]);
    assert_eq!(publisher.channels(), vec![Channel::X]);
}

#[test]
fn test_heading_reads_full_block() {
    let (reads, _) = reads_for(Channels::Z | Channels::HEADING);

    assert_eq!(reads, vec![(REG_STATUS, 1), (0x01, 6)]);
}

#[test]
fn test_y_and_z_skip_x() {
    let (reads, publisher) = reads_for(Channels::Y | Channels::Z);

    assert_eq!(reads, vec![(REG_STATUS, 1), (0x03, 4)]);
    assert_eq!(publisher.channels(), vec![Channel::Y, Channel::Z]);
}

#[test]
fn test_y_only_reads_y_and_z() {
    let (reads, publisher) = reads_for(Channels::Y);

    assert_eq!(reads, vec![(REG_STATUS, 1), (0x03, 4)]);
    assert_eq!(publisher.channels(), vec![Channel::Y]);
}

#[test]
fn test_z_only_reads_z() {
    let (reads, publisher) = reads_for(Channels::Z);

    assert_eq!(reads, vec![(REG_STATUS, 1), (0x05, 2)]);
    assert_eq!(publisher.channels(), vec![Channel::Z]);
}

#[test]
fn test_no_channels_still_reads_z() {
    let (reads, publisher) = reads_for(Channels::empty());

    assert_eq!(reads, vec![(REG_STATUS, 1), (0x05, 2)]);
    assert!(publisher.published.is_empty());
}

#[test]
fn test_partial_span_values() {
    let mut config = default_config();
    config.channels = Channels::Z;
    let (mut driver, interface, _) = create_initialized_driver(config);

    interface.set_mag_data(1000, 2000, 3000);
    let raw = driver.read_raw(Channels::Y | Channels::Z).unwrap();

    // Axes before the span are not read
    assert_eq!(raw.x, 0);
    assert_eq!(raw.y, 2000);
    assert_eq!(raw.z, 3000);
}

#[test]
fn test_read_raw_ignores_configured_channels() {
    let mut config = default_config();
    config.channels = Channels::Z;
    let (mut driver, interface, _) = create_initialized_driver(config);

    interface.set_mag_data(-7, 8, -9);
    let raw = driver.read_raw(Channels::ALL).unwrap();

    assert_eq!((raw.x, raw.y, raw.z), (-7, 8, -9));
    assert_eq!(interface.reads(), vec![(0x01, 6)]);
}
