//! High-level driver API for the QMC5883P
//!
//! This module programs the control registers once during `init()` and then
//! reads, converts and publishes one sample per `update()` call.

use core::fmt;

use crate::channels::{Channel, Channels};
use crate::config::{
    Config, DeviceConfig, Downsampling, MeasurementRange, OperatingMode, OutputDataRate,
    Oversampling, SetResetMode,
};
use crate::conversion::{MagData, MagSample};
use crate::host::{Publisher, Scheduler};
use crate::registers::{Qmc5883p as RegisterDevice, REG_29_INIT_VALUE};
use crate::Error;

// Only import RegisterInterface when not using async feature
#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

/// Largest burst read (X, Y and Z)
const DATA_BLOCK_LEN: usize = 6;

/// Driver lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// `init()` has not run yet
    Uninitialized,
    /// Registers programmed, polling allowed
    Ready,
    /// A register write failed during `init()`
    Failed,
}

/// Decoded status register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagStatus {
    /// New data is available
    pub data_ready: bool,
    /// A measurement exceeded the configured range
    pub overflow: bool,
}

/// Control register contents read back from the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlRegisters {
    /// Mode, rates and range
    pub device: DeviceConfig,
    /// Set/reset mode
    pub set_reset: SetResetMode,
    /// Self test bit
    pub self_test: bool,
    /// Soft reset bit
    pub soft_reset: bool,
}

/// Main driver for the QMC5883P
pub struct Qmc5883pDriver<I> {
    device: RegisterDevice<I>,
    config: Config,
    state: DeviceState,
    high_frequency: bool,
}

impl<I> Qmc5883pDriver<I> {
    /// Create a new QMC5883P driver instance
    ///
    /// No bus traffic happens here. Call `init()` to program the device.
    pub fn new(interface: I, config: Config) -> Self {
        Self {
            device: RegisterDevice::new(interface),
            config,
            state: DeviceState::Uninitialized,
            high_frequency: false,
        }
    }

    /// Active configuration
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Current lifecycle state
    pub const fn state(&self) -> DeviceState {
        self.state
    }

    /// Whether initialization failed
    pub const fn is_failed(&self) -> bool {
        matches!(self.state, DeviceState::Failed)
    }

    /// Whether the driver holds a high-frequency request on the host loop
    pub const fn high_frequency_requested(&self) -> bool {
        self.high_frequency
    }

    /// Configuration dump, printable with `{}`
    pub const fn config_summary(&self) -> ConfigSummary {
        ConfigSummary {
            config: self.config,
            failed: self.is_failed(),
            high_frequency: self.high_frequency,
        }
    }

    /// Log the configuration dump
    #[cfg(feature = "defmt")]
    pub fn dump_config(&self) {
        let config = &self.config;
        defmt::info!("QMC5883P:");
        if self.is_failed() {
            defmt::error!("Communication with QMC5883P failed!");
        }
        defmt::info!("  Update Interval: {=u32} ms", config.update_interval_ms);
        defmt::info!(
            "  Mode: {}, ODR: {=u16} Hz, OSR: {=u8}x, DSR: {=u8}x, Range: +/-{=u8} G",
            config.device.mode,
            config.device.data_rate.hz(),
            config.device.oversampling.ratio(),
            config.device.downsampling.ratio(),
            config.device.range.max_gauss()
        );
        for channel in Channel::ALL {
            if config.channels.wants(channel) {
                defmt::info!("  {=str}: published", channel.name());
            }
        }
    }

    /// Consume the driver and return the underlying interface
    ///
    /// Drops the high-frequency request taken in `init()`, if any.
    pub fn release<S: Scheduler>(self, scheduler: &mut S) -> I {
        if self.high_frequency {
            scheduler.release_high_frequency();
        }
        self.device.interface
    }

    fn check_ready<E>(&self) -> Result<(), Error<E>> {
        match self.state {
            DeviceState::Ready => Ok(()),
            DeviceState::Failed => Err(Error::Failed),
            DeviceState::Uninitialized => Err(Error::NotInitialized),
        }
    }

    fn mark_failed(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::error!("Communication with QMC5883P failed!");

        self.state = DeviceState::Failed;
    }

    /// Last step of `init()`, after the registers are written
    fn finish_init<S: Scheduler>(&mut self, scheduler: &mut S) {
        self.state = DeviceState::Ready;

        if !self.high_frequency && self.config.update_interval_ms < scheduler.loop_interval_ms() {
            scheduler.request_high_frequency();
            self.high_frequency = true;
        }
    }

    /// Convert a raw sample and push every requested channel
    fn finish_update<P: Publisher>(
        &self,
        status: MagStatus,
        raw: MagData,
        publisher: &mut P,
    ) -> MagSample {
        let channels = self.config.channels;
        let sample = MagSample::convert(raw, self.config.device.range, channels);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Got x={}uT y={}uT z={}uT heading={}deg status={}",
            sample.field.x,
            sample.field.y,
            sample.field.z,
            sample.heading,
            status
        );
        #[cfg(not(feature = "defmt"))]
        let _ = status;

        for channel in Channel::ALL {
            if !channels.wants(channel) {
                continue;
            }
            if let Some(value) = sample.value(channel) {
                publisher.publish(channel, value);
            }
        }

        sample
    }
}

#[allow(clippy::too_many_arguments)]
fn decode_control(
    mode: u8,
    odr: u8,
    osr: u8,
    dsr: u8,
    rng: u8,
    set_reset: u8,
    self_test: bool,
    soft_reset: bool,
) -> ControlRegisters {
    ControlRegisters {
        device: DeviceConfig {
            mode: OperatingMode::from_bits(mode),
            data_rate: OutputDataRate::from_bits(odr),
            oversampling: Oversampling::from_bits(osr),
            downsampling: Downsampling::from_bits(dsr),
            range: MeasurementRange::from_bits(rng),
        },
        set_reset: SetResetMode::from_bits(set_reset),
        self_test,
        soft_reset,
    }
}

#[cfg(not(feature = "async"))]
impl<I> Qmc5883pDriver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    /// Initialize the device
    ///
    /// Writes, in order:
    /// 1. `0x06` to register `0x29` (from the datasheet setup example)
    /// 2. CONTROL_2: range, set/reset on, no self test, no soft reset
    /// 3. CONTROL_1: mode, output data rate, oversampling, downsampling
    ///
    /// If the update interval is shorter than the host loop interval, a
    /// high-frequency request is placed on the scheduler and held until
    /// [`release`](Self::release).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if any write fails. The remaining writes are
    /// skipped and the driver is marked failed; `update()` will not touch the
    /// bus until `init()` is called again and succeeds.
    pub fn init<S: Scheduler>(&mut self, scheduler: &mut S) -> Result<(), Error<I::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Initializing QMC5883P...");

        if let Err(e) = self.write_control_registers() {
            self.mark_failed();
            return Err(e);
        }

        self.finish_init(scheduler);
        Ok(())
    }

    fn write_control_registers(&mut self) -> Result<(), Error<I::Error>> {
        let device = self.config.device;

        self.device.reg_29().write(|w| {
            w.set_value(REG_29_INIT_VALUE);
        })?;

        self.device.control_2().write(|w| {
            w.set_soft_rst(false);
            w.set_self_test(false);
            w.set_rng(device.range.bits());
            w.set_set_reset_mode(SetResetMode::SetAndReset.bits());
        })?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Control Register 2: rng={=u8:#b} set_reset={=u8:#b}",
            device.range.bits(),
            SetResetMode::SetAndReset.bits()
        );

        self.device.control_1().write(|w| {
            w.set_mode(device.mode.bits());
            w.set_odr(device.data_rate.bits());
            w.set_osr(device.oversampling.bits());
            w.set_dsr(device.downsampling.bits());
        })?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Control Register 1: mode={=u8:#b} odr={=u8:#b} osr={=u8:#b} dsr={=u8:#b}",
            device.mode.bits(),
            device.data_rate.bits(),
            device.oversampling.bits(),
            device.downsampling.bits()
        );

        Ok(())
    }

    /// Run one poll cycle
    ///
    /// Reads the status register (always, since the read clears the data ready
    /// flag), reads the data registers needed for the configured channels,
    /// converts them and publishes every configured channel.
    ///
    /// # Errors
    ///
    /// - [`Error::StatusRead`] / [`Error::DataRead`] if a read fails. Nothing
    ///   is published; the next call proceeds normally.
    /// - [`Error::Failed`] / [`Error::NotInitialized`] without bus access.
    pub fn update<P: Publisher>(&mut self, publisher: &mut P) -> Result<MagSample, Error<I::Error>> {
        self.check_ready()?;

        let status = self.fetch_status()?;
        let raw = self.fetch_raw(self.config.channels)?;

        Ok(self.finish_update(status, raw, publisher))
    }

    /// Read the status register
    ///
    /// Clears the data ready flag on the device.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StatusRead`] if communication fails, or a state error
    /// if the driver is not ready.
    pub fn read_status(&mut self) -> Result<MagStatus, Error<I::Error>> {
        self.check_ready()?;
        self.fetch_status()
    }

    /// Read raw samples for a channel set
    ///
    /// Only the shortest register span covering `channels` is read; axes before
    /// it are returned as 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataRead`] if communication fails, or a state error if
    /// the driver is not ready.
    pub fn read_raw(&mut self, channels: Channels) -> Result<MagData, Error<I::Error>> {
        self.check_ready()?;
        self.fetch_raw(channels)
    }

    /// Read back and decode CONTROL_1 and CONTROL_2
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if communication fails, or a state error if the
    /// driver is not ready.
    pub fn read_configuration(&mut self) -> Result<ControlRegisters, Error<I::Error>> {
        self.check_ready()?;

        let control_1 = self.device.control_1().read()?;
        let control_2 = self.device.control_2().read()?;

        Ok(decode_control(
            control_1.mode(),
            control_1.odr(),
            control_1.osr(),
            control_1.dsr(),
            control_2.rng(),
            control_2.set_reset_mode(),
            control_2.self_test(),
            control_2.soft_rst(),
        ))
    }

    fn fetch_status(&mut self) -> Result<MagStatus, Error<I::Error>> {
        match self.device.status().read() {
            Ok(status) => Ok(MagStatus {
                data_ready: status.drdy(),
                overflow: status.ovfl(),
            }),
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("QMC5883P status read failed");
                Err(Error::StatusRead(e))
            }
        }
    }

    fn fetch_raw(&mut self, channels: Channels) -> Result<MagData, Error<I::Error>> {
        let span = channels.read_span();
        let mut buffer = [0u8; DATA_BLOCK_LEN];
        let bytes = &mut buffer[..span.byte_len()];

        if let Err(e) = self.device.interface.read_register(
            span.start_register(),
            (span.byte_len() * 8) as u32,
            bytes,
        ) {
            #[cfg(feature = "defmt")]
            defmt::warn!("QMC5883P mag read failed");
            return Err(Error::DataRead(e));
        }

        Ok(MagData::from_le_bytes(span, bytes))
    }
}

#[cfg(feature = "async")]
impl<I> Qmc5883pDriver<I>
where
    I: device_driver::AsyncRegisterInterface<AddressType = u8>,
{
    /// Initialize the device
    ///
    /// Writes, in order:
    /// 1. `0x06` to register `0x29` (from the datasheet setup example)
    /// 2. CONTROL_2: range, set/reset on, no self test, no soft reset
    /// 3. CONTROL_1: mode, output data rate, oversampling, downsampling
    ///
    /// If the update interval is shorter than the host loop interval, a
    /// high-frequency request is placed on the scheduler and held until
    /// [`release`](Self::release).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if any write fails. The remaining writes are
    /// skipped and the driver is marked failed.
    pub async fn init<S: Scheduler>(&mut self, scheduler: &mut S) -> Result<(), Error<I::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Initializing QMC5883P...");

        if let Err(e) = self.write_control_registers().await {
            self.mark_failed();
            return Err(e);
        }

        self.finish_init(scheduler);
        Ok(())
    }

    async fn write_control_registers(&mut self) -> Result<(), Error<I::Error>> {
        let device = self.config.device;

        self.device
            .reg_29()
            .write_async(|w| {
                w.set_value(REG_29_INIT_VALUE);
            })
            .await?;

        self.device
            .control_2()
            .write_async(|w| {
                w.set_soft_rst(false);
                w.set_self_test(false);
                w.set_rng(device.range.bits());
                w.set_set_reset_mode(SetResetMode::SetAndReset.bits());
            })
            .await?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Control Register 2: rng={=u8:#b} set_reset={=u8:#b}",
            device.range.bits(),
            SetResetMode::SetAndReset.bits()
        );

        self.device
            .control_1()
            .write_async(|w| {
                w.set_mode(device.mode.bits());
                w.set_odr(device.data_rate.bits());
                w.set_osr(device.oversampling.bits());
                w.set_dsr(device.downsampling.bits());
            })
            .await?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Control Register 1: mode={=u8:#b} odr={=u8:#b} osr={=u8:#b} dsr={=u8:#b}",
            device.mode.bits(),
            device.data_rate.bits(),
            device.oversampling.bits(),
            device.downsampling.bits()
        );

        Ok(())
    }

    /// Run one poll cycle
    ///
    /// See the blocking variant for the read order and error behavior.
    ///
    /// # Errors
    ///
    /// - [`Error::StatusRead`] / [`Error::DataRead`] if a read fails.
    /// - [`Error::Failed`] / [`Error::NotInitialized`] without bus access.
    pub async fn update<P: Publisher>(
        &mut self,
        publisher: &mut P,
    ) -> Result<MagSample, Error<I::Error>> {
        self.check_ready()?;

        let status = self.fetch_status().await?;
        let raw = self.fetch_raw(self.config.channels).await?;

        Ok(self.finish_update(status, raw, publisher))
    }

    /// Read the status register
    ///
    /// # Errors
    ///
    /// Returns [`Error::StatusRead`] if communication fails, or a state error
    /// if the driver is not ready.
    pub async fn read_status(&mut self) -> Result<MagStatus, Error<I::Error>> {
        self.check_ready()?;
        self.fetch_status().await
    }

    /// Read raw samples for a channel set
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataRead`] if communication fails, or a state error if
    /// the driver is not ready.
    pub async fn read_raw(&mut self, channels: Channels) -> Result<MagData, Error<I::Error>> {
        self.check_ready()?;
        self.fetch_raw(channels).await
    }

    /// Read back and decode CONTROL_1 and CONTROL_2
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if communication fails, or a state error if the
    /// driver is not ready.
    pub async fn read_configuration(&mut self) -> Result<ControlRegisters, Error<I::Error>> {
        self.check_ready()?;

        let control_1 = self.device.control_1().read_async().await?;
        let control_2 = self.device.control_2().read_async().await?;

        Ok(decode_control(
            control_1.mode(),
            control_1.odr(),
            control_1.osr(),
            control_1.dsr(),
            control_2.rng(),
            control_2.set_reset_mode(),
            control_2.self_test(),
            control_2.soft_rst(),
        ))
    }

    async fn fetch_status(&mut self) -> Result<MagStatus, Error<I::Error>> {
        match self.device.status().read_async().await {
            Ok(status) => Ok(MagStatus {
                data_ready: status.drdy(),
                overflow: status.ovfl(),
            }),
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("QMC5883P status read failed");
                Err(Error::StatusRead(e))
            }
        }
    }

    async fn fetch_raw(&mut self, channels: Channels) -> Result<MagData, Error<I::Error>> {
        let span = channels.read_span();
        let mut buffer = [0u8; DATA_BLOCK_LEN];
        let bytes = &mut buffer[..span.byte_len()];

        if let Err(e) = self
            .device
            .interface
            .read_register(span.start_register(), (span.byte_len() * 8) as u32, bytes)
            .await
        {
            #[cfg(feature = "defmt")]
            defmt::warn!("QMC5883P mag read failed");
            return Err(Error::DataRead(e));
        }

        Ok(MagData::from_le_bytes(span, bytes))
    }
}

/// Human readable configuration dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigSummary {
    config: Config,
    failed: bool,
    high_frequency: bool,
}

impl fmt::Display for ConfigSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let device = &self.config.device;
        writeln!(f, "QMC5883P:")?;
        if self.failed {
            writeln!(f, "  Communication with QMC5883P failed!")?;
        }
        writeln!(f, "  Update Interval: {} ms", self.config.update_interval_ms)?;
        if self.high_frequency {
            writeln!(f, "  High frequency loop requested")?;
        }
        writeln!(f, "  Mode: {:?}", device.mode)?;
        writeln!(f, "  Output Data Rate: {} Hz", device.data_rate.hz())?;
        writeln!(f, "  Oversampling: {}x", device.oversampling.ratio())?;
        writeln!(f, "  Downsampling: {}x", device.downsampling.ratio())?;
        writeln!(f, "  Range: ±{} G", device.range.max_gauss())?;
        for channel in Channel::ALL {
            let wiring = if self.config.channels.wants(channel) {
                "published"
            } else {
                "not configured"
            };
            writeln!(f, "  {}: {}", channel.name(), wiring)?;
        }
        Ok(())
    }
}
