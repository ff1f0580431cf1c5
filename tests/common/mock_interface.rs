//! Mock interface implementation for testing the QMC5883P driver

use device_driver::RegisterInterface;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Status register address
pub const REG_STATUS: u8 = 0x09;
/// Control register 1 address
pub const REG_CONTROL_1: u8 = 0x0A;
/// Control register 2 address
pub const REG_CONTROL_2: u8 = 0x0B;
/// Register written with 0x06 during setup
pub const REG_29: u8 = 0x29;

/// Records operations performed on the mock interface
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Burst read starting at `address`
    Read {
        /// First register address
        address: u8,
        /// Number of bytes read
        len: usize,
    },
    /// Register write
    Write {
        /// Register address
        address: u8,
        /// Value that was written
        value: u8,
    },
}

/// Shared state for mock interface (uses interior mutability)
#[derive(Debug, Default)]
struct MockState {
    /// Simulated register values
    registers: HashMap<u8, u8>,

    /// Operations log for verification
    operations: Vec<Operation>,

    /// Failure injection flags
    fail_next_read: bool,
    fail_next_write: bool,
    fail_read_at: Option<u8>,
    fail_write_at: Option<u8>,
}

impl MockState {
    fn new() -> Self {
        let mut state = Self::default();
        // Data ready after power-up
        state.registers.insert(REG_STATUS, 0x01);
        state
    }

    /// Set magnetometer data (little-endian, X at 0x01)
    fn set_mag_data(&mut self, x: i16, y: i16, z: i16) {
        for (i, value) in [x, y, z].into_iter().enumerate() {
            let [lsb, msb] = value.to_le_bytes();
            let address = 0x01 + (i as u8) * 2;
            self.registers.insert(address, lsb);
            self.registers.insert(address + 1, msb);
        }
        // New sample sets DRDY
        let status = self.registers.get(&REG_STATUS).copied().unwrap_or(0);
        self.registers.insert(REG_STATUS, status | 0x01);
    }
}

/// Mock interface for testing
#[derive(Clone)]
pub struct MockInterface {
    state: Rc<RefCell<MockState>>,
}

impl MockInterface {
    /// Create a new mock interface with default register values
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(MockState::new())),
        }
    }

    /// Set a register value
    #[allow(dead_code)]
    pub fn set_register(&self, address: u8, value: u8) {
        self.state.borrow_mut().registers.insert(address, value);
    }

    /// Get a register value (0 if never written)
    pub fn get_register(&self, address: u8) -> u8 {
        self.state
            .borrow()
            .registers
            .get(&address)
            .copied()
            .unwrap_or(0)
    }

    /// Set magnetometer data (will be returned on next read)
    pub fn set_mag_data(&self, x: i16, y: i16, z: i16) {
        self.state.borrow_mut().set_mag_data(x, y, z);
    }

    /// Inject a read failure on the next read operation
    pub fn fail_next_read(&self) {
        self.state.borrow_mut().fail_next_read = true;
    }

    /// Inject a write failure on the next write operation
    pub fn fail_next_write(&self) {
        self.state.borrow_mut().fail_next_write = true;
    }

    /// Inject a read failure on the next read starting at `address`
    pub fn fail_read_at(&self, address: u8) {
        self.state.borrow_mut().fail_read_at = Some(address);
    }

    /// Inject a write failure on the next write to `address`
    pub fn fail_write_at(&self, address: u8) {
        self.state.borrow_mut().fail_write_at = Some(address);
    }

    /// Get the operations log
    pub fn operations(&self) -> Vec<Operation> {
        self.state.borrow().operations.clone()
    }

    /// Clear the operations log
    pub fn clear_operations(&self) {
        self.state.borrow_mut().operations.clear();
    }

    /// Addresses written, in order
    pub fn written_addresses(&self) -> Vec<u8> {
        self.state
            .borrow()
            .operations
            .iter()
            .filter_map(|op| match op {
                Operation::Write { address, .. } => Some(*address),
                Operation::Read { .. } => None,
            })
            .collect()
    }

    /// Reads performed, as (start address, length)
    pub fn reads(&self) -> Vec<(u8, usize)> {
        self.state
            .borrow()
            .operations
            .iter()
            .filter_map(|op| match op {
                Operation::Read { address, len } => Some((*address, *len)),
                Operation::Write { .. } => None,
            })
            .collect()
    }
}

/// Mock error type
#[derive(Debug, Clone, PartialEq)]
pub enum MockError {
    /// Simulated communication error (NACK)
    Communication,
}

impl RegisterInterface for MockInterface {
    type Error = MockError;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();

        // Check for injected failure
        if state.fail_next_read {
            state.fail_next_read = false;
            return Err(MockError::Communication);
        }
        if state.fail_read_at == Some(address) {
            state.fail_read_at = None;
            return Err(MockError::Communication);
        }

        state.operations.push(Operation::Read {
            address,
            len: read_data.len(),
        });

        for (i, byte) in read_data.iter_mut().enumerate() {
            let reg_addr = address.wrapping_add(i as u8);
            *byte = state.registers.get(&reg_addr).copied().unwrap_or(0);

            // Reading the status register clears DRDY
            if reg_addr == REG_STATUS {
                state.registers.insert(REG_STATUS, *byte & !0x01);
            }
        }

        Ok(())
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();

        // Check for injected failure
        if state.fail_next_write {
            state.fail_next_write = false;
            return Err(MockError::Communication);
        }
        if state.fail_write_at == Some(address) {
            state.fail_write_at = None;
            return Err(MockError::Communication);
        }

        for (i, &byte) in write_data.iter().enumerate() {
            let reg_addr = address.wrapping_add(i as u8);
            state.registers.insert(reg_addr, byte);
            state.operations.push(Operation::Write {
                address: reg_addr,
                value: byte,
            });
        }

        Ok(())
    }
}

impl Default for MockInterface {
    fn default() -> Self {
        Self::new()
    }
}
