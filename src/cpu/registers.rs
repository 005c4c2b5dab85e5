//! LS-8 register file and flags.
//!
//! The LS-8 has 8 eight-bit general purpose registers, three of which
//! have fixed roles:
//! - R5: IM, the interrupt mask
//! - R6: IS, the interrupt status
//! - R7: SP, the stack pointer

use bitflags::bitflags;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Number of registers in the file.
pub const REGISTER_COUNT: usize = 8;

/// Interrupt mask register.
pub const IM: u8 = 5;
/// Interrupt status register.
pub const IS: u8 = 6;
/// Stack pointer register.
pub const SP: u8 = 7;

/// Initial value of the stack pointer (empty stack).
pub const SP_INIT: u8 = 0xF4;

bitflags! {
    /// Result of the most recent `CMP`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub struct Flags: u8 {
        /// dest == src
        const EQ = 0b001;
        /// dest > src
        const GT = 0b010;
        /// dest < src
        const LT = 0b100;
    }
}

/// The LS-8 register file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    slots: [u8; REGISTER_COUNT],
}

impl Registers {
    /// Create a new register file: all zero except SP.
    pub fn new() -> Self {
        let mut slots = [0; REGISTER_COUNT];
        slots[SP as usize] = SP_INIT;
        Self { slots }
    }

    /// Reset to power-on values.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Read a register by index.
    #[inline]
    pub fn get(&self, reg: u8) -> Result<u8, RegisterError> {
        self.slots
            .get(reg as usize)
            .copied()
            .ok_or(RegisterError::InvalidRegister(reg))
    }

    /// Write a register by index.
    #[inline]
    pub fn set(&mut self, reg: u8, value: u8) -> Result<(), RegisterError> {
        let slot = self.slots
            .get_mut(reg as usize)
            .ok_or(RegisterError::InvalidRegister(reg))?;
        *slot = value;
        Ok(())
    }

    /// Interrupt mask (R5).
    pub fn im(&self) -> u8 {
        self.slots[IM as usize]
    }

    /// Interrupt status (R6).
    pub fn is(&self) -> u8 {
        self.slots[IS as usize]
    }

    pub fn set_is(&mut self, value: u8) {
        self.slots[IS as usize] = value;
    }

    /// Stack pointer (R7).
    pub fn sp(&self) -> u8 {
        self.slots[SP as usize]
    }

    pub fn set_sp(&mut self, value: u8) {
        self.slots[SP as usize] = value;
    }

    /// All eight registers, R0 first.
    pub fn as_array(&self) -> [u8; REGISTER_COUNT] {
        self.slots
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors raised by register accesses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error("invalid register R{0} (expected R0-R7)")]
    InvalidRegister(u8),
}
