//! CPU emulation for the LS-8.
//!
//! This module implements the complete LS-8 architecture:
//! - 256 bytes of memory, interrupt vectors at `0xF8..=0xFF`
//! - 8 registers, R5-R7 reserved as IM, IS and SP
//! - 22-instruction set with one to three byte encodings
//! - timer and keyboard interrupts

pub mod memory;
pub mod registers;
pub mod alu;
pub mod decode;
pub mod interrupt;
pub mod execute;
mod stack;

pub use memory::{Memory, MemoryError};
pub use registers::{Flags, Registers, RegisterError};
pub use decode::{Instruction, Opcode, DecodeError};
pub use interrupt::{Clock, Interrupt, ManualClock, SystemClock};
pub use execute::{Cpu, CpuError, CpuSnapshot, CpuState};
