//! # LS-8 Emulator
//!
//! An emulator for the LS-8, a small 8-bit byte-code CPU.
//!
//! The machine has 256 bytes of memory, eight registers (three of them
//! reserved for the interrupt mask, interrupt status and stack pointer),
//! a compare flag register and two interrupt sources: a one second timer
//! and the keyboard.

pub mod cpu;
pub mod asm;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use cpu::{Cpu, CpuState, CpuError, CpuSnapshot, Memory, Registers, Flags, Instruction, Opcode};
pub use cpu::{Clock, Interrupt, ManualClock, SystemClock};
pub use asm::{assemble, disassemble, AssemblerError, ImageError, load_image, parse_image, save_image};

#[cfg(feature = "tui")]
pub use tui::run_debugger;
