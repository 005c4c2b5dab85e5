//! Program image tooling for the LS-8.
//!
//! This module provides:
//! - The binary-text image format (`.ls8`) the CPU loads from
//! - A simple assembler (text → image bytes)
//! - A disassembler (image bytes → readable text)

pub mod assembler;
pub mod disasm;
pub mod image;

pub use assembler::{assemble, AssemblerError};
pub use disasm::{disassemble, disassemble_instruction};
pub use image::{format_image, load_image, parse_image, save_image, ImageError};
