//! TUI debugger for the LS-8 emulator.
//!
//! Provides an interactive terminal-based debugger with:
//! - Register, flag and interrupt-enable view
//! - Memory hex view with PC/SP highlighting
//! - Step/run/breakpoint controls
//! - Keyboard input forwarded as keyboard interrupts

mod app;
mod ui;

pub use app::{DebuggerApp, run_debugger};
