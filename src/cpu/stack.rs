//! Stack primitives.
//!
//! The stack grows down from `SP_INIT`. `push` decrements SP and then
//! writes, `pop` reads and then increments. Calls and interrupt context
//! switches go through these two functions only.

use crate::cpu::execute::{Cpu, CpuError};
use crate::cpu::interrupt::Clock;

impl<C: Clock> Cpu<C> {
    /// Push a byte onto the stack.
    pub fn push(&mut self, value: u8) -> Result<(), CpuError> {
        let sp = self.regs.sp().checked_sub(1).ok_or(CpuError::StackOverflow)?;
        self.regs.set_sp(sp);
        self.mem.write(sp as usize, value)?;
        Ok(())
    }

    /// Pop a byte off the stack.
    pub fn pop(&mut self) -> Result<u8, CpuError> {
        let sp = self.regs.sp();
        let value = self.mem.read(sp as usize)?;
        let next = sp.checked_add(1).ok_or(CpuError::StackUnderflow)?;
        self.regs.set_sp(next);
        Ok(value)
    }
}
