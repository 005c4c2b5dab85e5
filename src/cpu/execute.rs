//! CPU execution engine for the LS-8.
//!
//! Implements the fetch-decode-execute cycle, interrupt delivery and all
//! instruction behaviors.

use std::io::Write;
use crate::cpu::{Memory, Registers};
use crate::cpu::alu::{self, AluOp, AluOutput, AluError};
use crate::cpu::decode::{self, Instruction, Opcode};
use crate::cpu::interrupt::{self, Clock, Interrupt, InterruptController, SystemClock};
use crate::cpu::memory::{MemoryError, KEY_BUFFER, VECTOR_TABLE};
use crate::cpu::registers::{Flags, RegisterError, IS, REGISTER_COUNT};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// CPU execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuState {
    /// CPU is running normally.
    Running,
    /// CPU has halted (executed HLT instruction).
    Halted,
    /// CPU stopped on a fatal error.
    Error,
}

/// What a handler did with the program counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PcUpdate {
    /// Move past the instruction.
    Advance,
    /// The handler picked the next PC.
    Jump(u8),
}

/// The LS-8 CPU.
#[derive(Clone)]
pub struct Cpu<C: Clock = SystemClock> {
    /// Register file, R0-R7.
    pub regs: Registers,
    /// Main memory.
    pub mem: Memory,
    /// Address of the next instruction.
    pub pc: u8,
    /// Comparison flags.
    pub fl: Flags,
    /// Interrupts enabled.
    pub ie: bool,
    /// Current execution state.
    pub state: CpuState,
    /// Instruction count.
    pub cycles: u64,
    interrupts: InterruptController<C>,
    last_instr: Option<Instruction>,
}

/// Serializable view of the architectural state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuSnapshot {
    pub pc: u8,
    pub fl: Flags,
    pub ie: bool,
    pub state: CpuState,
    pub cycles: u64,
    pub registers: [u8; REGISTER_COUNT],
}

impl Cpu<SystemClock> {
    /// Create a new CPU driven by the wall clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl<C: Clock> Cpu<C> {
    /// Create a new CPU with a custom time source.
    pub fn with_clock(clock: C) -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            pc: 0,
            fl: Flags::empty(),
            ie: true,
            state: CpuState::Running,
            cycles: 0,
            interrupts: InterruptController::new(clock),
            last_instr: None,
        }
    }

    /// Reset the CPU to its power-on state.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.mem.clear();
        self.pc = 0;
        self.fl = Flags::empty();
        self.ie = true;
        self.state = CpuState::Running;
        self.cycles = 0;
        self.interrupts.reset();
        self.last_instr = None;
    }

    /// Load a program image at address 0.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), MemoryError> {
        self.mem.load_program(0, program)
    }

    /// Run one iteration of the main loop: timer check, interrupt
    /// delivery, then one instruction.
    ///
    /// Returns the instruction that was executed. Any error is fatal and
    /// leaves the CPU in [`CpuState::Error`].
    pub fn step(&mut self, out: &mut dyn Write) -> Result<Instruction, CpuError> {
        if self.state != CpuState::Running {
            return Err(CpuError::NotRunning(self.state));
        }

        match self.cycle(out) {
            Ok(instr) => {
                self.cycles += 1;
                self.last_instr = Some(instr);
                Ok(instr)
            }
            Err(e) => {
                self.state = CpuState::Error;
                Err(e)
            }
        }
    }

    /// Run until halt or error.
    ///
    /// Returns the number of instructions executed.
    pub fn run(&mut self, out: &mut dyn Write) -> Result<u64, CpuError> {
        let start_cycles = self.cycles;

        while self.state == CpuState::Running {
            self.step(out)?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Run for at most `max_cycles` instructions.
    pub fn run_limited(&mut self, out: &mut dyn Write, max_cycles: u64) -> Result<u64, CpuError> {
        let start_cycles = self.cycles;
        let limit = self.cycles + max_cycles;

        while self.state == CpuState::Running && self.cycles < limit {
            self.step(out)?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Set a line in the IS register. Delivered on the next step if
    /// masked in and interrupts are enabled.
    pub fn raise_interrupt(&mut self, line: Interrupt) {
        let is = self.regs.is() | line.mask();
        self.regs.set_is(is);
    }

    /// Deliver a key press: store it in the keyboard buffer and raise
    /// the keyboard line.
    pub fn press_key(&mut self, key: u8) -> Result<(), CpuError> {
        self.mem.write(KEY_BUFFER as usize, key)?;
        self.raise_interrupt(Interrupt::Keyboard);
        Ok(())
    }

    fn cycle(&mut self, out: &mut dyn Write) -> Result<Instruction, CpuError> {
        let is = self.interrupts.poll_timer(self.regs.is());
        self.regs.set_is(is);
        self.service_interrupts()?;

        // Fetch. Both operand bytes are read whether used or not.
        let pc = self.pc as usize;
        let bytes = [self.mem.read(pc)?, self.mem.read(pc + 1)?, self.mem.read(pc + 2)?];

        // Decode
        let instr = decode::decode(bytes).map_err(|_| CpuError::InvalidInstruction {
            opcode: bytes[0],
            addr: self.pc,
        })?;

        if log::log_enabled!(log::Level::Trace) {
            self.trace(bytes);
        }

        // Execute
        let update = self.execute(instr, out)?;
        debug_assert!(update == PcUpdate::Advance || instr.opcode.sets_pc());
        self.pc = match update {
            PcUpdate::Advance => {
                u8::try_from(pc + instr.size()).map_err(|_| CpuError::ProgramCounterOverflow)?
            }
            PcUpdate::Jump(addr) => addr,
        };

        Ok(instr)
    }

    /// Deliver at most one pending interrupt.
    fn service_interrupts(&mut self) -> Result<(), CpuError> {
        if !self.ie {
            return Ok(());
        }

        let Some(line) = interrupt::pending(self.regs.im(), self.regs.is()) else {
            return Ok(());
        };

        self.ie = false;
        self.regs.set_is(self.regs.is() & !(1 << line));

        self.push(self.pc)?;
        self.push(self.fl.bits())?;
        for reg in 0..=IS {
            let value = self.regs.get(reg)?;
            self.push(value)?;
        }

        let vector = self.mem.read(VECTOR_TABLE as usize + line as usize)?;
        log::debug!("interrupt {} from PC={:#04x} to vector {:#04x}", line, self.pc, vector);
        self.pc = vector;

        Ok(())
    }

    /// Execute a decoded instruction.
    fn execute(&mut self, instr: Instruction, out: &mut dyn Write) -> Result<PcUpdate, CpuError> {
        let Instruction { opcode, a, b } = instr;

        let update = match opcode {
            // ==================== ALU ====================

            Opcode::Add => self.alu(AluOp::Add, a, b)?,
            Opcode::Sub => self.alu(AluOp::Sub, a, b)?,
            Opcode::Mul => self.alu(AluOp::Mul, a, b)?,
            Opcode::Div => self.alu(AluOp::Div, a, b)?,
            Opcode::Or => self.alu(AluOp::Or, a, b)?,
            Opcode::Cmp => self.alu(AluOp::Cmp, a, b)?,
            Opcode::Inc => self.alu(AluOp::Inc, a, a)?,
            Opcode::Dec => self.alu(AluOp::Dec, a, a)?,

            // ==================== Data Transfer ====================

            Opcode::Ldi => {
                self.regs.set(a, b)?;
                PcUpdate::Advance
            }

            Opcode::Ld => {
                let addr = self.regs.get(b)?;
                let value = self.mem.read(addr as usize)?;
                self.regs.set(a, value)?;
                PcUpdate::Advance
            }

            Opcode::St => {
                let addr = self.regs.get(a)?;
                let value = self.regs.get(b)?;
                self.mem.write(addr as usize, value)?;
                PcUpdate::Advance
            }

            Opcode::Push => {
                let value = self.regs.get(a)?;
                self.push(value)?;
                PcUpdate::Advance
            }

            Opcode::Pop => {
                let value = self.pop()?;
                self.regs.set(a, value)?;
                PcUpdate::Advance
            }

            // ==================== I/O ====================

            Opcode::Prn => {
                let value = self.regs.get(a)?;
                writeln!(out, "{}", value)?;
                out.flush()?;
                PcUpdate::Advance
            }

            Opcode::Pra => {
                let value = self.regs.get(a)?;
                write!(out, "{}", char::from(value))?;
                out.flush()?;
                PcUpdate::Advance
            }

            // ==================== Control Flow ====================

            Opcode::Call => {
                let target = self.regs.get(a)?;
                let ret = self.pc.checked_add(2).ok_or(CpuError::ProgramCounterOverflow)?;
                self.push(ret)?;
                PcUpdate::Jump(target)
            }

            Opcode::Ret => PcUpdate::Jump(self.pop()?),

            Opcode::Iret => {
                for reg in (0..=IS).rev() {
                    let value = self.pop()?;
                    self.regs.set(reg, value)?;
                }
                self.fl = Flags::from_bits_truncate(self.pop()?);
                let pc = self.pop()?;
                self.ie = true;
                log::debug!("iret to PC={:#04x}", pc);
                PcUpdate::Jump(pc)
            }

            Opcode::Jmp => PcUpdate::Jump(self.regs.get(a)?),

            Opcode::Jeq => {
                if self.fl.contains(Flags::EQ) {
                    PcUpdate::Jump(self.regs.get(a)?)
                } else {
                    PcUpdate::Advance
                }
            }

            Opcode::Jne => {
                if !self.fl.contains(Flags::EQ) {
                    PcUpdate::Jump(self.regs.get(a)?)
                } else {
                    PcUpdate::Advance
                }
            }

            Opcode::Hlt => {
                self.state = CpuState::Halted;
                PcUpdate::Advance
            }
        };

        Ok(update)
    }

    /// Run an ALU operation on registers `a` and `b`.
    fn alu(&mut self, op: AluOp, a: u8, b: u8) -> Result<PcUpdate, CpuError> {
        let dest = self.regs.get(a)?;
        let src = self.regs.get(b)?;

        match alu::execute(op, dest, src) {
            Ok(AluOutput::Register(value)) => self.regs.set(a, value)?,
            Ok(AluOutput::Flags(flags)) => {
                self.fl.remove(Flags::all());
                self.fl.insert(flags);
            }
            Err(AluError::DivisionByZero) => {
                return Err(CpuError::DivisionByZero { addr: self.pc });
            }
        }

        Ok(PcUpdate::Advance)
    }

    fn trace(&self, bytes: [u8; 3]) {
        let regs = self.regs
            .as_array()
            .iter()
            .map(|r| format!("{:02X}", r))
            .collect::<Vec<_>>()
            .join(" ");
        log::trace!(
            "{:02X} | {:02X} | {} | {:02X} {:02X} {:02X} | {}",
            self.pc, self.fl.bits(), self.ie as u8, bytes[0], bytes[1], bytes[2], regs
        );
    }

    /// Serializable copy of the architectural state.
    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            pc: self.pc,
            fl: self.fl,
            ie: self.ie,
            state: self.state,
            cycles: self.cycles,
            registers: self.regs.as_array(),
        }
    }

    /// Get the last executed instruction.
    pub fn last_instruction(&self) -> Option<Instruction> {
        self.last_instr
    }

    /// Check if the CPU is halted.
    pub fn is_halted(&self) -> bool {
        self.state == CpuState::Halted
    }

    /// Check if the CPU is running.
    pub fn is_running(&self) -> bool {
        self.state == CpuState::Running
    }
}

impl Default for Cpu<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> std::fmt::Debug for Cpu<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("state", &self.state)
            .field("cycles", &self.cycles)
            .field("pc", &self.pc)
            .field("fl", &self.fl)
            .field("ie", &self.ie)
            .field("regs", &self.regs)
            .finish()
    }
}

/// Errors that can occur during CPU execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("CPU not running: {0:?}")]
    NotRunning(CpuState),

    #[error("invalid instruction {opcode:#04x} at address {addr:#04x}")]
    InvalidInstruction { opcode: u8, addr: u8 },

    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("register error: {0}")]
    Register(#[from] RegisterError),

    #[error("division by zero at address {addr:#04x}")]
    DivisionByZero { addr: u8 },

    #[error("stack overflow (SP would drop below 0x00)")]
    StackOverflow,

    #[error("stack underflow (SP would pass 0xff)")]
    StackUnderflow,

    #[error("program counter ran past the end of memory")]
    ProgramCounterOverflow,

    #[error("output error: {0}")]
    Output(String),
}

impl From<std::io::Error> for CpuError {
    fn from(e: std::io::Error) -> Self {
        CpuError::Output(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::decode::Opcode::*;
    use crate::cpu::interrupt::{ManualClock, TIMER_PERIOD};
    use crate::cpu::registers::{IM, SP, SP_INIT};

    fn make_program(instructions: &[(Opcode, u8, u8)]) -> Vec<u8> {
        instructions
            .iter()
            .flat_map(|&(op, a, b)| Instruction::new(op, a, b).encode())
            .collect()
    }

    fn run_program(program: &[u8]) -> (Cpu<ManualClock>, String) {
        let mut cpu = Cpu::with_clock(ManualClock::new());
        cpu.load_program(program).unwrap();
        let mut out: Vec<u8> = Vec::new();
        cpu.run(&mut out).unwrap();
        (cpu, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_cpu_halt() {
        let (cpu, _) = run_program(&make_program(&[(Hlt, 0, 0)]));
        assert!(cpu.is_halted());
        assert_eq!(cpu.cycles, 1);
    }

    #[test]
    fn test_print8() {
        let program = make_program(&[(Ldi, 0, 8), (Prn, 0, 0), (Hlt, 0, 0)]);
        let (_, out) = run_program(&program);
        assert_eq!(out, "8\n");
    }

    #[test]
    fn test_add_and_print() {
        let program = make_program(&[
            (Ldi, 0, 8),
            (Ldi, 1, 9),
            (Add, 0, 1),
            (Prn, 0, 0),
            (Hlt, 0, 0),
        ]);
        let (cpu, out) = run_program(&program);
        assert_eq!(out, "17\n");
        assert_eq!(cpu.cycles, 5);
    }

    #[test]
    fn test_pra() {
        let program = make_program(&[(Ldi, 2, b'A'), (Pra, 2, 0), (Pra, 2, 0), (Hlt, 0, 0)]);
        let (_, out) = run_program(&program);
        assert_eq!(out, "AA");
    }

    #[test]
    fn test_load_store() {
        let program = make_program(&[
            (Ldi, 0, 0x80),
            (Ldi, 1, 42),
            (St, 0, 1),
            (Ld, 2, 0),
            (Hlt, 0, 0),
        ]);
        let (cpu, _) = run_program(&program);
        assert_eq!(cpu.mem.read(0x80).unwrap(), 42);
        assert_eq!(cpu.regs.get(2).unwrap(), 42);
    }

    #[test]
    fn test_call_ret() {
        // 0: LDI R1,8   3: CALL R1   5: HLT   6: (pad)   8: LDI R0,7   11: RET
        let mut program = make_program(&[(Ldi, 1, 8), (Call, 1, 0), (Hlt, 0, 0)]);
        program.extend([0, 0]);
        program.extend(make_program(&[(Ldi, 0, 7), (Ret, 0, 0)]));

        let (cpu, _) = run_program(&program);
        assert!(cpu.is_halted());
        assert_eq!(cpu.regs.get(0).unwrap(), 7);
        assert_eq!(cpu.pc, 6);
        assert_eq!(cpu.regs.sp(), SP_INIT);
    }

    #[test]
    fn test_jeq_taken_and_not_taken() {
        // 0: LDI R0,1  3: LDI R1,2  6: LDI R2,17
        // 9: CMP R0,R1  12: JEQ R2  14: PRN R0  16: HLT  17: PRN R1  19: HLT
        let program = make_program(&[
            (Ldi, 0, 1),
            (Ldi, 1, 2),
            (Ldi, 2, 17),
            (Cmp, 0, 1),
            (Jeq, 2, 0),
            (Prn, 0, 0),
            (Hlt, 0, 0),
            (Prn, 1, 0),
            (Hlt, 0, 0),
        ]);
        let (cpu, out) = run_program(&program);
        assert_eq!(out, "1\n");
        assert_eq!(cpu.fl, Flags::LT);

        // Same program with equal values takes the branch.
        let mut equal = program.clone();
        equal[5] = 1;
        let (_, out) = run_program(&equal);
        assert_eq!(out, "1\n");
        let mut equal = program;
        equal[2] = 2;
        let (_, out) = run_program(&equal);
        assert_eq!(out, "2\n");
    }

    #[test]
    fn test_jne_falls_through_on_equal() {
        // 0: LDI R0,5  3: LDI R2,13  6: CMP R0,R0  9: JNE R2  11: HLT
        let program = make_program(&[
            (Ldi, 0, 5),
            (Ldi, 2, 13),
            (Cmp, 0, 0),
            (Jne, 2, 0),
            (Hlt, 0, 0),
        ]);
        let (cpu, _) = run_program(&program);
        assert_eq!(cpu.pc, 12);
    }

    #[test]
    fn test_invalid_instruction() {
        let mut cpu = Cpu::with_clock(ManualClock::new());
        cpu.load_program(&[0xFF]).unwrap();

        let err = cpu.run(&mut Vec::<u8>::new()).unwrap_err();
        assert_eq!(err, CpuError::InvalidInstruction { opcode: 0xFF, addr: 0 });
        assert_eq!(cpu.state, CpuState::Error);
        assert_eq!(cpu.cycles, 0);
        assert_eq!(cpu.step(&mut Vec::<u8>::new()), Err(CpuError::NotRunning(CpuState::Error)));
    }

    #[test]
    fn test_division_by_zero() {
        let program = make_program(&[(Ldi, 0, 10), (Div, 0, 1), (Hlt, 0, 0)]);
        let mut cpu = Cpu::with_clock(ManualClock::new());
        cpu.load_program(&program).unwrap();

        let err = cpu.run(&mut Vec::<u8>::new()).unwrap_err();
        assert_eq!(err, CpuError::DivisionByZero { addr: 3 });
    }

    #[test]
    fn test_invalid_register_operand() {
        let program = make_program(&[(Ldi, 8, 1)]);
        let mut cpu = Cpu::with_clock(ManualClock::new());
        cpu.load_program(&program).unwrap();

        let err = cpu.run(&mut Vec::<u8>::new()).unwrap_err();
        assert_eq!(err, CpuError::Register(RegisterError::InvalidRegister(8)));
    }

    #[test]
    fn test_fetch_past_end_of_memory() {
        let mut cpu = Cpu::with_clock(ManualClock::new());
        cpu.pc = 0xFE;
        cpu.mem.write(0xFE, Hlt as u8).unwrap();

        let err = cpu.step(&mut Vec::<u8>::new()).unwrap_err();
        assert_eq!(err, CpuError::Memory(MemoryError::AddressOutOfRange(0x100)));
    }

    #[test]
    fn test_pc_advance_past_end_of_memory() {
        // ADD is 3 bytes, so the next PC would be 0x100.
        let mut cpu = Cpu::with_clock(ManualClock::new());
        cpu.mem.load_program(0xFD, &make_program(&[(Add, 0, 1)])).unwrap();
        cpu.pc = 0xFD;

        let err = cpu.step(&mut Vec::<u8>::new()).unwrap_err();
        assert_eq!(err, CpuError::ProgramCounterOverflow);
        assert_eq!(cpu.state, CpuState::Error);
        assert_eq!(cpu.pc, 0xFD);
    }

    #[test]
    fn test_stack_overflow_during_delivery() {
        let mut cpu = Cpu::with_clock(ManualClock::new());
        cpu.load_program(&make_program(&[(Hlt, 0, 0)])).unwrap();
        cpu.regs.set_sp(3);
        cpu.regs.set(IM, 1).unwrap();
        cpu.raise_interrupt(Interrupt::Timer);

        // PC, FL and R0 fit; R1 does not.
        let err = cpu.step(&mut Vec::<u8>::new()).unwrap_err();
        assert_eq!(err, CpuError::StackOverflow);
        assert_eq!(cpu.state, CpuState::Error);
        assert_eq!(cpu.regs.sp(), 0);
        assert_eq!(cpu.cycles, 0);
    }

    #[test]
    fn test_last_instruction() {
        let mut cpu = Cpu::with_clock(ManualClock::new());
        cpu.load_program(&make_program(&[(Ldi, 0, 8), (Hlt, 0, 0)])).unwrap();
        assert_eq!(cpu.last_instruction(), None);

        let mut out = Vec::<u8>::new();
        cpu.step(&mut out).unwrap();
        assert_eq!(cpu.last_instruction(), Some(Instruction::new(Ldi, 0, 8)));
        cpu.step(&mut out).unwrap();
        assert_eq!(cpu.last_instruction().map(|i| i.opcode), Some(Hlt));

        cpu.reset();
        assert_eq!(cpu.last_instruction(), None);
    }

    #[test]
    fn test_timer_interrupt_delivery() {
        let clock = ManualClock::new();
        let mut cpu = Cpu::with_clock(clock.clone());

        // Main: LDI R5,1 (unmask timer); spin with JMP R4 at 6.
        // Handler at 0x20: LDI R0,65; PRA R0; HLT
        let main = make_program(&[(Ldi, IM, 1), (Ldi, 4, 6), (Jmp, 4, 0)]);
        cpu.load_program(&main).unwrap();
        let handler = make_program(&[(Ldi, 0, b'A'), (Pra, 0, 0), (Hlt, 0, 0)]);
        cpu.mem.load_program(0x20, &handler).unwrap();
        cpu.mem.write(VECTOR_TABLE as usize, 0x20).unwrap();

        let mut out: Vec<u8> = Vec::new();
        cpu.run_limited(&mut out, 10).unwrap();
        assert!(cpu.is_running());
        assert!(out.is_empty());

        clock.advance(TIMER_PERIOD);
        cpu.run_limited(&mut out, 10).unwrap();
        assert!(cpu.is_halted());
        assert_eq!(out, b"A");
        assert!(!cpu.ie);
        // PC, FL and R0-R6 saved.
        assert_eq!(cpu.regs.get(SP).unwrap(), SP_INIT - 9);
    }

    #[test]
    fn test_masked_interrupt_not_delivered() {
        let mut cpu = Cpu::with_clock(ManualClock::new());
        cpu.load_program(&make_program(&[(Hlt, 0, 0)])).unwrap();
        cpu.raise_interrupt(Interrupt::Keyboard);

        cpu.run(&mut Vec::<u8>::new()).unwrap();
        assert!(cpu.ie);
        assert_eq!(cpu.regs.is(), Interrupt::Keyboard.mask());
        assert_eq!(cpu.regs.sp(), SP_INIT);
    }

    #[test]
    fn test_press_key() {
        let mut cpu = Cpu::with_clock(ManualClock::new());
        cpu.press_key(b'x').unwrap();
        assert_eq!(cpu.mem.read(KEY_BUFFER as usize).unwrap(), b'x');
        assert_eq!(cpu.regs.is(), 0b10);
    }

    #[test]
    fn test_reset() {
        let (mut cpu, _) = run_program(&make_program(&[(Ldi, 0, 8), (Hlt, 0, 0)]));
        cpu.reset();
        assert!(cpu.is_running());
        assert_eq!(cpu.pc, 0);
        assert_eq!(cpu.cycles, 0);
        assert_eq!(cpu.regs, Registers::new());
        assert!(cpu.mem.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_snapshot_serializes() {
        let (cpu, _) = run_program(&make_program(&[(Ldi, 0, 8), (Hlt, 0, 0)]));
        let json = serde_json::to_string(&cpu.snapshot()).unwrap();
        let back: CpuSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cpu.snapshot());
        assert_eq!(back.registers[0], 8);
        assert_eq!(back.state, CpuState::Halted);
    }
}
