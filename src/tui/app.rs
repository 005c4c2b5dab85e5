//! Debugger application state and logic.

use crate::Cpu;
use crate::asm::disasm::disassemble_instruction;
use crate::cpu::memory::MEMORY_SIZE;
use std::collections::HashSet;

/// Debugger application state.
pub struct DebuggerApp {
    /// The CPU being debugged.
    pub cpu: Cpu,
    /// Original program for reference.
    pub program: Vec<u8>,
    /// Breakpoints (by address).
    pub breakpoints: HashSet<u8>,
    /// Is the debugger running continuously?
    pub running: bool,
    /// Are key presses forwarded to the machine?
    pub input_mode: bool,
    /// Should we quit?
    pub should_quit: bool,
    /// Status message to display.
    pub status: String,
    /// Console output produced by PRN/PRA.
    pub output: Vec<u8>,
    /// Memory view scroll offset (in 16-byte rows).
    pub mem_scroll: usize,
}

impl DebuggerApp {
    /// Create a new debugger with a loaded program.
    pub fn new(program: Vec<u8>) -> Self {
        let mut cpu = Cpu::new();
        let status = match cpu.load_program(&program) {
            Ok(()) => "Ready. Press 's' to step, 'r' to run, 'q' to quit.".to_string(),
            Err(e) => format!("Load failed: {}", e),
        };

        Self {
            cpu,
            program,
            breakpoints: HashSet::new(),
            running: false,
            input_mode: false,
            should_quit: false,
            status,
            output: Vec::new(),
            mem_scroll: 0,
        }
    }

    /// Step one instruction.
    pub fn step(&mut self) {
        if !self.cpu.is_running() {
            self.status = format!("CPU stopped: {:?}", self.cpu.state);
            self.running = false;
            return;
        }

        let pc = self.cpu.pc;
        match self.cpu.step(&mut self.output) {
            Ok(instr) => {
                self.status = format!("PC={:02X}: {}", pc, instr);
            }
            Err(e) => {
                self.status = format!("Error: {}", e);
                self.running = false;
            }
        }
    }

    /// Run until halt, breakpoint, or error.
    pub fn run(&mut self) {
        self.running = true;
        self.status = "Running...".into();
    }

    /// Run one iteration of continuous execution.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }

        if !self.cpu.is_running() {
            self.running = false;
            self.status = match self.cpu.last_instruction() {
                Some(instr) => format!("Stopped after {} cycles, last {}", self.cpu.cycles, instr),
                None => format!("Stopped after {} cycles", self.cpu.cycles),
            };
            return;
        }

        let pc = self.cpu.pc;
        if self.breakpoints.contains(&pc) {
            self.running = false;
            self.status = format!("Breakpoint at PC={:02X}", pc);
            return;
        }

        self.step();
    }

    /// Toggle breakpoint at current PC.
    pub fn toggle_breakpoint(&mut self) {
        let pc = self.cpu.pc;
        if self.breakpoints.remove(&pc) {
            self.status = format!("Removed breakpoint at PC={:02X}", pc);
        } else {
            self.breakpoints.insert(pc);
            self.status = format!("Set breakpoint at PC={:02X}", pc);
        }
    }

    /// Forward a key press to the machine as a keyboard interrupt.
    pub fn send_key(&mut self, key: char) {
        let Ok(byte) = u8::try_from(key) else {
            self.status = format!("Key {:?} is not a single byte", key);
            return;
        };
        match self.cpu.press_key(byte) {
            Ok(()) => self.status = format!("Key {:?} -> keyboard interrupt", key),
            Err(e) => self.status = format!("Error: {}", e),
        }
    }

    /// Reset CPU to initial state.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.output.clear();
        self.running = false;
        self.status = match self.cpu.load_program(&self.program) {
            Ok(()) => "Reset. Ready.".into(),
            Err(e) => format!("Load failed: {}", e),
        };
    }

    /// Get disassembly starting a little before the current PC.
    ///
    /// Lines before PC are single bytes since instruction boundaries
    /// behind PC are unknown.
    pub fn get_disassembly(&self, lines: usize) -> Vec<(u8, String, bool)> {
        let mem = self.cpu.mem.as_slice();
        let pc = self.cpu.pc as usize;
        let back = (lines / 4).min(pc);
        let mut result = Vec::with_capacity(lines);

        for addr in pc - back..pc {
            result.push((addr as u8, format!("{:02X}", mem[addr]), false));
        }

        let mut addr = pc;
        while result.len() < lines && addr < MEMORY_SIZE {
            let text = disassemble_instruction(&mem[addr..]);
            let size = crate::cpu::Opcode::from_byte(mem[addr]).map_or(1, |op| op.size());
            result.push((addr as u8, text, addr == pc));
            addr += size;
        }

        result
    }
}

/// Run the debugger with a program.
pub fn run_debugger(program: Vec<u8>) -> std::io::Result<()> {
    use crossterm::{
        event::{self, Event, KeyCode, KeyEventKind},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    };
    use ratatui::prelude::*;
    use std::io::stdout;
    use std::time::Duration;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = DebuggerApp::new(program);

    loop {
        terminal.draw(|frame| {
            super::ui::draw(frame, &app);
        })?;

        // Poll briefly while running so the machine keeps moving.
        let timeout = if app.running { Duration::from_millis(1) } else { Duration::from_millis(50) };
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if app.input_mode {
                        match key.code {
                            KeyCode::Esc => {
                                app.input_mode = false;
                                app.status = "Input mode off.".into();
                            }
                            KeyCode::Enter => app.send_key('\n'),
                            KeyCode::Char(c) => app.send_key(c),
                            _ => {}
                        }
                    } else {
                        match key.code {
                            KeyCode::Char('q') => app.should_quit = true,
                            KeyCode::Char('s') => {
                                app.running = false;
                                app.step();
                            }
                            KeyCode::Char('r') => app.run(),
                            KeyCode::Char('p') => {
                                app.running = false;
                                app.status = "Paused.".into();
                            }
                            KeyCode::Char('b') => app.toggle_breakpoint(),
                            KeyCode::Char('x') => app.reset(),
                            KeyCode::Char('i') => {
                                app.input_mode = true;
                                app.status = "Input mode: keys go to the machine, Esc to leave.".into();
                            }
                            KeyCode::Up => {
                                app.mem_scroll = app.mem_scroll.saturating_sub(1);
                            }
                            KeyCode::Down => {
                                if app.mem_scroll < MEMORY_SIZE / 16 - 1 {
                                    app.mem_scroll += 1;
                                }
                            }
                            _ => {}
                        }
                    }
                }
            }
        }

        if app.running {
            app.tick();
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> DebuggerApp {
        // LDI R0,8; PRN R0; HLT
        DebuggerApp::new(vec![0x82, 0, 8, 0x47, 0, 0x01])
    }

    #[test]
    fn test_step_collects_output() {
        let mut app = app();
        app.step();
        app.step();
        assert_eq!(app.output, b"8\n");
        assert!(app.status.contains("PRN R0"));
    }

    #[test]
    fn test_breakpoint_stops_run() {
        let mut app = app();
        app.step();
        app.toggle_breakpoint();
        app.reset();
        app.run();
        app.tick();
        app.tick();
        assert!(!app.running);
        assert_eq!(app.cpu.pc, 3);
        assert!(app.status.contains("Breakpoint"));
    }

    #[test]
    fn test_run_reports_last_instruction() {
        let mut app = app();
        app.run();
        for _ in 0..4 {
            app.tick();
        }
        assert!(!app.running);
        assert_eq!(app.status, "Stopped after 3 cycles, last HLT");
    }

    #[test]
    fn test_reset_reports_load_failure() {
        let mut app = DebuggerApp::new(vec![0x01; MEMORY_SIZE + 1]);
        assert!(app.status.starts_with("Load failed"));

        app.reset();
        assert!(app.status.starts_with("Load failed"));
        assert!(app.cpu.mem.as_slice().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_send_key() {
        let mut app = app();
        app.send_key('z');
        assert_eq!(app.cpu.mem.read(0xF4).unwrap(), b'z');
        assert_eq!(app.cpu.regs.is(), 0b10);
    }

    #[test]
    fn test_disassembly_marks_pc() {
        let mut app = app();
        app.step();
        let lines = app.get_disassembly(8);
        let current: Vec<_> = lines.iter().filter(|(_, _, cur)| *cur).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].0, 3);
        assert_eq!(current[0].1, "PRN R0");
    }
}
