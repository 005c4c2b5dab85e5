//! Simple assembler for LS-8 programs.
//!
//! Syntax:
//! ```text
//! ; Comment (or # Comment)
//! LOOP:              ; Define a label
//!     LDI R0,8       ; Register and immediate
//!     LDI R1,LOOP    ; Immediate taken from a label
//!     ADD R0,R1
//!     JMP R1
//!     HLT
//!
//!     DB 0x0A,10     ; Raw bytes
//!     DS Hello       ; Raw text
//! ```

use crate::cpu::decode::Opcode;
use crate::cpu::memory::MEMORY_SIZE;
use crate::cpu::registers::REGISTER_COUNT;
use std::collections::HashMap;
use thiserror::Error;

/// Assemble source code to program bytes.
pub fn assemble(source: &str) -> Result<Vec<u8>, AssemblerError> {
    let mut asm = Assembler::new();
    asm.assemble(source)
}

/// The assembler state.
struct Assembler {
    /// Symbol table (label -> address).
    symbols: HashMap<String, u8>,
    /// Label uses waiting for resolution: (output_index, label, source_line).
    pending: Vec<(usize, String, usize)>,
    /// Output bytes.
    output: Vec<u8>,
}

impl Assembler {
    fn new() -> Self {
        Self {
            symbols: HashMap::new(),
            pending: Vec::new(),
            output: Vec::new(),
        }
    }

    fn assemble(&mut self, source: &str) -> Result<Vec<u8>, AssemblerError> {
        for (line_num, line) in source.lines().enumerate() {
            self.process_line(line, line_num + 1)?;
        }

        if self.output.len() > MEMORY_SIZE {
            return Err(AssemblerError::ProgramTooLarge(self.output.len()));
        }

        self.resolve_references()?;

        Ok(std::mem::take(&mut self.output))
    }

    fn process_line(&mut self, line: &str, line_num: usize) -> Result<(), AssemblerError> {
        let line = match line.find(&[';', '#'][..]) {
            Some(idx) => &line[..idx],
            None => line,
        };
        let mut line = line.trim();

        if let Some((label, rest)) = line.split_once(':').filter(|(l, _)| is_identifier(l.trim())) {
            let label = label.trim().to_uppercase();
            let addr = self.current_addr(line_num)?;
            if self.symbols.insert(label.clone(), addr).is_some() {
                return Err(AssemblerError::SyntaxError {
                    line: line_num,
                    message: format!("label `{}` defined twice", label),
                });
            }
            line = rest.trim();
        }

        if line.is_empty() {
            return Ok(());
        }

        let (mnemonic, rest) = match line.split_once(char::is_whitespace) {
            Some((m, r)) => (m.to_uppercase(), r.trim()),
            None => (line.to_uppercase(), ""),
        };

        match mnemonic.as_str() {
            // Directives
            "DB" => {
                for operand in split_operands(rest) {
                    self.emit_value(operand, line_num)?;
                }
            }

            "DS" => {
                self.output.extend_from_slice(rest.as_bytes());
            }

            // Instructions
            _ => {
                let opcode = Opcode::from_mnemonic(&mnemonic).ok_or_else(|| {
                    AssemblerError::UnknownMnemonic { line: line_num, mnemonic: mnemonic.clone() }
                })?;
                self.process_instruction(opcode, rest, line_num)?;
            }
        }

        Ok(())
    }

    fn process_instruction(&mut self, opcode: Opcode, rest: &str, line_num: usize)
        -> Result<(), AssemblerError>
    {
        let operands = split_operands(rest);
        if operands.len() != opcode.operand_count() {
            return Err(AssemblerError::SyntaxError {
                line: line_num,
                message: format!(
                    "{} takes {} operand(s), found {}",
                    opcode.mnemonic(), opcode.operand_count(), operands.len()
                ),
            });
        }

        self.output.push(opcode as u8);
        for (i, operand) in operands.iter().enumerate() {
            if opcode == Opcode::Ldi && i == 1 {
                self.emit_value(operand, line_num)?;
            } else {
                let reg = parse_register(operand, line_num)?;
                self.output.push(reg);
            }
        }

        Ok(())
    }

    /// Emit a numeric byte, or a placeholder for a label.
    fn emit_value(&mut self, operand: &str, line_num: usize) -> Result<(), AssemblerError> {
        match parse_number(operand, line_num)? {
            Some(value) => self.output.push(value),
            None => {
                let label = operand.to_uppercase();
                if !is_identifier(&label) {
                    return Err(AssemblerError::SyntaxError {
                        line: line_num,
                        message: format!("invalid operand `{}`", operand),
                    });
                }
                self.pending.push((self.output.len(), label, line_num));
                self.output.push(0);
            }
        }
        Ok(())
    }

    fn current_addr(&self, line_num: usize) -> Result<u8, AssemblerError> {
        u8::try_from(self.output.len()).map_err(|_| AssemblerError::ValueOutOfRange {
            line: line_num,
            value: self.output.len() as i64,
        })
    }

    fn resolve_references(&mut self) -> Result<(), AssemblerError> {
        for (out_idx, label, line_num) in &self.pending {
            let addr = self.symbols.get(label).ok_or_else(|| AssemblerError::UndefinedLabel {
                line: *line_num,
                label: label.clone(),
            })?;
            self.output[*out_idx] = *addr;
        }
        Ok(())
    }
}

fn split_operands(rest: &str) -> Vec<&str> {
    rest.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_register(operand: &str, line_num: usize) -> Result<u8, AssemblerError> {
    let index = operand
        .strip_prefix(&['R', 'r'][..])
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|&n| (n as usize) < REGISTER_COUNT);

    index.ok_or_else(|| AssemblerError::SyntaxError {
        line: line_num,
        message: format!("expected register R0-R7, found `{}`", operand),
    })
}

/// Parse a decimal, `0x` hex or `0b` binary byte. `Ok(None)` if the
/// operand is not numeric at all.
fn parse_number(operand: &str, line_num: usize) -> Result<Option<u8>, AssemblerError> {
    let (digits, radix) = if let Some(hex) = operand.strip_prefix("0x").or_else(|| operand.strip_prefix("0X")) {
        (hex, 16)
    } else if let Some(bin) = operand.strip_prefix("0b").or_else(|| operand.strip_prefix("0B")) {
        (bin, 2)
    } else if operand.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        (operand, 10)
    } else {
        return Ok(None);
    };

    let value = i64::from_str_radix(digits, radix).map_err(|_| AssemblerError::SyntaxError {
        line: line_num,
        message: format!("invalid number `{}`", operand),
    })?;

    u8::try_from(value)
        .map(Some)
        .map_err(|_| AssemblerError::ValueOutOfRange { line: line_num, value })
}

/// Errors that can occur during assembly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblerError {
    #[error("syntax error on line {line}: {message}")]
    SyntaxError { line: usize, message: String },

    #[error("unknown mnemonic on line {line}: {mnemonic}")]
    UnknownMnemonic { line: usize, mnemonic: String },

    #[error("undefined label on line {line}: {label}")]
    UndefinedLabel { line: usize, label: String },

    #[error("value out of range on line {line}: {value}")]
    ValueOutOfRange { line: usize, value: i64 },

    #[error("program is {0} bytes, memory holds 256")]
    ProgramTooLarge(usize),
}
