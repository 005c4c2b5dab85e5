//! Disassembler for LS-8 programs.
//!
//! Converts program bytes back to readable assembly.

use crate::cpu::decode::decode;

/// Disassemble the instruction starting at `bytes[0]`.
///
/// Missing operand bytes read as zero, as they would from memory.
pub fn disassemble_instruction(bytes: &[u8]) -> String {
    let get = |i: usize| bytes.get(i).copied().unwrap_or(0);
    match decode([get(0), get(1), get(2)]) {
        Ok(instr) => instr.to_string(),
        Err(_) => format!("DB 0x{:02X}", get(0)),
    }
}

/// Walk a program by instruction size.
///
/// Returns each instruction's address with its text. Unknown bytes are
/// listed as data and skipped one at a time.
pub fn listing(bytes: &[u8]) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut addr = 0;

    while addr < bytes.len() {
        let get = |i: usize| bytes.get(i).copied().unwrap_or(0);
        match decode([get(addr), get(addr + 1), get(addr + 2)]) {
            Ok(instr) => {
                lines.push((addr, instr.to_string()));
                addr += instr.size();
            }
            Err(_) => {
                lines.push((addr, format!("DB 0x{:02X}", bytes[addr])));
                addr += 1;
            }
        }
    }

    lines
}

/// Disassemble a whole program.
pub fn disassemble(bytes: &[u8]) -> String {
    let mut output = String::new();
    output.push_str("; LS-8 Disassembly\n");
    output.push_str("; ----------------\n\n");

    for (addr, text) in listing(bytes) {
        output.push_str(&format!("{:02X}: {}\n", addr, text));
    }

    output
}
