//! Instruction decoder for the LS-8.
//!
//! Every instruction is one opcode byte followed by up to two operand
//! bytes. The opcode itself carries its layout:
//!
//! ```text
//! AABCDDDD
//!   AA   number of operands (0-2)
//!   B    1 if this is an ALU operation
//!   C    1 if the instruction sets the PC
//!   DDDD instruction identifier
//! ```

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// The LS-8 instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opcode {
    // ==================== ALU ====================
    Add = 0b1010_0000,
    Sub = 0b1010_0001,
    Mul = 0b1010_0010,
    Div = 0b1010_0011,
    Cmp = 0b1010_0111,
    Or = 0b1010_1010,
    Inc = 0b0110_0101,
    Dec = 0b0110_0110,

    // ==================== Data Transfer ====================
    Ldi = 0b1000_0010,
    Ld = 0b1000_0011,
    St = 0b1000_0100,
    Push = 0b0100_0101,
    Pop = 0b0100_0110,

    // ==================== I/O ====================
    Prn = 0b0100_0111,
    Pra = 0b0100_1000,

    // ==================== Control Flow ====================
    Call = 0b0101_0000,
    Ret = 0b0001_0001,
    Iret = 0b0001_0011,
    Jmp = 0b0101_0100,
    Jeq = 0b0101_0101,
    Jne = 0b0101_0110,
    Hlt = 0b0000_0001,
}

impl Opcode {
    /// Every defined opcode.
    pub const ALL: [Opcode; 22] = [
        Opcode::Add, Opcode::Sub, Opcode::Mul, Opcode::Div, Opcode::Cmp,
        Opcode::Or, Opcode::Inc, Opcode::Dec, Opcode::Ldi, Opcode::Ld,
        Opcode::St, Opcode::Push, Opcode::Pop, Opcode::Prn, Opcode::Pra,
        Opcode::Call, Opcode::Ret, Opcode::Iret, Opcode::Jmp, Opcode::Jeq,
        Opcode::Jne, Opcode::Hlt,
    ];

    /// Look up an opcode byte. `None` for unmapped bytes.
    pub fn from_byte(byte: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| *op as u8 == byte)
    }

    /// Look up a mnemonic (case-insensitive).
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(name))
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Cmp => "CMP",
            Opcode::Or => "OR",
            Opcode::Inc => "INC",
            Opcode::Dec => "DEC",
            Opcode::Ldi => "LDI",
            Opcode::Ld => "LD",
            Opcode::St => "ST",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Prn => "PRN",
            Opcode::Pra => "PRA",
            Opcode::Call => "CALL",
            Opcode::Ret => "RET",
            Opcode::Iret => "IRET",
            Opcode::Jmp => "JMP",
            Opcode::Jeq => "JEQ",
            Opcode::Jne => "JNE",
            Opcode::Hlt => "HLT",
        }
    }

    /// Number of operand bytes following the opcode (bits 6-7).
    #[inline]
    pub fn operand_count(self) -> usize {
        ((self as u8 >> 6) & 0b11) as usize
    }

    /// Total instruction length in bytes.
    #[inline]
    pub fn size(self) -> usize {
        self.operand_count() + 1
    }

    /// Whether the instruction sets the PC itself (bit 4).
    #[inline]
    pub fn sets_pc(self) -> bool {
        (self as u8 >> 4) & 1 == 1
    }
}

/// A decoded instruction with its raw operand bytes.
///
/// Operands that an instruction does not use are still carried; the
/// fetch stage always reads two bytes past the opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: Opcode,
    pub a: u8,
    pub b: u8,
}

impl Instruction {
    pub fn new(opcode: Opcode, a: u8, b: u8) -> Self {
        Self { opcode, a, b }
    }

    /// Instruction length in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.opcode.size()
    }

    /// The bytes this instruction occupies in memory (1 to 3).
    pub fn encode(&self) -> Vec<u8> {
        let bytes = [self.opcode as u8, self.a, self.b];
        bytes[..self.size()].to_vec()
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.opcode.mnemonic();
        match self.opcode {
            Opcode::Ldi => write!(f, "{} R{},0x{:02X}", name, self.a, self.b),
            _ => match self.opcode.operand_count() {
                0 => write!(f, "{}", name),
                1 => write!(f, "{} R{}", name, self.a),
                _ => write!(f, "{} R{},R{}", name, self.a, self.b),
            },
        }
    }
}

/// Decode an opcode byte and the two bytes after it.
pub fn decode(bytes: [u8; 3]) -> Result<Instruction, DecodeError> {
    let [ir, a, b] = bytes;
    let opcode = Opcode::from_byte(ir).ok_or(DecodeError::InvalidOpcode(ir))?;
    Ok(Instruction { opcode, a, b })
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid opcode: {0:#04x}")]
    InvalidOpcode(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hlt() {
        let instr = decode([0b0000_0001, 0, 0]).unwrap();
        assert_eq!(instr.opcode, Opcode::Hlt);
        assert_eq!(instr.size(), 1);
    }

    #[test]
    fn test_decode_invalid() {
        assert_eq!(decode([0xFF, 0, 0]), Err(DecodeError::InvalidOpcode(0xFF)));
        assert_eq!(decode([0x00, 0, 0]), Err(DecodeError::InvalidOpcode(0x00)));
    }

    #[test]
    fn test_layout_bits() {
        assert_eq!(Opcode::Ldi.size(), 3);
        assert_eq!(Opcode::Prn.size(), 2);
        assert_eq!(Opcode::Ret.size(), 1);

        assert!(Opcode::Call.sets_pc());
        assert!(Opcode::Jeq.sets_pc());
        assert!(Opcode::Iret.sets_pc());
        assert!(!Opcode::Push.sets_pc());
        assert!(!Opcode::Hlt.sets_pc());
    }

    #[test]
    fn test_opcode_table_is_unique() {
        for (i, a) in Opcode::ALL.iter().enumerate() {
            for b in &Opcode::ALL[i + 1..] {
                assert_ne!(*a as u8, *b as u8, "{:?} and {:?} collide", a, b);
            }
        }
    }

    #[test]
    fn test_mnemonic_lookup() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from_mnemonic(op.mnemonic()), Some(op));
        }
        assert_eq!(Opcode::from_mnemonic("ldi"), Some(Opcode::Ldi));
        assert_eq!(Opcode::from_mnemonic("NOP"), None);
    }

    #[test]
    fn test_encode_trims_unused_operands() {
        assert_eq!(Instruction::new(Opcode::Ldi, 0, 8).encode(), vec![0x82, 0, 8]);
        assert_eq!(Instruction::new(Opcode::Prn, 0, 99).encode(), vec![0x47, 0]);
        assert_eq!(Instruction::new(Opcode::Hlt, 1, 2).encode(), vec![0x01]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Instruction::new(Opcode::Ldi, 0, 8).to_string(), "LDI R0,0x08");
        assert_eq!(Instruction::new(Opcode::Add, 0, 1).to_string(), "ADD R0,R1");
        assert_eq!(Instruction::new(Opcode::Push, 3, 0).to_string(), "PUSH R3");
        assert_eq!(Instruction::new(Opcode::Iret, 0, 0).to_string(), "IRET");
    }
}
