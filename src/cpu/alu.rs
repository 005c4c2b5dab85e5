//! Arithmetic/logic unit.
//!
//! Pure functions over two register values. All arithmetic wraps at
//! eight bits so overflow behaves the same on every host.

use crate::cpu::registers::Flags;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// An ALU operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AluOp {
    Add,
    Sub,
    Mul,
    Div,
    Inc,
    Dec,
    Or,
    Cmp,
}

/// Where the result of an ALU operation goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOutput {
    /// Write back into the destination register.
    Register(u8),
    /// Replace the comparison bits of FL.
    Flags(Flags),
}

/// Run `op` on `dest` and `src`.
///
/// `src` is ignored by the unary operations (INC, DEC).
pub fn execute(op: AluOp, dest: u8, src: u8) -> Result<AluOutput, AluError> {
    let value = match op {
        AluOp::Add => dest.wrapping_add(src),
        AluOp::Sub => dest.wrapping_sub(src),
        AluOp::Mul => dest.wrapping_mul(src),
        AluOp::Div => dest.checked_div(src).ok_or(AluError::DivisionByZero)?,
        AluOp::Inc => dest.wrapping_add(1),
        AluOp::Dec => dest.wrapping_sub(1),
        AluOp::Or => dest | src,
        AluOp::Cmp => return Ok(AluOutput::Flags(compare(dest, src))),
    };

    Ok(AluOutput::Register(value))
}

/// Compare two unsigned values. Exactly one bit of the result is set.
pub fn compare(dest: u8, src: u8) -> Flags {
    match dest.cmp(&src) {
        std::cmp::Ordering::Less => Flags::LT,
        std::cmp::Ordering::Greater => Flags::GT,
        std::cmp::Ordering::Equal => Flags::EQ,
    }
}

/// Errors raised by the ALU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AluError {
    #[error("division by zero")]
    DivisionByZero,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg(op: AluOp, a: u8, b: u8) -> u8 {
        match execute(op, a, b).unwrap() {
            AluOutput::Register(v) => v,
            AluOutput::Flags(f) => panic!("unexpected flags {:?}", f),
        }
    }

    #[test]
    fn test_wrapping_arithmetic() {
        assert_eq!(reg(AluOp::Add, 255, 1), 0);
        assert_eq!(reg(AluOp::Sub, 0, 1), 255);
        assert_eq!(reg(AluOp::Mul, 16, 17), 16);
        assert_eq!(reg(AluOp::Inc, 255, 0), 0);
        assert_eq!(reg(AluOp::Dec, 0, 0), 255);
    }

    #[test]
    fn test_basic_ops() {
        assert_eq!(reg(AluOp::Add, 8, 9), 17);
        assert_eq!(reg(AluOp::Mul, 8, 9), 72);
        assert_eq!(reg(AluOp::Div, 17, 5), 3);
        assert_eq!(reg(AluOp::Or, 0b1010, 0b0101), 0b1111);
    }

    #[test]
    fn test_div_by_zero() {
        assert_eq!(execute(AluOp::Div, 10, 0), Err(AluError::DivisionByZero));
    }

    #[test]
    fn test_compare() {
        assert_eq!(execute(AluOp::Cmp, 3, 5).unwrap(), AluOutput::Flags(Flags::LT));
        assert_eq!(execute(AluOp::Cmp, 5, 3).unwrap(), AluOutput::Flags(Flags::GT));
        assert_eq!(execute(AluOp::Cmp, 4, 4).unwrap(), AluOutput::Flags(Flags::EQ));
    }

    #[test]
    fn test_compare_is_unsigned() {
        // 0x80 would be negative as i8
        assert_eq!(compare(0x80, 0x01), Flags::GT);
    }
}
