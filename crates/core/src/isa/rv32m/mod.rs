//! RV32M multiply/divide extension mnemonics.
//!
//! All five mnemonics share the R-type operand shape.

/// A multiply or divide/remainder mnemonic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MulDivOp {
    /// `MUL rd, rs1, rs2`: low 32 bits of the signed product.
    Mul,
    /// `DIV rd, rs1, rs2`: signed division.
    Div,
    /// `DIVU rd, rs1, rs2`: unsigned division.
    Divu,
    /// `REM rd, rs1, rs2`: signed remainder.
    Rem,
    /// `REMU rd, rs1, rs2`: unsigned remainder.
    Remu,
}
