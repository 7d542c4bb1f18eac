//! The mnemonic table: maps a lowercase opcode string to the instruction
//! format (and specific operation) it assembles to.

use crate::isa::instruction::{IOp, ROp};
use crate::isa::privileged::{CsrOp, SystemOp};
use crate::isa::rv32i::{BranchOp, IAluOp, LoadOp, RAluOp, StoreOp, UpperOp};
use crate::isa::rv32m::MulDivOp;

/// The operand shape a mnemonic assembles to, before operands are resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// `op rd, rs1, rs2`
    R(ROp),
    /// `op rd, rs1, imm`
    IAlu(IOp),
    /// `op rd, imm(rs1)`
    Load(LoadOp),
    /// `JALR rd, rs1, imm`
    Jalr,
    /// `op rd, csr, rs1` / `op rd, csr, zimm`
    Csr(CsrOp),
    /// `op rs2, imm(rs1)`
    Store(StoreOp),
    /// `op rs1, rs2, label`
    Branch(BranchOp),
    /// `JAL rd, label`
    Jal,
    /// `op rd, imm`
    Upper(UpperOp),
    /// A `SYSTEM`-class instruction with no operands.
    System(SystemOp),
    /// `LA rd, label`: expands to `LUI`+`ADDI`.
    La,
    /// `J label`: expands to `JAL x0, label`.
    J,
    /// `CALL label`: expands to `JAL ra, label`.
    Call,
    /// `RET`: expands to `JALR x0, ra, 0`.
    Ret,
    /// `NOP`: expands to `ADDI x0, x0, 0`.
    Nop,
}

impl Format {
    /// Number of instruction words this mnemonic assembles to, used during
    /// the first pass to size the text region before any label is resolved.
    #[must_use]
    pub fn word_count(self) -> u32 {
        match self {
            Format::La => 2,
            _ => 1,
        }
    }
}

/// Looks up the [`Format`] for a lowercase mnemonic string.
#[must_use]
pub fn lookup(mnemonic: &str) -> Option<Format> {
    use Format::{Branch, Csr, IAlu, Jal, Jalr, La, Load, Nop, Store, System, Upper, Call, Ret, J, R};
    Some(match mnemonic {
        "add" => R(ROp::Alu(RAluOp::Add)),
        "sub" => R(ROp::Alu(RAluOp::Sub)),
        "sll" => R(ROp::Alu(RAluOp::Sll)),
        "slt" => R(ROp::Alu(RAluOp::Slt)),
        "sltu" => R(ROp::Alu(RAluOp::Sltu)),
        "xor" => R(ROp::Alu(RAluOp::Xor)),
        "srl" => R(ROp::Alu(RAluOp::Srl)),
        "sra" => R(ROp::Alu(RAluOp::Sra)),
        "or" => R(ROp::Alu(RAluOp::Or)),
        "and" => R(ROp::Alu(RAluOp::And)),

        "mul" => R(ROp::MulDiv(MulDivOp::Mul)),
        "div" => R(ROp::MulDiv(MulDivOp::Div)),
        "divu" => R(ROp::MulDiv(MulDivOp::Divu)),
        "rem" => R(ROp::MulDiv(MulDivOp::Rem)),
        "remu" => R(ROp::MulDiv(MulDivOp::Remu)),

        "addi" => IAlu(IOp::Alu(IAluOp::Addi)),
        "slti" => IAlu(IOp::Alu(IAluOp::Slti)),
        "sltiu" => IAlu(IOp::Alu(IAluOp::Sltiu)),
        "xori" => IAlu(IOp::Alu(IAluOp::Xori)),
        "ori" => IAlu(IOp::Alu(IAluOp::Ori)),
        "andi" => IAlu(IOp::Alu(IAluOp::Andi)),
        "slli" => IAlu(IOp::Alu(IAluOp::Slli)),
        "srli" => IAlu(IOp::Alu(IAluOp::Srli)),
        "srai" => IAlu(IOp::Alu(IAluOp::Srai)),

        "lb" => Load(LoadOp::Lb),
        "lh" => Load(LoadOp::Lh),
        "lw" => Load(LoadOp::Lw),
        "lbu" => Load(LoadOp::Lbu),
        "lhu" => Load(LoadOp::Lhu),

        "sb" => Store(StoreOp::Sb),
        "sh" => Store(StoreOp::Sh),
        "sw" => Store(StoreOp::Sw),

        "beq" => Branch(BranchOp::Beq),
        "bne" => Branch(BranchOp::Bne),
        "blt" => Branch(BranchOp::Blt),
        "bge" => Branch(BranchOp::Bge),
        "bltu" => Branch(BranchOp::Bltu),
        "bgeu" => Branch(BranchOp::Bgeu),

        "jal" => Jal,
        "jalr" => Jalr,

        "lui" => Upper(UpperOp::Lui),
        "auipc" => Upper(UpperOp::Auipc),

        "csrrw" => Csr(CsrOp::Csrrw),
        "csrrs" => Csr(CsrOp::Csrrs),
        "csrrc" => Csr(CsrOp::Csrrc),
        "csrrwi" => Csr(CsrOp::Csrrwi),
        "csrrsi" => Csr(CsrOp::Csrrsi),
        "csrrci" => Csr(CsrOp::Csrrci),

        "mret" => System(SystemOp::Mret),
        "wfi" => System(SystemOp::Wfi),
        "halt" => System(SystemOp::Halt),

        "la" => La,
        "j" => J,
        "call" => Call,
        "ret" => Ret,
        "nop" => Nop,

        _ => return None,
    })
}
