//! RV32I base integer instruction mnemonics.

/// Mnemonics sharing the R-type (register-register) operand shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RAluOp {
    /// `ADD rd, rs1, rs2`
    Add,
    /// `SUB rd, rs1, rs2`
    Sub,
    /// `SLL rd, rs1, rs2`
    Sll,
    /// `SLT rd, rs1, rs2`
    Slt,
    /// `SLTU rd, rs1, rs2`
    Sltu,
    /// `XOR rd, rs1, rs2`
    Xor,
    /// `SRL rd, rs1, rs2`
    Srl,
    /// `SRA rd, rs1, rs2`
    Sra,
    /// `OR rd, rs1, rs2`
    Or,
    /// `AND rd, rs1, rs2`
    And,
}

/// Mnemonics sharing the I-type (register-immediate) ALU operand shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IAluOp {
    /// `ADDI rd, rs1, imm`
    Addi,
    /// `SLTI rd, rs1, imm`
    Slti,
    /// `SLTIU rd, rs1, imm`
    Sltiu,
    /// `XORI rd, rs1, imm`
    Xori,
    /// `ORI rd, rs1, imm`
    Ori,
    /// `ANDI rd, rs1, imm`
    Andi,
    /// `SLLI rd, rs1, shamt`
    Slli,
    /// `SRLI rd, rs1, shamt`
    Srli,
    /// `SRAI rd, rs1, shamt`
    Srai,
}

/// Load mnemonics, all I-type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOp {
    /// `LB rd, imm(rs1)`
    Lb,
    /// `LH rd, imm(rs1)`
    Lh,
    /// `LW rd, imm(rs1)`
    Lw,
    /// `LBU rd, imm(rs1)`
    Lbu,
    /// `LHU rd, imm(rs1)`
    Lhu,
}

/// Store mnemonics, all S-type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreOp {
    /// `SB rs2, imm(rs1)`
    Sb,
    /// `SH rs2, imm(rs1)`
    Sh,
    /// `SW rs2, imm(rs1)`
    Sw,
}

/// Branch mnemonics, all B-type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BranchOp {
    /// `BEQ rs1, rs2, label`
    Beq,
    /// `BNE rs1, rs2, label`
    Bne,
    /// `BLT rs1, rs2, label`
    Blt,
    /// `BGE rs1, rs2, label`
    Bge,
    /// `BLTU rs1, rs2, label`
    Bltu,
    /// `BGEU rs1, rs2, label`
    Bgeu,
}

/// Upper-immediate mnemonics, both U-type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpperOp {
    /// `LUI rd, imm`
    Lui,
    /// `AUIPC rd, imm`
    Auipc,
}
