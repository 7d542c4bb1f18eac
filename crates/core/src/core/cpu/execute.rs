//! Instruction execution: the ALU, memory access, and control-flow updates
//! that make up the bulk of `step`.

use crate::common::constants::SHIFT_MASK;
use crate::common::error::VmError;
use crate::core::arch::csr::CsrFile;
use crate::core::cpu::Cpu;
use crate::isa::instruction::{IOp, ROp};
use crate::isa::instruction::Instruction;
use crate::isa::privileged::{CsrOp, SystemOp};
use crate::isa::rv32i::{BranchOp, IAluOp, LoadOp, RAluOp, StoreOp, UpperOp};
use crate::isa::rv32m::MulDivOp;
use crate::soc::memory::Memory;

/// The outcome of executing a single instruction, signaling control-flow
/// events the driver or the surrounding step loop must react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Execution should continue at the CPU's (already updated) `pc`.
    Continue,
    /// The hart executed `HALT`.
    Halted,
}

fn alu_r(op: RAluOp, a: u32, b: u32) -> u32 {
    match op {
        RAluOp::Add => a.wrapping_add(b),
        RAluOp::Sub => a.wrapping_sub(b),
        RAluOp::Sll => a.wrapping_shl(b & SHIFT_MASK),
        RAluOp::Slt => u32::from((a as i32) < (b as i32)),
        RAluOp::Sltu => u32::from(a < b),
        RAluOp::Xor => a ^ b,
        RAluOp::Srl => a.wrapping_shr(b & SHIFT_MASK),
        RAluOp::Sra => ((a as i32).wrapping_shr(b & SHIFT_MASK)) as u32,
        RAluOp::Or => a | b,
        RAluOp::And => a & b,
    }
}

fn mul_div(op: MulDivOp, a: u32, b: u32) -> u32 {
    match op {
        MulDivOp::Mul => a.wrapping_mul(b),
        MulDivOp::Div => {
            let (a, b) = (a as i32, b as i32);
            if b == 0 {
                0xFFFF_FFFF
            } else if a == i32::MIN && b == -1 {
                a as u32
            } else {
                a.wrapping_div(b) as u32
            }
        }
        MulDivOp::Divu => {
            if b == 0 {
                0xFFFF_FFFF
            } else {
                a / b
            }
        }
        MulDivOp::Rem => {
            let (a, b) = (a as i32, b as i32);
            if b == 0 {
                a as u32
            } else if a == i32::MIN && b == -1 {
                0
            } else {
                a.wrapping_rem(b) as u32
            }
        }
        MulDivOp::Remu => {
            if b == 0 {
                a
            } else {
                a % b
            }
        }
    }
}

fn alu_i(op: IAluOp, a: u32, imm: i32) -> u32 {
    match op {
        IAluOp::Addi => a.wrapping_add(imm as u32),
        IAluOp::Slti => u32::from((a as i32) < imm),
        IAluOp::Sltiu => u32::from(a < imm as u32),
        IAluOp::Xori => a ^ imm as u32,
        IAluOp::Ori => a | imm as u32,
        IAluOp::Andi => a & imm as u32,
        IAluOp::Slli => a.wrapping_shl(imm as u32 & SHIFT_MASK),
        IAluOp::Srli => a.wrapping_shr(imm as u32 & SHIFT_MASK),
        IAluOp::Srai => ((a as i32).wrapping_shr(imm as u32 & SHIFT_MASK)) as u32,
    }
}

fn branch_taken(op: BranchOp, a: u32, b: u32) -> bool {
    match op {
        BranchOp::Beq => a == b,
        BranchOp::Bne => a != b,
        BranchOp::Blt => (a as i32) < (b as i32),
        BranchOp::Bge => (a as i32) >= (b as i32),
        BranchOp::Bltu => a < b,
        BranchOp::Bgeu => a >= b,
    }
}

fn csr_rmw(op: CsrOp, current: u32, operand: u32) -> (u32, bool) {
    match op {
        CsrOp::Csrrw | CsrOp::Csrrwi => (operand, true),
        CsrOp::Csrrs | CsrOp::Csrrsi => (current | operand, operand != 0),
        CsrOp::Csrrc | CsrOp::Csrrci => (current & !operand, operand != 0),
    }
}

/// Executes one instruction against `cpu` and `memory`.
///
/// The program counter is advanced to `pc + 4` (or a resolved branch/jump
/// target) before this function returns `Ok`; [`Outcome::Continue`] means
/// the caller should fetch the instruction now at `cpu.pc()`.
///
/// # Errors
///
/// Propagates any [`VmError`] raised by an out-of-range memory access, a
/// misaligned memory access, a write to write-protected text, or a CSR
/// instruction naming an unmapped address.
pub fn execute(cpu: &mut Cpu, memory: &mut Memory, instr: &Instruction) -> Result<Outcome, VmError> {
    let pc = cpu.pc();
    let mut next_pc = pc.wrapping_add(4);

    match instr {
        Instruction::R { op, rd, rs1, rs2 } => {
            let (a, b) = (cpu.gpr().read(*rs1), cpu.gpr().read(*rs2));
            let result = match op {
                ROp::Alu(op) => alu_r(*op, a, b),
                ROp::MulDiv(op) => mul_div(*op, a, b),
            };
            cpu.gpr_mut().write(*rd, result);
        }

        Instruction::I { op, rd, rs1, imm } => match op {
            IOp::Alu(op) => {
                let a = cpu.gpr().read(*rs1);
                cpu.gpr_mut().write(*rd, alu_i(*op, a, *imm));
            }
            IOp::Load(op) => {
                let addr = cpu.gpr().read(*rs1).wrapping_add(*imm as u32);
                let value = load(memory, *op, addr)?;
                cpu.gpr_mut().write(*rd, value);
            }
            IOp::Jalr => {
                let link = next_pc;
                let target = cpu.gpr().read(*rs1).wrapping_add(*imm as u32) & !1;
                cpu.gpr_mut().write(*rd, link);
                next_pc = target;
            }
            IOp::Csr(op) => {
                let addr = *imm as u16;
                let current = cpu
                    .csrs()
                    .read(addr)
                    .ok_or(VmError::UnmappedCsr { address: addr })?;
                let operand = match op {
                    CsrOp::Csrrw | CsrOp::Csrrs | CsrOp::Csrrc => cpu.gpr().read(*rs1),
                    CsrOp::Csrrwi | CsrOp::Csrrsi | CsrOp::Csrrci => u32::from(*rs1),
                };
                let (new_value, should_write) = csr_rmw(*op, current, operand);
                if should_write || matches!(op, CsrOp::Csrrw | CsrOp::Csrrwi) {
                    cpu.csrs_mut().write(addr, new_value);
                }
                cpu.gpr_mut().write(*rd, current);
            }
        },

        Instruction::S { op, rs1, rs2, imm } => {
            let addr = cpu.gpr().read(*rs1).wrapping_add(*imm as u32);
            let value = cpu.gpr().read(*rs2);
            store(memory, *op, addr, value)?;
        }

        Instruction::B { op, rs1, rs2, imm } => {
            let (a, b) = (cpu.gpr().read(*rs1), cpu.gpr().read(*rs2));
            if branch_taken(*op, a, b) {
                next_pc = pc.wrapping_add(*imm as u32);
            }
        }

        Instruction::J { rd, imm } => {
            cpu.gpr_mut().write(*rd, next_pc);
            next_pc = pc.wrapping_add(*imm as u32);
        }

        Instruction::U { op, rd, imm } => {
            let value = match op {
                UpperOp::Lui => *imm as u32,
                UpperOp::Auipc => pc.wrapping_add(*imm as u32),
            };
            cpu.gpr_mut().write(*rd, value);
        }

        Instruction::System { op } => {
            return execute_system(cpu, *op);
        }
    }

    cpu.set_pc(next_pc);
    Ok(Outcome::Continue)
}

/// `LH`/`LHU` and `SH`/`SB` are built from two/one byte access(es) rather
/// than a dedicated halfword path on [`Memory`]: the platform's MMIO
/// dispatch is word-granularity only, so a halfword access never observes
/// device state, matching the byte/word-only contract of the memory system.
fn load(memory: &mut Memory, op: LoadOp, addr: u32) -> Result<u32, VmError> {
    Ok(match op {
        LoadOp::Lb => memory.read_byte(addr)? as i8 as i32 as u32,
        LoadOp::Lbu => u32::from(memory.read_byte(addr)?),
        LoadOp::Lh => {
            let lo = memory.read_byte(addr)?;
            let hi = memory.read_byte(addr.wrapping_add(1))?;
            (u16::from_le_bytes([lo, hi]) as i16) as i32 as u32
        }
        LoadOp::Lhu => {
            let lo = memory.read_byte(addr)?;
            let hi = memory.read_byte(addr.wrapping_add(1))?;
            u32::from(u16::from_le_bytes([lo, hi]))
        }
        LoadOp::Lw => memory.read_word(addr)?,
    })
}

fn store(memory: &mut Memory, op: StoreOp, addr: u32, value: u32) -> Result<(), VmError> {
    match op {
        StoreOp::Sb => memory.write_byte(addr, value as u8),
        StoreOp::Sh => {
            let bytes = (value as u16).to_le_bytes();
            memory.write_byte(addr, bytes[0])?;
            memory.write_byte(addr.wrapping_add(1), bytes[1])
        }
        StoreOp::Sw => memory.write_word(addr, value),
    }
}

fn execute_system(cpu: &mut Cpu, op: SystemOp) -> Result<Outcome, VmError> {
    match op {
        SystemOp::Halt => {
            cpu.halt();
            Ok(Outcome::Halted)
        }
        SystemOp::Mret => {
            let resume = cpu.csrs_mut().mret();
            cpu.set_pc(resume);
            Ok(Outcome::Continue)
        }
        SystemOp::Wfi => {
            cpu.wait_for_interrupt();
            cpu.set_pc(cpu.pc().wrapping_add(4));
            Ok(Outcome::Continue)
        }
    }
}

/// Performs the trap-entry CSR update and redirects `cpu`'s `pc` to the
/// trap handler.
pub fn enter_trap(cpu: &mut Cpu, csrs_cause: u32) {
    let pc = cpu.pc();
    let handler = cpu.csrs_mut().enter_trap(pc, csrs_cause);
    cpu.set_pc(handler);
}

/// Convenience accessor so the execution engine can arbitrate interrupts
/// without importing [`CsrFile`] directly.
#[must_use]
pub fn csrs_of(cpu: &Cpu) -> &CsrFile {
    cpu.csrs()
}
