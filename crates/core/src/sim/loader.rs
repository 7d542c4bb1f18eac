//! Installs an assembled program into a [`Simulator`]'s address space.

use crate::assembler::{assemble, AssembledProgram};
use crate::common::error::AssembleError;
use crate::sim::simulator::Simulator;

/// Assembles `source` and installs its text, data, and entry point into `sim`.
///
/// # Errors
///
/// Returns the [`AssembleError`] raised while assembling `source`; `sim` is
/// left untouched if assembly fails.
pub fn load_program(sim: &mut Simulator, source: &str) -> Result<AssembledProgram, AssembleError> {
    let program = assemble(source)?;
    install(sim, &program);
    Ok(program)
}

/// Installs an already-assembled program into `sim`, without re-assembling.
///
/// Resets the hart: every register and CSR is cleared, `pc` is set to the
/// program's entry point (or the configured `entry_point` override, if one
/// is set), and `sp` (`x2`) is seeded with the top of the stack region.
pub fn install(sim: &mut Simulator, program: &AssembledProgram) {
    sim.memory_mut().load_text(program.text.clone());
    for (addr, bytes) in &program.data {
        sim.memory_mut().load_data(*addr, bytes);
    }
    let entry = sim.config().entry_point.unwrap_or(program.entry);
    sim.reset();
    sim.cpu_mut().gpr_mut().write(2, crate::soc::memory::STACK_TOP);
    sim.set_pc(entry);
}
