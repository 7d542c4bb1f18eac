//! Wires an assembled program into the execution engine.
//!
//! `simulator` owns the step loop; `loader` bridges it to the assembler.

/// Installing an assembled program into a [`Simulator`](simulator::Simulator).
pub mod loader;

/// The fetch-execute step loop.
pub mod simulator;

pub use loader::load_program;
pub use simulator::{Simulator, StepResult};
