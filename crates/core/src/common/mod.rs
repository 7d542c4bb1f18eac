//! Common utilities and types used throughout the simulator.
//!
//! This module provides fundamental building blocks shared across the
//! assembler, the CPU core, and the SoC devices:
//! 1. **Constants:** system-wide constants for memory layout and trap causes.
//! 2. **Error handling:** the `AssembleError` and `VmError` families.
//! 3. **Fault reports:** the structured snapshot built around a `VmError`.

/// Common constants used throughout the simulator.
pub mod constants;

/// Error types: assembler diagnostics and runtime VM faults.
pub mod error;

/// The structured fault report wrapping a [`VmError`] with diagnostic context.
pub mod fault;

pub use constants::{CAUSE_INTERRUPT_BIT, MEMORY_SIZE};
pub use error::{AssembleError, VmError};
pub use fault::FaultReport;
