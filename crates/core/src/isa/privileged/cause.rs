//! Named `mcause` values, re-exported from [`crate::common::constants`].
//!
//! The engine raises no synchronous exceptions of its own: memory and
//! alignment faults surface as a [`crate::common::error::VmError`] rather
//! than a trap, so only the two interrupt sources need a named cause here.

/// Interrupt cause codes (the interrupt bit must be set by the caller).
pub mod interrupt {
    pub use crate::common::constants::{
        CAUSE_MACHINE_TIMER_INTERRUPT as MACHINE_TIMER, CAUSE_REALTIME_TIMER_INTERRUPT as REALTIME_TIMER,
    };
}
