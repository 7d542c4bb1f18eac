//! Machine-mode interrupt arbitration.

use crate::common::constants::{CAUSE_INTERRUPT_BIT, CAUSE_MACHINE_TIMER_INTERRUPT, CAUSE_REALTIME_TIMER_INTERRUPT};
use crate::core::arch::csr::{CsrFile, MIE_MTIE, MIE_RTIE};

/// Selects the highest-priority pending, enabled interrupt, if any.
///
/// The real-time timer takes priority over the cycle timer when both are
/// pending and enabled simultaneously. Returns the `mcause` value (with the
/// interrupt bit set) that trap entry should use, paired with the `mip` bit
/// that should be cleared now that the interrupt is being delivered.
#[must_use]
pub fn pending_interrupt(csrs: &CsrFile) -> Option<(u32, u32)> {
    if !csrs.interrupts_enabled() {
        return None;
    }
    let mie = csrs.mie();
    let mip = csrs.mip();

    if mie & mip & MIE_RTIE != 0 {
        return Some((CAUSE_INTERRUPT_BIT | CAUSE_REALTIME_TIMER_INTERRUPT, MIE_RTIE));
    }
    if mie & mip & MIE_MTIE != 0 {
        return Some((CAUSE_INTERRUPT_BIT | CAUSE_MACHINE_TIMER_INTERRUPT, MIE_MTIE));
    }
    None
}
