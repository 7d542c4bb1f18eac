//! Global constants shared across the assembler and the execution engine.

/// Size of the whole addressable memory space, in bytes (1 MiB).
pub const MEMORY_SIZE: u32 = 1 << 20;

/// Size of a RISC-V instruction word, in bytes. The assembler never emits
/// compressed (16-bit) instructions.
pub const INSTRUCTION_SIZE: u32 = 4;

/// Mask applied to shift amounts for 32-bit shift instructions (5 bits).
pub const SHIFT_MASK: u32 = 0x1F;

/// Bit set in a `mcause`/trap-cause value to mark it as an interrupt rather
/// than a synchronous exception.
pub const CAUSE_INTERRUPT_BIT: u32 = 1 << 31;

/// Cause code for the machine timer (cycle) interrupt, excluding the
/// interrupt bit.
pub const CAUSE_MACHINE_TIMER_INTERRUPT: u32 = 7;

/// Cause code used for the real-time timer interrupt, excluding the
/// interrupt bit.
pub const CAUSE_REALTIME_TIMER_INTERRUPT: u32 = 11;
