//! Memory-mapped devices.

/// The instruction-cycle timer.
pub mod cycle_timer;

/// The text-mode display.
pub mod display;

/// The wall-clock real-time timer.
pub mod rt_timer;

pub use cycle_timer::CycleTimer;
pub use display::Display;
pub use rt_timer::RealTimeTimer;
