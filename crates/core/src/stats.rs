//! Execution statistics collected while a program runs.
//!
//! Unlike the teacher's cycle-accurate statistics (cache hit rates, branch
//! prediction accuracy, pipeline stalls), this single-cycle machine tracks
//! only what is meaningful without a pipeline or memory hierarchy: retired
//! instructions by category, and the wall-clock time spent running.

use std::time::Instant;

/// Execution statistics for one `run()` (or one sequence of `step()` calls).
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,

    /// Total instructions retired.
    pub instructions_retired: u64,
    /// Count of ALU (R-type and I-type arithmetic/logic) instructions retired.
    pub inst_alu: u64,
    /// Count of load instructions retired.
    pub inst_load: u64,
    /// Count of store instructions retired.
    pub inst_store: u64,
    /// Count of branch and jump instructions retired.
    pub inst_branch: u64,
    /// Count of `SYSTEM`-class and CSR instructions retired.
    pub inst_system: u64,
    /// Number of times trap entry was performed (interrupts and exceptions).
    pub traps_taken: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self::new()
    }
}

impl SimStats {
    /// Creates a fresh, zeroed statistics block with the clock starting now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            instructions_retired: 0,
            inst_alu: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            inst_system: 0,
            traps_taken: 0,
        }
    }

    /// Wall-clock time elapsed since this block was created, in seconds.
    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Instructions retired per second, or `0.0` if no time has elapsed.
    #[must_use]
    pub fn instructions_per_second(&self) -> f64 {
        let secs = self.elapsed_secs();
        if secs <= 0.0 {
            0.0
        } else {
            self.instructions_retired as f64 / secs
        }
    }
}
