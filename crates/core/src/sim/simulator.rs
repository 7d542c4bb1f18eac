//! The execution engine: the fetch-execute step loop tying the hart, the
//! address space, and the devices together.

use std::collections::BTreeSet;

use crate::common::error::VmError;
use crate::common::fault::{classify, ContextEntry, CsrSnapshot, FaultReport};
use crate::config::Config;
use crate::core::cpu::execute::{execute, Outcome};
use crate::core::cpu::trap::service_interrupts;
use crate::core::cpu::{Cpu, CpuState};
use crate::soc::memory::Memory;
use crate::stats::SimStats;

/// Instructions shown on each side of the fault site in a [`FaultReport`]'s
/// context window.
const CONTEXT_RADIUS: u32 = 3;
/// Bytes shown on each side of `sp` in a [`FaultReport`]'s stack dump.
const STACK_DUMP_RADIUS: u32 = 32;

/// The result of a single [`Simulator::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepResult {
    /// The instruction executed normally; `step` may be called again.
    Continue,
    /// The hart halted (`HALT` or the exit syscall); `step` should not be
    /// called again without a reset.
    Halted,
    /// Execution stopped before the instruction at a breakpoint address.
    Breakpoint,
    /// The hart is parked in `WFI`; no instruction was fetched this step.
    WaitingForInterrupt,
}

/// Owns the hart, the address space, and the devices attached to it, and
/// drives them one instruction at a time.
#[derive(Debug)]
pub struct Simulator {
    cpu: Cpu,
    memory: Memory,
    config: Config,
    stats: SimStats,
    paused_at: Option<u32>,
}

impl Simulator {
    /// Builds a simulator from `config`, with a cycle timer, a real-time
    /// timer, and a display already attached to the address space.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let memory = Memory::new(config.text_protect);

        Self {
            cpu: Cpu::new(),
            memory,
            config,
            stats: SimStats::new(),
            paused_at: None,
        }
    }

    /// Resets the hart (registers, CSRs, `pc`, halted/waiting flags), the
    /// cycle timer, and the real-time timer; the display and the backing
    /// memory buffer are left untouched. Called by
    /// [`crate::sim::loader::install`] on every program load.
    pub fn reset(&mut self) {
        self.cpu = Cpu::new();
        self.memory.reset_timers();
        self.stats = SimStats::new();
        self.paused_at = None;
    }

    /// The hart.
    #[must_use]
    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// A mutable view of the hart, for pre-seeding register state before
    /// the first `step` (e.g. the stack pointer, on program load).
    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    /// The address space.
    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// The simulator's configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A mutable view of the address space, for installing a program or
    /// pre-seeding device state before running.
    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    /// A snapshot of the hart's architectural state.
    #[must_use]
    pub fn state(&self) -> CpuState {
        self.cpu.state()
    }

    /// Execution statistics collected so far.
    #[must_use]
    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Installs `pc` as the entry point, overriding whatever the last
    /// program load set.
    pub fn set_pc(&mut self, pc: u32) {
        self.cpu.set_pc(pc);
    }

    /// Adds a breakpoint address.
    pub fn set_breakpoint(&mut self, address: u32) {
        self.config.breakpoints.insert(address);
    }

    /// Removes a breakpoint address.
    pub fn clear_breakpoint(&mut self, address: u32) {
        self.config.breakpoints.remove(&address);
    }

    /// The current breakpoint set.
    #[must_use]
    pub fn breakpoints(&self) -> &BTreeSet<u32> {
        &self.config.breakpoints
    }

    /// Executes exactly one instruction, or services a pending interrupt if
    /// the hart is parked in `WFI`.
    ///
    /// Order of operations per step, matching the platform's ordering
    /// guarantee that a timer reaching compare on cycle N delivers its
    /// interrupt at the start of cycle N+1's dispatch, before any
    /// instruction from N+1 is fetched:
    /// 1. If the hart already halted, return [`StepResult::Halted`] without
    ///    touching any state.
    /// 2. Tick the cycle timer and the real-time timer, folding any
    ///    interrupt request into `mip`.
    /// 3. If a pending, enabled interrupt exists, wake a `WFI`-parked hart
    ///    and enter its trap handler.
    /// 4. If `WFI` is still set, count the cycle and return without
    ///    fetching.
    /// 5. If `pc` is a breakpoint address not already paused at, stop and
    ///    return [`StepResult::Breakpoint`] without fetching.
    /// 6. Fetch the instruction at `pc`.
    /// 7. Execute it, updating registers, memory, and `pc`.
    /// 8. Record the retired instruction in the statistics.
    ///
    /// # Errors
    ///
    /// Propagates any [`VmError`] raised while fetching or executing.
    pub fn step(&mut self) -> Result<StepResult, VmError> {
        if self.cpu.halted() {
            return Ok(StepResult::Halted);
        }

        self.memory.tick_devices(self.cpu.csrs_mut());
        if service_interrupts(&mut self.cpu) {
            self.stats.traps_taken += 1;
        }

        if self.cpu.waiting() {
            self.stats.instructions_retired += 1;
            return Ok(StepResult::WaitingForInterrupt);
        }

        let pc = self.cpu.pc();
        if self.config.breakpoints.contains(&pc) && self.paused_at != Some(pc) {
            self.paused_at = Some(pc);
            return Ok(StepResult::Breakpoint);
        }
        self.paused_at = None;

        let instr = self.memory.fetch(pc)?;
        let outcome = execute(&mut self.cpu, &mut self.memory, &instr)?;

        self.stats.instructions_retired += 1;
        count_mnemonic(&mut self.stats, &instr);

        Ok(match outcome {
            Outcome::Halted => StepResult::Halted,
            Outcome::Continue => StepResult::Continue,
        })
    }

    /// Steps until the hart halts, an unrecoverable breakpoint is hit, or
    /// `max_instructions` steps have retired without a halt.
    ///
    /// # Errors
    ///
    /// Propagates any [`VmError`] raised by `step`, and returns
    /// [`VmError::InstructionLimitExceeded`] if the budget is exhausted
    /// first.
    pub fn run(&mut self) -> Result<StepResult, VmError> {
        let limit = self.config.max_instructions;
        let mut executed = 0u64;
        loop {
            match self.step()? {
                StepResult::Continue | StepResult::WaitingForInterrupt => {}
                result => return Ok(result),
            }
            executed += 1;
            if executed >= limit {
                return Err(VmError::InstructionLimitExceeded { limit });
            }
        }
    }

    /// Builds a [`FaultReport`] around `error`, capturing the hart's current
    /// state, a context window of instructions surrounding `pc`, and a dump
    /// of the stack region around `sp`.
    ///
    /// Intended for the caller to invoke on whatever [`VmError`] `step` or
    /// `run` just returned, before any further state changes; `self` is not
    /// otherwise touched by a faulting step.
    #[must_use]
    pub fn fault_report(&self, error: VmError) -> FaultReport {
        let (tag, hint, fault_address) = classify(&error);
        let cpu_state = self.cpu.state();
        let pc = cpu_state.pc;

        let context = self
            .memory
            .context_window(pc, CONTEXT_RADIUS)
            .into_iter()
            .map(|(address, instruction)| ContextEntry { address, instruction, is_fault_site: address == pc })
            .collect();

        let sp = self.cpu.gpr().read(2);
        let dump_start = sp.saturating_sub(STACK_DUMP_RADIUS);
        let stack_dump = self.memory.dump(dump_start, STACK_DUMP_RADIUS * 2);

        let csrs = self.cpu.csrs();
        FaultReport {
            error,
            cpu: cpu_state,
            csrs: CsrSnapshot {
                mstatus: csrs.mstatus(),
                mie: csrs.mie(),
                mtvec: csrs.mtvec(),
                mepc: csrs.mepc(),
                mcause: csrs.mcause(),
                mip: csrs.mip(),
            },
            instructions_retired: self.stats.instructions_retired,
            context,
            stack_dump,
            fault_address,
            tag,
            hint,
        }
    }
}

fn count_mnemonic(stats: &mut SimStats, instr: &crate::isa::instruction::Instruction) {
    use crate::isa::instruction::Instruction;
    match instr {
        Instruction::R { .. } | Instruction::I { op: crate::isa::instruction::IOp::Alu(_), .. } | Instruction::U { .. } => {
            stats.inst_alu += 1;
        }
        Instruction::I { op: crate::isa::instruction::IOp::Load(_), .. } => stats.inst_load += 1,
        Instruction::S { .. } => stats.inst_store += 1,
        Instruction::B { .. } | Instruction::J { .. } | Instruction::I { op: crate::isa::instruction::IOp::Jalr, .. } => {
            stats.inst_branch += 1;
        }
        Instruction::I { op: crate::isa::instruction::IOp::Csr(_), .. } | Instruction::System { .. } => {
            stats.inst_system += 1;
        }
    }
}
