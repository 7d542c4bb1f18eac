//! A driver for the RV32IM simulator.
//!
//! This binary is intentionally thin: it assembles a source file, installs
//! it into a [`Simulator`], runs it to completion (or to a fault), and
//! prints the final architectural state. Anything beyond that — a
//! terminal-rendered display, a step-mode REPL, or throttling execution to
//! wall-clock speed — is left to a richer front end built on this crate.

use std::{fs, process};

use clap::{Parser, Subcommand};
use rv32vm_core::config::Config;
use rv32vm_core::isa::abi::register_abi_name;
use rv32vm_core::sim::{load_program, Simulator, StepResult};

#[derive(Parser, Debug)]
#[command(
    name = "rv32vm",
    author,
    version,
    about = "A single-cycle RV32IM-inspired virtual machine with a symbolic assembler"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble and run a source file to completion.
    Run {
        /// Assembly source file.
        file: String,

        /// Instruction budget before the program is treated as non-terminating.
        #[arg(long)]
        max_instructions: Option<u64>,

        /// Disable text-region write protection (permits self-modifying stores).
        #[arg(long)]
        no_text_protect: bool,

        /// A breakpoint address (hex, e.g. `0x1000`), may be repeated.
        #[arg(long = "break")]
        breakpoints: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file, max_instructions, no_text_protect, breakpoints } => {
            cmd_run(&file, max_instructions, no_text_protect, &breakpoints);
        }
    }
}

fn cmd_run(file: &str, max_instructions: Option<u64>, no_text_protect: bool, breakpoints: &[String]) {
    let source = fs::read_to_string(file).unwrap_or_else(|err| {
        eprintln!("error reading {file}: {err}");
        process::exit(1);
    });

    let mut config = Config::default();
    if let Some(limit) = max_instructions {
        config.max_instructions = limit;
    }
    config.text_protect = !no_text_protect;
    for text in breakpoints {
        match parse_hex(text) {
            Some(addr) => {
                config.breakpoints.insert(addr);
            }
            None => {
                eprintln!("invalid breakpoint address '{text}'");
                process::exit(1);
            }
        }
    }

    let mut sim = Simulator::new(config);
    let program = load_program(&mut sim, &source).unwrap_or_else(|err| {
        eprintln!("assembly error: {err}");
        process::exit(1);
    });
    tracing::info!(entry = format_args!("{:#010x}", program.entry), labels = program.labels.len(), "program loaded");

    loop {
        match sim.run() {
            Ok(StepResult::Halted) => {
                println!("halted after {} instructions", sim.stats().instructions_retired);
                dump_state(&sim);
                break;
            }
            Ok(StepResult::Breakpoint) => {
                println!("breakpoint at pc {:#010x}", sim.state().pc);
                dump_state(&sim);
                process::exit(2);
            }
            Ok(StepResult::Continue | StepResult::WaitingForInterrupt) => unreachable!(
                "Simulator::run only returns once the hart stops advancing on its own"
            ),
            Err(err) => {
                let report = sim.fault_report(err);
                print_fault_report(&report);
                process::exit(1);
            }
        }
    }
}

fn print_fault_report(report: &rv32vm_core::FaultReport) {
    eprintln!("runtime fault [{}]: {}", report.tag, report.error);
    eprintln!("hint: {}", report.hint);
    if let Some(addr) = report.fault_address {
        eprintln!("fault address: {addr:#010x}");
    }
    eprintln!("pc = {:#010x}, instructions retired = {}", report.cpu.pc, report.instructions_retired);
    eprintln!(
        "mstatus={:#010x} mie={:#010x} mip={:#010x} mcause={:#010x} mepc={:#010x} mtvec={:#010x}",
        report.csrs.mstatus, report.csrs.mie, report.csrs.mip, report.csrs.mcause, report.csrs.mepc, report.csrs.mtvec
    );
    println!("context:");
    for entry in &report.context {
        let marker = if entry.is_fault_site { ">" } else { " " };
        let text = entry.instruction.as_ref().map_or("--".to_string(), |i| i.mnemonic().to_string());
        println!("{marker} {:#010x}  {text}", entry.address);
    }
    println!("stack (around sp={:#010x}):", report.cpu.registers[2]);
    println!("{}", report.stack_dump);
    print_registers(&report.cpu.registers);
}

fn dump_state(sim: &Simulator) {
    let state = sim.state();
    println!("pc = {:#010x}", state.pc);
    print_registers(&state.registers);
}

fn print_registers(registers: &[u32; 32]) {
    for row in 0..8 {
        let mut line = String::new();
        for col in 0..4 {
            let idx = row * 4 + col;
            line.push_str(&format!("{:>4}={:#010x}  ", register_abi_name(idx as u8), registers[idx]));
        }
        println!("{}", line.trim_end());
    }
}

fn parse_hex(text: &str) -> Option<u32> {
    let text = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")).unwrap_or(text);
    u32::from_str_radix(text, 16).ok()
}
