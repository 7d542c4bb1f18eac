//! Error and trap definitions shared by the assembler and the execution engine.
//!
//! This module defines the two error families used throughout the simulator:
//! 1. **`AssembleError`:** static errors raised while assembling source text.
//! 2. **`VmError`:** runtime errors raised while fetching or executing an
//!    instruction, reported as a structured fault rather than a panic.

use thiserror::Error;

/// Errors produced while assembling source text into an instruction stream.
///
/// Assembly is a two-pass process; most of these variants are raised during
/// the second pass once every label has a known address.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AssembleError {
    /// A line could not be tokenized (unterminated string or character literal).
    #[error("line {line}: {reason}")]
    SyntaxError {
        /// One-based source line number.
        line: usize,
        /// Human-readable description of the malformed token.
        reason: String,
    },

    /// An opcode mnemonic is not recognized.
    #[error("line {line}: unknown mnemonic '{mnemonic}'")]
    UnknownMnemonic {
        /// One-based source line number.
        line: usize,
        /// The offending mnemonic text.
        mnemonic: String,
    },

    /// A register name or number could not be parsed.
    #[error("line {line}: invalid register '{text}'")]
    InvalidRegister {
        /// One-based source line number.
        line: usize,
        /// The offending operand text.
        text: String,
    },

    /// An immediate operand could not be parsed as a number or character literal.
    #[error("line {line}: invalid immediate '{text}'")]
    InvalidImmediate {
        /// One-based source line number.
        line: usize,
        /// The offending operand text.
        text: String,
    },

    /// A resolved immediate does not fit in the bit width of the instruction format.
    #[error("line {line}: immediate {value} out of range for {format} format ({bits} bits)")]
    ImmediateOutOfRange {
        /// One-based source line number.
        line: usize,
        /// The resolved immediate value.
        value: i64,
        /// The instruction format requiring the immediate (e.g. "B", "J").
        format: &'static str,
        /// Number of bits available to encode the immediate.
        bits: u32,
    },

    /// A branch, jump, or `LA` operand referenced a label never defined anywhere
    /// in the source.
    #[error("line {line}: undefined label '{label}'")]
    UndefinedLabel {
        /// One-based source line number.
        line: usize,
        /// The offending label name.
        label: String,
    },

    /// The same label was defined more than once.
    #[error("line {line}: label '{label}' already defined at line {first_line}")]
    DuplicateLabel {
        /// One-based source line number of the second definition.
        line: usize,
        /// One-based source line number of the first definition.
        first_line: usize,
        /// The duplicated label name.
        label: String,
    },

    /// A directive (`.text`, `.data`, `.word`, ...) was malformed or unknown.
    #[error("line {line}: invalid directive '{directive}'")]
    InvalidDirective {
        /// One-based source line number.
        line: usize,
        /// The offending directive text, including the leading dot.
        directive: String,
    },

    /// An instruction or data item was emitted past the end of its memory region.
    #[error("line {line}: assembled address {address:#010x} exceeds region bounds")]
    RegionOverflow {
        /// One-based source line number.
        line: usize,
        /// The address that fell outside of the containing region.
        address: u32,
    },
}

/// Runtime errors raised while the execution engine fetches or executes an
/// instruction.
///
/// A `VmError` is never a panic: `Cpu::step` returns it as a value, and the
/// driver decides whether to halt, report, or (for interrupts routed through
/// the CSR file) resume after entering the trap handler.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum VmError {
    /// The program counter was not a multiple of four.
    #[error("instruction address misaligned: {address:#010x}")]
    InstructionAddressMisaligned {
        /// The misaligned program counter value.
        address: u32,
    },

    /// A load or store address was not aligned to its access width.
    #[error("{kind} address misaligned: {address:#010x} (width {width})")]
    DataAddressMisaligned {
        /// `"load"` or `"store"`.
        kind: &'static str,
        /// The misaligned address.
        address: u32,
        /// Access width in bytes (1, 2, or 4).
        width: u8,
    },

    /// An access (of any kind) fell entirely outside of the memory map.
    #[error("{kind} access out of bounds: {address:#010x}")]
    OutOfBounds {
        /// `"fetch"`, `"load"`, or `"store"`.
        kind: &'static str,
        /// The offending address.
        address: u32,
    },

    /// A store targeted the text region while text write-protection is enabled.
    #[error("store to write-protected text region: {address:#010x}")]
    TextWriteProtected {
        /// The offending address.
        address: u32,
    },

    /// The fetched instruction record has no defined semantics (a fetch past
    /// the assembled program, or a malformed record built by hand).
    #[error("illegal instruction at {address:#010x}")]
    IllegalInstruction {
        /// The program counter at which the fault occurred.
        address: u32,
    },

    /// A CSR instruction referenced an address with no backing register.
    #[error("unmapped CSR address {address:#05x}")]
    UnmappedCsr {
        /// The CSR address (12 bits).
        address: u16,
    },

    /// `run()` executed its instruction budget without the program halting.
    #[error("instruction limit of {limit} exceeded without halt")]
    InstructionLimitExceeded {
        /// The configured instruction budget.
        limit: u64,
    },
}
