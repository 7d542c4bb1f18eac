//! The flat 1 MiB address space: the region table, byte-addressed RAM, the
//! text segment, and memory-mapped device dispatch.
//!
//! 1 MiB, laid out as:
//!
//! ```text
//! 0x00000 - 0x0FFFF  text    (64 KiB)   program instructions
//! 0x10000 - 0x3FFFF  data    (192 KiB)  static/global data
//! 0x40000 - 0x7FFFF  heap    (256 KiB)  dynamic allocation
//! 0x80000 - 0xBFFFF  stack   (256 KiB)  grows downward from 0xBFFFC
//! 0xC0000 - 0xEFFFF  ram     (192 KiB)  general-purpose space
//! 0xF0000 - 0xFFFFF  mmio    (64 KiB)   display buffer/control, timers
//! ```

use crate::common::error::VmError;
use crate::isa::instruction::Instruction;
use crate::soc::devices::{CycleTimer, Display, RealTimeTimer};

/// Base address of the text (instruction) region.
pub const TEXT_BASE: u32 = 0x0000_0000;
/// Length of the text region, in bytes.
pub const TEXT_SIZE: u32 = 0x0001_0000;

/// Base address of the static/global data region (`.data`).
pub const DATA_BASE: u32 = 0x0001_0000;
/// Length of the data region, in bytes.
pub const DATA_SIZE: u32 = 0x0003_0000;

/// Base address of the heap region.
pub const HEAP_BASE: u32 = 0x0004_0000;
/// Length of the heap region, in bytes.
pub const HEAP_SIZE: u32 = 0x0004_0000;

/// Base address of the stack region. The stack pointer is seeded at
/// `STACK_TOP` on load and conventionally grows down toward `STACK_BASE`.
pub const STACK_BASE: u32 = 0x0008_0000;
/// Length of the stack region, in bytes.
pub const STACK_SIZE: u32 = 0x0004_0000;
/// The stack pointer's initial value, seeded by `load_program`.
pub const STACK_TOP: u32 = 0x000B_FFFC;

/// Base address of the general-purpose RAM region.
pub const RAM_BASE: u32 = 0x000C_0000;
/// Length of the general-purpose RAM region, in bytes.
pub const RAM_SIZE: u32 = 0x0003_0000;

/// Base address of the 64 KiB memory-mapped I/O window.
pub const MMIO_BASE: u32 = 0x000F_0000;
/// Length of the memory-mapped I/O window, in bytes.
pub const MMIO_SIZE: u32 = 0x0001_0000;

/// Base address of the display's character-grid framebuffer.
pub const DISPLAY_BUFFER_BASE: u32 = 0x000F_0000;
/// Length of the display framebuffer, in bytes (16 pages of 80x25 chars).
pub const DISPLAY_BUFFER_SIZE: u32 = 0x0000_7D00;

/// Base address of the display's control registers.
pub const DISPLAY_CTRL_BASE: u32 = 0x000F_7D00;
/// Length of the display control register window, in bytes.
pub const DISPLAY_CTRL_SIZE: u32 = 0x0000_0080;

/// Base address of the cycle timer's registers.
pub const TIMER_BASE: u32 = 0x000F_7E00;
/// Length of the cycle timer's register window, in bytes.
pub const TIMER_SIZE: u32 = 0x0000_0020;

/// Base address of the real-time timer's registers.
pub const RT_TIMER_BASE: u32 = 0x000F_7E20;
/// Length of the real-time timer's register window, in bytes.
pub const RT_TIMER_SIZE: u32 = 0x0000_0020;

use crate::common::constants::MEMORY_SIZE;

/// A named region of the address space, used for bounds checks and for
/// reporting which region an out-of-bounds access targeted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    /// The instruction stream.
    Text,
    /// Static/global data (`.data`).
    Data,
    /// The heap.
    Heap,
    /// The stack.
    Stack,
    /// General-purpose RAM.
    Ram,
    /// The display's character-grid framebuffer.
    DisplayBuffer,
    /// The display's control registers.
    DisplayCtrl,
    /// The cycle timer's registers.
    Timer,
    /// The real-time timer's registers.
    RtTimer,
    /// Unmapped space within the MMIO window not claimed by any device.
    Reserved,
}

fn region_of(addr: u32) -> Option<Region> {
    let table: [(Region, u32, u32); 9] = [
        (Region::Text, TEXT_BASE, TEXT_SIZE),
        (Region::Data, DATA_BASE, DATA_SIZE),
        (Region::Heap, HEAP_BASE, HEAP_SIZE),
        (Region::Stack, STACK_BASE, STACK_SIZE),
        (Region::Ram, RAM_BASE, RAM_SIZE),
        (Region::DisplayBuffer, DISPLAY_BUFFER_BASE, DISPLAY_BUFFER_SIZE),
        (Region::DisplayCtrl, DISPLAY_CTRL_BASE, DISPLAY_CTRL_SIZE),
        (Region::Timer, TIMER_BASE, TIMER_SIZE),
        (Region::RtTimer, RT_TIMER_BASE, RT_TIMER_SIZE),
    ];
    table
        .into_iter()
        .find(|(_, base, len)| addr >= *base && addr < base + len)
        .map(|(region, ..)| region)
        .or_else(|| (addr < MEMORY_SIZE).then_some(Region::Reserved))
}

/// The flat address space backing RAM, the text segment, and devices.
///
/// Instructions are never re-encoded into raw bytes: `text` holds the
/// assembler's resolved [`Instruction`] records directly, addressed by word
/// index, mirroring how the execution engine reads "instructions by index
/// (PC/4)" rather than by re-decoding a byte stream. Every other region is
/// one contiguous byte buffer indexed by absolute address.
///
/// Byte accesses (`read_byte`/`write_byte`) touch only the backing buffer:
/// they never reach a device. Only word accesses dispatch to the display,
/// the cycle timer, or the real-time timer — `LH`/`SH` are built from two
/// byte accesses at the instruction-execution layer and so never observe
/// device state, matching the platform's MMIO contract.
#[derive(Debug)]
pub struct Memory {
    text: Vec<Instruction>,
    ram: Vec<u8>,
    display: Display,
    timer: CycleTimer,
    rt_timer: RealTimeTimer,
    text_protect: bool,
}

impl Memory {
    /// Creates an empty address space with `text_protect` controlling
    /// whether stores into the text region are rejected.
    #[must_use]
    pub fn new(text_protect: bool) -> Self {
        Self {
            text: Vec::new(),
            ram: vec![0u8; MEMORY_SIZE as usize],
            display: Display::new(),
            timer: CycleTimer::new(),
            rt_timer: RealTimeTimer::new(),
            text_protect,
        }
    }

    /// The display device.
    #[must_use]
    pub fn display(&self) -> &Display {
        &self.display
    }

    /// The cycle timer.
    #[must_use]
    pub fn timer(&self) -> &CycleTimer {
        &self.timer
    }

    /// The real-time timer.
    #[must_use]
    pub fn rt_timer(&self) -> &RealTimeTimer {
        &self.rt_timer
    }

    /// Loads the assembled program into the text region, replacing any
    /// program loaded previously.
    pub fn load_text(&mut self, program: Vec<Instruction>) {
        self.text = program;
    }

    /// Copies `bytes` into RAM starting at `addr`, used to install the
    /// assembler's `.data` output. Panics only via the slice bounds check,
    /// which `Assembler` guarantees cannot happen for well-formed output.
    pub fn load_data(&mut self, addr: u32, bytes: &[u8]) {
        let start = addr as usize;
        self.ram[start..start + bytes.len()].copy_from_slice(bytes);
    }

    /// Whether writes to the text region are rejected.
    #[must_use]
    pub fn text_protected(&self) -> bool {
        self.text_protect
    }

    /// Enables or disables text write-protection.
    pub fn set_text_protected(&mut self, protected: bool) {
        self.text_protect = protected;
    }

    /// Fetches the instruction at `pc`.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::InstructionAddressMisaligned`] if `pc` is not a
    /// multiple of four, or [`VmError::OutOfBounds`] if `pc` does not fall
    /// within the text region's assembled length.
    pub fn fetch(&self, pc: u32) -> Result<Instruction, VmError> {
        if pc % 4 != 0 {
            return Err(VmError::InstructionAddressMisaligned { address: pc });
        }
        let index = ((pc - TEXT_BASE) / 4) as usize;
        self.text
            .get(index)
            .cloned()
            .ok_or(VmError::OutOfBounds { kind: "fetch", address: pc })
    }

    /// Reads a single byte at `addr`, touching only the backing buffer.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::OutOfBounds`] if `addr` is outside the address space.
    pub fn read_byte(&self, addr: u32) -> Result<u8, VmError> {
        self.check_bounds(addr, 1, "load")?;
        Ok(self.ram[addr as usize])
    }

    /// Writes a single byte at `addr`, touching only the backing buffer.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::OutOfBounds`] if `addr` is outside the address
    /// space, or [`VmError::TextWriteProtected`] if `addr` falls in the text
    /// region while text write-protection is enabled.
    pub fn write_byte(&mut self, addr: u32, value: u8) -> Result<(), VmError> {
        self.check_bounds(addr, 1, "store")?;
        if self.text_protect && addr < TEXT_BASE + TEXT_SIZE {
            return Err(VmError::TextWriteProtected { address: addr });
        }
        self.ram[addr as usize] = value;
        Ok(())
    }

    /// Reads a little-endian word at `addr`, dispatching to the cycle timer
    /// or the real-time timer before falling back to the backing buffer.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::DataAddressMisaligned`] if `addr` is not
    /// 4-byte-aligned, or [`VmError::OutOfBounds`] if `addr` is outside the
    /// address space.
    pub fn read_word(&mut self, addr: u32) -> Result<u32, VmError> {
        self.check_bounds(addr, 4, "load")?;
        self.check_alignment(addr, "load")?;

        if let Some(offset) = window(addr, TIMER_BASE, TIMER_SIZE) {
            return Ok(self.timer.read_register(offset));
        }
        if let Some(offset) = window(addr, RT_TIMER_BASE, RT_TIMER_SIZE) {
            return Ok(self.rt_timer.read_register(offset));
        }

        let bytes = &self.ram[addr as usize..addr as usize + 4];
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Writes a little-endian word at `addr`.
    ///
    /// Display-buffer writes unpack the word into up to four non-zero-byte
    /// character writes and never touch the backing buffer; display control,
    /// timer, and real-time timer register writes are dispatched to their
    /// device and likewise never touch the backing buffer.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::DataAddressMisaligned`] if `addr` is not
    /// 4-byte-aligned, [`VmError::TextWriteProtected`] if `addr` falls in
    /// the text region while text write-protection is enabled, or
    /// [`VmError::OutOfBounds`] if `addr` is outside the address space.
    pub fn write_word(&mut self, addr: u32, value: u32) -> Result<(), VmError> {
        self.check_bounds(addr, 4, "store")?;
        self.check_alignment(addr, "store")?;
        if self.text_protect && addr < TEXT_BASE + TEXT_SIZE {
            return Err(VmError::TextWriteProtected { address: addr });
        }

        if let Some(offset) = window(addr, DISPLAY_BUFFER_BASE, DISPLAY_BUFFER_SIZE) {
            for i in 0..4u32 {
                let byte = (value >> (i * 8)) as u8;
                if byte != 0 {
                    let char_offset = offset + i;
                    let col = (char_offset % crate::soc::devices::display::COLS as u32) as usize;
                    let row = ((char_offset / crate::soc::devices::display::COLS as u32)
                        % crate::soc::devices::display::ROWS as u32) as usize;
                    self.display.write_char(col, row, byte);
                }
            }
            return Ok(());
        }
        if let Some(offset) = window(addr, DISPLAY_CTRL_BASE, DISPLAY_CTRL_SIZE) {
            self.display.write_control(offset, value);
            return Ok(());
        }
        if let Some(offset) = window(addr, TIMER_BASE, TIMER_SIZE) {
            self.timer.write_register(offset, value);
            return Ok(());
        }
        if let Some(offset) = window(addr, RT_TIMER_BASE, RT_TIMER_SIZE) {
            self.rt_timer.write_register(offset, value);
            return Ok(());
        }

        self.ram[addr as usize..addr as usize + 4].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn check_bounds(&self, addr: u32, size: u32, kind: &'static str) -> Result<(), VmError> {
        if addr.checked_add(size).is_none_or(|end| end > MEMORY_SIZE) {
            return Err(VmError::OutOfBounds { kind, address: addr });
        }
        Ok(())
    }

    fn check_alignment(&self, addr: u32, kind: &'static str) -> Result<(), VmError> {
        if addr % 4 != 0 {
            return Err(VmError::DataAddressMisaligned { kind, address: addr, width: 4 });
        }
        Ok(())
    }

    /// Resets the cycle timer and the real-time timer to their power-on
    /// state, leaving the display and the backing buffer untouched.
    pub fn reset_timers(&mut self) {
        self.timer = CycleTimer::new();
        self.rt_timer = RealTimeTimer::new();
    }

    /// Advances the cycle timer and the real-time timer by one instruction
    /// step, folding any interrupt request into `mip`.
    pub fn tick_devices(&mut self, csrs: &mut crate::core::arch::CsrFile) {
        if self.timer.tick() {
            csrs.set_mip_bits(crate::core::arch::csr::MIE_MTIE, true);
        }
        if self.rt_timer.check() {
            csrs.set_mip_bits(crate::core::arch::csr::MIE_RTIE, true);
        }
    }

    /// Returns up to `radius` instructions before and after `pc` (inclusive
    /// of `pc` itself), for a fault report's PC-centered context window.
    /// Addresses outside the assembled program's length pair with `None`.
    #[must_use]
    pub fn context_window(&self, pc: u32, radius: u32) -> Vec<(u32, Option<Instruction>)> {
        let center = i64::from(pc / 4);
        let radius = i64::from(radius);
        (center - radius..=center + radius)
            .filter(|i| *i >= 0)
            .map(|i| {
                let addr = TEXT_BASE + (i as u32) * 4;
                (addr, self.text.get(i as usize).cloned())
            })
            .collect()
    }

    /// Returns which named region, if any, `addr` falls in.
    #[must_use]
    pub fn region_of(addr: u32) -> Option<Region> {
        region_of(addr)
    }

    /// Dumps `length` bytes starting at `start_address` as hex and ASCII,
    /// sixteen bytes per line — a debugging convenience with no contract
    /// beyond fidelity to the backing buffer.
    #[must_use]
    pub fn dump(&self, start_address: u32, length: u32) -> String {
        let mut lines = Vec::new();
        let mut addr = start_address;
        let end = start_address.saturating_add(length).min(MEMORY_SIZE);
        while addr < end {
            let row_end = (addr + 16).min(end);
            let row = &self.ram[addr as usize..row_end as usize];
            let hex: Vec<String> = row.iter().map(|b| format!("{b:02X}")).collect();
            let ascii: String = row
                .iter()
                .map(|&b| if (0x20..0x7F).contains(&b) { b as char } else { '.' })
                .collect();
            lines.push(format!("{:#010x}  {:<48}  {}", addr, hex.join(" "), ascii));
            addr = row_end;
        }
        lines.join("\n")
    }
}

fn window(addr: u32, base: u32, size: u32) -> Option<u32> {
    (addr >= base && addr < base + size).then(|| addr - base)
}
