//! The standard RISC-V register ABI names, `x0`-`x31`.

/// Maps a register name — `x0`..`x31` or an ABI alias such as `sp` or
/// `a0` — to its register number.
///
/// Returns `None` if `name` is not a recognized register.
#[must_use]
pub fn parse_register_name(name: &str) -> Option<u8> {
    if let Some(digits) = name.strip_prefix('x') {
        return digits.parse::<u8>().ok().filter(|n| *n < 32);
    }
    let index = match name {
        "zero" => 0,
        "ra" => 1,
        "sp" => 2,
        "gp" => 3,
        "tp" => 4,
        "t0" => 5,
        "t1" => 6,
        "t2" => 7,
        "s0" | "fp" => 8,
        "s1" => 9,
        "a0" => 10,
        "a1" => 11,
        "a2" => 12,
        "a3" => 13,
        "a4" => 14,
        "a5" => 15,
        "a6" => 16,
        "a7" => 17,
        "s2" => 18,
        "s3" => 19,
        "s4" => 20,
        "s5" => 21,
        "s6" => 22,
        "s7" => 23,
        "s8" => 24,
        "s9" => 25,
        "s10" => 26,
        "s11" => 27,
        "t3" => 28,
        "t4" => 29,
        "t5" => 30,
        "t6" => 31,
        _ => return None,
    };
    Some(index)
}

/// The canonical ABI name for register `index` (`index & 0x1F`).
#[must_use]
pub fn register_abi_name(index: u8) -> &'static str {
    const NAMES: [&str; 32] = [
        "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3",
        "a4", "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11",
        "t3", "t4", "t5", "t6",
    ];
    NAMES[usize::from(index & 0x1F)]
}
