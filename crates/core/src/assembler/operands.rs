//! Operand parsing: registers, immediates (decimal, hex, binary, and
//! character literals), and `offset(reg)` memory operands.

use crate::common::error::AssembleError;
use crate::isa::abi::parse_register_name;

/// Parses a register operand, accepting both `xN` and ABI names (`sp`, `a0`,
/// ...). Name lookup is case-insensitive: `A0` and `SP` resolve the same as
/// `a0` and `sp`.
pub fn parse_register(line: usize, text: &str) -> Result<u8, AssembleError> {
    let trimmed = text.trim();
    parse_register_name(&trimmed.to_ascii_lowercase()).ok_or_else(|| AssembleError::InvalidRegister {
        line,
        text: trimmed.to_string(),
    })
}

/// Parses an immediate: a decimal, `0x`-prefixed hex, `0b`-prefixed binary
/// number, or a single-quoted character literal such as `'a'` or `'\n'`.
pub fn parse_immediate(line: usize, text: &str) -> Result<i64, AssembleError> {
    let text = text.trim();
    let invalid = || AssembleError::InvalidImmediate { line, text: text.to_string() };

    if let Some(lit) = text.strip_prefix('\'') {
        let lit = lit.strip_suffix('\'').ok_or_else(invalid)?;
        return Ok(i64::from(parse_char_literal(lit).ok_or_else(invalid)?));
    }

    let (negative, text) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let value = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).map_err(|_| invalid())?
    } else if let Some(bin) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        i64::from_str_radix(bin, 2).map_err(|_| invalid())?
    } else {
        text.parse::<i64>().map_err(|_| invalid())?
    };

    Ok(if negative { -value } else { value })
}

/// Resolves a character literal's body (already stripped of its quotes) to
/// its ASCII code, handling the common backslash escapes.
fn parse_char_literal(body: &str) -> Option<u32> {
    let mut chars = body.chars();
    let value = match chars.next()? {
        '\\' => match chars.next()? {
            'n' => b'\n',
            't' => b'\t',
            'r' => b'\r',
            '0' => 0,
            '\\' => b'\\',
            '\'' => b'\'',
            '"' => b'"',
            other => other as u8,
        },
        other => other as u8,
    };
    if chars.next().is_some() {
        return None;
    }
    Some(u32::from(value))
}

/// Parses a `offset(reg)` memory operand used by loads, stores, `JALR`, and
/// CSR immediate addresses into `(offset, register)`.
pub fn parse_memory_operand(line: usize, text: &str) -> Result<(i64, u8), AssembleError> {
    let text = text.trim();
    let open = text.find('(').ok_or_else(|| AssembleError::SyntaxError {
        line,
        reason: format!("expected 'offset(reg)', got '{text}'"),
    })?;
    let close = text.rfind(')').ok_or_else(|| AssembleError::SyntaxError {
        line,
        reason: format!("expected 'offset(reg)', got '{text}'"),
    })?;
    let offset_text = text[..open].trim();
    let reg_text = text[open + 1..close].trim();
    let offset = if offset_text.is_empty() { 0 } else { parse_immediate(line, offset_text)? };
    let reg = parse_register(line, reg_text)?;
    Ok((offset, reg))
}
