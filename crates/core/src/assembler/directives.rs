//! Data directives: `.word`, `.byte`, `.string`, `.asciiz`, and the `.text`
//! / `.data` section switches.

use crate::common::error::AssembleError;

use super::operands::parse_immediate;

/// Which region a line's bytes (or instructions) are placed into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    /// The instruction stream.
    Text,
    /// Initialized data.
    Data,
}

/// Parses a quoted string literal's escapes into raw bytes, without its
/// surrounding quotes.
pub fn parse_string_literal(line: usize, text: &str) -> Result<Vec<u8>, AssembleError> {
    let body = text
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .ok_or_else(|| AssembleError::SyntaxError {
            line,
            reason: format!("expected a quoted string, got '{text}'"),
        })?;

    let mut bytes = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            let escaped = chars.next().ok_or_else(|| AssembleError::SyntaxError {
                line,
                reason: "unterminated escape sequence".to_string(),
            })?;
            bytes.push(match escaped {
                'n' => b'\n',
                't' => b'\t',
                'r' => b'\r',
                '0' => 0,
                '\\' => b'\\',
                '"' => b'"',
                other => other as u8,
            });
        } else {
            bytes.push(ch as u8);
        }
    }
    Ok(bytes)
}

/// The byte length a `.word`/`.byte`/`.string`/`.asciiz` directive
/// contributes to the data region, without yet emitting its bytes.
pub fn directive_size(line: usize, directive: &str, operands: &[String]) -> Result<u32, AssembleError> {
    match directive {
        ".word" => Ok(4 * operands.len() as u32),
        ".byte" => Ok(operands.len() as u32),
        ".string" => Ok(parse_string_literal(line, operand_or_err(line, directive, operands)?)?.len() as u32),
        ".asciiz" => Ok(parse_string_literal(line, operand_or_err(line, directive, operands)?)?.len() as u32 + 1),
        other => Err(AssembleError::InvalidDirective { line, directive: other.to_string() }),
    }
}

/// Emits the raw bytes a data directive contributes, in source order.
pub fn directive_bytes(line: usize, directive: &str, operands: &[String]) -> Result<Vec<u8>, AssembleError> {
    match directive {
        ".word" => {
            let mut bytes = Vec::with_capacity(4 * operands.len());
            for operand in operands {
                let value = parse_immediate(line, operand)?;
                bytes.extend_from_slice(&(value as i32 as u32).to_le_bytes());
            }
            Ok(bytes)
        }
        ".byte" => operands
            .iter()
            .map(|operand| Ok(parse_immediate(line, operand)? as u8))
            .collect(),
        ".string" => parse_string_literal(line, operand_or_err(line, directive, operands)?),
        ".asciiz" => {
            let mut bytes = parse_string_literal(line, operand_or_err(line, directive, operands)?)?;
            bytes.push(0);
            Ok(bytes)
        }
        other => Err(AssembleError::InvalidDirective { line, directive: other.to_string() }),
    }
}

fn operand_or_err<'a>(line: usize, directive: &str, operands: &'a [String]) -> Result<&'a str, AssembleError> {
    operands
        .first()
        .map(String::as_str)
        .ok_or_else(|| AssembleError::InvalidDirective { line, directive: directive.to_string() })
}
