//! Line tokenization: comment stripping, label extraction, and splitting a
//! line's remainder into a mnemonic/directive plus its operands.
//!
//! Comment stripping and operand splitting are both string/char-literal
//! aware, so a `.string` directive's text may itself contain `#`, `;`, or
//! commas without being misparsed.

/// One tokenized source line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LexedLine {
    /// One-based source line number.
    pub line_no: usize,
    /// A label defined on this line, if any (the text before the colon).
    pub label: Option<String>,
    /// The directive (e.g. `.word`) or mnemonic (e.g. `addi`), lowercased.
    pub op: Option<String>,
    /// Raw operand text, split on top-level commas and trimmed.
    pub operands: Vec<String>,
}

/// Splits `source` into [`LexedLine`]s, discarding blank lines and lines
/// containing only a label or only a comment.
#[must_use]
pub fn lex(source: &str) -> Vec<LexedLine> {
    source
        .lines()
        .enumerate()
        .filter_map(|(idx, raw)| lex_line(idx + 1, raw))
        .collect()
}

fn lex_line(line_no: usize, raw: &str) -> Option<LexedLine> {
    let stripped = strip_comment(raw);
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (label, rest) = extract_label(trimmed);
    let rest = rest.trim();
    if rest.is_empty() {
        return Some(LexedLine { line_no, label, op: None, operands: Vec::new() });
    }

    let (op, operand_text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let operands = split_operands(operand_text.trim());

    Some(LexedLine {
        line_no,
        label,
        op: Some(op.to_ascii_lowercase()),
        operands,
    })
}

/// Removes a trailing `#` or `;` comment, ignoring delimiters that appear
/// inside a `"..."` or `'...'` literal.
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    let mut in_char = false;
    let mut escaped = false;
    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string || in_char => escaped = true,
            '"' if !in_char => in_string = !in_string,
            '\'' if !in_string => in_char = !in_char,
            '#' | ';' if !in_string && !in_char => return &line[..idx],
            _ => {}
        }
    }
    line
}

/// Splits a leading `label:` from the rest of the line, if present.
fn extract_label(line: &str) -> (Option<String>, &str) {
    if let Some(colon) = find_top_level_colon(line) {
        let (label, rest) = line.split_at(colon);
        (Some(label.trim().to_string()), &rest[1..])
    } else {
        (None, line)
    }
}

fn find_top_level_colon(line: &str) -> Option<usize> {
    let mut in_string = false;
    let mut in_char = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' if !in_char => in_string = !in_string,
            '\'' if !in_string => in_char = !in_char,
            ':' if !in_string && !in_char => return Some(idx),
            _ => {}
        }
    }
    None
}

/// Splits operand text on top-level commas, i.e. commas outside of
/// parentheses (`4(sp)`) and string/char literals.
fn split_operands(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut operands = Vec::new();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut in_char = false;
    let mut start = 0usize;
    for (idx, ch) in text.char_indices() {
        match ch {
            '"' if !in_char => in_string = !in_string,
            '\'' if !in_string => in_char = !in_char,
            '(' if !in_string && !in_char => depth += 1,
            ')' if !in_string && !in_char => depth -= 1,
            ',' if depth == 0 && !in_string && !in_char => {
                operands.push(text[start..idx].trim().to_string());
                start = idx + 1;
            }
            _ => {}
        }
    }
    operands.push(text[start..].trim().to_string());
    operands
}
