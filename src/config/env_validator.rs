//! Validation of `REFLECT_*` environment values
//!
//! Invalid values are reported with a typo suggestion and otherwise ignored,
//! so a misspelt override never changes behaviour silently.

use std::io::Write;

/// Accepted spellings of a boolean override
pub const FLAG_VALUES: &[&str] = &["true", "false", "1", "0", "yes", "no", "on", "off"];

/// Parse a boolean override, warning on stderr when it is not one.
pub fn parse_flag(var: &str, value: &str) -> Option<bool> {
    parse_flag_with_writer(var, value, &mut std::io::stderr())
}

/// Parse with a custom writer (for testing)
pub fn parse_flag_with_writer<W: Write>(var: &str, value: &str, writer: &mut W) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        other => {
            let suggestion = suggest(other, FLAG_VALUES)
                .map(|s| format!(". Did you mean '{s}'?"))
                .unwrap_or_default();
            let _ = writeln!(writer, "Warning: Invalid {var} value '{value}'{suggestion}");
            let _ = writeln!(writer, "Valid values: {}", FLAG_VALUES.join(", "));
            None
        }
    }
}

/// Closest candidate within two edits, if any.
pub fn suggest<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|candidate| (*candidate, levenshtein(input, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist > 0 && *dist <= 2)
        .map(|(candidate, _)| candidate)
}

/// Levenshtein distance over bytes
pub fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.is_empty() {
        return b.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ac) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, bc) in b.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
