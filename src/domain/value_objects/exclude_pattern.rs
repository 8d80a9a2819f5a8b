//! Exclude pattern value object
//!
//! Translates rsync `--exclude` globs into anchored regular expressions so the
//! file watcher can drop the same paths rsync itself would skip.
//!
//! Dialect:
//! - leading `/` anchors the pattern at the watched root, otherwise it may
//!   match at any directory level
//! - trailing `/` matches directories only (and therefore everything below them)
//! - `*` matches any run of non-separator characters
//! - `**` matches any run of characters, separators included
//! - `***` is the widest wildcard; `dir/***` matches `dir` itself and all of
//!   its contents
//! - `?` matches exactly one non-separator character
//! - `[...]` / `[!...]` are character classes, `\x` matches `x` literally
//! - inside a class, `[:alpha:]` and the other POSIX names work as in rsync

use std::fmt;

use regex::Regex;

/// Wildcard tokens and their regex replacements.
///
/// Longer tokens come first: at every position the first matching token wins,
/// so `***` must be tried before `**`, and `**` before `*`.
const WILDCARDS: &[(&str, &str)] = &[
    ("/***", "(?:/.*)?"),
    ("***", ".*"),
    ("**", ".*"),
    ("*", "[^/]*"),
    ("?", "[^/]"),
];

/// POSIX class names usable inside brackets, e.g. `[[:digit:]]`.
const POSIX_CLASSES: &[&str] = &[
    "alnum", "alpha", "ascii", "blank", "cntrl", "digit", "graph", "lower", "print", "punct",
    "space", "upper", "word", "xdigit",
];

/// A compiled rsync exclude glob, matched against root-relative paths.
#[derive(Clone)]
pub struct ExcludePattern {
    pattern: String,
    expression: String,
    regex: Option<Regex>,
}

impl ExcludePattern {
    /// Compile one exclude glob.
    ///
    /// Any string compiles. A pattern whose character classes do not form a
    /// valid expression is retried with `[` taken literally.
    pub fn compile(pattern: &str) -> Self {
        let expression = translate(pattern, true);
        let (expression, regex) = match Regex::new(&expression) {
            Ok(regex) => (expression, Some(regex)),
            Err(_) => {
                let literal = translate(pattern, false);
                let regex = Regex::new(&literal).ok();
                if regex.is_none() {
                    tracing::warn!(pattern, "exclude pattern could not be compiled, ignoring");
                }
                (literal, regex)
            }
        };

        Self {
            pattern: pattern.to_string(),
            expression,
            regex,
        }
    }

    /// Compile a list of globs, preserving order.
    pub fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Vec<Self> {
        patterns.iter().map(|p| Self::compile(p.as_ref())).collect()
    }

    /// Check a root-relative path (no leading or trailing separator).
    pub fn matches(&self, rel_path: &str) -> bool {
        self.regex
            .as_ref()
            .map(|regex| regex.is_match(rel_path))
            .unwrap_or(false)
    }

    /// The original glob.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The translated regular expression.
    pub fn as_regex_str(&self) -> &str {
        &self.expression
    }
}

impl fmt::Debug for ExcludePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExcludePattern")
            .field("pattern", &self.pattern)
            .field("expression", &self.expression)
            .finish()
    }
}

impl PartialEq for ExcludePattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for ExcludePattern {}

/// Check a path against a set of compiled patterns.
pub fn is_excluded(patterns: &[ExcludePattern], rel_path: &str) -> bool {
    patterns.iter().any(|p| p.matches(rel_path))
}

fn translate(pattern: &str, classes: bool) -> String {
    let (anchored, rest) = match pattern.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, pattern),
    };
    let (dir_only, body) = match rest.strip_suffix('/') {
        Some(body) => (true, body),
        None => (false, rest),
    };

    let mut expression = String::with_capacity(body.len() * 2 + 16);
    expression.push_str(if anchored { "^" } else { "(?:^|/)" });
    translate_body(body, classes, &mut expression);
    expression.push_str(if dir_only { "/" } else { "(?:/|$)" });
    expression
}

fn translate_body(body: &str, classes: bool, out: &mut String) {
    let mut rest = body;

    'scan: while let Some(c) = rest.chars().next() {
        for (token, replacement) in WILDCARDS {
            if let Some(after) = rest.strip_prefix(token) {
                out.push_str(replacement);
                rest = after;
                continue 'scan;
            }
        }

        match c {
            '\\' => {
                let escaped = rest[1..].chars().next();
                match escaped {
                    Some(e) => {
                        push_literal(e, out);
                        rest = &rest[1 + e.len_utf8()..];
                    }
                    None => {
                        push_literal('\\', out);
                        rest = "";
                    }
                }
            }
            '[' if classes => match class_end(rest) {
                Some(end) => {
                    push_class(&rest[1..end], out);
                    rest = &rest[end + 1..];
                }
                None => {
                    push_literal('[', out);
                    rest = &rest[1..];
                }
            },
            _ => {
                push_literal(c, out);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
}

/// Byte index of the `]` closing a class that opens at `s[0]`.
fn class_end(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 1;
    if matches!(bytes.get(i), Some(b'!') | Some(b'^')) {
        i += 1;
    }
    // A `]` right after the opening bracket is a member, not the terminator
    if bytes.get(i) == Some(&b']') {
        i += 1;
    }
    while i < bytes.len() {
        if let Some(len) = s.get(i..).and_then(posix_class_len) {
            i += len;
            continue;
        }
        if bytes[i] == b']' {
            return Some(i);
        }
        i += 1;
    }
    None
}

/// Length of a `[:name:]` sequence at the start of `s`, if it names a known class.
fn posix_class_len(s: &str) -> Option<usize> {
    let name = s.strip_prefix("[:")?;
    let end = name.find(":]")?;
    POSIX_CLASSES.contains(&&name[..end]).then_some(end + 4)
}

fn push_class(inner: &str, out: &mut String) {
    let (negated, members) = match inner.strip_prefix(['!', '^']) {
        Some(members) => (true, members),
        None => (false, inner),
    };

    out.push('[');
    if negated {
        // Classes never match the separator
        out.push_str("^/");
    }
    let mut rest = members;
    if let Some(after) = rest.strip_prefix(']') {
        out.push_str("\\]");
        rest = after;
    }
    while let Some(c) = rest.chars().next() {
        if let Some(len) = posix_class_len(rest) {
            out.push_str(&rest[..len]);
            rest = &rest[len..];
            continue;
        }
        match c {
            '[' | '\\' | '&' | '~' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
        rest = &rest[c.len_utf8()..];
    }
    out.push(']');
}

fn push_literal(c: char, out: &mut String) {
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}
