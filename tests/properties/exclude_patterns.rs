//! Exclude pattern behavior, table-driven plus a containment property.

use proptest::prelude::*;

use reflect::domain::value_objects::{is_excluded, ExcludePattern};

/// (pattern, path, excluded)
const CASES: &[(&str, &str, bool)] = &[
    // Unanchored names match at any depth, and everything below them
    ("node_modules", "node_modules", true),
    ("node_modules", "web/node_modules/react/index.js", true),
    ("node_modules", "my_node_modules", false),
    // Leading slash anchors at the root
    ("/target", "target/debug/app", true),
    ("/target", "crates/core/target/debug/app", false),
    // Trailing slash only matches as a directory
    ("logs/", "logs/today.txt", true),
    ("logs/", "logs", false),
    ("/.git/", ".git/HEAD", true),
    ("/.git/", "sub/.git/HEAD", false),
    // Single star stays within one segment
    ("*.swp", ".main.rs.swp", true),
    ("*.swp", "src/.main.rs.swp", true),
    ("src/*.rs", "src/main.rs", true),
    ("/src/*.rs", "src/bin/cli.rs", false),
    // Double star crosses separators
    ("/src/**.rs", "src/bin/cli.rs", true),
    ("/docs/**", "docs/a/b/c.md", true),
    // Triple star includes the directory itself
    ("/vendor/***", "vendor", true),
    ("/vendor/***", "vendor/lib/x.c", true),
    ("/vendor/***", "vendored", false),
    // Question mark is one non-separator character
    ("file?.txt", "file1.txt", true),
    ("file?.txt", "file10.txt", false),
    ("a?b", "a/b", false),
    // Dots and other regex metacharacters are literal
    (".env", ".env", true),
    (".env", "xenv", false),
    ("a+b(1)", "a+b(1)", true),
    // Character classes
    ("[ab].txt", "a.txt", true),
    ("[ab].txt", "c.txt", false),
    ("[!ab].txt", "c.txt", true),
    ("[!ab].txt", "a.txt", false),
    ("[[:digit:]].txt", "1.txt", true),
    ("[[:digit:]].txt", "a.txt", false),
    ("[![:alpha:]]x", "1x", true),
    ("[![:alpha:]]x", "ax", false),
    // Escapes
    ("\\*.txt", "*.txt", true),
    ("\\*.txt", "a.txt", false),
];

#[test]
fn exclude_table() {
    let failures: Vec<String> = CASES
        .iter()
        .filter(|(pattern, path, excluded)| {
            ExcludePattern::compile(pattern).matches(path) != *excluded
        })
        .map(|(pattern, path, excluded)| {
            format!(
                "{pattern:?} vs {path:?}: expected excluded={excluded}, regex {}",
                ExcludePattern::compile(pattern).as_regex_str()
            )
        })
        .collect();

    assert!(failures.is_empty(), "mismatches:\n{}", failures.join("\n"));
}

#[test]
fn any_pattern_in_the_set_excludes() {
    let patterns = ExcludePattern::compile_all(&[".git/", "*.tmp", "/build"]);
    assert!(is_excluded(&patterns, ".git/config"));
    assert!(is_excluded(&patterns, "deep/down/x.tmp"));
    assert!(is_excluded(&patterns, "build/out"));
    assert!(!is_excluded(&patterns, "src/build.rs"));
    assert!(!is_excluded(&[], "anything"));
}

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9_]{1,8}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: an unanchored literal name excludes the whole subtree below
    /// it, wherever it sits.
    #[test]
    fn property_literal_name_excludes_subtree(
        prefix in proptest::collection::vec(segment(), 0..4),
        name in segment(),
        suffix in proptest::collection::vec(segment(), 0..4),
    ) {
        let pattern = ExcludePattern::compile(&name);
        let path = prefix
            .iter()
            .chain(std::iter::once(&name))
            .chain(suffix.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join("/");
        prop_assert!(pattern.matches(&path));
    }

    /// PROPERTY: compiling never panics, whatever the input.
    #[test]
    fn property_any_pattern_compiles(pattern in ".{0,30}", path in "[a-z/]{0,30}") {
        let compiled = ExcludePattern::compile(&pattern);
        let _ = compiled.matches(&path);
        prop_assert_eq!(compiled.pattern(), pattern.as_str());
    }
}
