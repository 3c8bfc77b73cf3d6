//! Integration Test: Unwrap Prohibition
//!
//! **Policy**: Production code propagates errors with `?`. `unwrap()` and
//! `expect()` are allowed in tests only. `unwrap_or`, `unwrap_or_else` and
//! `unwrap_or_default` are fine.

use architectural_enforcement::{find_violations, PRODUCTION_DIRS};

fn is_panicking_unwrap(code: &str) -> bool {
    code.contains(".unwrap()") || code.contains(".expect(")
}

#[test]
fn test_no_unwrap_in_production_code() {
    let violations = find_violations(PRODUCTION_DIRS, &[], is_panicking_unwrap);

    if !violations.is_empty() {
        eprintln!("\nunwrap()/expect() found in production code!\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        panic!(
            "\nFound {} unwrap/expect violation(s) in production code.",
            violations.len()
        );
    }
}

#[test]
fn test_unwrap_detection() {
    assert!(is_panicking_unwrap("let x = y.unwrap();"));
    assert!(is_panicking_unwrap("client.build().expect(\"client\")"));
    assert!(!is_panicking_unwrap("body.unwrap_or_default()"));
    assert!(!is_panicking_unwrap("v.unwrap_or_else(|| 1)"));
}
