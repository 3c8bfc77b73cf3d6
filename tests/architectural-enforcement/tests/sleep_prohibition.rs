//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT call sleep methods. Waiting for remote
//! state belongs in the readiness module, which bounds every wait by a
//! timeout or a fixed configured duration.
//! **Exceptions**: `client/core/src/readiness.rs`, test code

use architectural_enforcement::{find_violations, PRODUCTION_DIRS};

const ALLOWED: &[&str] = &["client/core/src/readiness.rs"];

fn is_sleep_call(code: &str) -> bool {
    code.contains("::sleep(") || code.contains(".sleep(")
}

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let violations = find_violations(PRODUCTION_DIRS, ALLOWED, is_sleep_call);

    if !violations.is_empty() {
        eprintln!("\nSleep calls found in production code!\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        eprintln!("\nWait for remote state through readiness::wait_for_counter instead.");

        panic!(
            "\nFound {} sleep violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

#[test]
fn test_sleep_detection() {
    assert!(is_sleep_call("    tokio::time::sleep(Duration::from_millis(10)).await;"));
    assert!(is_sleep_call("std::thread::sleep(d);"));
    assert!(!is_sleep_call("let asleep = false;"));
}
