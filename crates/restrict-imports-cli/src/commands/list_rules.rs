//! List rules command implementation.

use restrict_imports_core::{EXPECTED_ONE_RULE, IMPORT_DENIED, IMPORT_NOT_ALLOWED, RULE_NAME};

const DIAGNOSTICS: [((&str, &str), &str); 3] = [
    (
        EXPECTED_ONE_RULE,
        "File is governed by zero or several policies",
    ),
    (
        IMPORT_NOT_ALLOWED,
        "Import is not in the policy's can_import_from list",
    ),
    (
        IMPORT_DENIED,
        "Import matches the policy's cannot_import_from list",
    ),
];

/// Runs the list-rules command.
pub fn run() {
    println!("Diagnostics reported by {RULE_NAME}:\n");
    println!("{:<8} {:<20} Description", "Code", "Name");
    println!("{}", "-".repeat(76));

    for ((code, name), description) in DIAGNOSTICS {
        println!("{code:<8} {name:<20} {description}");
    }

    println!("\nPattern forms:");
    println!("  \"lodash\"              exact match");
    println!("  \"src/core/*\"          prefix match");
    println!("  {{ regex = \"^@app/\" }}  regular expression");
}
