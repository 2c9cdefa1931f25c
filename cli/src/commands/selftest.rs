//! Selftest Command
//!
//! Runs the startup harness and reports the implementation name. A
//! failing harness exits nonzero: a build with wrong digests must not
//! be deployed.

use anyhow::Result;
use std::path::Path;

use nlqhash::selftest::{run, run_with_fixture_dir, FixtureStatus};

/// Run the self-test harness, optionally against an explicit fixture
/// directory.
pub fn selftest_mode(fixtures: Option<&Path>) -> Result<()> {
    let report = match fixtures {
        Some(dir) => run_with_fixture_dir(dir),
        None => run(),
    };

    match report {
        Ok(report) => {
            match report.fixtures {
                FixtureStatus::Verified(n) => println!("fixtures: {n} blob(s) verified"),
                FixtureStatus::Skipped => println!("fixtures: directory absent, skipped"),
            }
            println!("implementation: {}", report.implementation);
            Ok(())
        }
        Err(e) => {
            eprintln!("SELF-TEST FAILED: {e}");
            eprintln!("This build must not be used for consensus hashing.");
            std::process::exit(1);
        }
    }
}
