//! CLI Commands
//!
//! All nlqhash CLI commands organized as separate modules.

mod check;
mod hash;
mod selftest;

pub use check::check_mode;
pub use hash::hash_files;
pub use selftest::selftest_mode;
