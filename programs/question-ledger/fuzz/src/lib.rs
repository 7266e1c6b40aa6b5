//! Property-based fuzz testing library for the Question Ledger program
//!
//! # Usage
//!
//! ```bash
//! # Run all property-based tests
//! cargo test --release
//!
//! # Run the fuzz test runner
//! cargo run --release
//!
//! # Run with more iterations
//! PROPTEST_CASES=10000 cargo test --release
//! ```

pub mod arbitrary;
pub mod invariants;
pub mod scenarios;

pub use arbitrary::*;
pub use invariants::*;
pub use scenarios::*;

// Include fuzz targets as test modules
#[cfg(test)]
#[path = "../fuzz_targets/ask_answer.rs"]
mod ask_answer_tests;

#[cfg(test)]
#[path = "../fuzz_targets/revoke.rs"]
mod revoke_tests;

#[cfg(test)]
#[path = "../fuzz_targets/transfer.rs"]
mod transfer_tests;

#[cfg(test)]
#[path = "../fuzz_targets/token_data.rs"]
mod token_data_tests;

#[cfg(test)]
#[path = "../fuzz_targets/ledger_session.rs"]
mod ledger_session_tests;
