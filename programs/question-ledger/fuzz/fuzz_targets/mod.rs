//! Fuzz target modules
//!
//! Each module contains property-based tests for one part of the ledger.
//! Run all tests with: cargo test --release -p question-ledger-fuzz

pub mod ask_answer;
pub mod ledger_session;
pub mod revoke;
pub mod token_data;
pub mod transfer;
