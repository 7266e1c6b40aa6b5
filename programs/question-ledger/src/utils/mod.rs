//! Utility modules for the Question Ledger program

pub mod data_keys;
pub mod validation;
