//! Instruction handlers for the Question Ledger program

pub mod constants;
pub mod lamport_transfer;
pub mod question_helpers;
pub mod question_store;
pub mod token_registry;
pub mod validation;

pub mod answer;
pub mod ask;
pub mod create_ledger;
pub mod ownership;
pub mod queries;
pub mod revoke;
pub mod set_data_for_token_id;
pub mod set_min_reward;
pub mod transfer;

#[allow(ambiguous_glob_reexports)]
pub use answer::*;
#[allow(ambiguous_glob_reexports)]
pub use ask::*;
#[allow(ambiguous_glob_reexports)]
pub use create_ledger::*;
pub use ownership::*;
pub use queries::*;
#[allow(ambiguous_glob_reexports)]
pub use revoke::*;
#[allow(ambiguous_glob_reexports)]
pub use set_data_for_token_id::*;
#[allow(ambiguous_glob_reexports)]
pub use set_min_reward::*;
#[allow(ambiguous_glob_reexports)]
pub use transfer::*;
