//! Events emitted by the Question Ledger program
//!
//! Indexers follow these through log subscriptions.

use anchor_lang::prelude::*;

/// Emitted when a ledger is created for an owner
#[event]
pub struct LedgerCreated {
    pub ledger: Pubkey,
    pub owner: Pubkey,
    pub min_reward: u64,
    pub timestamp: i64,
}

/// Emitted when a question is asked and its reward escrowed
#[event]
pub struct QuestionAsked {
    pub asker: Pubkey,
    pub question_id: [u8; 32],
    pub reward: u64,
    pub timestamp: i64,
}

/// Emitted when the owner answers a question and receives the reward
#[event]
pub struct QuestionAnswered {
    pub asker: Pubkey,
    pub question_id: [u8; 32],
    pub reward: u64,
    pub timestamp: i64,
}

/// Emitted when a question is revoked and its reward refunded
#[event]
pub struct QuestionRevoked {
    pub asker: Pubkey,
    pub question_id: [u8; 32],
    pub reward: u64,
    pub timestamp: i64,
}

/// Emitted when the minimum reward changes
#[event]
pub struct MinRewardUpdated {
    pub old_min_reward: u64,
    pub new_min_reward: u64,
    pub timestamp: i64,
}

/// Emitted when a free-form data key of a question is written
#[event]
pub struct TokenIdDataChanged {
    pub question_id: [u8; 32],
    pub data_key: [u8; 32],
    pub value: Vec<u8>,
    pub timestamp: i64,
}

/// Emitted when custody of a question token moves
#[event]
pub struct QuestionTransferred {
    pub question_id: [u8; 32],
    pub from: Pubkey,
    pub to: Pubkey,
    pub force: bool,
    pub data: Vec<u8>,
    pub timestamp: i64,
}
