//! Arbitrary input generators for fuzz testing
//!
//! Generates random but valid inputs for testing ledger instructions.

use proptest::prelude::*;

use crate::scenarios::{AccountKey, MAX_ANSWER_LEN, MAX_QUESTION_LEN};

/// Arbitrary 32-byte identifier (account key, data key, etc.)
pub fn arb_id() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(any::<u8>())
}

/// Arbitrary reward amount with edge cases
pub fn arb_reward_amount() -> impl Strategy<Value = u64> {
    prop_oneof![
        // Edge cases
        Just(0u64),
        Just(1u64),
        Just(u64::MAX),
        Just(u64::MAX / 2),
        // Small amounts
        1_000u64..1_000_000u64,
        // Typical amounts (up to 10 SOL)
        1_000_000u64..10_000_000_000u64,
    ]
}

/// Arbitrary question text, mostly within bounds
pub fn arb_question_text() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        8 => prop::collection::vec(any::<u8>(), 1..=64),
        1 => Just(Vec::new()),
        1 => prop::collection::vec(any::<u8>(), MAX_QUESTION_LEN..=MAX_QUESTION_LEN + 8),
    ]
}

/// Arbitrary answer text, mostly within bounds
pub fn arb_answer_text() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        8 => prop::collection::vec(any::<u8>(), 0..=64),
        1 => prop::collection::vec(any::<u8>(), MAX_ANSWER_LEN..=MAX_ANSWER_LEN + 8),
    ]
}

/// Arbitrary timestamp (seconds since Unix epoch)
pub fn arb_timestamp() -> impl Strategy<Value = i64> {
    prop_oneof![
        Just(1i64),
        1_600_000_000i64..1_900_000_000i64,
    ]
}

/// Accounts taking part in a simulated session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Owner,
    /// Contract-capable account (index into the session's contracts)
    Contract(u8),
    /// Plain wallet
    Wallet,
}

pub const CONTRACT_COUNT: u8 = 3;
pub const OWNER_KEY: AccountKey = [0xaa; 32];
pub const WALLET_KEY: AccountKey = [0xee; 32];

impl Actor {
    pub fn key(self) -> AccountKey {
        match self {
            Actor::Owner => OWNER_KEY,
            Actor::Contract(i) => [i % CONTRACT_COUNT + 1; 32],
            Actor::Wallet => WALLET_KEY,
        }
    }
}

pub fn arb_actor() -> impl Strategy<Value = Actor> {
    prop_oneof![
        1 => Just(Actor::Owner),
        4 => (0..CONTRACT_COUNT).prop_map(Actor::Contract),
        1 => Just(Actor::Wallet),
    ]
}

/// One instruction in a simulated session. Questions are picked from a
/// small pool so asks, answers and revokes collide often.
#[derive(Debug, Clone)]
pub enum LedgerAction {
    Ask { asker: Actor, text: u8, reward: u64 },
    Answer { signer: Actor, text: u8, answer: Vec<u8> },
    Revoke { signer: Actor, text: u8 },
    SetMinReward { signer: Actor, value: u64 },
    SetData { signer: Actor, text: u8, key: [u8; 32], value: Vec<u8> },
    Transfer { signer: Actor, from: Actor, to: Actor, text: u8 },
    ChangeOwnership { signer: Actor },
}

pub const QUESTION_POOL: [&[u8]; 4] = [
    b"How are you?",
    b"What is the airspeed velocity of an unladen swallow?",
    b"gm?",
    b"Will it rain tomorrow?",
];

pub fn pool_text(index: u8) -> &'static [u8] {
    QUESTION_POOL[index as usize % QUESTION_POOL.len()]
}

fn arb_pool_index() -> impl Strategy<Value = u8> {
    0..QUESTION_POOL.len() as u8
}

fn arb_small_reward() -> impl Strategy<Value = u64> {
    prop_oneof![Just(0u64), 1u64..5_000_000_000u64]
}

pub fn arb_action() -> impl Strategy<Value = LedgerAction> {
    prop_oneof![
        4 => (arb_actor(), arb_pool_index(), arb_small_reward())
            .prop_map(|(asker, text, reward)| LedgerAction::Ask { asker, text, reward }),
        3 => (arb_actor(), arb_pool_index(), arb_answer_text())
            .prop_map(|(signer, text, answer)| LedgerAction::Answer { signer, text, answer }),
        2 => (arb_actor(), arb_pool_index())
            .prop_map(|(signer, text)| LedgerAction::Revoke { signer, text }),
        1 => (arb_actor(), arb_small_reward())
            .prop_map(|(signer, value)| LedgerAction::SetMinReward { signer, value }),
        1 => (arb_actor(), arb_pool_index(), arb_id(), prop::collection::vec(any::<u8>(), 0..=300))
            .prop_map(|(signer, text, key, value)| LedgerAction::SetData { signer, text, key, value }),
        2 => (arb_actor(), arb_actor(), arb_actor(), arb_pool_index())
            .prop_map(|(signer, from, to, text)| LedgerAction::Transfer { signer, from, to, text }),
        1 => arb_actor().prop_map(|signer| LedgerAction::ChangeOwnership { signer }),
    ]
}

/// A session of actions against one ledger
#[derive(Debug, Clone)]
pub struct LedgerSession {
    pub min_reward: u64,
    pub start_timestamp: i64,
    pub actions: Vec<LedgerAction>,
}

impl Arbitrary for LedgerSession {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            arb_small_reward(),
            arb_timestamp(),
            prop::collection::vec(arb_action(), 1..40),
        )
            .prop_map(|(min_reward, start_timestamp, actions)| LedgerSession {
                min_reward,
                start_timestamp,
                actions,
            })
            .boxed()
    }
}

/// Input for ask/answer fuzz testing
#[derive(Debug, Clone)]
pub struct AskAnswerInput {
    pub question: Vec<u8>,
    pub answer: Vec<u8>,
    pub reward: u64,
    pub min_reward: u64,
    pub ask_timestamp: i64,
    pub answer_delay: i64,
}

impl Arbitrary for AskAnswerInput {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            arb_question_text(),
            arb_answer_text(),
            arb_reward_amount(),
            arb_reward_amount(),
            arb_timestamp(),
            0i64..1_000_000i64,
        )
            .prop_map(|(question, answer, reward, min_reward, ask_timestamp, answer_delay)| {
                AskAnswerInput {
                    question,
                    answer,
                    reward,
                    min_reward,
                    ask_timestamp,
                    answer_delay,
                }
            })
            .boxed()
    }
}
