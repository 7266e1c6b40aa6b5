//! Fuzz target for per-question data keys
//!
//! Tests invariants:
//! - Each protected key is rejected with its own error
//! - Any other key is writable by the owner only
//! - Protected keys always read the record's current values
//!
//! Run with: cargo test --release -p question-ledger-fuzz token_data

use crate::*;
use proptest::prelude::*;

const OWNER: AccountKey = [0xaa; 32];
const ASKER: AccountKey = [0x01; 32];

fn setup() -> (SimulatedLedger, [u8; 32]) {
    let mut ledger = SimulatedLedger::new(OWNER, 0);
    ledger.add_contract(ASKER, 1_000);
    assert!(simulate_ask(&mut ledger, ASKER, ASKER, b"How are you?", 1_000, 42).is_success());
    (ledger, question_id_of(b"How are you?"))
}

fn is_protected(key: &[u8; 32]) -> bool {
    PROTECTED_KEYS
        .iter()
        .any(|(name, _)| padded_key(name.as_bytes()) == *key)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn fuzz_custom_keys_writable(
        key in arb_id(),
        value in prop::collection::vec(any::<u8>(), 0..=MAX_DATA_VALUE_LEN),
    ) {
        prop_assume!(!is_protected(&key));
        let (mut ledger, id) = setup();

        prop_assert!(simulate_set_data(&mut ledger, OWNER, id, key, &value).is_success());
        prop_assert_eq!(ledger.data_for(&id, &key).unwrap(), value);
    }

    #[test]
    fn fuzz_non_owner_cannot_write(signer in arb_id(), key in arb_id()) {
        prop_assume!(signer != OWNER);
        let (mut ledger, id) = setup();
        prop_assert!(simulate_set_data(&mut ledger, signer, id, key, b"x")
            .is_error_named("UnauthorizedOwner"));
    }
}

#[test]
fn test_each_protected_key_has_its_own_error() {
    let (mut ledger, id) = setup();
    for (name, error) in PROTECTED_KEYS {
        let result = simulate_set_data(&mut ledger, OWNER, id, padded_key(name.as_bytes()), b"forged");
        assert!(result.is_error_named(error), "{}: {:?}", name, result);
    }
    assert!(simulate_set_data(&mut ledger, OWNER, id, padded_key(b"Color"), b"blue").is_success());
}

#[test]
fn test_protected_keys_read_record() {
    let (mut ledger, id) = setup();
    assert_eq!(ledger.data_for(&id, &padded_key(b"Question")).unwrap(), b"How are you?".to_vec());
    assert_eq!(ledger.data_for(&id, &padded_key(b"Reward")).unwrap(), 1_000u64.to_le_bytes().to_vec());
    assert_eq!(ledger.data_for(&id, &padded_key(b"Asker")).unwrap(), ASKER.to_vec());
    assert_eq!(ledger.data_for(&id, &padded_key(b"AskTimestamp")).unwrap(), 42i64.to_le_bytes().to_vec());
    assert!(ledger.data_for(&id, &padded_key(b"AnswerTimestamp")).unwrap().is_empty());

    assert!(simulate_answer(&mut ledger, OWNER, id, b"I am fine", 50).is_success());
    assert_eq!(ledger.data_for(&id, &padded_key(b"Answer")).unwrap(), b"I am fine".to_vec());
    assert_eq!(ledger.data_for(&id, &padded_key(b"AnswerTimestamp")).unwrap(), 50i64.to_le_bytes().to_vec());
}

#[test]
fn test_unwritten_custom_key_is_empty() {
    let (ledger, id) = setup();
    assert!(ledger.data_for(&id, &padded_key(b"Color")).unwrap().is_empty());
}

#[test]
fn test_value_too_long() {
    let (mut ledger, id) = setup();
    let value = vec![0u8; MAX_DATA_VALUE_LEN + 1];
    assert!(simulate_set_data(&mut ledger, OWNER, id, padded_key(b"Color"), &value)
        .is_error_named("DataValueTooLong"));
}

#[test]
fn test_write_requires_live_record() {
    let (mut ledger, _) = setup();
    assert!(simulate_set_data(&mut ledger, OWNER, question_id_of(b"nope"), padded_key(b"Color"), b"x")
        .is_error_named("QuestionDoesNotExist"));
}
