//! Fuzz target for revoke
//!
//! Tests invariants:
//! - Revoke refunds exactly the escrowed reward to the holder
//! - The revoked record is cleared and its token burned
//! - The same text can be asked again and maps to the same id
//! - Only the current holder may revoke
//!
//! Run with: cargo test --release -p question-ledger-fuzz revoke

use crate::*;
use proptest::prelude::*;

const OWNER: AccountKey = [0xaa; 32];
const ASKER: AccountKey = [0x01; 32];
const SECOND: AccountKey = [0x02; 32];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    #[test]
    fn fuzz_ask_then_revoke(
        text in prop::collection::vec(any::<u8>(), 1..=MAX_QUESTION_LEN),
        reward in arb_reward_amount(),
        now in arb_timestamp(),
    ) {
        let mut ledger = SimulatedLedger::new(OWNER, 0);
        ledger.add_contract(ASKER, reward);
        ledger.add_contract(SECOND, reward);
        let id = question_id_of(&text);

        prop_assert!(simulate_ask(&mut ledger, ASKER, ASKER, &text, reward, now).is_success());
        prop_assert_eq!(ledger.balance_of(&ASKER), 0);
        prop_assert_eq!(ledger.total_supply(), 1);

        let result = simulate_revoke(&mut ledger, ASKER, id);
        prop_assert!(result.is_success(), "{:?}", result);
        prop_assert_eq!(ledger.balance_of(&ASKER), reward);
        prop_assert_eq!(ledger.total_escrowed, 0);
        prop_assert_eq!(ledger.total_supply(), 0);
        prop_assert!(ledger.record(&id).is_err());
        prop_assert!(!ledger.answered(&id));

        let cleared = ledger.questions.get(&id).cloned().unwrap_or_default();
        prop_assert!(cleared.question.is_empty());
        prop_assert!(cleared.answer.is_empty());
        prop_assert_eq!(cleared.asker, [0u8; 32]);
        prop_assert_eq!(cleared.reward, 0);
        prop_assert_eq!(cleared.ask_timestamp, 0);
        prop_assert_eq!(cleared.answer_timestamp, 0);

        // Same content, same id, askable again by anyone
        prop_assert!(simulate_ask(&mut ledger, SECOND, SECOND, &text, reward, now + 1).is_success());
        let q = ledger.record(&id).unwrap();
        prop_assert_eq!(q.asker, SECOND);
        prop_assert_eq!(q.question_id, id);
    }

    #[test]
    fn fuzz_only_holder_can_revoke(signer in arb_id(), reward in 0u64..1_000_000u64) {
        prop_assume!(signer != ASKER);
        let mut ledger = SimulatedLedger::new(OWNER, 0);
        ledger.add_contract(ASKER, reward);
        prop_assert!(simulate_ask(&mut ledger, ASKER, ASKER, b"mine", reward, 1).is_success());

        let id = question_id_of(b"mine");
        let result = simulate_revoke(&mut ledger, signer, id);
        prop_assert!(result.is_error_named("UnauthorizedHolder"));
        prop_assert!(ledger.record(&id).is_ok());
        prop_assert_eq!(ledger.total_escrowed, reward);
    }

    #[test]
    fn fuzz_double_ask_rejected(reward in 0u64..1_000_000u64) {
        let mut ledger = SimulatedLedger::new(OWNER, 0);
        ledger.add_contract(ASKER, 2 * reward);
        ledger.add_contract(SECOND, reward);

        prop_assert!(simulate_ask(&mut ledger, ASKER, ASKER, b"dup", reward, 1).is_success());
        prop_assert!(simulate_ask(&mut ledger, ASKER, ASKER, b"dup", reward, 2)
            .is_error_named("QuestionHasAlreadyBeenAsked"));
        prop_assert!(simulate_ask(&mut ledger, SECOND, SECOND, b"dup", reward, 2)
            .is_error_named("QuestionHasAlreadyBeenAsked"));
        prop_assert_eq!(ledger.balance_of(&ASKER), reward);
        prop_assert_eq!(ledger.total_supply(), 1);
    }
}

#[test]
fn test_revoke_unknown_id() {
    let mut ledger = SimulatedLedger::new(OWNER, 0);
    ledger.add_contract(ASKER, 0);
    assert!(simulate_revoke(&mut ledger, ASKER, question_id_of(b"nothing"))
        .is_error_named("QuestionDoesNotExist"));
}

#[test]
fn test_revoke_twice() {
    let mut ledger = SimulatedLedger::new(OWNER, 0);
    ledger.add_contract(ASKER, 10);
    let id = question_id_of(b"once");
    assert!(simulate_ask(&mut ledger, ASKER, ASKER, b"once", 10, 1).is_success());
    assert!(simulate_revoke(&mut ledger, ASKER, id).is_success());
    assert!(simulate_revoke(&mut ledger, ASKER, id).is_error_named("QuestionDoesNotExist"));
    assert_eq!(ledger.balance_of(&ASKER), 10);
}

#[test]
fn test_revoke_moves_last_token_into_slot() {
    let mut ledger = SimulatedLedger::new(OWNER, 0);
    ledger.add_contract(ASKER, 0);
    for text in [&b"a"[..], b"b", b"c"] {
        assert!(simulate_ask(&mut ledger, ASKER, ASKER, text, 0, 1).is_success());
    }
    assert!(simulate_revoke(&mut ledger, ASKER, question_id_of(b"a")).is_success());
    let order: Vec<_> = ledger.tokens.iter().map(|(id, _)| *id).collect();
    assert_eq!(order, vec![question_id_of(b"c"), question_id_of(b"b")]);
}
