//! Fuzz target for ask followed by answer
//!
//! Tests invariants:
//! - Answer pays the owner exactly the escrowed reward
//! - The answered record holds the submitted content and timestamp
//! - Answered records are terminal
//! - Asks are validated against the current minimum reward
//!
//! Run with: cargo test --release -p question-ledger-fuzz ask_answer

use crate::*;
use proptest::prelude::*;

const OWNER: AccountKey = [0xaa; 32];
const ASKER: AccountKey = [0x01; 32];

fn ledger_with_funded_asker(min_reward: u64, balance: u64) -> SimulatedLedger {
    let mut ledger = SimulatedLedger::new(OWNER, min_reward);
    ledger.add_contract(ASKER, balance);
    ledger
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    #[test]
    fn fuzz_ask_then_answer(input in any::<AskAnswerInput>()) {
        let mut ledger = ledger_with_funded_asker(input.min_reward, u64::MAX);
        let id = question_id_of(&input.question);

        let ask = simulate_ask(&mut ledger, ASKER, ASKER, &input.question, input.reward, input.ask_timestamp);
        prop_assert!(!ask.is_invariant_violation(), "{:?}", ask);

        if input.reward < input.min_reward {
            prop_assert!(ask.is_error_named("ValueMustBeGreaterThanOrEqualMinReward"));
            return Ok(());
        }
        if input.question.is_empty() || input.question.len() > MAX_QUESTION_LEN {
            prop_assert!(ask.is_error());
            prop_assert!(ledger.record(&id).is_err());
            return Ok(());
        }
        prop_assert!(ask.is_success(), "{:?}", ask);

        let owner_before = ledger.balance_of(&OWNER);
        let answer_timestamp = input.ask_timestamp + input.answer_delay;
        let answer = simulate_answer(&mut ledger, OWNER, id, &input.answer, answer_timestamp);
        prop_assert!(!answer.is_invariant_violation(), "{:?}", answer);

        if input.answer.len() > MAX_ANSWER_LEN {
            prop_assert!(answer.is_error_named("AnswerTooLong"));
            prop_assert!(!ledger.answered(&id));
            prop_assert_eq!(ledger.balance_of(&OWNER), owner_before);
            return Ok(());
        }
        prop_assert!(answer.is_success(), "{:?}", answer);

        let q = ledger.record(&id).unwrap().clone();
        prop_assert!(ledger.answered(&id));
        prop_assert_eq!(&q.answer, &input.answer);
        prop_assert_eq!(q.answer_timestamp, answer_timestamp);
        prop_assert_eq!(q.reward, input.reward);
        prop_assert_eq!(ledger.balance_of(&OWNER), owner_before + input.reward);
        prop_assert_eq!(ledger.total_escrowed, 0);

        // Terminal: neither a second answer nor a revoke changes anything
        let snapshot = q.clone();
        prop_assert!(simulate_answer(&mut ledger, OWNER, id, b"second", answer_timestamp + 1)
            .is_error_named("QuestionHasAlreadyBeenAnswered"));
        prop_assert!(simulate_revoke(&mut ledger, ASKER, id)
            .is_error_named("QuestionHasAlreadyBeenAnswered"));
        prop_assert_eq!(ledger.record(&id).unwrap(), &snapshot);
    }

    #[test]
    fn fuzz_non_owner_cannot_answer(reward in 0u64..1_000_000_000u64, signer in arb_id()) {
        prop_assume!(signer != OWNER);
        let mut ledger = ledger_with_funded_asker(0, reward);
        prop_assert!(simulate_ask(&mut ledger, ASKER, ASKER, b"How are you?", reward, 1).is_success());

        let id = question_id_of(b"How are you?");
        let result = simulate_answer(&mut ledger, signer, id, b"I am fine", 2);
        prop_assert!(result.is_error_named("UnauthorizedOwner"));
        prop_assert!(!ledger.answered(&id));
        prop_assert_eq!(ledger.total_escrowed, reward);
    }

    #[test]
    fn fuzz_min_reward_applies_to_new_asks_only(
        first_reward in 1u64..1_000_000u64,
        new_min in 1_000_001u64..2_000_000u64,
    ) {
        let mut ledger = ledger_with_funded_asker(0, u64::MAX / 2);
        prop_assert!(simulate_ask(&mut ledger, ASKER, ASKER, b"first", first_reward, 1).is_success());

        prop_assert!(simulate_set_min_reward(&mut ledger, OWNER, new_min).is_success());
        prop_assert!(simulate_set_min_reward(&mut ledger, OWNER, new_min)
            .is_error_named("MinRewardHasNotChanged"));

        prop_assert!(simulate_ask(&mut ledger, ASKER, ASKER, b"second", new_min - 1, 2)
            .is_error_named("ValueMustBeGreaterThanOrEqualMinReward"));
        prop_assert!(simulate_ask(&mut ledger, ASKER, ASKER, b"second", new_min, 2).is_success());

        // Earlier escrow is paid out unchanged
        let before = ledger.balance_of(&OWNER);
        prop_assert!(simulate_answer(&mut ledger, OWNER, question_id_of(b"first"), b"ok", 3).is_success());
        prop_assert_eq!(ledger.balance_of(&OWNER), before + first_reward);
    }
}

#[test]
fn test_how_are_you_with_one_sol() {
    let one_sol = 1_000_000_000u64;
    let mut ledger = ledger_with_funded_asker(0, 5 * one_sol);
    let id = question_id_of(b"How are you?");

    assert!(simulate_ask(&mut ledger, ASKER, ASKER, b"How are you?", one_sol, 1_700_000_000).is_success());
    assert_eq!(ledger.balance_of(&ASKER), 4 * one_sol);

    assert!(simulate_answer(&mut ledger, OWNER, id, b"I am fine", 1_700_000_060).is_success());
    assert_eq!(ledger.balance_of(&OWNER), one_sol);

    let q = ledger.record(&id).unwrap();
    assert_eq!(
        (q.asker, q.reward, q.ask_timestamp, q.answer_timestamp),
        (ASKER, one_sol, 1_700_000_000, 1_700_000_060)
    );
    assert_eq!(q.question, b"How are you?".to_vec());
    assert_eq!(q.answer, b"I am fine".to_vec());
    assert!(ledger.answered(&id));
}

#[test]
fn test_owner_cannot_ask() {
    let mut ledger = ledger_with_funded_asker(0, 1);
    ledger.balances.insert(OWNER, 1_000);
    assert!(simulate_ask(&mut ledger, OWNER, OWNER, b"Am I allowed?", 10, 1)
        .is_error_named("OwnerMustNotBeAsker"));
}

#[test]
fn test_plain_wallet_cannot_ask() {
    let mut ledger = ledger_with_funded_asker(0, 1);
    let wallet = [0xee; 32];
    ledger.add_wallet(wallet, 1_000);
    assert!(simulate_ask(&mut ledger, wallet, wallet, b"Am I allowed?", 10, 1)
        .is_error_named("OwnerMustNotBeAnEOA"));
}

#[test]
fn test_unknown_id_reads_fail() {
    let ledger = ledger_with_funded_asker(0, 1);
    let id = question_id_of(b"never asked");
    assert_eq!(ledger.record(&id).unwrap_err(), "QuestionDoesNotExist");
    assert!(!ledger.answered(&id));
}
