//! Fuzz target for question token transfers
//!
//! Tests invariants:
//! - Recipients must be contract accounts other than the owner
//! - Only the current holder moves a token, and `from` must match it
//! - Custody moves in both the record and the registry; content does not
//! - The new holder receives the refund on revoke
//!
//! Run with: cargo test --release -p question-ledger-fuzz transfer

use crate::*;
use proptest::prelude::*;

const OWNER: AccountKey = [0xaa; 32];
const ASKER: AccountKey = [0x01; 32];
const RECIPIENT: AccountKey = [0x02; 32];
const WALLET: AccountKey = [0xee; 32];

fn setup(reward: u64) -> (SimulatedLedger, [u8; 32]) {
    let mut ledger = SimulatedLedger::new(OWNER, 0);
    ledger.add_contract(ASKER, reward);
    ledger.add_contract(RECIPIENT, 0);
    ledger.add_wallet(WALLET, 0);
    let result = simulate_ask(&mut ledger, ASKER, ASKER, b"Who holds this?", reward, 1);
    assert!(result.is_success(), "{:?}", result);
    (ledger, question_id_of(b"Who holds this?"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn fuzz_transfer_then_revoke(
        reward in 0u64..10_000_000_000u64,
        data in prop::collection::vec(any::<u8>(), 0..=MAX_TRANSFER_DATA_LEN),
    ) {
        let (mut ledger, id) = setup(reward);

        let result = simulate_transfer(&mut ledger, ASKER, ASKER, RECIPIENT, id, &data);
        prop_assert!(result.is_success(), "{:?}", result);

        let q = ledger.record(&id).unwrap();
        prop_assert_eq!(q.holder, RECIPIENT);
        prop_assert_eq!(q.asker, ASKER);
        prop_assert_eq!(ledger.tokens_of(&RECIPIENT), vec![id]);
        prop_assert!(ledger.tokens_of(&ASKER).is_empty());

        // The former holder lost the right to revoke
        prop_assert!(simulate_revoke(&mut ledger, ASKER, id).is_error_named("UnauthorizedHolder"));
        prop_assert!(simulate_revoke(&mut ledger, RECIPIENT, id).is_success());
        prop_assert_eq!(ledger.balance_of(&RECIPIENT), reward);
        prop_assert_eq!(ledger.balance_of(&ASKER), 0);
    }

    #[test]
    fn fuzz_transfer_guards(signer in arb_id(), from in arb_id()) {
        let (mut ledger, id) = setup(100);
        let result = simulate_transfer(&mut ledger, signer, from, RECIPIENT, id, &[]);
        if signer != ASKER {
            prop_assert!(result.is_error_named("UnauthorizedHolder"));
        } else if from != ASKER {
            prop_assert!(result.is_error_named("TransferFromMismatch"));
        } else {
            prop_assert!(result.is_success());
        }
    }
}

#[test]
fn test_transfer_to_owner_rejected() {
    let (mut ledger, id) = setup(100);
    assert!(simulate_transfer(&mut ledger, ASKER, ASKER, OWNER, id, &[])
        .is_error_named("OwnerMustNotBeAsker"));
}

#[test]
fn test_transfer_to_plain_wallet_rejected() {
    let (mut ledger, id) = setup(100);
    assert!(simulate_transfer(&mut ledger, ASKER, ASKER, WALLET, id, &[])
        .is_error_named("OwnerMustNotBeAnEOA"));
    assert_eq!(ledger.record(&id).unwrap().holder, ASKER);
}

#[test]
fn test_transfer_to_self_rejected() {
    let (mut ledger, id) = setup(100);
    assert!(simulate_transfer(&mut ledger, ASKER, ASKER, ASKER, id, &[])
        .is_error_named("CannotTransferToSelf"));
}

#[test]
fn test_transfer_answered_question() {
    let (mut ledger, id) = setup(100);
    assert!(simulate_answer(&mut ledger, OWNER, id, b"You do", 2).is_success());
    assert!(simulate_transfer(&mut ledger, ASKER, ASKER, RECIPIENT, id, &[]).is_success());
    let q = ledger.record(&id).unwrap();
    assert_eq!(q.holder, RECIPIENT);
    assert_eq!(q.answer, b"You do".to_vec());
}

#[test]
fn test_transfer_unknown_id() {
    let (mut ledger, _) = setup(100);
    assert!(simulate_transfer(&mut ledger, ASKER, ASKER, RECIPIENT, question_id_of(b"nope"), &[])
        .is_error_named("QuestionDoesNotExist"));
}

#[test]
fn test_transfer_data_too_long() {
    let (mut ledger, id) = setup(100);
    let data = vec![0u8; MAX_TRANSFER_DATA_LEN + 1];
    assert!(simulate_transfer(&mut ledger, ASKER, ASKER, RECIPIENT, id, &data)
        .is_error_named("DataValueTooLong"));
}
