//! Fuzz target for random instruction sequences against one ledger
//!
//! Tests invariants:
//! - Lamports are conserved and escrow always matches active rewards
//! - Only valid status transitions occur; answered records never change
//! - The registry agrees with every record's holder
//! - Failed instructions leave the ledger untouched
//! - Ownership never changes
//!
//! Run with: cargo test --release -p question-ledger-fuzz ledger_session

use crate::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn fuzz_ledger_session(session in any::<LedgerSession>()) {
        let mut ledger = new_session_ledger(session.min_reward);
        let initial_lamports = ledger.total_lamports();

        for (step, action) in session.actions.iter().enumerate() {
            let now = session.start_timestamp + step as i64;
            let before = ledger.clone();
            let result = simulate_action(&mut ledger, action, now);

            prop_assert!(
                !result.is_invariant_violation(),
                "Invariant violation: {:?}\nAction: {:?}\nSession: {:?}",
                result,
                action,
                session
            );

            if result.is_error() {
                prop_assert_eq!(&ledger.questions, &before.questions);
                prop_assert_eq!(&ledger.balances, &before.balances);
                prop_assert_eq!(&ledger.tokens, &before.tokens);
                prop_assert_eq!(ledger.min_reward, before.min_reward);
            }

            if let LedgerAction::ChangeOwnership { .. } = action {
                prop_assert!(result.is_error_named("TransferringOwnershipIsNotAllowed"));
            }

            if let LedgerAction::Ask { asker: Actor::Owner, .. } = action {
                prop_assert!(result.is_error_named("OwnerMustNotBeAsker"));
            }

            if let LedgerAction::Ask { asker: Actor::Wallet, .. } = action {
                prop_assert!(result.is_error_named("OwnerMustNotBeAnEOA"));
            }

            prop_assert_eq!(ledger.owner, Actor::Owner.key());
        }

        prop_assert_eq!(ledger.total_lamports(), initial_lamports);
        prop_assert!(ledger.check_invariants().is_none());
    }
}
