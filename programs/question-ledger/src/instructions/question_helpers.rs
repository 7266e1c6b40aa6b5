//! Shared helpers for the question lifecycle (ask, answer, revoke, transfer)
//!
//! These mutate only in-memory `Ledger` / `Question` values. Handlers move
//! lamports first and apply these afterwards, so a failed payout never leaves
//! a record marked answered or revoked.

use crate::errors::LedgerError;
use crate::state::{Ledger, Question, QuestionStatus};
use anchor_lang::prelude::*;

/// A new question must escrow at least the current minimum reward.
pub fn validate_reward(ledger: &Ledger, reward: u64) -> Result<()> {
    require!(
        reward >= ledger.min_reward,
        LedgerError::ValueMustBeGreaterThanOrEqualMinReward
    );
    Ok(())
}

/// Populates a fresh (or previously revoked) record as active.
#[allow(clippy::too_many_arguments)]
pub fn init_question_fields(
    question: &mut Question,
    question_id: [u8; 32],
    ledger: Pubkey,
    asker: Pubkey,
    reward: u64,
    text: Vec<u8>,
    now: i64,
    bump: u8,
) -> Result<()> {
    require!(
        !question.status.exists(),
        LedgerError::QuestionHasAlreadyBeenAsked
    );
    require!(
        question.status.can_transition_to(QuestionStatus::Active),
        LedgerError::InvalidStatusTransition
    );

    *question = Question {
        question_id,
        ledger,
        asker,
        holder: asker,
        reward,
        question: text,
        answer: Vec::new(),
        status: QuestionStatus::Active,
        ask_timestamp: now,
        answer_timestamp: 0,
        bump,
    };
    Ok(())
}

/// Checks that a record can still be answered or revoked.
pub fn require_unanswered(question: &Question) -> Result<()> {
    require!(
        question.status.exists(),
        LedgerError::QuestionDoesNotExist
    );
    require!(
        !question.answered(),
        LedgerError::QuestionHasAlreadyBeenAnswered
    );
    Ok(())
}

/// Marks an active record answered.
pub fn apply_answer(question: &mut Question, answer: Vec<u8>, now: i64) -> Result<()> {
    require_unanswered(question)?;
    require!(
        question.status.can_transition_to(QuestionStatus::Answered),
        LedgerError::InvalidStatusTransition
    );
    question.answer = answer;
    question.answer_timestamp = now;
    question.status = QuestionStatus::Answered;
    Ok(())
}

/// Zeroes an active record so the id can be asked again.
pub fn clear_question(question: &mut Question) -> Result<()> {
    require_unanswered(question)?;
    require!(
        question.status.can_transition_to(QuestionStatus::Nonexistent),
        LedgerError::InvalidStatusTransition
    );
    *question = Question::default();
    Ok(())
}

/// Accounts for a new escrow. The token itself is placed by `token_registry::push_token`.
pub fn record_ask(ledger: &mut Ledger, reward: u64) -> Result<()> {
    ledger.total_escrowed = ledger
        .total_escrowed
        .checked_add(reward)
        .ok_or(LedgerError::ArithmeticOverflow)?;
    ledger.total_asked = ledger
        .total_asked
        .checked_add(1)
        .ok_or(LedgerError::ArithmeticOverflow)?;
    Ok(())
}

/// Accounts for a reward paid out to the owner. The token stays minted.
pub fn record_answer(ledger: &mut Ledger, reward: u64) -> Result<()> {
    ledger.total_escrowed = ledger
        .total_escrowed
        .checked_sub(reward)
        .ok_or(LedgerError::ArithmeticOverflow)?;
    ledger.total_answered = ledger
        .total_answered
        .checked_add(1)
        .ok_or(LedgerError::ArithmeticOverflow)?;
    Ok(())
}

/// Accounts for a refunded escrow.
pub fn record_revoke(ledger: &mut Ledger, reward: u64) -> Result<()> {
    ledger.total_escrowed = ledger
        .total_escrowed
        .checked_sub(reward)
        .ok_or(LedgerError::ArithmeticOverflow)?;
    ledger.total_revoked = ledger
        .total_revoked
        .checked_add(1)
        .ok_or(LedgerError::ArithmeticOverflow)?;
    Ok(())
}

/// Validates a custody move and applies it to the record.
pub fn move_token(question: &mut Question, signer: &Pubkey, from: &Pubkey, to: &Pubkey) -> Result<()> {
    require!(
        question.status.exists(),
        LedgerError::QuestionDoesNotExist
    );
    require!(question.holder == *signer, LedgerError::UnauthorizedHolder);
    require!(question.holder == *from, LedgerError::TransferFromMismatch);
    require!(from != to, LedgerError::CannotTransferToSelf);
    question.holder = *to;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::error_code;

    fn ledger_with_min(min_reward: u64) -> Ledger {
        Ledger {
            owner: Pubkey::new_unique(),
            min_reward,
            ..Default::default()
        }
    }

    fn active_question(asker: Pubkey, reward: u64) -> Question {
        let mut q = Question::default();
        init_question_fields(
            &mut q,
            [9u8; 32],
            Pubkey::new_unique(),
            asker,
            reward,
            b"How are you?".to_vec(),
            1_000,
            254,
        )
        .unwrap();
        q
    }

    mod ask {
        use super::*;

        #[test]
        fn test_reward_below_minimum() {
            let ledger = ledger_with_min(100);
            let err = validate_reward(&ledger, 99).unwrap_err();
            assert_eq!(
                error_code(err),
                u32::from(LedgerError::ValueMustBeGreaterThanOrEqualMinReward)
            );
        }

        #[test]
        fn test_reward_at_minimum() {
            let ledger = ledger_with_min(100);
            assert!(validate_reward(&ledger, 100).is_ok());
        }

        #[test]
        fn test_init_sets_holder_to_asker() {
            let asker = Pubkey::new_unique();
            let q = active_question(asker, 50);
            assert_eq!(q.status, QuestionStatus::Active);
            assert_eq!(q.asker, asker);
            assert_eq!(q.holder, asker);
            assert_eq!(q.reward, 50);
            assert_eq!(q.ask_timestamp, 1_000);
            assert_eq!(q.answer_timestamp, 0);
            assert!(q.answer.is_empty());
        }

        #[test]
        fn test_active_id_cannot_be_asked_again() {
            let mut q = active_question(Pubkey::new_unique(), 50);
            let err = init_question_fields(
                &mut q,
                [9u8; 32],
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                50,
                b"How are you?".to_vec(),
                2_000,
                254,
            )
            .unwrap_err();
            assert_eq!(
                error_code(err),
                u32::from(LedgerError::QuestionHasAlreadyBeenAsked)
            );
            assert_eq!(q.ask_timestamp, 1_000);
        }

        #[test]
        fn test_answered_id_cannot_be_asked_again() {
            let mut q = active_question(Pubkey::new_unique(), 50);
            apply_answer(&mut q, b"I am fine".to_vec(), 1_500).unwrap();
            let err = init_question_fields(
                &mut q,
                [9u8; 32],
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                50,
                b"How are you?".to_vec(),
                2_000,
                254,
            )
            .unwrap_err();
            assert_eq!(
                error_code(err),
                u32::from(LedgerError::QuestionHasAlreadyBeenAsked)
            );
        }

        #[test]
        fn test_revoked_id_can_be_asked_again() {
            let mut q = active_question(Pubkey::new_unique(), 50);
            clear_question(&mut q).unwrap();
            let second = Pubkey::new_unique();
            init_question_fields(
                &mut q,
                [9u8; 32],
                Pubkey::new_unique(),
                second,
                70,
                b"How are you?".to_vec(),
                3_000,
                254,
            )
            .unwrap();
            assert_eq!(q.asker, second);
            assert_eq!(q.reward, 70);
            assert_eq!(q.ask_timestamp, 3_000);
        }
    }

    mod answer {
        use super::*;

        #[test]
        fn test_answer_marks_answered() {
            let mut q = active_question(Pubkey::new_unique(), 50);
            apply_answer(&mut q, b"I am fine".to_vec(), 1_500).unwrap();
            assert!(q.answered());
            assert_eq!(q.answer, b"I am fine".to_vec());
            assert_eq!(q.answer_timestamp, 1_500);
            assert_eq!(q.reward, 50);
        }

        #[test]
        fn test_answer_is_terminal() {
            let mut q = active_question(Pubkey::new_unique(), 50);
            apply_answer(&mut q, b"I am fine".to_vec(), 1_500).unwrap();

            let err = apply_answer(&mut q, b"changed".to_vec(), 1_600).unwrap_err();
            assert_eq!(
                error_code(err),
                u32::from(LedgerError::QuestionHasAlreadyBeenAnswered)
            );
            let err = clear_question(&mut q).unwrap_err();
            assert_eq!(
                error_code(err),
                u32::from(LedgerError::QuestionHasAlreadyBeenAnswered)
            );
            assert_eq!(q.answer, b"I am fine".to_vec());
            assert_eq!(q.answer_timestamp, 1_500);
        }

        #[test]
        fn test_answer_nonexistent() {
            let mut q = Question::default();
            let err = apply_answer(&mut q, b"I am fine".to_vec(), 1_500).unwrap_err();
            assert_eq!(error_code(err), u32::from(LedgerError::QuestionDoesNotExist));
        }
    }

    mod revoke {
        use super::*;

        #[test]
        fn test_clear_zeroes_every_field() {
            let mut q = active_question(Pubkey::new_unique(), 50);
            clear_question(&mut q).unwrap();
            assert_eq!(q.status, QuestionStatus::Nonexistent);
            assert_eq!(q.asker, Pubkey::default());
            assert_eq!(q.holder, Pubkey::default());
            assert_eq!(q.reward, 0);
            assert!(q.question.is_empty());
            assert_eq!(q.ask_timestamp, 0);
        }

        #[test]
        fn test_clear_nonexistent() {
            let mut q = Question::default();
            let err = clear_question(&mut q).unwrap_err();
            assert_eq!(error_code(err), u32::from(LedgerError::QuestionDoesNotExist));
        }
    }

    mod counters {
        use super::*;

        #[test]
        fn test_escrow_accounting() {
            let mut ledger = ledger_with_min(0);
            record_ask(&mut ledger, 100).unwrap();
            record_ask(&mut ledger, 40).unwrap();
            assert_eq!(ledger.total_escrowed, 140);

            record_answer(&mut ledger, 100).unwrap();
            assert_eq!(ledger.total_escrowed, 40);

            record_revoke(&mut ledger, 40).unwrap();
            assert_eq!(ledger.total_escrowed, 0);
            assert_eq!(
                (ledger.total_asked, ledger.total_answered, ledger.total_revoked),
                (2, 1, 1)
            );
        }

        #[test]
        fn test_escrow_overflow() {
            let mut ledger = ledger_with_min(0);
            record_ask(&mut ledger, u64::MAX).unwrap();
            let err = record_ask(&mut ledger, 1).unwrap_err();
            assert_eq!(error_code(err), u32::from(LedgerError::ArithmeticOverflow));
        }

        #[test]
        fn test_refund_more_than_escrowed() {
            let mut ledger = ledger_with_min(0);
            record_ask(&mut ledger, 10).unwrap();
            let err = record_revoke(&mut ledger, 11).unwrap_err();
            assert_eq!(error_code(err), u32::from(LedgerError::ArithmeticOverflow));
        }
    }

    mod transfer {
        use super::*;

        #[test]
        fn test_move_updates_holder_only() {
            let asker = Pubkey::new_unique();
            let mut q = active_question(asker, 50);
            let to = Pubkey::new_unique();
            move_token(&mut q, &asker, &asker, &to).unwrap();
            assert_eq!(q.holder, to);
            assert_eq!(q.asker, asker);
            assert_eq!(q.reward, 50);
        }

        #[test]
        fn test_move_requires_holder_signer() {
            let asker = Pubkey::new_unique();
            let mut q = active_question(asker, 50);
            let stranger = Pubkey::new_unique();
            let err = move_token(&mut q, &stranger, &asker, &Pubkey::new_unique()).unwrap_err();
            assert_eq!(error_code(err), u32::from(LedgerError::UnauthorizedHolder));
        }

        #[test]
        fn test_move_from_mismatch() {
            let asker = Pubkey::new_unique();
            let mut q = active_question(asker, 50);
            let err = move_token(&mut q, &asker, &Pubkey::new_unique(), &Pubkey::new_unique())
                .unwrap_err();
            assert_eq!(error_code(err), u32::from(LedgerError::TransferFromMismatch));
        }

        #[test]
        fn test_move_to_self() {
            let asker = Pubkey::new_unique();
            let mut q = active_question(asker, 50);
            let err = move_token(&mut q, &asker, &asker, &asker).unwrap_err();
            assert_eq!(error_code(err), u32::from(LedgerError::CannotTransferToSelf));
        }

        #[test]
        fn test_move_nonexistent() {
            let mut q = Question::default();
            let key = Pubkey::default();
            let err = move_token(&mut q, &key, &key, &Pubkey::new_unique()).unwrap_err();
            assert_eq!(error_code(err), u32::from(LedgerError::QuestionDoesNotExist));
        }
    }
}
