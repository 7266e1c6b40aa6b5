//! Manual load/store of question records.
//!
//! Answer, revoke, transfer and the record queries take the question PDA as
//! an unchecked account, so an id that was never asked (no account yet) and
//! one that was revoked (zeroed account) both fail with
//! `QuestionDoesNotExist` instead of an account-constraint error.

use crate::errors::LedgerError;
use crate::state::Question;
use anchor_lang::prelude::*;

/// Reads a question record, returning `None` when the id has no live record.
pub fn read_question(account: &AccountInfo, ledger: &Pubkey) -> Result<Option<Question>> {
    if account.owner != &crate::ID || account.data_is_empty() {
        return Ok(None);
    }
    let data = account.try_borrow_data()?;
    let question = Question::try_deserialize(&mut &data[..])?;
    if !question.status.exists() {
        return Ok(None);
    }
    require_keys_eq!(
        question.ledger,
        *ledger,
        LedgerError::QuestionLedgerMismatch
    );
    Ok(Some(question))
}

/// Reads a live question record.
pub fn load_question(account: &AccountInfo, ledger: &Pubkey) -> Result<Question> {
    read_question(account, ledger)?.ok_or_else(|| error!(LedgerError::QuestionDoesNotExist))
}

/// Writes `question` back, zeroing stale bytes past the new encoding.
pub fn store_question(account: &AccountInfo, question: &Question) -> Result<()> {
    let mut data = account.try_borrow_mut_data()?;
    data[8..].fill(0);
    // Borsh only; the discriminator at data[..8] is left as is
    AnchorSerialize::serialize(question, &mut &mut data[8..])
        .map_err(|_| anchor_lang::error::ErrorCode::AccountDidNotSerialize)?;
    Ok(())
}
