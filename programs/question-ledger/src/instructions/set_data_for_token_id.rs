//! Write a free-form data key of a question (owner only)
//!
//! Keys mirroring the question record are rejected; they change only through
//! ask, answer and revoke.

use anchor_lang::prelude::*;

use crate::errors::LedgerError;
use crate::events::TokenIdDataChanged;
use crate::instructions::constants::{LEDGER_SEED, QUESTION_SEED, TOKEN_DATA_SEED};
use crate::instructions::question_store::load_question;
use crate::instructions::validation::require_owner;
use crate::state::{Ledger, TokenData, MAX_DATA_VALUE_LEN};
use crate::utils::data_keys::CustomDataKey;

#[derive(Accounts)]
#[instruction(question_id: [u8; 32], data_key: [u8; 32])]
pub struct SetDataForTokenId<'info> {
    #[account(
        seeds = [LEDGER_SEED, ledger.owner.as_ref()],
        bump = ledger.bump
    )]
    pub ledger: Account<'info, Ledger>,

    /// CHECK: Loaded in handler so a missing record reports QuestionDoesNotExist
    #[account(
        seeds = [QUESTION_SEED, ledger.key().as_ref(), question_id.as_ref()],
        bump
    )]
    pub question: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = owner,
        space = TokenData::SIZE,
        seeds = [
            TOKEN_DATA_SEED,
            ledger.key().as_ref(),
            question_id.as_ref(),
            data_key.as_ref()
        ],
        bump
    )]
    pub token_data: Account<'info, TokenData>,

    #[account(mut)]
    pub owner: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<SetDataForTokenId>,
    question_id: [u8; 32],
    data_key: [u8; 32],
    value: Vec<u8>,
) -> Result<()> {
    require_owner(&ctx.accounts.ledger, &ctx.accounts.owner.key())?;
    let ledger_key = ctx.accounts.ledger.key();
    load_question(&ctx.accounts.question.to_account_info(), &ledger_key)?;

    let key = CustomDataKey::try_from(data_key)?;
    let now = Clock::get()?.unix_timestamp;
    write_token_data(
        &mut ctx.accounts.token_data,
        ledger_key,
        question_id,
        &key,
        value.clone(),
        now,
        ctx.bumps.token_data,
    )?;

    emit!(TokenIdDataChanged {
        question_id,
        data_key,
        value,
        timestamp: now,
    });

    Ok(())
}

/// Stores `value` under a free-form key. Protected keys cannot reach this
/// path since a `CustomDataKey` is never built from one.
pub fn write_token_data(
    entry: &mut TokenData,
    ledger: Pubkey,
    question_id: [u8; 32],
    key: &CustomDataKey,
    value: Vec<u8>,
    now: i64,
    bump: u8,
) -> Result<()> {
    require!(
        value.len() <= MAX_DATA_VALUE_LEN,
        LedgerError::DataValueTooLong
    );
    entry.ledger = ledger;
    entry.question_id = question_id;
    entry.data_key = *key.as_bytes();
    entry.value = value;
    entry.updated_at = now;
    entry.bump = bump;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::error_code;
    use crate::utils::data_keys::padded_key;

    #[test]
    fn test_write_and_overwrite() {
        let key = CustomDataKey::try_from(padded_key(b"Color")).unwrap();
        let ledger = Pubkey::new_unique();
        let mut entry = TokenData::default();

        write_token_data(&mut entry, ledger, [1; 32], &key, b"blue".to_vec(), 10, 255).unwrap();
        assert_eq!(entry.value, b"blue".to_vec());
        assert_eq!(entry.data_key, padded_key(b"Color"));
        assert_eq!(entry.ledger, ledger);

        write_token_data(&mut entry, ledger, [1; 32], &key, b"red".to_vec(), 20, 255).unwrap();
        assert_eq!(entry.value, b"red".to_vec());
        assert_eq!(entry.updated_at, 20);
    }

    #[test]
    fn test_value_too_long() {
        let key = CustomDataKey::try_from(padded_key(b"Color")).unwrap();
        let mut entry = TokenData::default();
        let err = write_token_data(
            &mut entry,
            Pubkey::new_unique(),
            [1; 32],
            &key,
            vec![0u8; MAX_DATA_VALUE_LEN + 1],
            10,
            255,
        )
        .unwrap_err();
        assert_eq!(error_code(err), u32::from(LedgerError::DataValueTooLong));
        assert!(entry.value.is_empty());
    }
}
