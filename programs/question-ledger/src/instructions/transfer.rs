//! Move custody of a question token to another contract account

use anchor_lang::prelude::*;

use crate::errors::LedgerError;
use crate::events::QuestionTransferred;
use crate::instructions::constants::{
    LEDGER_SEED, MAX_TRANSFER_DATA_LEN, QUESTION_SEED, TOKEN_PAGE_SEED,
};
use crate::instructions::question_helpers::move_token;
use crate::instructions::question_store::{load_question, store_question};
use crate::instructions::token_registry::{load_token_page, set_holder, store_token_page};
use crate::instructions::validation::{require_contract_account, require_not_owner};
use crate::state::Ledger;

#[derive(Accounts)]
#[instruction(from: Pubkey, question_id: [u8; 32], page_index: u64)]
pub struct TransferQuestion<'info> {
    #[account(
        seeds = [LEDGER_SEED, ledger.owner.as_ref()],
        bump = ledger.bump
    )]
    pub ledger: Account<'info, Ledger>,

    /// CHECK: Loaded in handler so a missing record reports QuestionDoesNotExist
    #[account(
        mut,
        seeds = [QUESTION_SEED, ledger.key().as_ref(), question_id.as_ref()],
        bump
    )]
    pub question: UncheckedAccount<'info>,

    /// CHECK: Registry page holding the token, loaded in handler
    #[account(
        mut,
        seeds = [TOKEN_PAGE_SEED, ledger.key().as_ref(), page_index.to_le_bytes().as_ref()],
        bump
    )]
    pub token_page: UncheckedAccount<'info>,

    /// Current holder
    pub signer: Signer<'info>,

    /// CHECK: Must be a contract account other than the ledger owner, checked in handler
    pub to: UncheckedAccount<'info>,
}

pub fn handler(
    ctx: Context<TransferQuestion>,
    from: Pubkey,
    question_id: [u8; 32],
    _page_index: u64,
    force: bool,
    data: Vec<u8>,
) -> Result<()> {
    let to = ctx.accounts.to.key();
    require_not_owner(&ctx.accounts.ledger, &to)?;
    // Applies with or without `force`
    require_contract_account(&ctx.accounts.to)?;

    let ledger_key = ctx.accounts.ledger.key();
    let question_info = ctx.accounts.question.to_account_info();
    let mut question = load_question(&question_info, &ledger_key)?;
    require!(
        data.len() <= MAX_TRANSFER_DATA_LEN,
        LedgerError::DataValueTooLong
    );

    move_token(&mut question, &ctx.accounts.signer.key(), &from, &to)?;
    store_question(&question_info, &question)?;

    let page_info = ctx.accounts.token_page.to_account_info();
    let mut page = load_token_page(&page_info, &ledger_key)?;
    set_holder(&mut page, &question_id, to)?;
    store_token_page(&page_info, &page)?;

    emit!(QuestionTransferred {
        question_id,
        from,
        to,
        force,
        data,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
