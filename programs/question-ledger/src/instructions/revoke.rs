//! Revoke an unanswered question and refund its reward to the holder

use anchor_lang::prelude::*;

use crate::errors::LedgerError;
use crate::events::QuestionRevoked;
use crate::instructions::constants::{LEDGER_SEED, QUESTION_SEED, TOKEN_PAGE_SEED};
use crate::instructions::lamport_transfer::release_escrow;
use crate::instructions::question_helpers::{clear_question, record_revoke, require_unanswered};
use crate::instructions::question_store::{load_question, store_question};
use crate::instructions::token_registry::{load_token_page, remove_token, store_token_page};
use crate::state::{Ledger, TokenPage};

#[derive(Accounts)]
#[instruction(question_id: [u8; 32], page_index: u64)]
pub struct RevokeQuestion<'info> {
    #[account(
        mut,
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

    /// CHECK: Registry page holding the last token; may be `token_page` itself
    #[account(
        mut,
        seeds = [
            TOKEN_PAGE_SEED,
            ledger.key().as_ref(),
            TokenPage::page_of(ledger.total_supply.saturating_sub(1)).to_le_bytes().as_ref()
        ],
        bump
    )]
    pub last_page: UncheckedAccount<'info>,

    #[account(mut)]
    pub holder: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<RevokeQuestion>, question_id: [u8; 32], _page_index: u64) -> Result<()> {
    let ledger_key = ctx.accounts.ledger.key();
    let question_info = ctx.accounts.question.to_account_info();
    let mut question = load_question(&question_info, &ledger_key)?;
    require_unanswered(&question)?;
    require!(
        question.holder == ctx.accounts.holder.key(),
        LedgerError::UnauthorizedHolder
    );

    let asker = question.asker;
    let reward = question.reward;
    release_escrow(&question_info, &ctx.accounts.holder.to_account_info(), reward)?;

    clear_question(&mut question)?;
    store_question(&question_info, &question)?;

    let page_info = ctx.accounts.token_page.to_account_info();
    let mut page = load_token_page(&page_info, &ledger_key)?;
    if ctx.accounts.last_page.key() == page_info.key() {
        remove_token(&mut ctx.accounts.ledger, &mut page, None, &question_id)?;
    } else {
        let last_info = ctx.accounts.last_page.to_account_info();
        let mut last = load_token_page(&last_info, &ledger_key)?;
        remove_token(&mut ctx.accounts.ledger, &mut page, Some(&mut last), &question_id)?;
        store_token_page(&last_info, &last)?;
    }
    store_token_page(&page_info, &page)?;
    record_revoke(&mut ctx.accounts.ledger, reward)?;

    emit!(QuestionRevoked {
        asker,
        question_id,
        reward,
        timestamp: Clock::get()?.unix_timestamp,
    });

    msg!(
        "Refunded reward {} to holder {}",
        reward,
        ctx.accounts.holder.key()
    );

    Ok(())
}
