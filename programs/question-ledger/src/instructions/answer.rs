//! Answer a question and collect its escrowed reward (owner only)

use anchor_lang::prelude::*;

use crate::events::QuestionAnswered;
use crate::instructions::constants::{LEDGER_SEED, QUESTION_SEED};
use crate::instructions::lamport_transfer::release_escrow;
use crate::instructions::question_helpers::{apply_answer, record_answer, require_unanswered};
use crate::instructions::question_store::{load_question, store_question};
use crate::instructions::validation::require_owner;
use crate::state::Ledger;
use crate::utils::validation::validate_answer;

#[derive(Accounts)]
#[instruction(question_id: [u8; 32])]
pub struct AnswerQuestion<'info> {
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

    #[account(mut)]
    pub owner: Signer<'info>,
}

pub fn handler(ctx: Context<AnswerQuestion>, question_id: [u8; 32], answer: Vec<u8>) -> Result<()> {
    require_owner(&ctx.accounts.ledger, &ctx.accounts.owner.key())?;

    let ledger_key = ctx.accounts.ledger.key();
    let question_info = ctx.accounts.question.to_account_info();
    let mut question = load_question(&question_info, &ledger_key)?;
    require_unanswered(&question)?;
    validate_answer(&answer)?;

    // Pay out the stored reward before the record is marked answered
    let reward = question.reward;
    release_escrow(&question_info, &ctx.accounts.owner.to_account_info(), reward)?;

    let clock = Clock::get()?;
    apply_answer(&mut question, answer, clock.unix_timestamp)?;
    store_question(&question_info, &question)?;
    record_answer(&mut ctx.accounts.ledger, reward)?;

    emit!(QuestionAnswered {
        asker: question.asker,
        question_id,
        reward,
        timestamp: clock.unix_timestamp,
    });

    msg!("Paid reward {} to owner {}", reward, ctx.accounts.owner.key());

    Ok(())
}
