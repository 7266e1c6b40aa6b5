//! Ask a question and escrow its reward

use anchor_lang::prelude::*;
use anchor_lang::system_program;

use crate::events::QuestionAsked;
use crate::instructions::constants::{LEDGER_SEED, QUESTION_SEED, TOKEN_PAGE_SEED};
use crate::instructions::question_helpers::{init_question_fields, record_ask, validate_reward};
use crate::instructions::token_registry::push_token;
use crate::instructions::validation::{require_contract_account, require_not_owner};
use crate::state::{Ledger, Question, TokenPage};
use crate::utils::validation::validate_question;

#[derive(Accounts)]
#[instruction(question_id: [u8; 32])]
pub struct AskQuestion<'info> {
    #[account(
        mut,
        seeds = [LEDGER_SEED, ledger.owner.as_ref()],
        bump = ledger.bump
    )]
    pub ledger: Account<'info, Ledger>,

    /// Created on first ask; a revoked record is reused
    #[account(
        init_if_needed,
        payer = payer,
        space = Question::SIZE,
        seeds = [QUESTION_SEED, ledger.key().as_ref(), question_id.as_ref()],
        bump
    )]
    pub question: Account<'info, Question>,

    /// Registry page at the end of the token list, created when it opens
    #[account(
        init_if_needed,
        payer = payer,
        space = TokenPage::SIZE,
        seeds = [TOKEN_PAGE_SEED, ledger.key().as_ref(), ledger.next_page_index().to_le_bytes().as_ref()],
        bump
    )]
    pub token_page: Account<'info, TokenPage>,

    /// Contract account asking the question, e.g. a program-owned profile
    pub asker: Signer<'info>,

    /// Funds rent and the escrowed reward
    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<AskQuestion>,
    question_id: [u8; 32],
    question: Vec<u8>,
    reward: u64,
) -> Result<()> {
    let asker = ctx.accounts.asker.key();
    require_not_owner(&ctx.accounts.ledger, &asker)?;
    require_contract_account(&ctx.accounts.asker)?;
    validate_reward(&ctx.accounts.ledger, reward)?;
    validate_question(&question_id, &question)?;

    let clock = Clock::get()?;
    let ledger_key = ctx.accounts.ledger.key();
    init_question_fields(
        &mut ctx.accounts.question,
        question_id,
        ledger_key,
        asker,
        reward,
        question,
        clock.unix_timestamp,
        ctx.bumps.question,
    )?;

    if reward > 0 {
        system_program::transfer(
            CpiContext::new(
                ctx.accounts.system_program.to_account_info(),
                system_program::Transfer {
                    from: ctx.accounts.payer.to_account_info(),
                    to: ctx.accounts.question.to_account_info(),
                },
            ),
            reward,
        )?;
    }

    let page = &mut ctx.accounts.token_page;
    if page.ledger == Pubkey::default() {
        page.ledger = ledger_key;
        page.page_index = ctx.accounts.ledger.next_page_index();
        page.bump = ctx.bumps.token_page;
    }
    push_token(&mut ctx.accounts.ledger, page, question_id, asker)?;
    record_ask(&mut ctx.accounts.ledger, reward)?;

    emit!(QuestionAsked {
        asker,
        question_id,
        reward,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}
