//! Update the minimum reward for new questions (owner only)

use anchor_lang::prelude::*;

use crate::errors::LedgerError;
use crate::events::MinRewardUpdated;
use crate::instructions::constants::LEDGER_SEED;
use crate::instructions::validation::require_owner;
use crate::state::Ledger;

#[derive(Accounts)]
pub struct SetMinReward<'info> {
    #[account(
        mut,
        seeds = [LEDGER_SEED, ledger.owner.as_ref()],
        bump = ledger.bump
    )]
    pub ledger: Account<'info, Ledger>,

    pub owner: Signer<'info>,
}

pub fn handler(ctx: Context<SetMinReward>, new_min_reward: u64) -> Result<()> {
    let ledger = &mut ctx.accounts.ledger;
    require_owner(ledger, &ctx.accounts.owner.key())?;

    let old_min_reward = ledger.min_reward;
    require!(
        new_min_reward != old_min_reward,
        LedgerError::MinRewardHasNotChanged
    );
    ledger.min_reward = new_min_reward;

    emit!(MinRewardUpdated {
        old_min_reward,
        new_min_reward,
        timestamp: Clock::get()?.unix_timestamp,
    });

    Ok(())
}
