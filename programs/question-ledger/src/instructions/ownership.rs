//! Ownership of a ledger is fixed at creation.
//!
//! Both instructions exist so callers get an explicit error instead of an
//! unknown-instruction failure.

use anchor_lang::prelude::*;

use crate::errors::LedgerError;
use crate::instructions::constants::LEDGER_SEED;
use crate::state::Ledger;

#[derive(Accounts)]
pub struct ChangeOwnership<'info> {
    #[account(
        seeds = [LEDGER_SEED, ledger.owner.as_ref()],
        bump = ledger.bump
    )]
    pub ledger: Account<'info, Ledger>,

    pub signer: Signer<'info>,
}

pub fn reject_renounce_ownership(_ctx: Context<ChangeOwnership>) -> Result<()> {
    err!(LedgerError::TransferringOwnershipIsNotAllowed)
}

pub fn reject_transfer_ownership(_ctx: Context<ChangeOwnership>, _new_owner: Pubkey) -> Result<()> {
    err!(LedgerError::TransferringOwnershipIsNotAllowed)
}
