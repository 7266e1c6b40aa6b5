//! Deploy a question ledger for an owner account.
//!
//! The ledger PDA `["ledger", owner]` is the owner → ledger registry: an
//! owner can have at most one ledger and its address is derivable by anyone.

use crate::errors::LedgerError;
use crate::events::LedgerCreated;
use crate::instructions::constants::LEDGER_SEED;
use crate::instructions::validation::require_contract_account;
use crate::state::{Ledger, VerifiableUri};
use crate::utils::validation::validate_metadata;
use anchor_lang::prelude::*;
use anchor_lang::system_program;

#[derive(Accounts)]
pub struct CreateLedger<'info> {
    /// CHECK: Created in the handler so an existing ledger reports
    /// QuestionAndAnswerContractAlreadyDeployed; address checked by seeds
    #[account(
        mut,
        seeds = [LEDGER_SEED, owner.key().as_ref()],
        bump
    )]
    pub ledger: UncheckedAccount<'info>,

    /// CHECK: Must be a contract account, checked in handler
    pub owner: UncheckedAccount<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<CreateLedger>,
    metadata: VerifiableUri,
    initial_min_reward: u64,
) -> Result<()> {
    let ledger_info = ctx.accounts.ledger.to_account_info();
    require!(
        !is_deployed(&ledger_info),
        LedgerError::QuestionAndAnswerContractAlreadyDeployed
    );
    require_contract_account(&ctx.accounts.owner)?;
    validate_metadata(&metadata)?;

    let owner = ctx.accounts.owner.key();
    let bump = ctx.bumps.ledger;
    let space = Ledger::SIZE;
    let signer_seeds: &[&[u8]] = &[LEDGER_SEED, owner.as_ref(), &[bump]];

    allocate_ledger_account(
        &ctx.accounts.payer.to_account_info(),
        &ledger_info,
        &ctx.accounts.system_program.to_account_info(),
        space,
        signer_seeds,
    )?;

    let clock = Clock::get()?;
    let ledger = Ledger {
        owner,
        min_reward: initial_min_reward,
        metadata,
        created_at: clock.unix_timestamp,
        bump,
        ..Default::default()
    };
    let mut data = ledger_info.try_borrow_mut_data()?;
    ledger.try_serialize(&mut &mut data[..])?;

    emit!(LedgerCreated {
        ledger: ledger_info.key(),
        owner,
        min_reward: initial_min_reward,
        timestamp: clock.unix_timestamp,
    });

    msg!(
        "Ledger {} created for owner {} (min reward {})",
        ledger_info.key(),
        owner,
        initial_min_reward
    );

    Ok(())
}

fn is_deployed(ledger: &AccountInfo) -> bool {
    ledger.owner == &crate::ID && !ledger.data_is_empty()
}

/// Creates the ledger PDA owned by this program.
///
/// A PDA that already holds lamports cannot go through `create_account`, so
/// it is topped up to rent exemption, allocated and assigned instead.
fn allocate_ledger_account<'info>(
    payer: &AccountInfo<'info>,
    ledger: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    space: usize,
    signer_seeds: &[&[u8]],
) -> Result<()> {
    let rent_minimum = Rent::get()?.minimum_balance(space);
    let current = ledger.lamports();

    if current == 0 {
        return system_program::create_account(
            CpiContext::new_with_signer(
                system_program.clone(),
                system_program::CreateAccount {
                    from: payer.clone(),
                    to: ledger.clone(),
                },
                &[signer_seeds],
            ),
            rent_minimum,
            space as u64,
            &crate::ID,
        );
    }

    let top_up = rent_minimum.saturating_sub(current);
    if top_up > 0 {
        system_program::transfer(
            CpiContext::new(
                system_program.clone(),
                system_program::Transfer {
                    from: payer.clone(),
                    to: ledger.clone(),
                },
            ),
            top_up,
        )?;
    }
    system_program::allocate(
        CpiContext::new_with_signer(
            system_program.clone(),
            system_program::Allocate {
                account_to_allocate: ledger.clone(),
            },
            &[signer_seeds],
        ),
        space as u64,
    )?;
    system_program::assign(
        CpiContext::new_with_signer(
            system_program.clone(),
            system_program::Assign {
                account_to_assign: ledger.clone(),
            },
            &[signer_seeds],
        ),
        &crate::ID,
    )
}

#[derive(Accounts)]
pub struct LedgerAddressOf<'info> {
    /// CHECK: Any account; only its key is used
    pub owner: UncheckedAccount<'info>,

    /// CHECK: May not exist; address checked by seeds
    #[account(
        seeds = [LEDGER_SEED, owner.key().as_ref()],
        bump
    )]
    pub ledger: UncheckedAccount<'info>,
}

/// Ledger address of `owner`, if one has been deployed.
pub fn query_ledger_address_of(ctx: Context<LedgerAddressOf>) -> Result<Option<Pubkey>> {
    let ledger_info = ctx.accounts.ledger.to_account_info();
    Ok(is_deployed(&ledger_info).then(|| ledger_info.key()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deployed(owner: Pubkey, data_len: usize) -> bool {
        let key = Pubkey::new_unique();
        let mut lamports = 1_000_000;
        let mut data = vec![0u8; data_len];
        let info = AccountInfo::new(&key, false, false, &mut lamports, &mut data, &owner, false, 0);
        is_deployed(&info)
    }

    #[test]
    fn test_is_deployed() {
        assert!(deployed(crate::ID, Ledger::SIZE));
        // A funded but unallocated PDA is not a ledger yet
        assert!(!deployed(anchor_lang::system_program::ID, 0));
        assert!(!deployed(crate::ID, 0));
        assert!(!deployed(anchor_lang::system_program::ID, Ledger::SIZE));
    }
}
