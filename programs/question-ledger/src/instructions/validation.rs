//! Shared account checks for instruction handlers

use crate::errors::LedgerError;
use crate::state::Ledger;
use anchor_lang::prelude::*;
use anchor_lang::system_program;

/// A plain wallet is owned by the System Program, holds no data and is not
/// executable. Anything else (program-owned profile accounts, PDAs with
/// state, programs) counts as contract-capable.
///
/// Only the account's current state is inspected. A keypair wallet that
/// allocates data to itself passes, so this does not prove the account is
/// controlled by a program.
pub fn is_plain_wallet(owner: &Pubkey, data_len: usize, executable: bool) -> bool {
    owner == &system_program::ID && data_len == 0 && !executable
}

/// Rejects plain wallets as askers, recipients and ledger owners.
pub fn require_contract_account(account: &AccountInfo) -> Result<()> {
    require!(
        !is_plain_wallet(account.owner, account.data_len(), account.executable),
        LedgerError::OwnerMustNotBeAnEOA
    );
    Ok(())
}

/// The ledger owner may not ask, hold or receive questions.
pub fn require_not_owner(ledger: &Ledger, account: &Pubkey) -> Result<()> {
    require!(ledger.owner != *account, LedgerError::OwnerMustNotBeAsker);
    Ok(())
}

pub fn require_owner(ledger: &Ledger, signer: &Pubkey) -> Result<()> {
    require!(ledger.owner == *signer, LedgerError::UnauthorizedOwner);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::error_code;

    #[test]
    fn test_plain_wallet() {
        assert!(is_plain_wallet(&system_program::ID, 0, false));
    }

    #[test]
    fn test_contract_capable_accounts() {
        // Program-owned profile account
        assert!(!is_plain_wallet(&crate::ID, 0, false));
        assert!(!is_plain_wallet(&Pubkey::new_unique(), 128, false));
        // System-owned account carrying data
        assert!(!is_plain_wallet(&system_program::ID, 32, false));
        // Executable
        assert!(!is_plain_wallet(&Pubkey::new_unique(), 36, true));
    }

    #[test]
    fn test_wallet_with_allocated_data_passes() {
        let key = Pubkey::new_unique();
        let system = system_program::ID;
        let mut lamports = 1_000_000;
        let mut empty: Vec<u8> = Vec::new();
        let wallet = AccountInfo::new(&key, true, false, &mut lamports, &mut empty, &system, false, 0);
        let err = require_contract_account(&wallet).unwrap_err();
        assert_eq!(error_code(err), u32::from(LedgerError::OwnerMustNotBeAnEOA));

        let mut lamports = 1_000_000;
        let mut data = vec![0u8; 8];
        let allocated = AccountInfo::new(&key, true, false, &mut lamports, &mut data, &system, false, 0);
        assert!(require_contract_account(&allocated).is_ok());
    }

    #[test]
    fn test_owner_guards() {
        let owner = Pubkey::new_unique();
        let other = Pubkey::new_unique();
        let ledger = Ledger {
            owner,
            ..Default::default()
        };

        assert!(require_owner(&ledger, &owner).is_ok());
        let err = require_owner(&ledger, &other).unwrap_err();
        assert_eq!(error_code(err), u32::from(LedgerError::UnauthorizedOwner));

        assert!(require_not_owner(&ledger, &other).is_ok());
        let err = require_not_owner(&ledger, &owner).unwrap_err();
        assert_eq!(error_code(err), u32::from(LedgerError::OwnerMustNotBeAsker));
    }
}
