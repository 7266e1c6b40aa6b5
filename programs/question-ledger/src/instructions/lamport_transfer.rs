//! Lamport movement out of question escrow with checked arithmetic.
//!
//! Escrowed rewards sit in the program-owned question account on top of its
//! rent-exempt minimum. Every payout and refund goes through
//! [`release_escrow`], which fails instead of leaving the account below that
//! minimum. A failure aborts the whole instruction, so no record is ever
//! marked answered or revoked without the funds having moved.

use crate::errors::LedgerError;
use anchor_lang::prelude::*;

/// Transfer `amount` lamports from one account to another using checked arithmetic.
///
/// `from` must be owned by this program.
/// Returns `Ok(())` immediately if `amount == 0` (no-op).
/// Returns `LedgerError::ArithmeticOverflow` on underflow or overflow.
pub fn transfer_lamports<'info>(
    from: &AccountInfo<'info>,
    to: &AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    **from.try_borrow_mut_lamports()? = from
        .lamports()
        .checked_sub(amount)
        .ok_or(LedgerError::ArithmeticOverflow)?;
    **to.try_borrow_mut_lamports()? = to
        .lamports()
        .checked_add(amount)
        .ok_or(LedgerError::ArithmeticOverflow)?;
    Ok(())
}

/// Lamports left in an escrow account after releasing `amount`.
///
/// Fails if the balance cannot cover `amount` or the remainder would drop
/// below `rent_minimum`.
pub fn escrow_remainder(balance: u64, amount: u64, rent_minimum: u64) -> Result<u64> {
    let remaining = balance
        .checked_sub(amount)
        .ok_or(LedgerError::ArithmeticOverflow)?;
    require!(
        remaining >= rent_minimum,
        LedgerError::EscrowBelowRentExemption
    );
    Ok(remaining)
}

/// Pay `amount` escrowed lamports out of `escrow` to `recipient`.
pub fn release_escrow<'info>(
    escrow: &AccountInfo<'info>,
    recipient: &AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    let rent_minimum = Rent::get()?.minimum_balance(escrow.data_len());
    pay_from_escrow(escrow, recipient, amount, rent_minimum)
}

/// Moves `amount` out of `escrow` while keeping `rent_minimum` in it.
pub fn pay_from_escrow<'info>(
    escrow: &AccountInfo<'info>,
    recipient: &AccountInfo<'info>,
    amount: u64,
    rent_minimum: u64,
) -> Result<()> {
    escrow_remainder(escrow.lamports(), amount, rent_minimum)?;
    transfer_lamports(escrow, recipient, amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::error_code;

    #[test]
    fn test_remainder_keeps_rent() {
        assert_eq!(escrow_remainder(1_500, 1_000, 500).unwrap(), 500);
    }

    #[test]
    fn test_remainder_zero_amount() {
        assert_eq!(escrow_remainder(500, 0, 500).unwrap(), 500);
    }

    #[test]
    fn test_remainder_below_rent() {
        let err = escrow_remainder(1_400, 1_000, 500).unwrap_err();
        assert_eq!(
            error_code(err),
            u32::from(LedgerError::EscrowBelowRentExemption)
        );
    }

    /// Runs `f` against a program-owned escrow and a wallet recipient.
    fn with_accounts(
        escrow_lamports: u64,
        recipient_lamports: u64,
        f: impl for<'a> FnOnce(&AccountInfo<'a>, &AccountInfo<'a>),
    ) {
        let escrow_key = Pubkey::new_unique();
        let recipient_key = Pubkey::new_unique();
        let program_id = crate::ID;
        let system = anchor_lang::system_program::ID;
        let mut escrow_balance = escrow_lamports;
        let mut recipient_balance = recipient_lamports;
        let mut escrow_data = vec![0u8; 16];
        let mut recipient_data: Vec<u8> = Vec::new();
        let escrow = AccountInfo::new(
            &escrow_key,
            false,
            true,
            &mut escrow_balance,
            &mut escrow_data,
            &program_id,
            false,
            0,
        );
        let recipient = AccountInfo::new(
            &recipient_key,
            true,
            true,
            &mut recipient_balance,
            &mut recipient_data,
            &system,
            false,
            0,
        );
        f(&escrow, &recipient);
    }

    #[test]
    fn test_payout_moves_lamports() {
        with_accounts(1_500, 10, |escrow, recipient| {
            pay_from_escrow(escrow, recipient, 1_000, 500).unwrap();
            assert_eq!(escrow.lamports(), 500);
            assert_eq!(recipient.lamports(), 1_010);
        });
    }

    #[test]
    fn test_payout_below_rent_floor_moves_nothing() {
        with_accounts(1_500, 10, |escrow, recipient| {
            let err = pay_from_escrow(escrow, recipient, 1_001, 500).unwrap_err();
            assert_eq!(
                error_code(err),
                u32::from(LedgerError::EscrowBelowRentExemption)
            );
            assert_eq!(escrow.lamports(), 1_500);
            assert_eq!(recipient.lamports(), 10);
        });
    }

    #[test]
    fn test_zero_payout_is_noop() {
        with_accounts(500, 0, |escrow, recipient| {
            pay_from_escrow(escrow, recipient, 0, 500).unwrap();
            assert_eq!(escrow.lamports(), 500);
            assert_eq!(recipient.lamports(), 0);
        });
    }

    #[test]
    fn test_transfer_overflow_rejected() {
        with_accounts(1_000, u64::MAX, |escrow, recipient| {
            let err = transfer_lamports(escrow, recipient, 1).unwrap_err();
            assert_eq!(error_code(err), u32::from(LedgerError::ArithmeticOverflow));
            assert_eq!(recipient.lamports(), u64::MAX);
        });
    }

    #[test]
    fn test_remainder_underflow() {
        let err = escrow_remainder(999, 1_000, 0).unwrap_err();
        assert_eq!(error_code(err), u32::from(LedgerError::ArithmeticOverflow));
    }
}
