//! Question token registry kept in fixed-size `TokenPage` accounts.
//!
//! Registry index `i` lives in page `i / TOKEN_PAGE_SIZE`. Minting appends to
//! the page at `ledger.total_supply`; burning swap-removes with the last
//! token, so every page except the last stays full and no instruction loads
//! more than two pages.

use crate::errors::LedgerError;
use crate::state::{Ledger, TokenEntry, TokenPage, TOKEN_PAGE_SIZE};
use anchor_lang::prelude::*;

/// Appends a freshly minted token to `page`, which must be the page at the
/// current end of the registry.
pub fn push_token(ledger: &mut Ledger, page: &mut TokenPage, token_id: [u8; 32], holder: Pubkey) -> Result<()> {
    require!(
        page.page_index == ledger.next_page_index()
            && page.entries.len() as u64 == ledger.total_supply % TOKEN_PAGE_SIZE as u64,
        LedgerError::TokenPageMismatch
    );
    require!(
        page.position(&token_id).is_none(),
        LedgerError::TokenAlreadyRegistered
    );
    ledger.total_supply = ledger
        .total_supply
        .checked_add(1)
        .ok_or(LedgerError::ArithmeticOverflow)?;
    page.entries.push(TokenEntry { token_id, holder });
    Ok(())
}

/// Burns `token_id` from `page`. The last token of the registry fills the
/// freed slot; pass `last` when it sits in a different page.
pub fn remove_token(
    ledger: &mut Ledger,
    page: &mut TokenPage,
    last: Option<&mut TokenPage>,
    token_id: &[u8; 32],
) -> Result<TokenEntry> {
    let last_index = ledger
        .last_page_index()
        .ok_or(LedgerError::TokenNotRegistered)?;
    let position = page
        .position(token_id)
        .ok_or(LedgerError::TokenNotRegistered)?;

    let removed = match last {
        None => {
            require!(
                page.page_index == last_index,
                LedgerError::TokenPageMismatch
            );
            page.entries.swap_remove(position)
        }
        Some(last) => {
            require!(
                last.page_index == last_index && page.page_index != last_index,
                LedgerError::TokenPageMismatch
            );
            let moved = last.entries.pop().ok_or(LedgerError::TokenPageMismatch)?;
            std::mem::replace(&mut page.entries[position], moved)
        }
    };

    ledger.total_supply -= 1;
    Ok(removed)
}

/// Records a custody move in the registry.
pub fn set_holder(page: &mut TokenPage, token_id: &[u8; 32], holder: Pubkey) -> Result<()> {
    let position = page
        .position(token_id)
        .ok_or(LedgerError::TokenNotRegistered)?;
    page.entries[position].holder = holder;
    Ok(())
}

/// Reads a registry page, returning `None` if it was never created.
pub fn read_token_page(account: &AccountInfo, ledger: &Pubkey) -> Result<Option<TokenPage>> {
    if account.owner != &crate::ID || account.data_is_empty() {
        return Ok(None);
    }
    let data = account.try_borrow_data()?;
    let page = TokenPage::try_deserialize(&mut &data[..])?;
    require_keys_eq!(page.ledger, *ledger, LedgerError::TokenPageMismatch);
    Ok(Some(page))
}

/// Reads a registry page that must exist.
pub fn load_token_page(account: &AccountInfo, ledger: &Pubkey) -> Result<TokenPage> {
    read_token_page(account, ledger)?.ok_or_else(|| error!(LedgerError::TokenPageMismatch))
}

pub fn store_token_page(account: &AccountInfo, page: &TokenPage) -> Result<()> {
    let mut data = account.try_borrow_mut_data()?;
    page.try_serialize(&mut &mut data[..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::error_code;

    fn id(n: u16) -> [u8; 32] {
        let mut id = [0u8; 32];
        id[..2].copy_from_slice(&n.to_le_bytes());
        id
    }

    /// Mints `count` tokens to `holder`, returning the ledger and its pages.
    fn minted(count: u16, holder: Pubkey) -> (Ledger, Vec<TokenPage>) {
        let mut ledger = Ledger::default();
        let mut pages: Vec<TokenPage> = Vec::new();
        for n in 0..count {
            let page_index = ledger.next_page_index();
            if pages.len() as u64 == page_index {
                pages.push(TokenPage {
                    page_index,
                    ..Default::default()
                });
            }
            push_token(&mut ledger, &mut pages[page_index as usize], id(n), holder).unwrap();
        }
        (ledger, pages)
    }

    fn registry_ids(pages: &[TokenPage]) -> Vec<[u8; 32]> {
        pages
            .iter()
            .flat_map(|p| p.entries.iter().map(|e| e.token_id))
            .collect()
    }

    #[test]
    fn test_pages_fill_in_order() {
        let (ledger, pages) = minted(65, Pubkey::new_unique());
        assert_eq!(ledger.total_supply, 65);
        assert_eq!(pages.len(), 3);
        assert!(pages[0].is_full() && pages[1].is_full());
        assert_eq!(pages[2].entries.len(), 5);
        assert_eq!(pages[1].entries[0].token_id, id(30));
    }

    #[test]
    fn test_push_into_wrong_page() {
        let (mut ledger, mut pages) = minted(30, Pubkey::new_unique());
        let err = push_token(&mut ledger, &mut pages[0], id(99), Pubkey::new_unique()).unwrap_err();
        assert_eq!(error_code(err), u32::from(LedgerError::TokenPageMismatch));
        assert_eq!(ledger.total_supply, 30);
    }

    #[test]
    fn test_push_duplicate() {
        let (mut ledger, mut pages) = minted(3, Pubkey::new_unique());
        let err = push_token(&mut ledger, &mut pages[0], id(1), Pubkey::new_unique()).unwrap_err();
        assert_eq!(error_code(err), u32::from(LedgerError::TokenAlreadyRegistered));
    }

    #[test]
    fn test_remove_from_last_page() {
        let (mut ledger, mut pages) = minted(35, Pubkey::new_unique());
        let removed = remove_token(&mut ledger, &mut pages[1], None, &id(31)).unwrap();
        assert_eq!(removed.token_id, id(31));
        assert_eq!(ledger.total_supply, 34);
        assert_eq!(pages[1].entries[1].token_id, id(34));
        assert_eq!(pages[1].entries.len(), 4);
    }

    #[test]
    fn test_remove_fills_slot_from_last_page() {
        let (mut ledger, mut pages) = minted(35, Pubkey::new_unique());
        let (head, tail) = pages.split_at_mut(1);
        remove_token(&mut ledger, &mut head[0], Some(&mut tail[0]), &id(3)).unwrap();

        assert_eq!(ledger.total_supply, 34);
        assert_eq!(pages[0].entries[3].token_id, id(34));
        assert!(pages[0].is_full());
        assert_eq!(pages[1].entries.len(), 4);

        let ids = registry_ids(&pages);
        assert_eq!(ids.len(), 34);
        assert!(!ids.contains(&id(3)));
    }

    #[test]
    fn test_remove_requires_last_page() {
        let (mut ledger, mut pages) = minted(35, Pubkey::new_unique());
        // Page 0 is not the last page, so the moved token must come from elsewhere
        let err = remove_token(&mut ledger, &mut pages[0], None, &id(3)).unwrap_err();
        assert_eq!(error_code(err), u32::from(LedgerError::TokenPageMismatch));
        assert_eq!(ledger.total_supply, 35);
    }

    #[test]
    fn test_remove_unknown_token() {
        let (mut ledger, mut pages) = minted(3, Pubkey::new_unique());
        let err = remove_token(&mut ledger, &mut pages[0], None, &id(7)).unwrap_err();
        assert_eq!(error_code(err), u32::from(LedgerError::TokenNotRegistered));
    }

    #[test]
    fn test_remove_then_mint_reuses_slot() {
        let (mut ledger, mut pages) = minted(30, Pubkey::new_unique());
        remove_token(&mut ledger, &mut pages[0], None, &id(0)).unwrap();
        assert_eq!(ledger.next_page_index(), 0);
        push_token(&mut ledger, &mut pages[0], id(0), Pubkey::new_unique()).unwrap();
        assert_eq!(ledger.total_supply, 30);
        assert_eq!(pages[0].entries[29].token_id, id(0));
    }

    #[test]
    fn test_set_holder() {
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        let (_, mut pages) = minted(3, alice);
        set_holder(&mut pages[0], &id(1), bob).unwrap();
        assert_eq!(pages[0].token_ids_of(&bob).collect::<Vec<_>>(), vec![id(1)]);
        assert_eq!(pages[0].token_ids_of(&alice).count(), 2);

        let err = set_holder(&mut pages[0], &id(9), bob).unwrap_err();
        assert_eq!(error_code(err), u32::from(LedgerError::TokenNotRegistered));
    }

    #[test]
    fn test_page_account_round_trip() {
        let ledger_key = Pubkey::new_unique();
        let (_, pages) = minted(3, Pubkey::new_unique());
        let mut page = pages[0].clone();
        page.ledger = ledger_key;

        let key = Pubkey::new_unique();
        let program_id = crate::ID;
        let mut lamports = 1_000_000;
        let mut data = vec![0u8; TokenPage::SIZE];
        let info = AccountInfo::new(
            &key,
            false,
            true,
            &mut lamports,
            &mut data,
            &program_id,
            false,
            0,
        );

        store_token_page(&info, &page).unwrap();
        let loaded = load_token_page(&info, &ledger_key).unwrap();
        assert_eq!(loaded.entries, page.entries);

        let err = load_token_page(&info, &Pubkey::new_unique()).unwrap_err();
        assert_eq!(error_code(err), u32::from(LedgerError::TokenPageMismatch));
    }

    #[test]
    fn test_missing_page_reads_none() {
        let key = Pubkey::new_unique();
        let system = anchor_lang::system_program::ID;
        let mut lamports = 0;
        let mut data: Vec<u8> = Vec::new();
        let info = AccountInfo::new(&key, false, false, &mut lamports, &mut data, &system, false, 0);
        assert!(read_token_page(&info, &Pubkey::new_unique()).unwrap().is_none());
    }
}
