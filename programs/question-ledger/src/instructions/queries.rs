//! Read-only instructions returning values through return data.
//!
//! Return data is capped at 1024 bytes: question and answer text are at most
//! 400 bytes each and token id listings are paged.

use anchor_lang::prelude::*;

use crate::errors::LedgerError;
use crate::instructions::constants::{
    LEDGER_SEED, QNA_INTERFACE_ID, QUESTION_SEED, TOKEN_DATA_SEED, TOKEN_PAGE_SEED,
};
use crate::instructions::question_store::{load_question, read_question};
use crate::instructions::token_registry::read_token_page;
use crate::state::{
    Ledger, Question, QuestionAndAnswer, TokenData, TokenPage, VerifiableUri, TOKEN_PAGE_SIZE,
};
use crate::utils::data_keys::{CustomDataKey, DataKey};

#[derive(Accounts)]
pub struct ReadLedger<'info> {
    #[account(
        seeds = [LEDGER_SEED, ledger.owner.as_ref()],
        bump = ledger.bump
    )]
    pub ledger: Account<'info, Ledger>,
}

#[derive(Accounts)]
#[instruction(index: u64)]
pub struct ReadTokenAt<'info> {
    #[account(
        seeds = [LEDGER_SEED, ledger.owner.as_ref()],
        bump = ledger.bump
    )]
    pub ledger: Account<'info, Ledger>,

    /// CHECK: Registry page holding `index`, loaded in handler
    #[account(
        seeds = [TOKEN_PAGE_SEED, ledger.key().as_ref(), TokenPage::page_of(index).to_le_bytes().as_ref()],
        bump
    )]
    pub token_page: UncheckedAccount<'info>,
}

#[derive(Accounts)]
#[instruction(holder: Pubkey, page_index: u64)]
pub struct ReadTokenPage<'info> {
    #[account(
        seeds = [LEDGER_SEED, ledger.owner.as_ref()],
        bump = ledger.bump
    )]
    pub ledger: Account<'info, Ledger>,

    /// CHECK: May not exist past the end of the registry
    #[account(
        seeds = [TOKEN_PAGE_SEED, ledger.key().as_ref(), page_index.to_le_bytes().as_ref()],
        bump
    )]
    pub token_page: UncheckedAccount<'info>,
}

#[derive(Accounts)]
#[instruction(question_id: [u8; 32])]
pub struct ReadQuestion<'info> {
    #[account(
        seeds = [LEDGER_SEED, ledger.owner.as_ref()],
        bump = ledger.bump
    )]
    pub ledger: Account<'info, Ledger>,

    /// CHECK: May not exist; loaded in handler
    #[account(
        seeds = [QUESTION_SEED, ledger.key().as_ref(), question_id.as_ref()],
        bump
    )]
    pub question: UncheckedAccount<'info>,
}

#[derive(Accounts)]
#[instruction(question_id: [u8; 32], data_key: [u8; 32])]
pub struct ReadTokenData<'info> {
    #[account(
        seeds = [LEDGER_SEED, ledger.owner.as_ref()],
        bump = ledger.bump
    )]
    pub ledger: Account<'info, Ledger>,

    /// CHECK: May not exist; loaded in handler
    #[account(
        seeds = [QUESTION_SEED, ledger.key().as_ref(), question_id.as_ref()],
        bump
    )]
    pub question: UncheckedAccount<'info>,

    /// CHECK: Absent until the key is first written
    #[account(
        seeds = [
            TOKEN_DATA_SEED,
            ledger.key().as_ref(),
            question_id.as_ref(),
            data_key.as_ref()
        ],
        bump
    )]
    pub token_data: UncheckedAccount<'info>,
}

fn question_of(ctx: &Context<ReadQuestion>) -> Result<Question> {
    load_question(
        &ctx.accounts.question.to_account_info(),
        &ctx.accounts.ledger.key(),
    )
}

// ============================================================================
// Ledger
// ============================================================================

pub fn query_owner(ctx: Context<ReadLedger>) -> Result<Pubkey> {
    Ok(ctx.accounts.ledger.owner)
}

pub fn query_min_reward(ctx: Context<ReadLedger>) -> Result<u64> {
    Ok(ctx.accounts.ledger.min_reward)
}

pub fn query_total_supply(ctx: Context<ReadLedger>) -> Result<u64> {
    Ok(ctx.accounts.ledger.total_supply)
}

pub fn query_collection_metadata(ctx: Context<ReadLedger>) -> Result<VerifiableUri> {
    Ok(ctx.accounts.ledger.metadata.clone())
}

pub fn query_supports_interface_id(_ctx: Context<ReadLedger>, interface_id: [u8; 4]) -> Result<bool> {
    Ok(supports_interface(interface_id))
}

pub fn supports_interface(interface_id: [u8; 4]) -> bool {
    interface_id == QNA_INTERFACE_ID
}

// ============================================================================
// Token registry
// ============================================================================

pub fn query_token_at(ctx: Context<ReadTokenAt>, index: u64) -> Result<[u8; 32]> {
    let ledger = &ctx.accounts.ledger;
    require!(
        index < ledger.total_supply,
        LedgerError::TokenIndexOutOfBounds
    );
    let page = read_token_page(&ctx.accounts.token_page.to_account_info(), &ledger.key())?;
    token_in_page(page.as_ref(), index)
}

/// `holder`'s tokens in registry page `page_index`; empty past the end.
pub fn query_token_ids_of(
    ctx: Context<ReadTokenPage>,
    holder: Pubkey,
    page_index: u64,
) -> Result<Vec<[u8; 32]>> {
    let page = read_token_page(
        &ctx.accounts.token_page.to_account_info(),
        &ctx.accounts.ledger.key(),
    )?;
    Ok(page
        .filter(|p| p.page_index == page_index)
        .map(|p| p.token_ids_of(&holder).collect())
        .unwrap_or_default())
}

/// Token id stored at registry position `index`.
fn token_in_page(page: Option<&TokenPage>, index: u64) -> Result<[u8; 32]> {
    let page = page.ok_or(LedgerError::TokenIndexOutOfBounds)?;
    require!(
        page.page_index == TokenPage::page_of(index),
        LedgerError::TokenPageMismatch
    );
    page.entries
        .get((index % TOKEN_PAGE_SIZE as u64) as usize)
        .map(|e| e.token_id)
        .ok_or_else(|| error!(LedgerError::TokenIndexOutOfBounds))
}

// ============================================================================
// Question records
// ============================================================================

/// False for ids that were never asked or have been revoked.
pub fn query_answered(ctx: Context<ReadQuestion>, _question_id: [u8; 32]) -> Result<bool> {
    let question = read_question(
        &ctx.accounts.question.to_account_info(),
        &ctx.accounts.ledger.key(),
    )?;
    Ok(question.is_some_and(|q| q.answered()))
}

pub fn query_asker(ctx: Context<ReadQuestion>, _question_id: [u8; 32]) -> Result<Pubkey> {
    Ok(question_of(&ctx)?.asker)
}

pub fn query_reward(ctx: Context<ReadQuestion>, _question_id: [u8; 32]) -> Result<u64> {
    Ok(question_of(&ctx)?.reward)
}

pub fn query_question(ctx: Context<ReadQuestion>, _question_id: [u8; 32]) -> Result<Vec<u8>> {
    Ok(question_of(&ctx)?.question)
}

pub fn query_answer(ctx: Context<ReadQuestion>, _question_id: [u8; 32]) -> Result<Vec<u8>> {
    Ok(question_of(&ctx)?.answer)
}

pub fn query_ask_timestamp(ctx: Context<ReadQuestion>, _question_id: [u8; 32]) -> Result<i64> {
    Ok(question_of(&ctx)?.ask_timestamp)
}

pub fn query_answer_timestamp(ctx: Context<ReadQuestion>, _question_id: [u8; 32]) -> Result<i64> {
    Ok(question_of(&ctx)?.answer_timestamp)
}

pub fn query_question_and_answer(
    ctx: Context<ReadQuestion>,
    _question_id: [u8; 32],
) -> Result<QuestionAndAnswer> {
    Ok(QuestionAndAnswer::from(&question_of(&ctx)?))
}

// ============================================================================
// Token data
// ============================================================================

/// Protected keys mirror the record and read empty once it is cleared.
/// Custom keys are read from their own PDA whether or not the record is live.
pub fn query_data_for_token_id(
    ctx: Context<ReadTokenData>,
    _question_id: [u8; 32],
    data_key: [u8; 32],
) -> Result<Vec<u8>> {
    match DataKey::parse(data_key) {
        DataKey::Protected(key) => {
            let question = read_question(
                &ctx.accounts.question.to_account_info(),
                &ctx.accounts.ledger.key(),
            )?;
            Ok(key.read(question.as_ref()))
        }
        DataKey::Custom(key) => read_token_data(&ctx.accounts.token_data.to_account_info(), &key),
    }
}

/// Stored value of a free-form key, empty if it was never written.
fn read_token_data(account: &AccountInfo, key: &CustomDataKey) -> Result<Vec<u8>> {
    if account.owner != &crate::ID || account.data_is_empty() {
        return Ok(Vec::new());
    }
    let data = account.try_borrow_data()?;
    let entry = TokenData::try_deserialize(&mut &data[..])?;
    if entry.data_key != *key.as_bytes() {
        return Ok(Vec::new());
    }
    Ok(entry.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::error_code;
    use crate::state::TokenEntry;
    use crate::utils::data_keys::padded_key;

    #[test]
    fn test_supports_interface() {
        assert!(supports_interface(QNA_INTERFACE_ID));
        assert!(supports_interface([0xcd, 0xc5, 0xf2, 0xfd]));
        assert!(!supports_interface([0xff; 4]));
        assert!(!supports_interface([0x01, 0xff, 0xc9, 0xa7]));
    }

    fn page_with(page_index: u64, count: u8) -> TokenPage {
        TokenPage {
            page_index,
            entries: (0..count)
                .map(|i| TokenEntry {
                    token_id: [i; 32],
                    holder: Pubkey::default(),
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_token_in_page() {
        let page = page_with(1, 5);
        assert_eq!(token_in_page(Some(&page), 32).unwrap(), [2; 32]);

        let err = token_in_page(Some(&page), 35).unwrap_err();
        assert_eq!(error_code(err), u32::from(LedgerError::TokenIndexOutOfBounds));

        let err = token_in_page(Some(&page), 3).unwrap_err();
        assert_eq!(error_code(err), u32::from(LedgerError::TokenPageMismatch));

        let err = token_in_page(None, 0).unwrap_err();
        assert_eq!(error_code(err), u32::from(LedgerError::TokenIndexOutOfBounds));
    }

    #[test]
    fn test_page_fits_return_data() {
        let page = vec![[0u8; 32]; TOKEN_PAGE_SIZE];
        let mut buf: Vec<u8> = Vec::new();
        AnchorSerialize::serialize(&page, &mut buf).unwrap();
        assert!(buf.len() <= 1024);
    }

    #[test]
    fn test_custom_data_read_without_record() {
        let key = CustomDataKey::try_from(padded_key(b"Color")).unwrap();
        let entry = TokenData {
            data_key: *key.as_bytes(),
            value: b"blue".to_vec(),
            ..Default::default()
        };
        let mut data = Vec::new();
        entry.try_serialize(&mut data).unwrap();

        let account_key = Pubkey::new_unique();
        let program_id = crate::ID;
        let mut lamports = 1_000_000;
        let info = AccountInfo::new(
            &account_key,
            false,
            false,
            &mut lamports,
            &mut data,
            &program_id,
            false,
            0,
        );
        assert_eq!(read_token_data(&info, &key).unwrap(), b"blue".to_vec());

        let other = CustomDataKey::try_from(padded_key(b"Size")).unwrap();
        assert!(read_token_data(&info, &other).unwrap().is_empty());
    }
}
