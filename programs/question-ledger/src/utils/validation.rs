//! Input validation utilities for the Question Ledger

use crate::errors::LedgerError;
use crate::state::{VerifiableUri, HASH_SIZE, MAX_ANSWER_LEN, MAX_METADATA_URI_LEN, MAX_QUESTION_LEN};
use anchor_lang::prelude::*;
use sha2::{Digest, Sha256};

/// Validates that a string contains only printable ASCII characters.
///
/// Metadata URIs are shown to wallets and indexers as-is, so control
/// characters and non-ASCII bytes are rejected.
///
/// # Examples
/// ```
/// use question_ledger::utils::validation::validate_string_input;
///
/// assert!(validate_string_input("ipfs://QmHash123"));
/// assert!(validate_string_input("hello world"));
/// assert!(!validate_string_input("hello\x00world")); // null byte
/// assert!(!validate_string_input("hello\nworld"));   // newline
/// ```
pub fn validate_string_input(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_graphic() || c == ' ')
}

/// Validates the collection metadata descriptor given at ledger creation.
pub fn validate_metadata(metadata: &VerifiableUri) -> Result<()> {
    require!(
        !metadata.url.is_empty()
            && metadata.url.len() <= MAX_METADATA_URI_LEN
            && validate_string_input(&metadata.url),
        LedgerError::InvalidMetadataUri
    );
    require!(
        metadata.hash != [0u8; HASH_SIZE],
        LedgerError::InvalidMetadataHash
    );
    Ok(())
}

/// Question id for a question text: SHA-256 of its bytes.
pub fn question_id_of(question: &[u8]) -> [u8; HASH_SIZE] {
    Sha256::digest(question).into()
}

/// Checks question text bounds and that `question_id` is derived from it.
pub fn validate_question(question_id: &[u8; HASH_SIZE], question: &[u8]) -> Result<()> {
    require!(!question.is_empty(), LedgerError::InvalidQuestion);
    require!(
        question.len() <= MAX_QUESTION_LEN,
        LedgerError::QuestionTooLong
    );
    require!(
        question_id_of(question) == *question_id,
        LedgerError::QuestionIdMismatch
    );
    Ok(())
}

pub fn validate_answer(answer: &[u8]) -> Result<()> {
    require!(answer.len() <= MAX_ANSWER_LEN, LedgerError::AnswerTooLong);
    Ok(())
}
