#![allow(unexpected_cfgs)]
//! Question Ledger
//!
//! Paid question-and-answer escrow. Anyone except the ledger owner can ask a
//! question by escrowing a reward; the owner collects the reward by
//! answering, or the current holder of the question token revokes it and
//! gets the reward back. Each owner deploys at most one ledger.

use anchor_lang::prelude::*;

declare_id!("bcQqc3v9A4TZj9EuMzRtJkHsNK9z5WASfaYwq9qqwao");

pub mod errors;
pub mod events;
pub mod instructions;
pub mod state;
pub mod utils;

use instructions::*;
use state::{QuestionAndAnswer, VerifiableUri};

#[program]
pub mod question_ledger {
    use super::*;

    /// Deploy a ledger for a contract-capable owner account.
    /// The ledger PDA is derived from the owner, so each owner has at most one.
    ///
    /// # Arguments
    /// * `ctx` - Context with the ledger PDA, owner and payer
    /// * `metadata` - Collection metadata descriptor (hash method, hash, URI)
    /// * `initial_min_reward` - Minimum escrow for new questions, in lamports
    pub fn create_ledger(
        ctx: Context<CreateLedger>,
        metadata: VerifiableUri,
        initial_min_reward: u64,
    ) -> Result<()> {
        instructions::create_ledger::handler(ctx, metadata, initial_min_reward)
    }

    /// Ledger address of an owner, or `None` if none was deployed.
    pub fn ledger_address_of(ctx: Context<LedgerAddressOf>) -> Result<Option<Pubkey>> {
        instructions::create_ledger::query_ledger_address_of(ctx)
    }

    /// Ask a question and escrow `reward` lamports in the question account.
    ///
    /// # Arguments
    /// * `ctx` - Context with ledger, question PDA, asker and payer
    /// * `question_id` - SHA-256 of the question text
    /// * `question` - Question text (max 400 bytes)
    /// * `reward` - Escrowed reward, at least the ledger's minimum
    pub fn ask(
        ctx: Context<AskQuestion>,
        question_id: [u8; 32],
        question: Vec<u8>,
        reward: u64,
    ) -> Result<()> {
        instructions::ask::handler(ctx, question_id, question, reward)
    }

    /// Answer a question and receive its escrowed reward.
    /// Only the ledger owner can answer; answered questions are final.
    pub fn answer(
        ctx: Context<AnswerQuestion>,
        question_id: [u8; 32],
        answer: Vec<u8>,
    ) -> Result<()> {
        instructions::answer::handler(ctx, question_id, answer)
    }

    /// Revoke an unanswered question. The reward is refunded to the current
    /// holder and the id can be asked again.
    ///
    /// `page_index` names the registry page holding the token; the last
    /// registry page is passed as well so its last token can fill the slot.
    pub fn revoke(
        ctx: Context<RevokeQuestion>,
        question_id: [u8; 32],
        page_index: u64,
    ) -> Result<()> {
        instructions::revoke::handler(ctx, question_id, page_index)
    }

    /// Change the minimum reward for new questions (owner only).
    pub fn set_min_reward(ctx: Context<SetMinReward>, new_min_reward: u64) -> Result<()> {
        instructions::set_min_reward::handler(ctx, new_min_reward)
    }

    /// Write a free-form data key of an existing question (owner only).
    pub fn set_data_for_token_id(
        ctx: Context<SetDataForTokenId>,
        question_id: [u8; 32],
        data_key: [u8; 32],
        value: Vec<u8>,
    ) -> Result<()> {
        instructions::set_data_for_token_id::handler(ctx, question_id, data_key, value)
    }

    /// Move custody of a question token to another contract account.
    ///
    /// # Arguments
    /// * `from` - Current holder, must match the signer
    /// * `question_id` - Token id
    /// * `page_index` - Registry page holding the token
    /// * `force` - Recorded in the event; recipients must be contract accounts either way
    /// * `data` - Opaque payload forwarded in the event (max 256 bytes)
    pub fn transfer(
        ctx: Context<TransferQuestion>,
        from: Pubkey,
        question_id: [u8; 32],
        page_index: u64,
        force: bool,
        data: Vec<u8>,
    ) -> Result<()> {
        instructions::transfer::handler(ctx, from, question_id, page_index, force, data)
    }

    /// Always fails: ledger ownership cannot be renounced.
    pub fn renounce_ownership(ctx: Context<ChangeOwnership>) -> Result<()> {
        instructions::ownership::reject_renounce_ownership(ctx)
    }

    /// Always fails: ledger ownership cannot be transferred.
    pub fn transfer_ownership(ctx: Context<ChangeOwnership>, new_owner: Pubkey) -> Result<()> {
        instructions::ownership::reject_transfer_ownership(ctx, new_owner)
    }

    pub fn owner(ctx: Context<ReadLedger>) -> Result<Pubkey> {
        instructions::queries::query_owner(ctx)
    }

    pub fn min_reward(ctx: Context<ReadLedger>) -> Result<u64> {
        instructions::queries::query_min_reward(ctx)
    }

    /// Number of live question tokens (asked and not revoked).
    pub fn total_supply(ctx: Context<ReadLedger>) -> Result<u64> {
        instructions::queries::query_total_supply(ctx)
    }

    /// Token id at registry position `index`. A revoke moves the last token into the freed slot.
    pub fn token_at(ctx: Context<ReadTokenAt>, index: u64) -> Result<[u8; 32]> {
        instructions::queries::query_token_at(ctx, index)
    }

    /// Token ids held by `holder` within registry page `page_index`.
    /// Pages run from 0 to `(total_supply - 1) / 30`.
    pub fn token_ids_of(
        ctx: Context<ReadTokenPage>,
        holder: Pubkey,
        page_index: u64,
    ) -> Result<Vec<[u8; 32]>> {
        instructions::queries::query_token_ids_of(ctx, holder, page_index)
    }

    pub fn supports_interface_id(ctx: Context<ReadLedger>, interface_id: [u8; 4]) -> Result<bool> {
        instructions::queries::query_supports_interface_id(ctx, interface_id)
    }

    pub fn get_collection_metadata(ctx: Context<ReadLedger>) -> Result<VerifiableUri> {
        instructions::queries::query_collection_metadata(ctx)
    }

    /// Whether the question has been answered. False for unknown ids.
    pub fn answered(ctx: Context<ReadQuestion>, question_id: [u8; 32]) -> Result<bool> {
        instructions::queries::query_answered(ctx, question_id)
    }

    pub fn get_asker(ctx: Context<ReadQuestion>, question_id: [u8; 32]) -> Result<Pubkey> {
        instructions::queries::query_asker(ctx, question_id)
    }

    pub fn get_reward(ctx: Context<ReadQuestion>, question_id: [u8; 32]) -> Result<u64> {
        instructions::queries::query_reward(ctx, question_id)
    }

    pub fn get_question(ctx: Context<ReadQuestion>, question_id: [u8; 32]) -> Result<Vec<u8>> {
        instructions::queries::query_question(ctx, question_id)
    }

    pub fn get_answer(ctx: Context<ReadQuestion>, question_id: [u8; 32]) -> Result<Vec<u8>> {
        instructions::queries::query_answer(ctx, question_id)
    }

    pub fn get_ask_timestamp(ctx: Context<ReadQuestion>, question_id: [u8; 32]) -> Result<i64> {
        instructions::queries::query_ask_timestamp(ctx, question_id)
    }

    pub fn get_answer_timestamp(ctx: Context<ReadQuestion>, question_id: [u8; 32]) -> Result<i64> {
        instructions::queries::query_answer_timestamp(ctx, question_id)
    }

    pub fn get_question_and_answer(
        ctx: Context<ReadQuestion>,
        question_id: [u8; 32],
    ) -> Result<QuestionAndAnswer> {
        instructions::queries::query_question_and_answer(ctx, question_id)
    }

    /// Value stored under `data_key`. Keys mirroring the record are read from
    /// it and are empty for unknown or revoked ids.
    pub fn get_data_for_token_id(
        ctx: Context<ReadTokenData>,
        question_id: [u8; 32],
        data_key: [u8; 32],
    ) -> Result<Vec<u8>> {
        instructions::queries::query_data_for_token_id(ctx, question_id, data_key)
    }
}
