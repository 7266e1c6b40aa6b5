//! Fuzz testing scenarios that simulate instruction execution
//!
//! These scenarios run the ledger's checks and state changes on plain Rust
//! values, without the Solana runtime, so sequences of instructions can be
//! property-tested quickly. Every simulated instruction either fails with the
//! program's error name and leaves the ledger untouched, or succeeds and is
//! followed by a full invariant sweep.

use crate::arbitrary::{pool_text, Actor, LedgerAction, CONTRACT_COUNT};
use crate::invariants::*;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};

pub type AccountKey = [u8; 32];

pub const MAX_QUESTION_LEN: usize = 400;
pub const MAX_ANSWER_LEN: usize = 400;
pub const MAX_DATA_VALUE_LEN: usize = 256;
pub const MAX_TRANSFER_DATA_LEN: usize = 256;
pub const MAX_METADATA_URI_LEN: usize = 200;

/// Protected key names and the error raised when each is written directly
pub const PROTECTED_KEYS: [(&str, &str); 6] = [
    ("Question", "MustNotSetQuestionKeyManually"),
    ("Answer", "MustNotSetAnswerKeyManually"),
    ("Reward", "MustNotSetRewardKeyManually"),
    ("Asker", "MustNotSetAskerKeyManually"),
    ("AskTimestamp", "MustNotSetAskTimestampKeyManually"),
    ("AnswerTimestamp", "MustNotSetAnswerTimestampKeyManually"),
];

/// SHA-256 of the question text
pub fn question_id_of(text: &[u8]) -> [u8; 32] {
    Sha256::digest(text).into()
}

/// ASCII name right-padded with zeros to 32 bytes
pub fn padded_key(name: &[u8]) -> [u8; 32] {
    let mut key = [0u8; 32];
    let len = name.len().min(32);
    key[..len].copy_from_slice(&name[..len]);
    key
}

/// Simulated question record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulatedQuestion {
    pub question_id: [u8; 32],
    pub asker: AccountKey,
    pub holder: AccountKey,
    pub reward: u64,
    pub question: Vec<u8>,
    pub answer: Vec<u8>,
    pub status: u8,
    pub ask_timestamp: i64,
    pub answer_timestamp: i64,
}

impl SimulatedQuestion {
    pub fn exists(&self) -> bool {
        self.status != question_status::NONEXISTENT
    }
}

/// Simulated ledger plus the balances of every account it touches
#[derive(Debug, Clone, Default)]
pub struct SimulatedLedger {
    pub owner: AccountKey,
    pub min_reward: u64,
    pub questions: BTreeMap<[u8; 32], SimulatedQuestion>,
    /// Lamports held above rent by each question account
    pub escrow: BTreeMap<[u8; 32], u64>,
    /// Live tokens in registry order: (token_id, holder).
    /// A revoke moves the last token into the freed slot.
    pub tokens: Vec<([u8; 32], AccountKey)>,
    pub data: BTreeMap<([u8; 32], [u8; 32]), Vec<u8>>,
    pub balances: BTreeMap<AccountKey, u64>,
    pub contracts: BTreeSet<AccountKey>,
    pub total_escrowed: u64,
}

impl SimulatedLedger {
    pub fn new(owner: AccountKey, min_reward: u64) -> Self {
        let mut ledger = Self {
            owner,
            min_reward,
            ..Default::default()
        };
        ledger.contracts.insert(owner);
        ledger.balances.insert(owner, 0);
        ledger
    }

    /// Adds a contract-capable account (e.g. a program-owned profile)
    pub fn add_contract(&mut self, key: AccountKey, lamports: u64) {
        self.contracts.insert(key);
        self.balances.insert(key, lamports);
    }

    /// Adds a plain wallet
    pub fn add_wallet(&mut self, key: AccountKey, lamports: u64) {
        self.contracts.remove(&key);
        self.balances.insert(key, lamports);
    }

    pub fn balance_of(&self, key: &AccountKey) -> u64 {
        self.balances.get(key).copied().unwrap_or(0)
    }

    pub fn total_lamports(&self) -> u128 {
        let balances: u128 = self.balances.values().map(|&b| b as u128).sum();
        let escrow: u128 = self.escrow.values().map(|&e| e as u128).sum();
        balances + escrow
    }

    /// Live record, or the program's error for reads of unknown ids
    pub fn record(&self, question_id: &[u8; 32]) -> Result<&SimulatedQuestion, String> {
        self.questions
            .get(question_id)
            .filter(|q| q.exists())
            .ok_or_else(|| "QuestionDoesNotExist".to_string())
    }

    pub fn answered(&self, question_id: &[u8; 32]) -> bool {
        self.record(question_id)
            .map(|q| q.status == question_status::ANSWERED)
            .unwrap_or(false)
    }

    pub fn total_supply(&self) -> u64 {
        self.tokens.len() as u64
    }

    pub fn tokens_of(&self, holder: &AccountKey) -> Vec<[u8; 32]> {
        self.tokens
            .iter()
            .filter(|(_, h)| h == holder)
            .map(|(id, _)| *id)
            .collect()
    }

    fn registry_holder(&self, question_id: &[u8; 32]) -> Option<&AccountKey> {
        self.tokens
            .iter()
            .find(|(id, _)| id == question_id)
            .map(|(_, h)| h)
    }

    /// Reads a data key: protected keys come from the record, others from storage.
    pub fn data_for(&self, question_id: &[u8; 32], key: &[u8; 32]) -> Result<Vec<u8>, String> {
        let q = self.record(question_id)?;
        let value = if *key == padded_key(b"Question") {
            q.question.clone()
        } else if *key == padded_key(b"Answer") {
            q.answer.clone()
        } else if *key == padded_key(b"Reward") {
            q.reward.to_le_bytes().to_vec()
        } else if *key == padded_key(b"Asker") {
            q.asker.to_vec()
        } else if *key == padded_key(b"AskTimestamp") {
            q.ask_timestamp.to_le_bytes().to_vec()
        } else if *key == padded_key(b"AnswerTimestamp") {
            if q.answer_timestamp == 0 {
                Vec::new()
            } else {
                q.answer_timestamp.to_le_bytes().to_vec()
            }
        } else {
            self.data
                .get(&(*question_id, *key))
                .cloned()
                .unwrap_or_default()
        };
        Ok(value)
    }

    /// Checks every global invariant, returning the first violation found.
    pub fn check_invariants(&self) -> Option<String> {
        let active_sum: u64 = self
            .questions
            .values()
            .filter(|q| q.status == question_status::ACTIVE)
            .map(|q| q.reward)
            .sum();
        if let EscrowInvariantResult::TrackedTotalMismatch { tracked, active_sum } =
            check_tracked_total(self.total_escrowed, active_sum)
        {
            return Some(format!(
                "total_escrowed {} != active rewards {}",
                tracked, active_sum
            ));
        }

        for (id, q) in &self.questions {
            let escrow = self.escrow.get(id).copied().unwrap_or(0);
            let result = check_question_escrow(q.status, q.reward, escrow);
            if result != EscrowInvariantResult::Valid {
                return Some(format!("escrow: {:?}", result));
            }

            let result = check_registry_entry(q.status, &q.holder, self.registry_holder(id));
            if result != RoleInvariantResult::Valid {
                return Some(format!("registry: {:?}", result));
            }

            if !q.exists() {
                let result = check_cleared(
                    &q.question,
                    &q.answer,
                    q.reward,
                    q.ask_timestamp,
                    q.answer_timestamp,
                );
                if result != QuestionInvariantResult::Valid {
                    return Some(format!("revoked record: {:?}", result));
                }
                continue;
            }

            let result = check_id_derivation(id, &question_id_of(&q.question));
            if result != QuestionInvariantResult::Valid {
                return Some(format!("id: {:?}", result));
            }

            let result = check_roles(
                &self.owner,
                &q.asker,
                &q.holder,
                self.contracts.contains(&q.holder),
            );
            if result != RoleInvariantResult::Valid {
                return Some(format!("roles: {:?}", result));
            }
        }

        for (id, _) in &self.tokens {
            if self.record(id).is_err() {
                return Some("registry token without a live record".to_string());
            }
        }

        None
    }
}

/// Result of a simulated instruction execution
#[derive(Debug, Clone)]
pub enum SimulationResult {
    Success,
    Error(String),
    InvariantViolation(String),
}

impl SimulationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SimulationResult::Success)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SimulationResult::Error(_))
    }

    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, SimulationResult::InvariantViolation(_))
    }

    /// True if this is the named program error
    pub fn is_error_named(&self, name: &str) -> bool {
        matches!(self, SimulationResult::Error(e) if e == name)
    }
}

fn fail(name: &str) -> SimulationResult {
    SimulationResult::Error(name.to_string())
}

/// Post-condition sweep comparing the ledger before and after an instruction
fn finish(before: &SimulatedLedger, after: &SimulatedLedger) -> SimulationResult {
    if let EscrowInvariantResult::ConservationViolation { before, after } =
        check_lamport_conservation(before.total_lamports(), after.total_lamports())
    {
        return SimulationResult::InvariantViolation(format!(
            "lamports not conserved: {} -> {}",
            before, after
        ));
    }

    if before.owner != after.owner {
        return SimulationResult::InvariantViolation("owner changed".to_string());
    }

    for (id, old) in &before.questions {
        let new = after.questions.get(id).cloned().unwrap_or_default();
        if let QuestionInvariantResult::InvalidStateTransition { from, to } =
            check_question_state_transition(old.status, new.status)
        {
            return SimulationResult::InvariantViolation(format!(
                "invalid transition {} -> {}",
                from, to
            ));
        }
        // Custody may move; content may not
        let mut old_content = old.clone();
        let mut new_content = new.clone();
        old_content.holder = [0u8; 32];
        new_content.holder = [0u8; 32];
        if check_terminal_unchanged(old.status, &old_content, &new_content)
            == QuestionInvariantResult::TerminalStateModified
        {
            return SimulationResult::InvariantViolation("answered record modified".to_string());
        }
    }

    match after.check_invariants() {
        Some(violation) => SimulationResult::InvariantViolation(violation),
        None => SimulationResult::Success,
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Simulated owner -> ledger registry
#[derive(Debug, Clone, Default)]
pub struct SimulatedFactory {
    pub ledgers: BTreeMap<AccountKey, SimulatedLedger>,
}

impl SimulatedFactory {
    pub fn ledger_address_of(&self, owner: &AccountKey) -> Option<&SimulatedLedger> {
        self.ledgers.get(owner)
    }
}

/// Simulate create_ledger instruction
pub fn simulate_create_ledger(
    factory: &mut SimulatedFactory,
    owner: AccountKey,
    owner_is_contract: bool,
    min_reward: u64,
    metadata_url: &str,
) -> SimulationResult {
    if factory.ledgers.contains_key(&owner) {
        return fail("QuestionAndAnswerContractAlreadyDeployed");
    }
    if !owner_is_contract {
        return fail("OwnerMustNotBeAnEOA");
    }
    let url_valid = !metadata_url.is_empty()
        && metadata_url.len() <= MAX_METADATA_URI_LEN
        && metadata_url.chars().all(|c| c.is_ascii_graphic() || c == ' ');
    if !url_valid {
        return fail("InvalidMetadataUri");
    }

    factory
        .ledgers
        .insert(owner, SimulatedLedger::new(owner, min_reward));
    SimulationResult::Success
}

// ============================================================================
// Question Lifecycle
// ============================================================================

/// Simulate ask instruction
pub fn simulate_ask(
    ledger: &mut SimulatedLedger,
    asker: AccountKey,
    payer: AccountKey,
    text: &[u8],
    reward: u64,
    now: i64,
) -> SimulationResult {
    if asker == ledger.owner {
        return fail("OwnerMustNotBeAsker");
    }
    if !ledger.contracts.contains(&asker) {
        return fail("OwnerMustNotBeAnEOA");
    }
    if reward < ledger.min_reward {
        return fail("ValueMustBeGreaterThanOrEqualMinReward");
    }
    if text.is_empty() {
        return fail("InvalidQuestion");
    }
    if text.len() > MAX_QUESTION_LEN {
        return fail("QuestionTooLong");
    }
    let id = question_id_of(text);
    if ledger.questions.get(&id).is_some_and(|q| q.exists()) {
        return fail("QuestionHasAlreadyBeenAsked");
    }
    let payer_balance = ledger.balance_of(&payer);
    if payer_balance < reward {
        // Rejected by the system program transfer
        return fail("InsufficientFunds");
    }
    let Some(total_escrowed) = ledger.total_escrowed.checked_add(reward) else {
        return fail("ArithmeticOverflow");
    };

    let before = ledger.clone();
    ledger.balances.insert(payer, payer_balance - reward);
    ledger.escrow.insert(id, reward);
    ledger.questions.insert(
        id,
        SimulatedQuestion {
            question_id: id,
            asker,
            holder: asker,
            reward,
            question: text.to_vec(),
            answer: Vec::new(),
            status: question_status::ACTIVE,
            ask_timestamp: now,
            answer_timestamp: 0,
        },
    );
    ledger.tokens.push((id, asker));
    ledger.total_escrowed = total_escrowed;

    finish(&before, ledger)
}

/// Simulate answer instruction
pub fn simulate_answer(
    ledger: &mut SimulatedLedger,
    signer: AccountKey,
    question_id: [u8; 32],
    answer: &[u8],
    now: i64,
) -> SimulationResult {
    if signer != ledger.owner {
        return fail("UnauthorizedOwner");
    }
    let question = match ledger.record(&question_id) {
        Ok(q) => q.clone(),
        Err(e) => return SimulationResult::Error(e),
    };
    if question.status == question_status::ANSWERED {
        return fail("QuestionHasAlreadyBeenAnswered");
    }
    if answer.len() > MAX_ANSWER_LEN {
        return fail("AnswerTooLong");
    }

    // Payout happens before the record changes; a failed payout aborts
    let escrow = ledger.escrow.get(&question_id).copied().unwrap_or(0);
    let Some(remaining) = escrow.checked_sub(question.reward) else {
        return fail("EscrowBelowRentExemption");
    };
    let Some(owner_balance) = ledger.balance_of(&signer).checked_add(question.reward) else {
        return fail("ArithmeticOverflow");
    };

    let before = ledger.clone();
    ledger.escrow.insert(question_id, remaining);
    ledger.balances.insert(signer, owner_balance);
    if let Some(q) = ledger.questions.get_mut(&question_id) {
        q.answer = answer.to_vec();
        q.answer_timestamp = now;
        q.status = question_status::ANSWERED;
    }
    ledger.total_escrowed -= question.reward;

    finish(&before, ledger)
}

/// Simulate revoke instruction
pub fn simulate_revoke(
    ledger: &mut SimulatedLedger,
    signer: AccountKey,
    question_id: [u8; 32],
) -> SimulationResult {
    let question = match ledger.record(&question_id) {
        Ok(q) => q.clone(),
        Err(e) => return SimulationResult::Error(e),
    };
    if question.status == question_status::ANSWERED {
        return fail("QuestionHasAlreadyBeenAnswered");
    }
    if question.holder != signer {
        return fail("UnauthorizedHolder");
    }

    let escrow = ledger.escrow.get(&question_id).copied().unwrap_or(0);
    let Some(remaining) = escrow.checked_sub(question.reward) else {
        return fail("EscrowBelowRentExemption");
    };
    let Some(holder_balance) = ledger.balance_of(&signer).checked_add(question.reward) else {
        return fail("ArithmeticOverflow");
    };

    let before = ledger.clone();
    ledger.escrow.insert(question_id, remaining);
    ledger.balances.insert(signer, holder_balance);
    ledger
        .questions
        .insert(question_id, SimulatedQuestion::default());
    if let Some(position) = ledger.tokens.iter().position(|(id, _)| *id == question_id) {
        ledger.tokens.swap_remove(position);
    }
    ledger.total_escrowed -= question.reward;

    finish(&before, ledger)
}

/// Simulate set_min_reward instruction
pub fn simulate_set_min_reward(
    ledger: &mut SimulatedLedger,
    signer: AccountKey,
    new_min_reward: u64,
) -> SimulationResult {
    if signer != ledger.owner {
        return fail("UnauthorizedOwner");
    }
    if new_min_reward == ledger.min_reward {
        return fail("MinRewardHasNotChanged");
    }

    let before = ledger.clone();
    ledger.min_reward = new_min_reward;
    finish(&before, ledger)
}

/// Simulate set_data_for_token_id instruction
pub fn simulate_set_data(
    ledger: &mut SimulatedLedger,
    signer: AccountKey,
    question_id: [u8; 32],
    key: [u8; 32],
    value: &[u8],
) -> SimulationResult {
    if signer != ledger.owner {
        return fail("UnauthorizedOwner");
    }
    if let Err(e) = ledger.record(&question_id) {
        return SimulationResult::Error(e);
    }
    if let Some((_, error)) = PROTECTED_KEYS
        .iter()
        .find(|(name, _)| padded_key(name.as_bytes()) == key)
    {
        return fail(error);
    }
    if value.len() > MAX_DATA_VALUE_LEN {
        return fail("DataValueTooLong");
    }

    let before = ledger.clone();
    ledger.data.insert((question_id, key), value.to_vec());
    finish(&before, ledger)
}

/// Simulate transfer instruction
pub fn simulate_transfer(
    ledger: &mut SimulatedLedger,
    signer: AccountKey,
    from: AccountKey,
    to: AccountKey,
    question_id: [u8; 32],
    data: &[u8],
) -> SimulationResult {
    if to == ledger.owner {
        return fail("OwnerMustNotBeAsker");
    }
    if !ledger.contracts.contains(&to) {
        return fail("OwnerMustNotBeAnEOA");
    }
    let question = match ledger.record(&question_id) {
        Ok(q) => q.clone(),
        Err(e) => return SimulationResult::Error(e),
    };
    if data.len() > MAX_TRANSFER_DATA_LEN {
        return fail("DataValueTooLong");
    }
    if question.holder != signer {
        return fail("UnauthorizedHolder");
    }
    if question.holder != from {
        return fail("TransferFromMismatch");
    }
    if from == to {
        return fail("CannotTransferToSelf");
    }

    let before = ledger.clone();
    if let Some(q) = ledger.questions.get_mut(&question_id) {
        q.holder = to;
    }
    if let Some(entry) = ledger.tokens.iter_mut().find(|(id, _)| *id == question_id) {
        entry.1 = to;
    }
    finish(&before, ledger)
}

/// Simulate renounce_ownership / transfer_ownership: always rejected
pub fn simulate_change_ownership(_ledger: &SimulatedLedger, _signer: AccountKey) -> SimulationResult {
    fail("TransferringOwnershipIsNotAllowed")
}

// ============================================================================
// Sessions
// ============================================================================

/// Starting balance of every funded actor in a session
pub const SESSION_FUNDING: u64 = 1_000_000_000_000;

/// Ledger owned by `Actor::Owner` with every contract and the wallet funded
pub fn new_session_ledger(min_reward: u64) -> SimulatedLedger {
    let mut ledger = SimulatedLedger::new(Actor::Owner.key(), min_reward);
    for i in 0..CONTRACT_COUNT {
        ledger.add_contract(Actor::Contract(i).key(), SESSION_FUNDING);
    }
    ledger.add_wallet(Actor::Wallet.key(), SESSION_FUNDING);
    ledger
}

/// Applies one session action to the ledger
pub fn simulate_action(ledger: &mut SimulatedLedger, action: &LedgerAction, now: i64) -> SimulationResult {
    match action {
        LedgerAction::Ask { asker, text, reward } => {
            simulate_ask(ledger, asker.key(), asker.key(), pool_text(*text), *reward, now)
        }
        LedgerAction::Answer { signer, text, answer } => {
            simulate_answer(ledger, signer.key(), question_id_of(pool_text(*text)), answer, now)
        }
        LedgerAction::Revoke { signer, text } => {
            simulate_revoke(ledger, signer.key(), question_id_of(pool_text(*text)))
        }
        LedgerAction::SetMinReward { signer, value } => {
            simulate_set_min_reward(ledger, signer.key(), *value)
        }
        LedgerAction::SetData { signer, text, key, value } => {
            simulate_set_data(ledger, signer.key(), question_id_of(pool_text(*text)), *key, value)
        }
        LedgerAction::Transfer { signer, from, to, text } => simulate_transfer(
            ledger,
            signer.key(),
            from.key(),
            to.key(),
            question_id_of(pool_text(*text)),
            &[],
        ),
        LedgerAction::ChangeOwnership { signer } => simulate_change_ownership(ledger, signer.key()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: AccountKey = [1u8; 32];
    const ASKER: AccountKey = [2u8; 32];
    const OTHER: AccountKey = [3u8; 32];
    const WALLET: AccountKey = [4u8; 32];
    const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

    fn setup() -> SimulatedLedger {
        let mut ledger = SimulatedLedger::new(OWNER, 0);
        ledger.add_contract(ASKER, 10 * LAMPORTS_PER_SOL);
        ledger.add_contract(OTHER, 10 * LAMPORTS_PER_SOL);
        ledger.add_wallet(WALLET, 10 * LAMPORTS_PER_SOL);
        ledger
    }

    #[test]
    fn test_how_are_you_end_to_end() {
        let mut ledger = setup();
        let id = question_id_of(b"How are you?");

        assert!(simulate_ask(&mut ledger, ASKER, ASKER, b"How are you?", LAMPORTS_PER_SOL, 100).is_success());
        assert!(simulate_answer(&mut ledger, OWNER, id, b"I am fine", 200).is_success());

        let q = ledger.record(&id).unwrap();
        assert_eq!(q.asker, ASKER);
        assert_eq!(q.reward, LAMPORTS_PER_SOL);
        assert_eq!(q.ask_timestamp, 100);
        assert_eq!(q.answer_timestamp, 200);
        assert_eq!(q.question, b"How are you?".to_vec());
        assert_eq!(q.answer, b"I am fine".to_vec());
        assert!(ledger.answered(&id));
        assert_eq!(ledger.balance_of(&OWNER), LAMPORTS_PER_SOL);

        assert!(simulate_answer(&mut ledger, OWNER, id, b"again", 300)
            .is_error_named("QuestionHasAlreadyBeenAnswered"));
        assert!(simulate_revoke(&mut ledger, ASKER, id).is_error_named("QuestionHasAlreadyBeenAnswered"));
    }

    #[test]
    fn test_factory_one_ledger_per_owner() {
        let mut factory = SimulatedFactory::default();
        assert!(simulate_create_ledger(&mut factory, OWNER, true, 0, "ipfs://QmCollection").is_success());
        assert!(factory.ledger_address_of(&OWNER).is_some());
        assert!(simulate_create_ledger(&mut factory, OWNER, true, 5, "ipfs://QmCollection")
            .is_error_named("QuestionAndAnswerContractAlreadyDeployed"));
        assert!(simulate_create_ledger(&mut factory, WALLET, false, 0, "ipfs://QmCollection")
            .is_error_named("OwnerMustNotBeAnEOA"));
        assert!(factory.ledger_address_of(&WALLET).is_none());
    }

    #[test]
    fn test_data_for_unknown_id() {
        let ledger = setup();
        let id = question_id_of(b"never asked");
        assert!(ledger.data_for(&id, &padded_key(b"Color")).is_err());
        assert!(!ledger.answered(&id));
    }
}
