//! Ledger invariant checking for fuzz testing

/// Escrow invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscrowInvariantResult {
    Valid,
    /// Lamports appeared or disappeared across an instruction
    ConservationViolation { before: u128, after: u128 },
    /// `total_escrowed` differs from the sum of active rewards
    TrackedTotalMismatch { tracked: u64, active_sum: u64 },
    /// An active question's escrow differs from its stored reward
    EscrowRewardMismatch { escrow: u64, reward: u64 },
    /// A non-active question still holds escrow
    StrandedEscrow { status: u8, escrow: u64 },
}

/// Question state machine invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionInvariantResult {
    Valid,
    InvalidStateTransition { from: u8, to: u8 },
    TerminalStateModified,
    ClearedRecordNotEmpty,
    IdNotDerivedFromText,
}

/// Role and registry invariant results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleInvariantResult {
    Valid,
    OwnerIsAsker,
    OwnerIsHolder,
    PlainWalletHolder,
    RegistryHolderMismatch,
    RegistryMissingToken,
    RegistryHasBurnedToken,
}

/// Question status values (mirrors QuestionStatus in state.rs)
pub mod question_status {
    pub const NONEXISTENT: u8 = 0;
    pub const ACTIVE: u8 = 1;
    pub const ANSWERED: u8 = 2;
}

// ============================================================================
// Escrow Invariants
// ============================================================================

/// Total lamports across every simulated account are unchanged.
pub fn check_lamport_conservation(before: u128, after: u128) -> EscrowInvariantResult {
    if before != after {
        EscrowInvariantResult::ConservationViolation { before, after }
    } else {
        EscrowInvariantResult::Valid
    }
}

pub fn check_tracked_total(tracked: u64, active_sum: u64) -> EscrowInvariantResult {
    if tracked != active_sum {
        EscrowInvariantResult::TrackedTotalMismatch { tracked, active_sum }
    } else {
        EscrowInvariantResult::Valid
    }
}

/// Active questions hold exactly their reward; others hold nothing.
pub fn check_question_escrow(status: u8, reward: u64, escrow: u64) -> EscrowInvariantResult {
    match status {
        question_status::ACTIVE if escrow != reward => {
            EscrowInvariantResult::EscrowRewardMismatch { escrow, reward }
        }
        question_status::ACTIVE => EscrowInvariantResult::Valid,
        _ if escrow != 0 => EscrowInvariantResult::StrandedEscrow { status, escrow },
        _ => EscrowInvariantResult::Valid,
    }
}

// ============================================================================
// Question Invariants
// ============================================================================

/// Nonexistent -> Active -> {Answered | Nonexistent}; unchanged is always allowed.
pub fn check_question_state_transition(from: u8, to: u8) -> QuestionInvariantResult {
    use question_status::*;
    let valid = from == to
        || matches!(
            (from, to),
            (NONEXISTENT, ACTIVE) | (ACTIVE, ANSWERED) | (ACTIVE, NONEXISTENT)
        );
    if valid {
        QuestionInvariantResult::Valid
    } else {
        QuestionInvariantResult::InvalidStateTransition { from, to }
    }
}

/// Answered records never change.
pub fn check_terminal_unchanged<T: PartialEq>(before_status: u8, before: &T, after: &T) -> QuestionInvariantResult {
    if before_status == question_status::ANSWERED && before != after {
        QuestionInvariantResult::TerminalStateModified
    } else {
        QuestionInvariantResult::Valid
    }
}

pub fn check_cleared(
    question: &[u8],
    answer: &[u8],
    reward: u64,
    ask_timestamp: i64,
    answer_timestamp: i64,
) -> QuestionInvariantResult {
    if question.is_empty() && answer.is_empty() && reward == 0 && ask_timestamp == 0 && answer_timestamp == 0 {
        QuestionInvariantResult::Valid
    } else {
        QuestionInvariantResult::ClearedRecordNotEmpty
    }
}

pub fn check_id_derivation(question_id: &[u8; 32], expected: &[u8; 32]) -> QuestionInvariantResult {
    if question_id != expected {
        QuestionInvariantResult::IdNotDerivedFromText
    } else {
        QuestionInvariantResult::Valid
    }
}

// ============================================================================
// Role Invariants
// ============================================================================

pub fn check_roles(owner: &[u8; 32], asker: &[u8; 32], holder: &[u8; 32], holder_is_contract: bool) -> RoleInvariantResult {
    if owner == asker {
        RoleInvariantResult::OwnerIsAsker
    } else if owner == holder {
        RoleInvariantResult::OwnerIsHolder
    } else if !holder_is_contract {
        RoleInvariantResult::PlainWalletHolder
    } else {
        RoleInvariantResult::Valid
    }
}

/// Registry entry for a question agrees with its record.
pub fn check_registry_entry(status: u8, record_holder: &[u8; 32], registry_holder: Option<&[u8; 32]>) -> RoleInvariantResult {
    match (status, registry_holder) {
        (question_status::NONEXISTENT, Some(_)) => RoleInvariantResult::RegistryHasBurnedToken,
        (question_status::NONEXISTENT, None) => RoleInvariantResult::Valid,
        (_, None) => RoleInvariantResult::RegistryMissingToken,
        (_, Some(h)) if h != record_holder => RoleInvariantResult::RegistryHolderMismatch,
        _ => RoleInvariantResult::Valid,
    }
}
