//! Error codes for the Question Ledger program

use anchor_lang::prelude::*;

/// Codes are assigned in declaration order starting at 6000.
#[error_code]
pub enum LedgerError {
    // Identity errors
    #[msg("The ledger owner must not ask or hold questions")]
    OwnerMustNotBeAsker,

    #[msg("Account must be a contract account, not a plain wallet")]
    OwnerMustNotBeAnEOA,

    #[msg("Only the ledger owner can perform this action")]
    UnauthorizedOwner,

    #[msg("Only the current question holder can perform this action")]
    UnauthorizedHolder,

    #[msg("Transferring or renouncing ownership is not allowed")]
    TransferringOwnershipIsNotAllowed,

    // Question errors
    #[msg("The sent value is below the minimum reward")]
    ValueMustBeGreaterThanOrEqualMinReward,

    #[msg("Question has already been asked")]
    QuestionHasAlreadyBeenAsked,

    #[msg("Question does not exist")]
    QuestionDoesNotExist,

    #[msg("Question has already been answered")]
    QuestionHasAlreadyBeenAnswered,

    #[msg("Question status transition is not allowed")]
    InvalidStatusTransition,

    #[msg("Question id is not the hash of the question text")]
    QuestionIdMismatch,

    #[msg("Question text must not be empty")]
    InvalidQuestion,

    #[msg("Question text is too long")]
    QuestionTooLong,

    #[msg("Answer text is too long")]
    AnswerTooLong,

    #[msg("Question account does not belong to this ledger")]
    QuestionLedgerMismatch,

    // Configuration errors
    #[msg("Minimum reward has not changed")]
    MinRewardHasNotChanged,

    #[msg("A question and answer ledger is already deployed for this owner")]
    QuestionAndAnswerContractAlreadyDeployed,

    #[msg("Metadata URI is empty, too long or contains invalid characters")]
    InvalidMetadataUri,

    #[msg("Metadata hash must not be zero")]
    InvalidMetadataHash,

    // Token data errors
    #[msg("The Question key must not be set manually")]
    MustNotSetQuestionKeyManually,

    #[msg("The Answer key must not be set manually")]
    MustNotSetAnswerKeyManually,

    #[msg("The Reward key must not be set manually")]
    MustNotSetRewardKeyManually,

    #[msg("The Asker key must not be set manually")]
    MustNotSetAskerKeyManually,

    #[msg("The AskTimestamp key must not be set manually")]
    MustNotSetAskTimestampKeyManually,

    #[msg("The AnswerTimestamp key must not be set manually")]
    MustNotSetAnswerTimestampKeyManually,

    #[msg("Data value is too long")]
    DataValueTooLong,

    // Token registry errors
    #[msg("Token index is out of bounds")]
    TokenIndexOutOfBounds,

    #[msg("Question token is not registered")]
    TokenNotRegistered,

    #[msg("Question token is already registered")]
    TokenAlreadyRegistered,

    #[msg("Token page does not belong to this ledger or is not the expected page")]
    TokenPageMismatch,

    #[msg("Sender is not the current holder")]
    TransferFromMismatch,

    #[msg("Cannot transfer a question to its current holder")]
    CannotTransferToSelf,

    // Escrow errors
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,

    #[msg("Payout would leave the escrow below rent exemption")]
    EscrowBelowRentExemption,
}

/// Error code carried by an anchor error, for asserting on failures in tests.
#[cfg(test)]
pub(crate) fn error_code(err: anchor_lang::error::Error) -> u32 {
    match err {
        anchor_lang::error::Error::AnchorError(e) => e.error_code_number,
        anchor_lang::error::Error::ProgramError(e) => panic!("expected anchor error, got {e:?}"),
    }
}
