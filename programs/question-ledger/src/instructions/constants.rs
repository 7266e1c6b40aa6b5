//! Shared constants for instruction handlers

/// PDA seed for ledger accounts: ["ledger", owner]
pub const LEDGER_SEED: &[u8] = b"ledger";

/// PDA seed for question accounts: ["question", ledger, question_id]
pub const QUESTION_SEED: &[u8] = b"question";

/// PDA seed for free-form token data: ["data", ledger, question_id, data_key]
pub const TOKEN_DATA_SEED: &[u8] = b"data";

/// Interface id reported by `supports_interface_id`.
/// Clients use it to tell a question ledger apart from other programs.
pub const QNA_INTERFACE_ID: [u8; 4] = [0xcd, 0xc5, 0xf2, 0xfd];

/// PDA seed for token registry pages: ["tokens", ledger, page_index]
pub const TOKEN_PAGE_SEED: &[u8] = b"tokens";

/// Maximum length of the opaque `data` forwarded with a transfer
pub const MAX_TRANSFER_DATA_LEN: usize = 256;
