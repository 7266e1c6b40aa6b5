//! Account state structures for the Question Ledger program

use anchor_lang::prelude::*;

// ============================================================================
// Size Constants
// ============================================================================

/// Size of question ids, data keys and content hashes
pub const HASH_SIZE: usize = 32;

/// Maximum question text length in bytes
pub const MAX_QUESTION_LEN: usize = 400;

/// Maximum answer text length in bytes
pub const MAX_ANSWER_LEN: usize = 400;

/// Maximum collection metadata URI length
pub const MAX_METADATA_URI_LEN: usize = 200;

/// Maximum value length for free-form token data
pub const MAX_DATA_VALUE_LEN: usize = 256;

/// Registry entries per `TokenPage`.
/// A page of ids (4-byte length prefix + 30 * 32 bytes) fits the 1024-byte
/// return data limit.
pub const TOKEN_PAGE_SIZE: usize = 30;

/// Question lifecycle status
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, Default, InitSpace)]
#[repr(u8)]
pub enum QuestionStatus {
    /// Never asked, or revoked and cleared
    #[default]
    Nonexistent = 0,
    /// Asked, reward held in escrow
    Active = 1,
    /// Answered, reward paid out to the owner
    Answered = 2,
}

impl QuestionStatus {
    /// Validates whether a status transition is allowed.
    ///
    /// Valid transitions:
    /// - Nonexistent → Active (ask)
    /// - Active → Answered (answer)
    /// - Active → Nonexistent (revoke, frees the id for reuse)
    ///
    /// Answered is terminal.
    pub fn can_transition_to(&self, new_status: QuestionStatus) -> bool {
        use QuestionStatus::*;
        matches!(
            (self, new_status),
            (Nonexistent, Active) | (Active, Answered) | (Active, Nonexistent)
        )
    }

    /// A record can be read while it is active or answered
    pub fn exists(&self) -> bool {
        *self != QuestionStatus::Nonexistent
    }
}

/// Hash function used by a verifiable URI
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, Default, InitSpace)]
#[repr(u8)]
pub enum HashMethod {
    #[default]
    Sha256Utf8 = 0,
    Keccak256Utf8 = 1,
}

/// Content-addressed pointer to the collection metadata JSON.
///
/// Fixed when the ledger is created. Off-chain readers fetch `url` and
/// check the body against `hash` using `hash_method`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, PartialEq, Eq, Debug, Default, InitSpace)]
pub struct VerifiableUri {
    pub hash_method: HashMethod,
    pub hash: [u8; 32],
    #[max_len(200)]
    pub url: String,
}

impl VerifiableUri {
    pub const SIZE: usize = 1 + // hash_method
        32 + // hash
        4 + MAX_METADATA_URI_LEN; // url (string)
}

/// One live question token and its current holder
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, Default, InitSpace)]
pub struct TokenEntry {
    pub token_id: [u8; 32],
    pub holder: Pubkey,
}

impl TokenEntry {
    pub const SIZE: usize = 32 + // token_id
        32; // holder
}

/// Ledger configuration and counters
/// PDA seeds: ["ledger", owner]
///
/// Question tokens are listed in `TokenPage` accounts, so the ledger keeps a
/// fixed size however many questions are asked.
#[account]
#[derive(Default, Debug, InitSpace)]
pub struct Ledger {
    /// The answering account.
    /// Note: Cannot be updated after creation. Ownership transfer and
    /// renouncement are rejected.
    pub owner: Pubkey,
    /// Minimum escrow for a new question, in lamports
    pub min_reward: u64,
    /// Collection metadata descriptor
    pub metadata: VerifiableUri,
    /// Lamports currently escrowed across all active questions
    pub total_escrowed: u64,
    /// Live question tokens (asked and not revoked)
    pub total_supply: u64,
    /// Questions asked over the ledger's lifetime (re-asks included)
    pub total_asked: u64,
    /// Questions answered
    pub total_answered: u64,
    /// Questions revoked
    pub total_revoked: u64,
    /// Creation timestamp
    pub created_at: i64,
    /// Bump seed
    pub bump: u8,
}

impl Ledger {
    pub const SIZE: usize = 8 + // discriminator
        32 + // owner
        8 +  // min_reward
        VerifiableUri::SIZE + // metadata
        8 +  // total_escrowed
        8 +  // total_supply
        8 +  // total_asked
        8 +  // total_answered
        8 +  // total_revoked
        8 +  // created_at
        1; // bump

    /// Page that receives the next minted token
    pub fn next_page_index(&self) -> u64 {
        TokenPage::page_of(self.total_supply)
    }

    /// Page holding the most recently placed token, if any
    pub fn last_page_index(&self) -> Option<u64> {
        self.total_supply.checked_sub(1).map(TokenPage::page_of)
    }
}

/// One page of the question token registry
/// PDA seeds: ["tokens", ledger, page_index (u64 LE)]
///
/// The token at registry index `i` sits in page `i / TOKEN_PAGE_SIZE`, slot
/// `i % TOKEN_PAGE_SIZE`. Revoke swap-removes with the last token, so only
/// the last page is partially filled and pages never grow past
/// `TOKEN_PAGE_SIZE` entries.
#[account]
#[derive(Default, Debug, InitSpace)]
pub struct TokenPage {
    /// Ledger this page belongs to
    pub ledger: Pubkey,
    /// Position of the page in the registry
    pub page_index: u64,
    /// Tokens in this page, in registry order
    #[max_len(30)]
    pub entries: Vec<TokenEntry>,
    /// Bump seed
    pub bump: u8,
}

impl TokenPage {
    pub const SIZE: usize = 8 + // discriminator
        32 + // ledger
        8 +  // page_index
        4 + TOKEN_PAGE_SIZE * TokenEntry::SIZE + // entries
        1; // bump

    pub fn page_of(index: u64) -> u64 {
        index / TOKEN_PAGE_SIZE as u64
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= TOKEN_PAGE_SIZE
    }

    pub fn position(&self, token_id: &[u8; 32]) -> Option<usize> {
        self.entries.iter().position(|t| t.token_id == *token_id)
    }

    /// Token ids in this page held by `holder`, in registry order
    pub fn token_ids_of<'a>(&'a self, holder: &'a Pubkey) -> impl Iterator<Item = [u8; 32]> + 'a {
        self.entries
            .iter()
            .filter(move |t| t.holder == *holder)
            .map(|t| t.token_id)
    }
}

/// Question record
/// PDA seeds: ["question", ledger, question_id]
///
/// Escrowed lamports live in this account on top of its rent-exempt minimum.
/// The account is kept after revoke with every field zeroed, so the same
/// question can be asked again.
#[account]
#[derive(Default, Debug, InitSpace)]
pub struct Question {
    /// SHA-256 of the question text
    pub question_id: [u8; 32],
    /// Ledger this record belongs to
    pub ledger: Pubkey,
    /// Account that asked the question
    pub asker: Pubkey,
    /// Current custodian of the question token
    pub holder: Pubkey,
    /// Escrowed reward in lamports, fixed at ask time
    pub reward: u64,
    /// Question text (max 400 bytes)
    #[max_len(400)]
    pub question: Vec<u8>,
    /// Answer text (max 400 bytes), empty until answered
    #[max_len(400)]
    pub answer: Vec<u8>,
    /// Lifecycle status
    pub status: QuestionStatus,
    /// Ask timestamp
    pub ask_timestamp: i64,
    /// Answer timestamp (0 until answered)
    pub answer_timestamp: i64,
    /// Bump seed
    pub bump: u8,
}

impl Question {
    pub const SIZE: usize = 8 + // discriminator
        32 + // question_id
        32 + // ledger
        32 + // asker
        32 + // holder
        8 +  // reward
        4 + MAX_QUESTION_LEN + // question
        4 + MAX_ANSWER_LEN +   // answer
        1 +  // status
        8 +  // ask_timestamp
        8 +  // answer_timestamp
        1; // bump

    pub fn answered(&self) -> bool {
        self.status == QuestionStatus::Answered
    }
}

/// Free-form per-question data entry
/// PDA seeds: ["data", ledger, question_id, data_key]
#[account]
#[derive(Default, InitSpace)]
pub struct TokenData {
    pub ledger: Pubkey,
    pub question_id: [u8; 32],
    pub data_key: [u8; 32],
    #[max_len(256)]
    pub value: Vec<u8>,
    pub updated_at: i64,
    pub bump: u8,
}

impl TokenData {
    pub const SIZE: usize = 8 + // discriminator
        32 + // ledger
        32 + // question_id
        32 + // data_key
        4 + MAX_DATA_VALUE_LEN + // value
        8 +  // updated_at
        1; // bump
}

/// Full view of a question, returned by `get_question_and_answer`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, PartialEq, Eq, Debug)]
pub struct QuestionAndAnswer {
    pub asker: Pubkey,
    pub reward: u64,
    pub ask_timestamp: i64,
    pub answer_timestamp: i64,
    pub question: Vec<u8>,
    pub answer: Vec<u8>,
    pub answered: bool,
}

impl From<&Question> for QuestionAndAnswer {
    fn from(q: &Question) -> Self {
        Self {
            asker: q.asker,
            reward: q.reward,
            ask_timestamp: q.ask_timestamp,
            answer_timestamp: q.answer_timestamp,
            question: q.question.clone(),
            answer: q.answer.clone(),
            answered: q.answered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: SIZE should equal INIT_SPACE (borsh serialized) + 8-byte discriminator.
    macro_rules! test_size_constant {
        ($struct:ty) => {
            assert_eq!(
                <$struct>::SIZE,
                <$struct as anchor_lang::Space>::INIT_SPACE + 8,
                concat!(stringify!($struct), "::SIZE mismatch with INIT_SPACE")
            );
        };
    }

    #[test]
    fn test_question_size() {
        test_size_constant!(Question);
    }

    #[test]
    fn test_token_data_size() {
        test_size_constant!(TokenData);
    }

    #[test]
    fn test_verifiable_uri_size() {
        assert_eq!(
            VerifiableUri::SIZE,
            <VerifiableUri as anchor_lang::Space>::INIT_SPACE
        );
    }

    #[test]
    fn test_token_entry_size() {
        assert_eq!(TokenEntry::SIZE, <TokenEntry as anchor_lang::Space>::INIT_SPACE);
    }

    #[test]
    fn test_ledger_size() {
        test_size_constant!(Ledger);
    }

    #[test]
    fn test_token_page_size() {
        test_size_constant!(TokenPage);
    }

    #[test]
    fn test_full_page_serialized_len() {
        let page = TokenPage {
            entries: vec![TokenEntry::default(); TOKEN_PAGE_SIZE],
            ..Default::default()
        };
        let mut buf: Vec<u8> = Vec::new();
        AnchorSerialize::serialize(&page, &mut buf).unwrap();
        assert_eq!(buf.len() + 8, TokenPage::SIZE);
    }

    #[test]
    fn test_status_transitions() {
        use QuestionStatus::*;
        assert!(Nonexistent.can_transition_to(Active));
        assert!(Active.can_transition_to(Answered));
        assert!(Active.can_transition_to(Nonexistent));

        assert!(!Nonexistent.can_transition_to(Answered));
        assert!(!Active.can_transition_to(Active));
        assert!(!Answered.can_transition_to(Nonexistent));
        assert!(!Answered.can_transition_to(Active));
        assert!(!Answered.can_transition_to(Answered));
    }

    #[test]
    fn test_page_indexing() {
        assert_eq!(TokenPage::page_of(0), 0);
        assert_eq!(TokenPage::page_of(29), 0);
        assert_eq!(TokenPage::page_of(30), 1);

        let mut ledger = Ledger::default();
        assert_eq!(ledger.next_page_index(), 0);
        assert_eq!(ledger.last_page_index(), None);

        ledger.total_supply = 30;
        assert_eq!(ledger.next_page_index(), 1);
        assert_eq!(ledger.last_page_index(), Some(0));

        ledger.total_supply = 31;
        assert_eq!(ledger.last_page_index(), Some(1));
    }

    #[test]
    fn test_page_queries() {
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        let page = TokenPage {
            entries: vec![
                TokenEntry { token_id: [1; 32], holder: alice },
                TokenEntry { token_id: [2; 32], holder: bob },
                TokenEntry { token_id: [3; 32], holder: alice },
            ],
            ..Default::default()
        };

        assert_eq!(page.position(&[3; 32]), Some(2));
        assert_eq!(page.position(&[4; 32]), None);
        assert!(!page.is_full());

        let alice_tokens: Vec<_> = page.token_ids_of(&alice).collect();
        assert_eq!(alice_tokens, vec![[1; 32], [3; 32]]);
    }

    #[test]
    fn test_question_and_answer_view() {
        let asker = Pubkey::new_unique();
        let q = Question {
            asker,
            reward: 42,
            question: b"How are you?".to_vec(),
            answer: b"I am fine".to_vec(),
            status: QuestionStatus::Answered,
            ask_timestamp: 10,
            answer_timestamp: 20,
            ..Default::default()
        };
        let view = QuestionAndAnswer::from(&q);
        assert_eq!(view.asker, asker);
        assert_eq!(view.reward, 42);
        assert_eq!(view.question, b"How are you?".to_vec());
        assert_eq!(view.answer, b"I am fine".to_vec());
        assert!(view.answered);
    }
}
