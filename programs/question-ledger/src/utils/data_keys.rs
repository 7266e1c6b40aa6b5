//! Per-question data keys.
//!
//! Six keys mirror fields of the question record and may only change through
//! ask, answer and revoke. Every other key is free-form and lives in a
//! `TokenData` account. Raw 32-byte keys coming from an instruction are parsed
//! into [`DataKey`]; the write path takes a [`CustomDataKey`], which can only
//! be built from a non-protected key.

use crate::errors::LedgerError;
use crate::state::{Question, HASH_SIZE};
use anchor_lang::prelude::*;

/// ASCII `name` right-padded with zeros to a 32-byte key
pub const fn padded_key(name: &[u8]) -> [u8; HASH_SIZE] {
    let mut out = [0u8; HASH_SIZE];
    let mut i = 0;
    while i < name.len() && i < HASH_SIZE {
        out[i] = name[i];
        i += 1;
    }
    out
}

/// Keys managed by the ledger itself
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ProtectedKey {
    Question,
    Answer,
    Reward,
    Asker,
    AskTimestamp,
    AnswerTimestamp,
}

impl ProtectedKey {
    pub const ALL: [ProtectedKey; 6] = [
        ProtectedKey::Question,
        ProtectedKey::Answer,
        ProtectedKey::Reward,
        ProtectedKey::Asker,
        ProtectedKey::AskTimestamp,
        ProtectedKey::AnswerTimestamp,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ProtectedKey::Question => "Question",
            ProtectedKey::Answer => "Answer",
            ProtectedKey::Reward => "Reward",
            ProtectedKey::Asker => "Asker",
            ProtectedKey::AskTimestamp => "AskTimestamp",
            ProtectedKey::AnswerTimestamp => "AnswerTimestamp",
        }
    }

    pub const fn key(self) -> [u8; HASH_SIZE] {
        padded_key(self.name().as_bytes())
    }

    /// Error raised when this key is written through the generic data path
    pub fn write_error(self) -> LedgerError {
        match self {
            ProtectedKey::Question => LedgerError::MustNotSetQuestionKeyManually,
            ProtectedKey::Answer => LedgerError::MustNotSetAnswerKeyManually,
            ProtectedKey::Reward => LedgerError::MustNotSetRewardKeyManually,
            ProtectedKey::Asker => LedgerError::MustNotSetAskerKeyManually,
            ProtectedKey::AskTimestamp => LedgerError::MustNotSetAskTimestampKeyManually,
            ProtectedKey::AnswerTimestamp => LedgerError::MustNotSetAnswerTimestampKeyManually,
        }
    }

    /// Value of this key as read from the record.
    ///
    /// Integers are little-endian; an unset answer timestamp reads as empty.
    pub fn encode(self, question: &Question) -> Vec<u8> {
        match self {
            ProtectedKey::Question => question.question.clone(),
            ProtectedKey::Answer => question.answer.clone(),
            ProtectedKey::Reward => question.reward.to_le_bytes().to_vec(),
            ProtectedKey::Asker => question.asker.to_bytes().to_vec(),
            ProtectedKey::AskTimestamp => question.ask_timestamp.to_le_bytes().to_vec(),
            ProtectedKey::AnswerTimestamp if question.answer_timestamp == 0 => Vec::new(),
            ProtectedKey::AnswerTimestamp => question.answer_timestamp.to_le_bytes().to_vec(),
        }
    }

    /// Value of this key for a record that may be missing or revoked, which reads as empty.
    pub fn read(self, question: Option<&Question>) -> Vec<u8> {
        question.map(|q| self.encode(q)).unwrap_or_default()
    }
}

/// A key that is not managed by the ledger
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CustomDataKey([u8; HASH_SIZE]);

impl CustomDataKey {
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }
}

impl TryFrom<[u8; HASH_SIZE]> for CustomDataKey {
    type Error = anchor_lang::error::Error;

    fn try_from(raw: [u8; HASH_SIZE]) -> Result<Self> {
        match DataKey::parse(raw) {
            DataKey::Protected(key) => Err(key.write_error().into()),
            DataKey::Custom(key) => Ok(key),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DataKey {
    Protected(ProtectedKey),
    Custom(CustomDataKey),
}

impl DataKey {
    pub fn parse(raw: [u8; HASH_SIZE]) -> DataKey {
        ProtectedKey::ALL
            .into_iter()
            .find(|k| k.key() == raw)
            .map(DataKey::Protected)
            .unwrap_or(DataKey::Custom(CustomDataKey(raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::error_code;
    use crate::state::QuestionStatus;

    #[test]
    fn test_padded_key() {
        let key = padded_key(b"Reward");
        assert_eq!(&key[..6], b"Reward");
        assert!(key[6..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_protected_keys_parse() {
        for key in ProtectedKey::ALL {
            assert_eq!(DataKey::parse(key.key()), DataKey::Protected(key));
        }
    }

    #[test]
    fn test_protected_keys_rejected_with_own_error() {
        let expected = [
            LedgerError::MustNotSetQuestionKeyManually,
            LedgerError::MustNotSetAnswerKeyManually,
            LedgerError::MustNotSetRewardKeyManually,
            LedgerError::MustNotSetAskerKeyManually,
            LedgerError::MustNotSetAskTimestampKeyManually,
            LedgerError::MustNotSetAnswerTimestampKeyManually,
        ];
        for (key, expected) in ProtectedKey::ALL.into_iter().zip(expected) {
            let err = CustomDataKey::try_from(key.key()).unwrap_err();
            assert_eq!(error_code(err), u32::from(expected), "{}", key.name());
        }
    }

    #[test]
    fn test_custom_key_accepted() {
        let raw = padded_key(b"Color");
        let key = CustomDataKey::try_from(raw).unwrap();
        assert_eq!(key.as_bytes(), &raw);
    }

    #[test]
    fn test_similar_names_are_custom() {
        // Prefix and case variants are not protected
        for name in [&b"Questions"[..], b"question", b"Ask", b"AnswerTimestamp2"] {
            assert!(matches!(DataKey::parse(padded_key(name)), DataKey::Custom(_)));
        }
    }

    #[test]
    fn test_encode_record_fields() {
        let asker = Pubkey::new_unique();
        let mut q = Question {
            asker,
            reward: 1_000_000_000,
            question: b"How are you?".to_vec(),
            status: QuestionStatus::Active,
            ask_timestamp: 1_700_000_000,
            ..Default::default()
        };

        assert_eq!(ProtectedKey::Question.encode(&q), b"How are you?".to_vec());
        assert!(ProtectedKey::Answer.encode(&q).is_empty());
        assert_eq!(
            ProtectedKey::Reward.encode(&q),
            1_000_000_000u64.to_le_bytes().to_vec()
        );
        assert_eq!(ProtectedKey::Asker.encode(&q), asker.to_bytes().to_vec());
        assert_eq!(
            ProtectedKey::AskTimestamp.encode(&q),
            1_700_000_000i64.to_le_bytes().to_vec()
        );
        assert!(ProtectedKey::AnswerTimestamp.encode(&q).is_empty());

        q.answer_timestamp = 1_700_000_100;
        assert_eq!(
            ProtectedKey::AnswerTimestamp.encode(&q),
            1_700_000_100i64.to_le_bytes().to_vec()
        );
    }

    #[test]
    fn test_cleared_record_reads_empty() {
        // Revoked ids behave like ids that were never asked
        for key in ProtectedKey::ALL {
            assert!(key.read(None).is_empty(), "{}", key.name());
        }
        let q = Question {
            reward: 5,
            status: QuestionStatus::Active,
            ..Default::default()
        };
        assert_eq!(ProtectedKey::Reward.read(Some(&q)), 5u64.to_le_bytes().to_vec());
    }
}
