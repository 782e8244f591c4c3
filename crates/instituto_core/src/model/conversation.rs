//! Messaging domain model.
//!
//! # Invariants
//! - A conversation has exactly two participants.
//! - At most one conversation exists per unordered participant pair.
//! - Messages are append-only and kept in insertion order.

use crate::model::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender_id: UserId,
    pub text: String,
    /// Serialized as RFC 3339.
    pub timestamp: DateTime<Utc>,
}

/// Two-party conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub participant_ids: [UserId; 2],
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Returns whether this conversation belongs to the unordered pair
    /// `{a, b}`.
    pub fn connects(&self, a: UserId, b: UserId) -> bool {
        let [first, second] = self.participant_ids;
        (first == a && second == b) || (first == b && second == a)
    }

    pub fn includes(&self, user_id: UserId) -> bool {
        self.participant_ids.contains(&user_id)
    }

    /// Returns the other participant when `user_id` takes part.
    ///
    /// A conversation with oneself has no partner.
    pub fn partner_of(&self, user_id: UserId) -> Option<UserId> {
        if !self.includes(user_id) {
            return None;
        }
        self.participant_ids
            .iter()
            .copied()
            .find(|id| *id != user_id)
    }

    /// Last message by insertion order.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::Conversation;

    #[test]
    fn pair_matching_is_symmetric() {
        let conversation = Conversation {
            id: "conv1".to_string(),
            participant_ids: [100, 101],
            messages: Vec::new(),
        };

        assert!(conversation.connects(100, 101));
        assert!(conversation.connects(101, 100));
        assert!(!conversation.connects(100, 102));
        assert_eq!(conversation.partner_of(101), Some(100));
        assert_eq!(conversation.partner_of(100), Some(101));
        assert_eq!(conversation.partner_of(7), None);
    }

    #[test]
    fn self_conversation_has_no_partner() {
        let conversation = Conversation {
            id: "conv-self".to_string(),
            participant_ids: [103, 103],
            messages: Vec::new(),
        };

        assert!(conversation.connects(103, 103));
        assert_eq!(conversation.partner_of(103), None);

        let pair = Conversation {
            id: "conv-pair".to_string(),
            participant_ids: [100, 103],
            messages: Vec::new(),
        };
        assert!(!pair.connects(103, 103));
    }
}
