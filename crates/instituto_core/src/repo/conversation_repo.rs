//! Conversation repository contracts and in-memory implementation.
//!
//! # Invariants
//! - At most one conversation per unordered participant pair.
//! - `append_message` finds-or-creates and appends under one write lock.

use crate::model::conversation::{Conversation, Message};
use crate::model::user::UserId;
use crate::repo::user_repo::{RepoError, RepoResult};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Repository interface for two-party conversations.
pub trait ConversationRepository {
    fn list_conversations(&self) -> RepoResult<Vec<Conversation>>;
    /// Returns the conversation for the unordered pair `{a, b}`.
    fn find_between(&self, a: UserId, b: UserId) -> RepoResult<Option<Conversation>>;
    /// Appends `message` to the `{sender_id, receiver_id}` conversation,
    /// creating it with `new_conversation_id()` when missing.
    ///
    /// Returns the id of the conversation that received the message.
    fn append_message<F>(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
        message: Message,
        new_conversation_id: F,
    ) -> RepoResult<String>
    where
        F: FnOnce() -> String;
}

/// `RwLock`-guarded conversation table.
#[derive(Debug, Default)]
pub struct InMemoryConversationRepository {
    conversations: RwLock<Vec<Conversation>>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from seed conversations.
    pub fn with_conversations(conversations: Vec<Conversation>) -> Self {
        Self {
            conversations: RwLock::new(conversations),
        }
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, Vec<Conversation>>> {
        self.conversations
            .read()
            .map_err(|_| RepoError::LockPoisoned("conversations"))
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, Vec<Conversation>>> {
        self.conversations
            .write()
            .map_err(|_| RepoError::LockPoisoned("conversations"))
    }
}

impl ConversationRepository for InMemoryConversationRepository {
    fn list_conversations(&self) -> RepoResult<Vec<Conversation>> {
        Ok(self.read()?.clone())
    }

    fn find_between(&self, a: UserId, b: UserId) -> RepoResult<Option<Conversation>> {
        Ok(self
            .read()?
            .iter()
            .find(|conversation| conversation.connects(a, b))
            .cloned())
    }

    fn append_message<F>(
        &self,
        sender_id: UserId,
        receiver_id: UserId,
        message: Message,
        new_conversation_id: F,
    ) -> RepoResult<String>
    where
        F: FnOnce() -> String,
    {
        let mut conversations = self.write()?;
        if let Some(conversation) = conversations
            .iter_mut()
            .find(|conversation| conversation.connects(sender_id, receiver_id))
        {
            conversation.messages.push(message);
            return Ok(conversation.id.clone());
        }

        let conversation = Conversation {
            id: new_conversation_id(),
            participant_ids: [sender_id, receiver_id],
            messages: vec![message],
        };
        let id = conversation.id.clone();
        conversations.push(conversation);
        Ok(id)
    }
}
