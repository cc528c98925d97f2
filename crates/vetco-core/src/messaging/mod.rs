//! Farmer/vet conversations with scheduled counterpart replies.
//!
//! A send never blocks waiting for the counterpart. When the reply policy
//! fires, the reply is stored with a due time and appended by
//! [`Messenger::deliver_due_replies`] once that time has passed.

mod reply;

pub use reply::*;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MessagingConfig;
use crate::db::{Database, DbError};
use crate::models::{Conversation, Message, Role};
use crate::validation::is_blank;

#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(i64),

    #[error("Farmer not found: {0}")]
    FarmerNotFound(String),

    #[error("Vet not found: {0}")]
    VetNotFound(String),
}

pub type MessagingResult<T> = Result<T, MessagingError>;

/// An opened conversation and its messages in append order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationThread {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

/// A message that was sent, and when the counterpart reply is due, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentMessage {
    pub message: Message,
    pub reply_due_at_ms: Option<i64>,
}

pub struct Messenger<'a> {
    db: &'a Database,
    vet_reply: ReplyPolicy,
    farmer_reply: ReplyPolicy,
    rng: StdRng,
}

impl<'a> Messenger<'a> {
    pub fn new(db: &'a Database, config: &MessagingConfig) -> Self {
        Self {
            db,
            vet_reply: ReplyPolicy::from_config(&config.vet_reply),
            farmer_reply: ReplyPolicy::from_config(&config.farmer_reply),
            rng: StdRng::from_entropy(),
        }
    }

    /// Use a fixed random source (for reproducible `sometimes` replies).
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// The policy the given side replies with.
    pub fn reply_policy(&self, replier: Role) -> &ReplyPolicy {
        match replier {
            Role::Farmer => &self.farmer_reply,
            Role::Vet => &self.vet_reply,
        }
    }

    /// Open a conversation: mark it read for the viewer and load its messages.
    pub fn open(&self, conversation_id: i64, viewer: Role) -> MessagingResult<ConversationThread> {
        self.db.mark_conversation_read(conversation_id, viewer)?;

        let conversation = self
            .db
            .get_conversation(conversation_id)?
            .ok_or(MessagingError::ConversationNotFound(conversation_id))?;
        let messages = self.db.list_messages(conversation_id)?;

        log::debug!(
            "Opened conversation {} as {} ({} messages)",
            conversation_id,
            viewer.as_str(),
            messages.len()
        );
        Ok(ConversationThread {
            conversation,
            messages,
        })
    }

    /// Open the conversation between a farmer and a vet, starting it if
    /// they have never talked.
    pub fn open_with(
        &self,
        farmer_id: &str,
        vet_id: &str,
        viewer: Role,
    ) -> MessagingResult<ConversationThread> {
        if self.db.get_farmer(farmer_id)?.is_none() {
            return Err(MessagingError::FarmerNotFound(farmer_id.to_string()));
        }
        if self.db.get_vet(vet_id)?.is_none() {
            return Err(MessagingError::VetNotFound(vet_id.to_string()));
        }

        let id = self.db.get_or_create_conversation(farmer_id, vet_id)?;
        self.open(id, viewer)
    }

    /// Send a message. Blank text is ignored and returns `None`.
    pub fn send(
        &mut self,
        conversation_id: i64,
        sender: Role,
        text: &str,
        now: DateTime<Utc>,
    ) -> MessagingResult<Option<SentMessage>> {
        if is_blank(text) {
            return Ok(None);
        }
        if self.db.get_conversation(conversation_id)?.is_none() {
            return Err(MessagingError::ConversationNotFound(conversation_id));
        }

        let message = self
            .db
            .append_message(conversation_id, sender, text.trim(), &now.to_rfc3339())?;
        log::info!(
            "{} sent message {} in conversation {}",
            sender.as_str(),
            message.id,
            conversation_id
        );

        let replier = sender.counterpart();
        let policy = self.reply_policy(replier).clone();

        let reply_due_at_ms = if policy.should_reply(&mut self.rng) {
            let due_at_ms = now.timestamp_millis().saturating_add(policy.delay_ms);
            self.db
                .insert_scheduled_reply(conversation_id, replier, &policy.text, due_at_ms)?;
            log::debug!(
                "Scheduled {} reply in conversation {} at {}",
                replier.as_str(),
                conversation_id,
                due_at_ms
            );
            Some(due_at_ms)
        } else {
            None
        };

        Ok(Some(SentMessage {
            message,
            reply_due_at_ms,
        }))
    }

    /// Append every scheduled reply due at or before `now`.
    pub fn deliver_due_replies(&self, now: DateTime<Utc>) -> MessagingResult<Vec<Message>> {
        let sent_at = now.to_rfc3339();
        let mut delivered = Vec::new();

        for reply in self.db.list_due_replies(now.timestamp_millis())? {
            if let Some(message) = self.db.deliver_scheduled_reply(&reply, &sent_at)? {
                delivered.push(message);
            }
        }

        if !delivered.is_empty() {
            log::info!("Delivered {} scheduled replies", delivered.len());
        }
        Ok(delivered)
    }

    /// A party's conversations matching `term` on counterpart name or last
    /// message. An empty term lists everything.
    pub fn conversations(
        &self,
        viewer: Role,
        party_id: &str,
        term: &str,
    ) -> MessagingResult<Vec<Conversation>> {
        let conversations = self.db.list_conversations(viewer, party_id)?;
        Ok(conversations
            .into_iter()
            .filter(|c| c.matches(viewer, term))
            .collect())
    }

    /// Number of conversations with unread messages for the viewer.
    pub fn unread_count(&self, viewer: Role, party_id: &str) -> MessagingResult<usize> {
        let conversations = self.db.list_conversations(viewer, party_id)?;
        Ok(conversations
            .iter()
            .filter(|c| c.is_unread_for(viewer))
            .count())
    }
}
