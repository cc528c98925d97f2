//! Conversation and message models.

use serde::{Deserialize, Serialize};

use super::party::{FarmerSummary, Role, VetSummary};

/// A thread between one farmer and one vet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversation {
    pub id: i64,
    pub farmer: FarmerSummary,
    pub vet: VetSummary,
    /// Preview of the most recent message
    pub last_message: String,
    /// Timestamp of the most recent message (RFC 3339), absent for empty threads
    pub last_message_at: Option<String>,
    pub unread_by_farmer: bool,
    pub unread_by_vet: bool,
}

impl Conversation {
    pub fn is_unread_for(&self, viewer: Role) -> bool {
        match viewer {
            Role::Farmer => self.unread_by_farmer,
            Role::Vet => self.unread_by_vet,
        }
    }

    /// Name of the other party from the viewer's side.
    pub fn counterpart_name(&self, viewer: Role) -> &str {
        match viewer {
            Role::Farmer => &self.vet.name,
            Role::Vet => &self.farmer.name,
        }
    }

    /// Case-insensitive match on counterpart name or last message.
    pub fn matches(&self, viewer: Role, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.counterpart_name(viewer).to_lowercase().contains(&term)
            || self.last_message.to_lowercase().contains(&term)
    }
}

/// One message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub sender: Role,
    pub text: String,
    /// RFC 3339
    pub sent_at: String,
}

/// A counterpart reply waiting for its delivery time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledReply {
    pub id: i64,
    pub conversation_id: i64,
    pub sender: Role,
    pub text: String,
    /// Unix epoch milliseconds
    pub due_at_ms: i64,
}
