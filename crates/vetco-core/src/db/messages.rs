//! Conversation, message and scheduled reply database operations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Conversation, FarmerSummary, Message, Role, ScheduledReply, VetSummary};

const CONVERSATION_SELECT: &str = r#"
    SELECT c.id, c.last_message, c.last_message_at, c.unread_by_farmer, c.unread_by_vet,
           f.id, f.name, f.location, f.phone, f.avatar,
           v.id, v.name, v.specialty, v.avatar
    FROM conversations c
    JOIN farmers f ON f.id = c.farmer_id
    JOIN vets v ON v.id = c.vet_id
"#;

impl Database {
    /// Find the conversation for a farmer/vet pair, creating it if absent.
    pub fn get_or_create_conversation(&self, farmer_id: &str, vet_id: &str) -> DbResult<i64> {
        self.conn.execute(
            "INSERT OR IGNORE INTO conversations (farmer_id, vet_id) VALUES (?1, ?2)",
            params![farmer_id, vet_id],
        )?;
        let id = self.conn.query_row(
            "SELECT id FROM conversations WHERE farmer_id = ?1 AND vet_id = ?2",
            params![farmer_id, vet_id],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Get a conversation by ID.
    pub fn get_conversation(&self, id: i64) -> DbResult<Option<Conversation>> {
        self.conn
            .query_row(
                &format!("{} WHERE c.id = ?", CONVERSATION_SELECT),
                [id],
                conversation_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// List a party's conversations, most recently active first.
    pub fn list_conversations(&self, viewer: Role, party_id: &str) -> DbResult<Vec<Conversation>> {
        let column = match viewer {
            Role::Farmer => "c.farmer_id",
            Role::Vet => "c.vet_id",
        };
        let mut stmt = self.conn.prepare(&format!(
            "{} WHERE {} = ? ORDER BY c.last_message_at IS NULL, c.last_message_at DESC, c.id",
            CONVERSATION_SELECT, column
        ))?;

        let rows = stmt.query_map([party_id], conversation_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Append a message, update the conversation preview and flag it unread
    /// for the receiving side.
    pub fn append_message(
        &self,
        conversation_id: i64,
        sender: Role,
        text: &str,
        sent_at: &str,
    ) -> DbResult<Message> {
        let tx = self.conn.unchecked_transaction()?;
        let message = write_message(&tx, conversation_id, sender, text, sent_at)?;
        tx.commit()?;
        Ok(message)
    }

    /// Messages of a conversation in append order.
    pub fn list_messages(&self, conversation_id: i64) -> DbResult<Vec<Message>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT id, conversation_id, sender, text, sent_at
               FROM messages WHERE conversation_id = ? ORDER BY id"#,
        )?;

        let rows = stmt.query_map([conversation_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut messages = Vec::new();
        for row in rows {
            let (id, conversation_id, sender, text, sent_at) = row?;
            messages.push(Message {
                id,
                conversation_id,
                sender: string_to_role(&sender)?,
                text,
                sent_at,
            });
        }
        Ok(messages)
    }

    /// Clear the viewer's unread flag.
    pub fn mark_conversation_read(&self, conversation_id: i64, viewer: Role) -> DbResult<bool> {
        let sql = match viewer {
            Role::Farmer => "UPDATE conversations SET unread_by_farmer = 0 WHERE id = ?",
            Role::Vet => "UPDATE conversations SET unread_by_vet = 0 WHERE id = ?",
        };
        let rows_affected = self.conn.execute(sql, [conversation_id])?;
        Ok(rows_affected > 0)
    }

    /// Queue a reply for later delivery, returning its ID.
    pub fn insert_scheduled_reply(
        &self,
        conversation_id: i64,
        sender: Role,
        text: &str,
        due_at_ms: i64,
    ) -> DbResult<i64> {
        self.conn.execute(
            r#"INSERT INTO scheduled_replies (conversation_id, sender, text, due_at_ms)
               VALUES (?1, ?2, ?3, ?4)"#,
            params![conversation_id, sender.as_str(), text, due_at_ms],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Scheduled replies due at or before `now_ms`, oldest due first.
    pub fn list_due_replies(&self, now_ms: i64) -> DbResult<Vec<ScheduledReply>> {
        self.query_scheduled_replies(
            "WHERE due_at_ms <= ?1 ORDER BY due_at_ms, id",
            now_ms,
        )
    }

    /// Replies still waiting in a conversation.
    pub fn list_scheduled_replies(&self, conversation_id: i64) -> DbResult<Vec<ScheduledReply>> {
        self.query_scheduled_replies(
            "WHERE conversation_id = ?1 ORDER BY due_at_ms, id",
            conversation_id,
        )
    }

    /// Append a scheduled reply to its conversation and drop it from the
    /// queue in one transaction. `None` when it was already delivered.
    pub fn deliver_scheduled_reply(
        &self,
        reply: &ScheduledReply,
        sent_at: &str,
    ) -> DbResult<Option<Message>> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute("DELETE FROM scheduled_replies WHERE id = ?", [reply.id])?;
        if removed == 0 {
            return Ok(None);
        }
        let message = write_message(&tx, reply.conversation_id, reply.sender, &reply.text, sent_at)?;
        tx.commit()?;
        Ok(Some(message))
    }

    fn query_scheduled_replies(&self, clause: &str, param: i64) -> DbResult<Vec<ScheduledReply>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, conversation_id, sender, text, due_at_ms FROM scheduled_replies {}",
            clause
        ))?;

        let rows = stmt.query_map([param], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, i64>(4)?,
            ))
        })?;

        let mut replies = Vec::new();
        for row in rows {
            let (id, conversation_id, sender, text, due_at_ms) = row?;
            replies.push(ScheduledReply {
                id,
                conversation_id,
                sender: string_to_role(&sender)?,
                text,
                due_at_ms,
            });
        }
        Ok(replies)
    }
}

/// Insert a message and refresh the conversation preview and the
/// counterpart's unread flag.
fn write_message(
    conn: &Connection,
    conversation_id: i64,
    sender: Role,
    text: &str,
    sent_at: &str,
) -> DbResult<Message> {
    let unread_column = match sender.counterpart() {
        Role::Farmer => "unread_by_farmer",
        Role::Vet => "unread_by_vet",
    };

    conn.execute(
        "INSERT INTO messages (conversation_id, sender, text, sent_at) VALUES (?1, ?2, ?3, ?4)",
        params![conversation_id, sender.as_str(), text, sent_at],
    )?;
    let id = conn.last_insert_rowid();

    let rows_affected = conn.execute(
        &format!(
            r#"UPDATE conversations SET last_message = ?2, last_message_at = ?3, {} = 1
               WHERE id = ?1"#,
            unread_column
        ),
        params![conversation_id, text, sent_at],
    )?;
    if rows_affected == 0 {
        return Err(DbError::NotFound(format!("conversation {}", conversation_id)));
    }

    Ok(Message {
        id,
        conversation_id,
        sender,
        text: text.to_string(),
        sent_at: sent_at.to_string(),
    })
}

fn conversation_from_row(row: &Row<'_>) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        id: row.get(0)?,
        last_message: row.get(1)?,
        last_message_at: row.get(2)?,
        unread_by_farmer: row.get(3)?,
        unread_by_vet: row.get(4)?,
        farmer: FarmerSummary {
            id: row.get(5)?,
            name: row.get(6)?,
            location: row.get(7)?,
            phone: row.get(8)?,
            avatar: row.get(9)?,
        },
        vet: VetSummary {
            id: row.get(10)?,
            name: row.get(11)?,
            specialty: row.get(12)?,
            avatar: row.get(13)?,
        },
    })
}

fn string_to_role(s: &str) -> Result<Role, DbError> {
    Role::parse(s).ok_or_else(|| DbError::Constraint(format!("Unknown sender role: {}", s)))
}
