//! Append-only conversation model.
//!
//! Messages keep insertion order. At most one bot reply may be active
//! (`Typing` or `Streaming`) at a time; everything else is `Complete`.

use chrono::Utc;

use kangbot_types::error::ConversationError;
use kangbot_types::message::{Message, MessageStatus};

#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    /// Last id handed out. Survives `clear` so ids never repeat.
    last_id: i64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Millisecond timestamp, bumped past the previous id if the clock
    /// has not moved.
    fn next_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let id = now.max(self.last_id + 1);
        self.last_id = id;
        id
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> i64 {
        let id = self.next_id();
        self.messages.push(Message::user(id, text));
        id
    }

    /// Append a finished bot message (notices, apologies).
    pub fn push_notice(&mut self, text: impl Into<String>) -> i64 {
        let id = self.next_id();
        self.messages.push(Message::bot(id, text));
        id
    }

    /// Append an empty bot reply in `Typing` state.
    pub fn begin_reply(&mut self) -> Result<i64, ConversationError> {
        if let Some(active) = self.active_reply() {
            return Err(ConversationError::ReplyInProgress(active.id));
        }
        let id = self.next_id();
        self.messages.push(Message::typing(id));
        Ok(id)
    }

    /// Replace the text of an active reply and mark it `Streaming`.
    pub fn stream(&mut self, id: i64, text: &str) -> Result<&Message, ConversationError> {
        let message = self.active_mut(id)?;
        message.text.clear();
        message.text.push_str(text);
        message.status = MessageStatus::Streaming;
        Ok(message)
    }

    /// Set the final text of an active reply and mark it `Complete`.
    pub fn complete(&mut self, id: i64, text: impl Into<String>) -> Result<&Message, ConversationError> {
        let message = self.active_mut(id)?;
        message.text = text.into();
        message.status = MessageStatus::Complete;
        Ok(message)
    }

    fn active_mut(&mut self, id: i64) -> Result<&mut Message, ConversationError> {
        // Search from the back: the active reply is almost always last.
        let message = self
            .messages
            .iter_mut()
            .rev()
            .find(|m| m.id == id)
            .ok_or(ConversationError::UnknownMessage(id))?;
        if !message.status.is_active() {
            return Err(ConversationError::NotActive(id));
        }
        Ok(message)
    }

    pub fn active_reply(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.status.is_active())
    }

    pub fn get(&self, id: i64) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.id == id)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kangbot_types::message::Sender;

    #[test]
    fn test_ids_are_strictly_increasing() {
        let mut conv = Conversation::new();
        let a = conv.push_user("one");
        let b = conv.push_notice("two");
        let c = conv.push_user("three");
        assert!(a < b && b < c);
    }

    #[test]
    fn test_ids_stay_monotonic_across_clear() {
        let mut conv = Conversation::new();
        let a = conv.push_user("one");
        conv.clear();
        assert!(conv.is_empty());
        let b = conv.push_user("two");
        assert!(b > a);
    }

    #[test]
    fn test_reply_lifecycle() {
        let mut conv = Conversation::new();
        conv.push_user("question");
        let id = conv.begin_reply().unwrap();
        assert_eq!(conv.get(id).unwrap().status, MessageStatus::Typing);

        let msg = conv.stream(id, "ans").unwrap();
        assert_eq!(msg.status, MessageStatus::Streaming);
        assert_eq!(msg.text, "ans");

        let msg = conv.complete(id, "answer").unwrap();
        assert_eq!(msg.status, MessageStatus::Complete);
        assert_eq!(msg.sender, Sender::Bot);
        assert!(conv.active_reply().is_none());
    }

    #[test]
    fn test_only_one_active_reply() {
        let mut conv = Conversation::new();
        let first = conv.begin_reply().unwrap();
        assert_eq!(conv.begin_reply(), Err(ConversationError::ReplyInProgress(first)));

        conv.complete(first, "done").unwrap();
        assert!(conv.begin_reply().is_ok());
        let active = conv.messages().iter().filter(|m| m.status.is_active()).count();
        assert_eq!(active, 1);
    }

    #[test]
    fn test_completed_reply_is_frozen() {
        let mut conv = Conversation::new();
        let id = conv.begin_reply().unwrap();
        conv.complete(id, "final").unwrap();
        assert_eq!(conv.stream(id, "late").unwrap_err(), ConversationError::NotActive(id));
        assert_eq!(conv.get(id).unwrap().text, "final");
    }

    #[test]
    fn test_unknown_message() {
        let mut conv = Conversation::new();
        assert_eq!(conv.complete(99, "x").unwrap_err(), ConversationError::UnknownMessage(99));
    }

    #[test]
    fn test_insertion_order() {
        let mut conv = Conversation::new();
        conv.push_user("q1");
        let r = conv.begin_reply().unwrap();
        conv.complete(r, "a1").unwrap();
        conv.push_user("q2");

        let texts: Vec<&str> = conv.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["q1", "a1", "q2"]);
        assert_eq!(conv.len(), 3);
    }
}
