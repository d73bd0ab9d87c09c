use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::openai_client::ChatMessage;

/// Booking-flow persona every transcript starts from.
pub const SYSTEM_PROMPT: &str = r#"You are a premium hotel booking service provider for company Dukaan.
You have to start talking with the user in the language they are using.

Booking flow:
1. You greet the user first.
2. User asks about room booking.
3. You ask for the budget.
4. User provides the budget.
5. You show the rooms available in the budget using function calling. If no room is available in the budget, show the message "No room available in the budget".
6. User selects the room name.
7. You ask for the number of nights.
8. User provides the number of nights.
9. You ask for the number of guests.
10. User provides the number of guests.
11. You ask for the email.
12. User provides the email.
13. You ask for the full name.
14. User provides the full name.
15. You calculate the total price and show it to the user with selected house details.
16. User confirms the booking.
17. You show the booking details with the heading "Booking Details" and send this data to the user's email using function calling.
18. You show the thank you message."#;

/// In-memory chat history, one transcript per user id. Every transcript is
/// seeded with the system prompt on first touch and only ever appended to.
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    transcripts: Arc<RwLock<HashMap<String, Vec<ChatMessage>>>>,
}

fn seed_transcript() -> Vec<ChatMessage> {
    vec![ChatMessage::system(SYSTEM_PROMPT)]
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self {
            transcripts: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Snapshot of a user's transcript, in append order.
    pub async fn history(&self, user_id: &str) -> Vec<ChatMessage> {
        let mut transcripts = self.transcripts.write().await;
        transcripts
            .entry(user_id.to_string())
            .or_insert_with(seed_transcript)
            .clone()
    }

    pub async fn append(&self, user_id: &str, message: ChatMessage) {
        let mut transcripts = self.transcripts.write().await;
        transcripts
            .entry(user_id.to_string())
            .or_insert_with(seed_transcript)
            .push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_touch_seeds_the_system_prompt() {
        let store = TranscriptStore::new();
        let history = store.history("u1").await;

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, "system");
        assert_eq!(history[0].content.as_deref(), Some(SYSTEM_PROMPT));
    }

    #[tokio::test]
    async fn appends_preserve_order_after_the_prompt() {
        let store = TranscriptStore::new();
        store.append("u1", ChatMessage::user("first")).await;
        store.append("u1", ChatMessage::user("second")).await;

        let history = store.history("u1").await;
        assert_eq!(history.len(), 3);
        assert_eq!(history[1].content.as_deref(), Some("first"));
        assert_eq!(history[2].content.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn transcripts_are_isolated_per_user() {
        let store = TranscriptStore::new();
        store.append("u1", ChatMessage::user("room under 100")).await;

        let other = store.history("u2").await;
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].role, "system");
    }
}
