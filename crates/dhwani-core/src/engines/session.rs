//! Conversation session wrapper around a chat engine.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::engines::chat::{ChatEngine, ChatMessage, ChatReply};
use crate::error::Result;

/// Bounded conversation state around an [`ChatEngine`].
///
/// The session owns the history exclusively; it keeps at most
/// `max_turns` user/assistant turns and trims from the oldest end.
pub struct ChatSession {
    engine: Arc<dyn ChatEngine>,
    system_prompt: Mutex<String>,
    history: Mutex<Vec<ChatMessage>>,
    max_turns: usize,
    max_new_tokens: usize,
}

impl ChatSession {
    pub fn new(
        engine: Arc<dyn ChatEngine>,
        system_prompt: impl Into<String>,
        max_turns: usize,
        max_new_tokens: usize,
    ) -> Self {
        Self {
            engine,
            system_prompt: Mutex::new(system_prompt.into()),
            history: Mutex::new(Vec::new()),
            max_turns: max_turns.max(1),
            max_new_tokens,
        }
    }

    /// Generate a reply and remember the exchange.
    pub async fn chat(&self, user_input: &str) -> Result<ChatReply> {
        let messages = self.build_messages(user_input).await;
        let reply = self.engine.chat(&messages, self.max_new_tokens).await?;

        let mut history = self.history.lock().await;
        history.push(ChatMessage::user(user_input));
        history.push(ChatMessage::assistant(reply.content.clone()));
        let max_messages = self.max_turns * 2;
        if history.len() > max_messages {
            let excess = history.len() - max_messages;
            history.drain(..excess);
        }

        Ok(reply)
    }

    /// Generate a reply without recording it in the history.
    pub async fn chat_oneshot(&self, user_input: &str, max_new_tokens: usize) -> Result<ChatReply> {
        let messages = self.build_messages(user_input).await;
        self.engine.chat(&messages, max_new_tokens).await
    }

    pub async fn set_system_prompt(&self, prompt: impl Into<String>) {
        *self.system_prompt.lock().await = prompt.into();
        info!("System prompt updated");
    }

    pub async fn clear_history(&self) {
        self.history.lock().await.clear();
        info!("Conversation history cleared");
    }

    pub async fn history_len(&self) -> usize {
        self.history.lock().await.len()
    }

    async fn build_messages(&self, user_input: &str) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(self.system_prompt.lock().await.clone())];
        {
            let history = self.history.lock().await;
            let skip = history.len().saturating_sub(self.max_turns * 2);
            messages.extend(history[skip..].iter().cloned());
        }
        messages.push(ChatMessage::user(user_input));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoEngine {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ChatEngine for EchoEngine {
        async fn chat(&self, messages: &[ChatMessage], _max_new_tokens: usize) -> Result<ChatReply> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let last = messages.last().expect("at least one message");
            Ok(ChatReply {
                content: format!("echo: {}", last.content),
                tokens_used: 4,
                generation_time_ms: 1.0,
            })
        }
    }

    fn session(max_turns: usize) -> ChatSession {
        ChatSession::new(
            Arc::new(EchoEngine {
                calls: AtomicUsize::new(0),
            }),
            "You are a test assistant.",
            max_turns,
            64,
        )
    }

    #[tokio::test]
    async fn remembers_and_trims_history() {
        let session = session(2);
        for i in 0..5 {
            session.chat(&format!("turn {i}")).await.unwrap();
        }
        // Bounded to the last two turns (four messages), trimmed oldest-first.
        assert_eq!(session.history_len().await, 4);
        let history = session.history.lock().await;
        assert_eq!(history[0].content, "turn 3");
        assert_eq!(history[3].content, "echo: turn 4");
    }

    #[tokio::test]
    async fn clear_history_empties_state() {
        let session = session(4);
        session.chat("hello").await.unwrap();
        assert_eq!(session.history_len().await, 2);
        session.clear_history().await;
        assert_eq!(session.history_len().await, 0);
    }

    #[tokio::test]
    async fn oneshot_does_not_touch_history() {
        let session = session(4);
        let reply = session.chat_oneshot("classify me", 32).await.unwrap();
        assert_eq!(reply.content, "echo: classify me");
        assert_eq!(session.history_len().await, 0);
    }

    #[tokio::test]
    async fn system_prompt_leads_every_request() {
        let session = session(4);
        let messages = session.build_messages("hi").await;
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages.last().unwrap().content, "hi");
    }
}
