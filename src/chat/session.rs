//! The chat session: an append-only message list and one round trip per turn.

use crate::chat::AssistantBackend;
use crate::types::{AppError, Message, Result};
use std::sync::Arc;
use tracing::debug;

/// Whether a turn is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Waiting,
}

/// An in-memory chat session.
///
/// Invariants:
/// - the message list is append-only: no reordering, no in-place edits;
/// - a successful turn appends exactly one `user` and one `assistant`
///   message, in that order;
/// - a failed turn appends only the `user` message and records the error;
/// - at most one turn is in flight at a time.
///
/// The session lives only as long as its owner; dropping a pending [`send`]
/// future abandons that turn, and the session should be dropped with it.
///
/// [`send`]: ChatSession::send
pub struct ChatSession {
    backend: Arc<dyn AssistantBackend>,
    messages: Vec<Message>,
    state: SessionState,
    last_error: Option<String>,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn AssistantBackend>) -> Self {
        Self {
            backend,
            messages: Vec::new(),
            state: SessionState::Idle,
            last_error: None,
        }
    }

    /// Messages in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_waiting(&self) -> bool {
        self.state == SessionState::Waiting
    }

    /// Error from the most recent failed turn, cleared by the next send.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Sends one user turn and awaits the assistant reply.
    ///
    /// Empty or whitespace-only input is a no-op: nothing is appended and
    /// the backend is not called. A send while a turn is pending is rejected.
    /// The user message is appended optimistically before the backend call
    /// and is not revoked on failure; a failed turn appends no assistant
    /// message, records the error, and leaves the session ready for the
    /// next send.
    pub async fn send(&mut self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }
        if self.state == SessionState::Waiting {
            return Err(AppError::Validation(
                "a response is still pending".to_string(),
            ));
        }

        self.last_error = None;
        self.messages.push(Message::user(text));
        self.state = SessionState::Waiting;
        debug!(backend = self.backend.name(), "chat turn started");

        // History excludes the message being answered.
        let history_len = self.messages.len() - 1;
        match self.backend.reply(&self.messages[..history_len], text).await {
            Ok(reply) => {
                self.messages
                    .push(Message::assistant(reply.content, reply.references));
                self.state = SessionState::Idle;
                Ok(())
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                self.state = SessionState::Idle;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::MockBackend;
    use crate::types::{AssistantReply, MessageRole};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    /// Backend scripted to answer instantly or fail, without any delay.
    struct ScriptedBackend {
        fail: AtomicBool,
    }

    #[async_trait]
    impl AssistantBackend for ScriptedBackend {
        async fn reply(&self, _history: &[Message], text: &str) -> Result<AssistantReply> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::Network("connection refused".to_string()));
            }
            Ok(AssistantReply {
                content: format!("echo: {}", text),
                references: Vec::new(),
            })
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn session(fail: bool) -> ChatSession {
        ChatSession::new(Arc::new(ScriptedBackend {
            fail: AtomicBool::new(fail),
        }))
    }

    #[tokio::test]
    async fn test_send_appends_user_then_assistant() {
        let mut session = session(false);
        session.send("hello there").await.unwrap();

        let messages = session.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "hello there");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].content, "echo: hello there");
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_empty_and_whitespace_input_appends_nothing() {
        let mut session = session(false);
        session.send("").await.unwrap();
        session.send("   \t\n").await.unwrap();

        assert!(session.messages().is_empty());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_ordering_is_insertion_order_across_turns() {
        let mut session = session(false);
        session.send("first").await.unwrap();
        session.send("second").await.unwrap();

        let contents: Vec<&str> = session
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(
            contents,
            vec!["first", "echo: first", "second", "echo: second"]
        );
    }

    #[tokio::test]
    async fn test_failed_turn_appends_no_assistant_message() {
        let mut session = session(true);
        let err = session.send("hello").await.unwrap_err();

        assert!(matches!(err, AppError::Network(_)));
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, MessageRole::User);
        assert_eq!(session.last_error(), Some("Network error: connection refused"));
        // Input is re-enabled after a failure
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_next_send_clears_previous_error() {
        let backend = Arc::new(ScriptedBackend {
            fail: AtomicBool::new(true),
        });
        let mut session = ChatSession::new(backend.clone());

        session.send("boom").await.unwrap_err();
        assert!(session.last_error().is_some());

        backend.fail.store(false, Ordering::SeqCst);
        session.send("retry").await.unwrap();
        assert!(session.last_error().is_none());
        assert_eq!(session.messages().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_turn_leaves_session_waiting() {
        let mut session = ChatSession::new(Arc::new(MockBackend::new(Duration::from_secs(5))));

        // Drop the send future before the mock delay elapses.
        let cancelled = tokio::time::timeout(Duration::from_millis(1), session.send("hi")).await;
        assert!(cancelled.is_err());

        // The optimistic user message stays; the turn is abandoned.
        assert_eq!(session.messages().len(), 1);
        assert!(session.is_waiting());
        let err = session.send("again").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_mock_backend_turn_settles_after_delay() {
        let mut session = ChatSession::new(Arc::new(MockBackend::default()));
        session.send("what is rag?").await.unwrap();

        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].references.len(), 1);
    }
}
