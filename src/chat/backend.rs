//! Assistant backends.
//!
//! [`AssistantBackend`] is the seam between the chat session and whatever
//! produces assistant turns. [`HttpBackend`] is the real network round trip;
//! [`MockBackend`] is the documented stand-in that fabricates replies
//! in-process after a fixed delay. Both honor the same contract, so swapping
//! one for the other never changes the session's list-append behavior.

use crate::api::ApiClient;
use crate::types::{AssistantReply, ChatRequest, ChatResponse, DocumentReference, Message, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;
use tracing::debug;

/// Produces one assistant turn for a user message.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Returns the assistant reply for `text`, given the conversation so far.
    async fn reply(&self, history: &[Message], text: &str) -> Result<AssistantReply>;

    /// Human-readable backend name, for logs and the status line.
    fn name(&self) -> &str;
}

// ============= Mock Backend =============

/// In-process assistant that fabricates replies after a fixed delay.
///
/// Keyword-matched canned answers stand in for retrieval and generation
/// until a live backend is pointed at. Mentioning "rag" (any case) yields an
/// explanation with one cited reference; anything else gets a greeting.
pub struct MockBackend {
    delay: Duration,
}

impl MockBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        // Matches the original client's simulated response delay.
        Self::new(Duration::from_millis(1500))
    }
}

#[async_trait]
impl AssistantBackend for MockBackend {
    async fn reply(&self, _history: &[Message], text: &str) -> Result<AssistantReply> {
        tokio::time::sleep(self.delay).await;

        if text.to_lowercase().contains("rag") {
            Ok(AssistantReply {
                content: "RAG stands for Retrieval-Augmented Generation.\n\n\
                          It combines the generative ability of a large language model \
                          with retrieval from an external knowledge source, so answers \
                          are grounded in more accurate and current information."
                    .to_string(),
                references: vec![DocumentReference {
                    id: "doc1".to_string(),
                    title: "RAG System Overview".to_string(),
                    content: "RAG (Retrieval-Augmented Generation) combines the knowledge \
                              of a large language model with fresh external data retrieved \
                              from your documents."
                        .to_string(),
                    relevance_score: 0.95,
                }],
            })
        } else {
            Ok(AssistantReply {
                content: "Hello! What would you like to know? Feel free to ask anything \
                          about the documents in your workspace."
                    .to_string(),
                references: Vec::new(),
            })
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ============= HTTP Backend =============

/// The real round trip: `POST /chat` through the API client.
///
/// The server assigns a conversation id on the first turn; it is threaded
/// into subsequent requests so the backend sees one continuous conversation.
pub struct HttpBackend {
    client: ApiClient,
    conversation_id: Mutex<Option<i64>>,
}

impl HttpBackend {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            conversation_id: Mutex::new(None),
        }
    }

    /// The server-assigned conversation id, once the first turn completed.
    pub fn conversation_id(&self) -> Option<i64> {
        *self.conversation_id.lock()
    }
}

#[async_trait]
impl AssistantBackend for HttpBackend {
    async fn reply(&self, _history: &[Message], text: &str) -> Result<AssistantReply> {
        let request = ChatRequest {
            message: text.to_string(),
            conversation_id: *self.conversation_id.lock(),
        };
        let response: ChatResponse = self.client.post_json("/chat", &request).await?;
        debug!(conversation_id = response.conversation_id, "chat turn completed");
        *self.conversation_id.lock() = Some(response.conversation_id);

        Ok(AssistantReply {
            content: response.message.content,
            references: response.chunks,
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}
