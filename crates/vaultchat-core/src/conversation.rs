//! Conversation state: messages, the draft input, and the in-flight request
//!
//! All mutation goes through `&mut self`, so whoever owns the conversation
//! (normally the UI loop) is the only context that ever touches it. The
//! network call runs on a spawned task and its result is applied only when
//! the owner calls [`Conversation::poll_reply`] or [`Conversation::wait_reply`].

use futures_util::FutureExt;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};

use crate::api::{ChatTransport, Reply};
use crate::error::ApiError;
use crate::state::ChatMessage;

/// Shown in place of the answer whenever a request fails, whatever the cause
pub const FALLBACK_REPLY: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input accepted and request started
    Sent,
    /// Input was empty after trimming
    Empty,
    /// A request is already in flight
    Busy,
}

type PendingReply = JoinHandle<Result<Reply, ApiError>>;

pub struct Conversation {
    transport: Arc<dyn ChatTransport>,
    messages: Vec<ChatMessage>,
    input: String,
    pending: Option<PendingReply>,
    revision: watch::Sender<u64>,
}

impl Conversation {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            transport,
            messages: Vec::new(),
            input: String::new(),
            pending: None,
            revision,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.bump();
    }

    /// Edit the draft in place (cursor-based editors)
    pub fn edit_input(&mut self, edit: impl FnOnce(&mut String)) {
        edit(&mut self.input);
        self.bump();
    }

    /// True from an accepted `send` until its reply has been applied
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Revision counter bumped on every change, for front-ends that redraw
    /// on demand.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Send the trimmed draft as a user message and start the request.
    ///
    /// Must be called from within a tokio runtime.
    pub fn send(&mut self) -> SendOutcome {
        if self.is_busy() {
            tracing::debug!("send ignored, a request is already in flight");
            return SendOutcome::Busy;
        }

        let text = self.input.trim().to_string();
        if text.is_empty() {
            return SendOutcome::Empty;
        }

        self.input.clear();
        self.messages.push(ChatMessage::user(text.clone()));

        let transport = Arc::clone(&self.transport);
        self.pending = Some(tokio::spawn(async move { transport.send_message(&text).await }));
        self.bump();

        tracing::debug!(messages = self.messages.len(), "question sent");
        SendOutcome::Sent
    }

    /// Apply the reply if the request has finished. Never blocks.
    ///
    /// Returns true when a reply (or the fallback) was appended.
    pub fn poll_reply(&mut self) -> bool {
        let Some(handle) = self.pending.as_mut() else {
            return false;
        };
        if !handle.is_finished() {
            return false;
        }

        match handle.now_or_never() {
            Some(result) => {
                self.pending = None;
                self.finish(result);
                true
            }
            None => false,
        }
    }

    /// Wait for the in-flight request and apply its reply.
    ///
    /// Returns false when nothing was in flight. Dropping this future early
    /// leaves the request pending.
    pub async fn wait_reply(&mut self) -> bool {
        let Some(handle) = self.pending.as_mut() else {
            return false;
        };

        let result = handle.await;
        self.pending = None;
        self.finish(result);
        true
    }

    /// Abort the in-flight request. No assistant message is added.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                handle.abort();
                self.bump();
                tracing::debug!("request cancelled");
                true
            }
            None => false,
        }
    }

    fn finish(&mut self, result: Result<Result<Reply, ApiError>, JoinError>) {
        let text = match result {
            Ok(Ok(reply)) => {
                tracing::debug!(chars = reply.text.len(), "reply received");
                reply.text
            }
            Ok(Err(e)) => {
                tracing::warn!(kind = e.kind(), error = %e, "chatbot request failed");
                FALLBACK_REPLY.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "chatbot request task failed");
                FALLBACK_REPLY.to_string()
            }
        };

        self.messages.push(ChatMessage::assistant(text));
        self.bump();
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }
}

impl Drop for Conversation {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
