pub mod types;
pub mod vaultchat;

use async_trait::async_trait;

use crate::error::ApiError;

pub use types::{decode_reply, Reply, Source};
pub use vaultchat::VaultChatClient;

/// Sends one user question and returns the assistant's answer.
///
/// Implementors own the transport; the conversation only cares about the
/// reply text or the fact that it failed.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(&self, question: &str) -> Result<Reply, ApiError>;
}
