//! The widget as a host application sees it: a configuration, a chat
//! screen that can be opened and closed, and the conversation behind it.

use std::sync::Arc;

use crate::api::{ChatTransport, VaultChatClient};
use crate::config::Config;
use crate::conversation::Conversation;

pub struct ChatSession {
    config: Arc<Config>,
    conversation: Conversation,
    open: bool,
}

impl ChatSession {
    /// Session talking to the configured VaultChat endpoint
    pub fn new(config: Arc<Config>) -> Self {
        let client = VaultChatClient::new(Arc::clone(&config));
        Self::with_transport(config, Arc::new(client))
    }

    pub fn with_transport(config: Arc<Config>, transport: Arc<dyn ChatTransport>) -> Self {
        tracing::info!(theme = config.theme().as_str(), "chat session configured");
        Self {
            config,
            conversation: Conversation::new(transport),
            open: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hide the chat screen. An in-flight request keeps running and its
    /// reply is applied on the next poll.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Reply;
    use crate::error::ApiError;
    use crate::state::ChatRole;
    use async_trait::async_trait;

    struct EchoTransport;

    #[async_trait]
    impl ChatTransport for EchoTransport {
        async fn send_message(&self, question: &str) -> Result<Reply, ApiError> {
            Ok(Reply::text(format!("echo: {question}")))
        }
    }

    fn session() -> ChatSession {
        let config = Arc::new(Config::builder("k").build().unwrap());
        ChatSession::with_transport(config, Arc::new(EchoTransport))
    }

    #[test]
    fn test_open_close_toggle() {
        let mut session = session();
        assert!(!session.is_open());
        session.open();
        assert!(session.is_open());
        session.close();
        assert!(!session.is_open());
        session.toggle();
        assert!(session.is_open());
    }

    #[tokio::test]
    async fn test_reply_lands_after_close() {
        let mut session = session();
        session.open();
        session.conversation_mut().set_input("ping");
        session.conversation_mut().send();
        session.close();

        assert!(session.conversation_mut().wait_reply().await);
        let last = session.conversation().messages().last().unwrap();
        assert_eq!(last.role, ChatRole::Assistant);
        assert_eq!(last.text, "echo: ping");
    }

    #[test]
    fn test_new_uses_shared_config() {
        let config = Arc::new(Config::builder("k").chat_title("Help").build().unwrap());
        let session = ChatSession::new(Arc::clone(&config));
        assert_eq!(session.config().chat_title(), "Help");
        assert_eq!(Arc::strong_count(&config), 3);
    }
}
