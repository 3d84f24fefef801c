use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

use super::types::{decode_reply, AskRequest, Reply, ASK_COMMAND};
use super::ChatTransport;
use crate::config::Config;
use crate::error::ApiError;

/// Client for the hosted askChatbot endpoint
#[derive(Clone)]
pub struct VaultChatClient {
    client: Client,
    config: Arc<Config>,
}

impl VaultChatClient {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub async fn ask(&self, question: &str) -> Result<Reply, ApiError> {
        let request = AskRequest {
            command: ASK_COMMAND,
            api_key: self.config.api_key(),
            question,
        };

        tracing::debug!(endpoint = %self.config.endpoint(), "sending askChatbot request");

        // The status code is not checked: error payloads come back as JSON too
        let response = self
            .client
            .post(self.config.endpoint().clone())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(%status, bytes = body.len(), "askChatbot response received");

        decode_reply(&body)
    }
}

#[async_trait]
impl ChatTransport for VaultChatClient {
    async fn send_message(&self, question: &str) -> Result<Reply, ApiError> {
        self.ask(question).await
    }
}
