//! Wire types for the askChatbot endpoint

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const ASK_COMMAND: &str = "askChatbot";
pub const SUCCESS_STATUS: &str = "SUCCESS";
pub const UNKNOWN_API_ERROR: &str = "Unknown API error";

#[derive(Serialize, Debug)]
pub(crate) struct AskRequest<'a> {
    pub command: &'a str,
    pub api_key: &'a str,
    pub question: &'a str,
}

#[derive(Deserialize, Debug)]
struct AskResponse {
    status: Option<String>,
    status_message: Option<String>,
    conversation_id: Option<String>,
    data: Option<AskData>,
    sources: Option<Vec<Source>>,
}

#[derive(Deserialize, Debug)]
struct AskData {
    blocks: Option<Vec<AskBlock>>,
    suggestions: Option<Vec<String>>,
}

#[derive(Deserialize, Debug)]
struct AskBlock {
    text: Option<String>,
}

/// A document chunk the answer was drawn from
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Source {
    pub document_key: Option<String>,
    pub document_id: Option<String>,
    pub page: Option<i64>,
    pub chunk_index: Option<i64>,
    pub distance: Option<f64>,
}

/// A successful answer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reply {
    /// Text of the first block, empty when the answer has no blocks
    pub text: String,
    pub conversation_id: Option<String>,
    pub suggestions: Vec<String>,
    pub sources: Vec<Source>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Decode a response body into a [`Reply`] or the error it describes.
pub fn decode_reply(body: &[u8]) -> Result<Reply, ApiError> {
    let response: AskResponse = serde_json::from_slice(body)
        .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

    if response.status.as_deref() != Some(SUCCESS_STATUS) {
        let message = response
            .status_message
            .unwrap_or_else(|| UNKNOWN_API_ERROR.to_string());
        return Err(ApiError::Remote(message));
    }

    let (blocks, suggestions) = match response.data {
        Some(data) => (data.blocks.unwrap_or_default(), data.suggestions.unwrap_or_default()),
        None => (Vec::new(), Vec::new()),
    };

    Ok(Reply {
        text: blocks
            .into_iter()
            .next()
            .and_then(|b| b.text)
            .unwrap_or_default(),
        conversation_id: response.conversation_id,
        suggestions,
        sources: response.sources.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let request = AskRequest {
            command: ASK_COMMAND,
            api_key: "k-1",
            question: "Hello",
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"command": "askChatbot", "api_key": "k-1", "question": "Hello"})
        );
    }

    #[test]
    fn test_success_takes_first_block() {
        let body = br#"{
            "status": "SUCCESS",
            "status_message": null,
            "conversation_id": "c-9",
            "data": {
                "blocks": [{"type": "text", "text": "Hi there"}, {"type": "text", "text": "ignored"}],
                "suggestions": ["What else?"]
            },
            "sources": [{"document_key": "faq.pdf", "page": 3, "distance": 0.12}]
        }"#;
        let reply = decode_reply(body).unwrap();
        assert_eq!(reply.text, "Hi there");
        assert_eq!(reply.conversation_id.as_deref(), Some("c-9"));
        assert_eq!(reply.suggestions, vec!["What else?".to_string()]);
        assert_eq!(reply.sources.len(), 1);
        assert_eq!(reply.sources[0].page, Some(3));
    }

    #[test]
    fn test_success_without_blocks_is_empty_text() {
        let reply = decode_reply(br#"{"status": "SUCCESS"}"#).unwrap();
        assert_eq!(reply.text, "");

        let reply = decode_reply(br#"{"status": "SUCCESS", "data": {"blocks": []}}"#).unwrap();
        assert_eq!(reply.text, "");

        let reply = decode_reply(br#"{"status": "SUCCESS", "data": {"blocks": [{"type": "chart"}]}}"#).unwrap();
        assert_eq!(reply.text, "");
    }

    #[test]
    fn test_error_status_carries_server_message() {
        let err = decode_reply(br#"{"status": "ERROR", "status_message": "bad key"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Remote(ref m) if m == "bad key"));
    }

    #[test]
    fn test_missing_status_uses_generic_message() {
        let err = decode_reply(br#"{"data": null}"#).unwrap_err();
        assert!(matches!(err, ApiError::Remote(ref m) if m == UNKNOWN_API_ERROR));
    }

    #[test]
    fn test_status_match_is_exact() {
        let err = decode_reply(br#"{"status": "success"}"#).unwrap_err();
        assert_eq!(err.kind(), "remote");
    }

    #[test]
    fn test_undecodable_bodies() {
        for body in [&b""[..], b"<html>502</html>", b"[1, 2]", br#"{"status": 5}"#] {
            let err = decode_reply(body).unwrap_err();
            assert_eq!(err.kind(), "invalid_response");
        }
    }
}
