use std::sync::Arc;

use anyhow::{Context, Result};
use base64::engine::{DecodePaddingMode, Engine, GeneralPurpose, GeneralPurposeConfig};
use regex::Regex;
use serde::Deserialize;

use crate::helpers::google_oauth::GoogleAuthenticator;

const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";

// Gmail bodies come back base64url encoded, padded or not depending on the part.
const BODY_DECODER: GeneralPurpose = GeneralPurpose::new(
    &base64::alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub struct GmailClient {
    http: reqwest::Client,
    auth: Arc<GoogleAuthenticator>,
    tag_pattern: Regex,
}

#[derive(Debug, Deserialize)]
struct MessageListResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Message {
    payload: Option<MessagePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessagePart {
    #[serde(default)]
    mime_type: String,
    body: Option<PartBody>,
    #[serde(default)]
    parts: Vec<MessagePart>,
}

#[derive(Debug, Default, Deserialize)]
struct PartBody {
    data: Option<String>,
}

impl GmailClient {
    pub fn new(auth: Arc<GoogleAuthenticator>) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth,
            tag_pattern: Regex::new(r"<[^>]+>").unwrap(),
        }
    }

    /// Lists ids of messages matching the configured search query.
    pub async fn list_message_ids(&self, query: &str) -> Result<Vec<String>> {
        let token = self.auth.access_token().await?;
        let url = format!("{}/users/me/messages", GMAIL_API_BASE);

        let response: MessageListResponse = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("q", query)])
            .send()
            .await
            .context("Failed to list Gmail messages")?
            .error_for_status()
            .context("Gmail message list request rejected")?
            .json()
            .await
            .context("Failed to decode Gmail message list")?;

        Ok(response.messages.into_iter().map(|m| m.id).collect())
    }

    /// Fetches one message and returns its body as plain text.
    ///
    /// Prefers a `text/plain` part, falls back to stripped `text/html`, then
    /// to parts nested one level inside `multipart/*` containers.
    pub async fn get_message_text(&self, message_id: &str) -> Result<String> {
        let token = self.auth.access_token().await?;
        let url = format!("{}/users/me/messages/{}", GMAIL_API_BASE, message_id);

        let message: Message = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("format", "full")])
            .send()
            .await
            .with_context(|| format!("Failed to fetch Gmail message {}", message_id))?
            .error_for_status()
            .with_context(|| format!("Gmail message fetch rejected for {}", message_id))?
            .json()
            .await
            .with_context(|| format!("Failed to decode Gmail message {}", message_id))?;

        let payload = message
            .payload
            .ok_or_else(|| anyhow::anyhow!("Message {} has no payload", message_id))?;

        self.extract_body_text(&payload)
            .ok_or_else(|| anyhow::anyhow!("No readable content in message {}", message_id))
    }

    fn extract_body_text(&self, payload: &MessagePart) -> Option<String> {
        if payload.parts.is_empty() {
            return self.decode_part(payload);
        }

        if let Some(text) = self
            .part_with_mime(&payload.parts, "text/plain")
            .and_then(|part| self.decode_part(part))
        {
            return Some(text);
        }

        if let Some(text) = self
            .part_with_mime(&payload.parts, "text/html")
            .and_then(|part| self.decode_part(part))
        {
            return Some(text);
        }

        // multipart/alternative and friends nest the text parts one level down
        for part in &payload.parts {
            if part.mime_type.starts_with("multipart/") {
                for nested in &part.parts {
                    if nested.mime_type == "text/plain" || nested.mime_type == "text/html" {
                        if let Some(text) = self.decode_part(nested) {
                            return Some(text);
                        }
                    }
                }
            }
        }

        None
    }

    fn part_with_mime<'a>(&self, parts: &'a [MessagePart], mime: &str) -> Option<&'a MessagePart> {
        parts.iter().find(|part| part.mime_type == mime)
    }

    fn decode_part(&self, part: &MessagePart) -> Option<String> {
        let data = part.body.as_ref()?.data.as_deref()?;

        let bytes = match BODY_DECODER.decode(data) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("failed to decode {} part: {}", part.mime_type, e);
                return None;
            }
        };

        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("{} part is not valid UTF-8: {}", part.mime_type, e);
                return None;
            }
        };

        if part.mime_type == "text/html" {
            Some(self.strip_html(&text))
        } else {
            Some(text)
        }
    }

    fn strip_html(&self, html: &str) -> String {
        self.tag_pattern
            .replace_all(html, "")
            .replace("&nbsp;", " ")
            .replace("&amp;", "&")
    }
}
