//! Chat message records.

use serde::{Deserialize, Deserializer, Serialize};

use crate::Username;

/// A chat message as delivered by the server.
///
/// Immutable once received. Every field defaults to empty when absent so a
/// partially filled record still renders. `text` is untrusted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// User who wrote the message. Older servers call this field `username`.
    #[serde(default, alias = "username")]
    pub author: Username,
    /// Raw message body.
    #[serde(default)]
    pub text: String,
    /// Server-formatted time of day.
    #[serde(default)]
    pub timestamp: String,
}

impl Message {
    /// Create a message.
    pub fn new(
        author: impl Into<Username>,
        text: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self { author: author.into(), text: text.into(), timestamp: timestamp.into() }
    }
}

/// Decode a history array, skipping entries that are not message records.
///
/// A `null` or missing array decodes as empty.
pub(crate) fn lenient_messages<'de, D>(deserializer: D) -> Result<Vec<Message>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    let messages = raw
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed history entry");
                None
            },
        })
        .collect();
    Ok(messages)
}
