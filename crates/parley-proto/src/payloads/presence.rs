//! Presence payloads.

use serde::{Deserialize, Serialize};

use crate::Username;

/// A single user came online or went offline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceChange {
    /// User whose presence changed.
    pub username: Username,
}

/// Full set of currently online users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineUsers {
    /// Every online user. Duplicates are tolerated.
    #[serde(default)]
    pub users: Vec<Username>,
}
