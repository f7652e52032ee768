//! Online presence tracking.
//!
//! The online set is rebuilt wholesale from snapshots and patched by
//! online/offline deltas in between. Presence never changes which
//! conversation is open; it only reads the active conversation to decide
//! whether the user should be told that their peer came or went.

use std::collections::BTreeSet;

use parley_proto::{ConversationRef, Username};

use crate::{RenderOp, SessionAction};

/// Set of currently online users.
#[derive(Debug, Clone, Default)]
pub struct PresenceTracker {
    /// Users currently online.
    online: BTreeSet<Username>,
    /// Users whose status the view displays.
    watched: BTreeSet<Username>,
}

impl PresenceTracker {
    /// Create an empty tracker watching `contacts`.
    pub fn new(contacts: impl IntoIterator<Item = Username>) -> Self {
        Self { online: BTreeSet::new(), watched: contacts.into_iter().collect() }
    }

    /// Add users to the watched set.
    pub fn watch(&mut self, users: impl IntoIterator<Item = Username>) {
        self.watched.extend(users);
    }

    /// Replace the online set with a full snapshot.
    ///
    /// Re-renders the status of every watched user.
    pub fn apply_snapshot(&mut self, users: impl IntoIterator<Item = Username>) -> Vec<SessionAction> {
        self.online = users.into_iter().collect();
        tracing::debug!(online = self.online.len(), "presence snapshot applied");

        let mut actions: Vec<_> = self
            .watched
            .iter()
            .map(|user| {
                SessionAction::Render(RenderOp::UserStatus {
                    username: user.clone(),
                    online: self.online.contains(user),
                })
            })
            .collect();
        actions.push(self.count_op());
        actions
    }

    /// Mark `username` online.
    ///
    /// Idempotent on the online set. Tells the user whenever the peer of the
    /// active private chat is reported online.
    pub fn apply_online(
        &mut self,
        username: &Username,
        active: Option<&ConversationRef>,
    ) -> Vec<SessionAction> {
        self.online.insert(username.clone());
        self.delta(username, true, active)
    }

    /// Mark `username` offline.
    ///
    /// Idempotent on the online set. Tells the user whenever the peer of the
    /// active private chat is reported offline.
    pub fn apply_offline(
        &mut self,
        username: &Username,
        active: Option<&ConversationRef>,
    ) -> Vec<SessionAction> {
        self.online.remove(username);
        self.delta(username, false, active)
    }

    fn delta(
        &self,
        username: &Username,
        online: bool,
        active: Option<&ConversationRef>,
    ) -> Vec<SessionAction> {
        let mut actions = vec![
            SessionAction::Render(RenderOp::UserStatus { username: username.clone(), online }),
            self.count_op(),
        ];

        let is_peer = active.and_then(ConversationRef::peer).is_some_and(|peer| username == peer);
        if is_peer {
            let state = if online { "online" } else { "offline" };
            actions.push(SessionAction::Render(RenderOp::notice(&format!("{username} is {state}"))));
        }
        actions
    }

    fn count_op(&self) -> SessionAction {
        SessionAction::Render(RenderOp::OnlineCount { count: self.online.len() })
    }

    /// Whether `username` is online.
    pub fn is_online(&self, username: &Username) -> bool {
        self.online.contains(username)
    }

    /// Current online set.
    pub fn online(&self) -> &BTreeSet<Username> {
        &self.online
    }

    /// Users whose status is displayed.
    pub fn watched(&self) -> &BTreeSet<Username> {
        &self.watched
    }
}
