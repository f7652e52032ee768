//! Session configuration.

use std::time::Duration;

use parley_proto::Username;

/// Idle period after the last keystroke before `typing_stop` is sent.
pub const DEFAULT_TYPING_IDLE: Duration = Duration::from_millis(1000);

/// Longest accepted typing debounce window. Longer windows are clamped.
pub const MAX_TYPING_IDLE: Duration = Duration::from_secs(3600);

/// Characters of a live message shown in the conversation list preview.
pub const DEFAULT_PREVIEW_LEN: usize = 25;

/// Per-connection session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// The signed-in user. Never shown as a remote typer, never a private
    /// chat target.
    pub local_user: Username,
    /// Typing debounce window.
    pub typing_idle: Duration,
    /// Preview truncation length in characters.
    pub preview_len: usize,
    /// Users listed in the contact list whose presence is displayed.
    pub contacts: Vec<Username>,
}

impl SessionConfig {
    /// Defaults for `local_user`.
    pub fn new(local_user: impl Into<Username>) -> Self {
        Self {
            local_user: local_user.into(),
            typing_idle: DEFAULT_TYPING_IDLE,
            preview_len: DEFAULT_PREVIEW_LEN,
            contacts: Vec::new(),
        }
    }

    /// Override the typing debounce window, clamped to [`MAX_TYPING_IDLE`].
    #[must_use]
    pub fn with_typing_idle(mut self, idle: Duration) -> Self {
        self.typing_idle = idle.min(MAX_TYPING_IDLE);
        self
    }

    /// Override the preview truncation length.
    #[must_use]
    pub fn with_preview_len(mut self, len: usize) -> Self {
        self.preview_len = len;
        self
    }

    /// Set the contact list.
    #[must_use]
    pub fn with_contacts<I, U>(mut self, contacts: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<Username>,
    {
        self.contacts = contacts.into_iter().map(Into::into).collect();
        self
    }
}
