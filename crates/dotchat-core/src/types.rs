// ABOUTME: Core message types shared by the session and the views
// ABOUTME: Role, Message, CodeBlock, and the Participant display identity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::config::ProfileConfig;

/// Role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Unique message identifier within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A fenced code block attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Highlighting grammar after alias resolution
    pub language: String,
    pub filename: Option<String>,
    pub code: String,
}

/// Who is speaking, as shown in the message header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub avatar: String,
}

impl Participant {
    pub fn new(name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: avatar.into(),
        }
    }

    /// User and assistant identities from the profile section of the config
    pub fn pair_from(profile: &ProfileConfig) -> (Self, Self) {
        (
            Self::new(&profile.user_name, &profile.user_avatar),
            Self::new(&profile.assistant_name, &profile.assistant_avatar),
        )
    }
}

/// A completed message in the conversation. Never mutated after it is appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub name: String,
    pub avatar: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub code_blocks: Vec<CodeBlock>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>, from: &Participant) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            name: from.name.clone(),
            avatar: from.avatar.clone(),
            timestamp: Utc::now(),
            code_blocks: Vec::new(),
        }
    }

    pub fn user(content: impl Into<String>, from: &Participant) -> Self {
        Self::new(Role::User, content, from)
    }

    /// Assistant message with its fenced code blocks extracted
    pub fn assistant(content: impl Into<String>, from: &Participant) -> Self {
        let mut msg = Self::new(Role::Assistant, content, from);
        msg.code_blocks = crate::markdown::extract_code_blocks(&msg.content);
        msg
    }

    pub fn is_error(&self) -> bool {
        self.role == Role::Assistant && self.content.starts_with(crate::session::ERROR_PREFIX)
    }
}
