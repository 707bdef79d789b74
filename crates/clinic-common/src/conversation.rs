//! Conversation logging.
//!
//! The chat layer records every turn through [`ConversationLog`]. The matching
//! core never touches it. Two implementations ship here: a Redis list that
//! survives restarts and an in-process buffer used when Redis is absent.
use std::collections::VecDeque;
use std::future::Future;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;

use crate::redis::RedisStore;

pub const DEFAULT_TTL_SECS: u64 = 86_400;
pub const DEFAULT_MAX_MESSAGES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn now(role: Role, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Sink for conversational turns.
///
/// Recording is best-effort: implementations swallow storage failures so a
/// chat turn never fails because its log could not be written.
pub trait ConversationLog: Send + Sync {
    fn record(&self, role: Role, content: &str) -> impl Future<Output = ()> + Send;

    /// All retained messages, oldest first.
    fn history(&self) -> impl Future<Output = Vec<ChatMessage>> + Send;
}

/// Bounded in-process log. Oldest messages are dropped past `max_messages`.
pub struct MemoryConversationLog {
    messages: Mutex<VecDeque<ChatMessage>>,
    max_messages: usize,
}

impl MemoryConversationLog {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: Mutex::new(VecDeque::new()),
            max_messages: max_messages.max(1),
        }
    }
}

impl Default for MemoryConversationLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MESSAGES)
    }
}

impl ConversationLog for MemoryConversationLog {
    async fn record(&self, role: Role, content: &str) {
        let mut messages = self.messages.lock().await;
        messages.push_back(ChatMessage::now(role, content));
        while messages.len() > self.max_messages {
            messages.pop_front();
        }
    }

    async fn history(&self) -> Vec<ChatMessage> {
        self.messages.lock().await.iter().cloned().collect()
    }
}

/// Log kept in a single Redis list of JSON-encoded [`ChatMessage`]s.
///
/// Key: `{prefix}:conversation`. Every write refreshes the TTL and trims the
/// list to the newest `max_messages` entries.
pub struct RedisConversationLog {
    redis: RedisStore,
    key: String,
    ttl_secs: u64,
    max_messages: usize,
}

impl RedisConversationLog {
    pub fn new(redis: RedisStore, prefix: &str, ttl_secs: u64, max_messages: usize) -> Self {
        Self {
            redis,
            key: format!("{prefix}:conversation"),
            ttl_secs,
            max_messages: max_messages.max(1),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn clear(&self) -> bool {
        self.redis.delete(&self.key).await
    }
}

impl ConversationLog for RedisConversationLog {
    async fn record(&self, role: Role, content: &str) {
        let message = ChatMessage::now(role, content);
        let Ok(raw) = serde_json::to_string(&message)
            .inspect_err(|e| warn!(error = %e, "failed to encode chat message"))
        else {
            return;
        };
        self.redis
            .push_capped(&self.key, &raw, self.max_messages, self.ttl_secs)
            .await;
    }

    async fn history(&self) -> Vec<ChatMessage> {
        let Some(entries) = self.redis.list_all(&self.key).await else {
            return Vec::new();
        };
        entries
            .iter()
            .filter_map(|raw| {
                serde_json::from_str(raw)
                    .inspect_err(|e| warn!(error = %e, key = %self.key, "skipping undecodable chat message"))
                    .ok()
            })
            .collect()
    }
}
