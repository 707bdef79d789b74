use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::conversation::{ChatMessage, Role};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FindDoctorsParams {
    /// Free-text description of the symptoms, e.g. "I have a fever and cough".
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SendMessageParams {
    /// The user's chat message. Greetings get an introduction, anything else is
    /// matched against the doctor roster.
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DoctorMatch {
    pub id: String,
    pub name: String,
    pub specialization: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub timings: Vec<String>,
    /// Symptom strings of this doctor hit by the message, ascending.
    pub matched_symptoms: Vec<String>,
    /// Number of distinct matched symptoms.
    pub match_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FindDoctorsResponse {
    /// Candidate tokens extracted from the message, longest first.
    pub tokens: Vec<String>,
    pub doctors: Vec<DoctorMatch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConversationEntry {
    pub role: Role,
    pub content: String,
    /// UTC wall-clock time, `HH:MM:SS`.
    pub timestamp: String,
}

impl From<&ChatMessage> for ConversationEntry {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
            timestamp: message.timestamp.format("%H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ConversationResponse {
    pub messages: Vec<ConversationEntry>,
}

/// What the client should do after showing the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    Greeted,
    ShowDoctors,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChatReply {
    pub reply: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub doctors: Vec<DoctorMatch>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conversation: Vec<ConversationEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<NextAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DoctorSummary {
    pub id: String,
    pub name: String,
    pub specialization: Option<String>,
    pub symptoms: Vec<String>,
    pub timings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RosterResponse {
    pub doctors: Vec<DoctorSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReloadRosterResponse {
    pub doctor_count: usize,
}
