//! One conversational turn: log the message, answer greetings, otherwise rank
//! the roster against the message and describe the result.
use std::sync::Arc;

use tracing::debug;

use clinic_common::conversation::{
    ChatMessage, ConversationLog, MemoryConversationLog, RedisConversationLog, Role,
};
use clinic_common::mcp_api::{
    ChatReply, ConversationEntry, DoctorMatch, FindDoctorsResponse, NextAction,
};

use crate::matcher::rank_doctors;
use crate::roster::RosterHandle;
use crate::tokenizer::{extract_tokens, words};

const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "assalam",
    "assalamu",
    "salaam",
    "good morning",
    "good evening",
];

const EMPTY_MESSAGE_REPLY: &str = "⚠️ Please enter a message.";

const GREETING_REPLY: &str = "👋 Assalamu Alaikum! I’m your health assistant.\n\
Tell me your symptom (e.g., 'I have a fever' or 'I feel chest pain') \
and I will show doctors who treat it.";

const DOCTORS_HEADER: &str = "👨‍⚕️ I found doctors who treat the symptoms you mentioned:";

const NO_MATCH_REPLY: &str = "🤖 I couldn't find a doctor for the symptoms you described in our records.\n\
Could you try writing the symptom differently (e.g., 'fever', 'severe headache')?\n\
If this is a new symptom, please contact support or provide more details.";

/// Conversation storage picked at startup.
pub enum ConversationBackend {
    Redis(RedisConversationLog),
    Memory(MemoryConversationLog),
}

impl ConversationLog for ConversationBackend {
    async fn record(&self, role: Role, content: &str) {
        match self {
            Self::Redis(log) => log.record(role, content).await,
            Self::Memory(log) => log.record(role, content).await,
        }
    }

    async fn history(&self) -> Vec<ChatMessage> {
        match self {
            Self::Redis(log) => log.history().await,
            Self::Memory(log) => log.history().await,
        }
    }
}

pub struct ChatService<L> {
    roster: Arc<RosterHandle>,
    log: L,
}

impl<L: ConversationLog> ChatService<L> {
    pub fn new(roster: Arc<RosterHandle>, log: L) -> Self {
        Self { roster, log }
    }

    pub fn roster(&self) -> &Arc<RosterHandle> {
        &self.roster
    }

    /// Rank the current roster against `message` without logging anything.
    pub async fn find_doctors(&self, message: &str) -> FindDoctorsResponse {
        let tokens = extract_tokens(message);
        let doctors = self.roster.snapshot().await;
        let matches = rank_doctors(&tokens, &doctors)
            .iter()
            .map(|m| m.to_api())
            .collect();
        FindDoctorsResponse {
            tokens,
            doctors: matches,
        }
    }

    pub async fn handle_message(&self, message: &str) -> ChatReply {
        let message = message.trim();
        if message.is_empty() {
            return ChatReply {
                reply: EMPTY_MESSAGE_REPLY.to_string(),
                doctors: Vec::new(),
                conversation: Vec::new(),
                next: None,
            };
        }

        self.log.record(Role::User, message).await;

        if is_greeting(message) {
            debug!("greeting detected");
            return self.respond(GREETING_REPLY.to_string(), Vec::new(), Some(NextAction::Greeted)).await;
        }

        let found = self.find_doctors(message).await;
        debug!(
            tokens = found.tokens.len(),
            matches = found.doctors.len(),
            "ranked roster"
        );

        if found.doctors.is_empty() {
            return self.respond(NO_MATCH_REPLY.to_string(), Vec::new(), None).await;
        }
        let reply = describe_doctors(&found.doctors);
        self.respond(reply, found.doctors, Some(NextAction::ShowDoctors)).await
    }

    pub async fn conversation(&self) -> Vec<ConversationEntry> {
        self.log
            .history()
            .await
            .iter()
            .map(ConversationEntry::from)
            .collect()
    }

    async fn respond(
        &self,
        reply: String,
        doctors: Vec<DoctorMatch>,
        next: Option<NextAction>,
    ) -> ChatReply {
        self.log.record(Role::Assistant, &reply).await;
        ChatReply {
            reply,
            doctors,
            conversation: self.conversation().await,
            next,
        }
    }
}

/// Whole-word greeting check, so "this" or "high fever" do not count.
pub fn is_greeting(message: &str) -> bool {
    let words = words(message);
    GREETINGS.iter().any(|greeting| {
        let phrase: Vec<&str> = greeting.split(' ').collect();
        words
            .windows(phrase.len())
            .any(|window| window.iter().zip(&phrase).all(|(w, p)| w == p))
    })
}

/// Numbered, human-readable list of matched doctors.
pub fn describe_doctors(doctors: &[DoctorMatch]) -> String {
    let mut lines = vec![DOCTORS_HEADER.to_string()];
    for (i, doctor) in doctors.iter().enumerate() {
        lines.push(format!(
            "{}. {} — {} — {}\n   {}",
            i + 1,
            doctor.name,
            doctor.specialization.as_deref().unwrap_or_default(),
            doctor.phone.as_deref().unwrap_or_default(),
            doctor.address.as_deref().unwrap_or_default(),
        ));
    }
    lines.join("\n")
}
