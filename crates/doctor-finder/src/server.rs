use std::path::PathBuf;
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tracing::{info, warn};

use clinic_common::mcp_api::{
    ChatReply, ConversationResponse, FindDoctorsParams, FindDoctorsResponse,
    ReloadRosterResponse, RosterResponse, SendMessageParams,
};

use crate::chat::{ChatService, ConversationBackend};

#[derive(Clone)]
pub struct DoctorFinderServer {
    chat: Arc<ChatService<ConversationBackend>>,
    roster_path: PathBuf,
    tool_router: ToolRouter<DoctorFinderServer>,
}

impl DoctorFinderServer {
    pub fn new(chat: Arc<ChatService<ConversationBackend>>, roster_path: PathBuf) -> Self {
        Self {
            chat,
            roster_path,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl DoctorFinderServer {
    #[tool(description = "Rank doctors by how many of their listed symptoms appear in a free-text message. Returns the extracted candidate tokens and the matching doctors, best match first. Does not record the message.")]
    async fn find_doctors(
        &self,
        Parameters(params): Parameters<FindDoctorsParams>,
    ) -> Result<Json<FindDoctorsResponse>, String> {
        let message = params.message.trim().to_string();
        if message.is_empty() {
            return Err("message must not be empty".to_string());
        }
        Ok(Json(self.chat.find_doctors(&message).await))
    }

    #[tool(description = "Send a chat message as the user. Greetings get an introduction; symptom descriptions get a list of matching doctors. The turn is added to the conversation log.")]
    async fn send_message(
        &self,
        Parameters(params): Parameters<SendMessageParams>,
    ) -> Result<Json<ChatReply>, String> {
        Ok(Json(self.chat.handle_message(&params.message).await))
    }

    #[tool(description = "Get the recorded conversation, oldest message first.")]
    async fn get_conversation(&self) -> Result<Json<ConversationResponse>, String> {
        Ok(Json(ConversationResponse {
            messages: self.chat.conversation().await,
        }))
    }

    #[tool(description = "List every doctor in the roster with their symptoms and timings, sorted by name.")]
    async fn list_doctors(&self) -> Result<Json<RosterResponse>, String> {
        let roster = self.chat.roster().snapshot().await;
        let mut doctors: Vec<_> = roster.iter().map(|d| d.summary()).collect();
        doctors.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(Json(RosterResponse { doctors }))
    }

    #[tool(description = "Re-read the doctor roster file. The previous roster stays active if the file cannot be loaded.")]
    async fn reload_roster(&self) -> Result<Json<ReloadRosterResponse>, String> {
        info!(path = %self.roster_path.display(), "reload_roster tool invoked");
        let doctor_count = self
            .chat
            .roster()
            .reload(&self.roster_path)
            .await
            .inspect_err(|e| warn!(error = %e, "roster reload failed"))
            .map_err(|e| format!("reload failed: {e}"))?;
        Ok(Json(ReloadRosterResponse { doctor_count }))
    }
}

#[tool_handler]
impl ServerHandler for DoctorFinderServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "doctor-finder".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Symptom-to-doctor matching server. Use find_doctors to rank the roster for a \
                 symptom description, send_message for a logged chat turn (greetings included), \
                 get_conversation to read the log, list_doctors to browse the roster and \
                 reload_roster after the roster file changes. Matching is plain substring \
                 overlap between message words and listed symptoms, not diagnosis."
                    .to_string(),
            ),
        }
    }
}
