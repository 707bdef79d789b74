use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use clinic_common::conversation::{MemoryConversationLog, RedisConversationLog};
use clinic_common::redis::RedisStore;
use doctor_finder::chat::{ChatService, ConversationBackend};
use doctor_finder::config::Config;
use doctor_finder::roster::{self, RosterHandle};
use doctor_finder::server::DoctorFinderServer;

const REDIS_KEY_PREFIX: &str = "doctor_finder";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries MCP JSON-RPC on stdio transport
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting doctor-finder MCP server");

    let config = Config::from_env()?;
    info!(
        roster_path = %config.roster_path,
        redis = config.redis_url.is_some(),
        http = config.http_listen_addr.is_some(),
        "configuration loaded"
    );

    let doctors = roster::load_roster(&config.roster_path())?;
    info!(doctors = doctors.len(), "roster loaded");
    let roster = Arc::new(RosterHandle::new(doctors));

    let redis = RedisStore::new(config.redis_url.as_deref());
    let log = if redis.is_available().await {
        info!("redis connected, conversation log is persistent");
        ConversationBackend::Redis(RedisConversationLog::new(
            redis,
            REDIS_KEY_PREFIX,
            config.convo_ttl_secs,
            config.convo_max_messages,
        ))
    } else {
        info!("redis unavailable, keeping conversation log in memory");
        ConversationBackend::Memory(MemoryConversationLog::new(config.convo_max_messages))
    };

    let chat = Arc::new(ChatService::new(roster, log));

    let http_task = match config.http_listen_addr.as_deref() {
        Some(addr) => {
            let listener = TcpListener::bind(addr).await?;
            let app = doctor_finder::http::router(Arc::clone(&chat));
            info!(listen_addr = %addr, "HTTP chat API ready");
            Some(tokio::spawn(doctor_finder::http::serve(listener, app)))
        }
        None => None,
    };

    let server = DoctorFinderServer::new(chat, config.roster_path());

    if let Some(addr) = config.mcp_tcp_listen_addr.as_deref() {
        let listener = TcpListener::bind(addr).await?;
        info!(listen_addr = %addr, "MCP server ready, serving on TCP");
        loop {
            let (stream, peer) = listener.accept().await?;
            let server = server.clone();
            tokio::spawn(async move {
                tracing::info!(peer = %peer, "MCP client connected");
                let service = server.serve(stream).await.inspect_err(|e| {
                    tracing::error!(error = %e, "MCP server error");
                })?;
                service.waiting().await?;
                tracing::info!(peer = %peer, "MCP client disconnected");
                Ok::<(), anyhow::Error>(())
            });
        }
    }

    info!("MCP server ready, serving on stdio");
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!(error = %e, "MCP server error");
    })?;
    service.waiting().await?;
    info!("MCP server shut down");

    if let Some(task) = http_task {
        info!("stdio closed, HTTP chat API keeps serving");
        task.await??;
    }
    Ok(())
}
