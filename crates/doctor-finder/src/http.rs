//! JSON chat API for browser clients.
//!
//! - `POST /api/message/` with `{"message": "..."}` runs one chat turn.
//! - `GET /api/conversation/` returns the log.
//! - `GET /health` reports liveness and roster size.
use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tracing::{debug, error};

use clinic_common::conversation::ConversationLog;
use clinic_common::mcp_api::{ConversationResponse, SendMessageParams};

use crate::chat::ChatService;

pub fn router<L>(chat: Arc<ChatService<L>>) -> Router
where
    L: ConversationLog + 'static,
{
    Router::new()
        .route("/api/message", post(send_message::<L>))
        .route("/api/message/", post(send_message::<L>))
        .route("/api/conversation", get(conversation::<L>))
        .route("/api/conversation/", get(conversation::<L>))
        .route("/health", get(health::<L>))
        .with_state(chat)
}

/// Serve `app` until the listener fails. The failure is logged here because
/// the task running this is only joined once the MCP transport closes.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    axum::serve(listener, app)
        .await
        .inspect_err(|e| error!(error = %e, "HTTP chat API stopped"))
}

async fn send_message<L: ConversationLog>(
    State(chat): State<Arc<ChatService<L>>>,
    body: Bytes,
) -> Response {
    let Some(params) = parse_message_body(&body) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid JSON format" })),
        )
            .into_response();
    };

    Json(chat.handle_message(&params.message).await).into_response()
}

/// An empty body reads as `{}`. Anything other than a JSON object, or an
/// object whose `message` is not a string, is rejected.
fn parse_message_body(body: &[u8]) -> Option<SendMessageParams> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Some(SendMessageParams::default());
    }
    let value: Value = serde_json::from_slice(body)
        .inspect_err(|e| debug!(error = %e, "rejecting chat request body"))
        .ok()?;
    if !value.is_object() {
        debug!("rejecting chat request body that is not an object");
        return None;
    }
    serde_json::from_value(value)
        .inspect_err(|e| debug!(error = %e, "rejecting chat request body"))
        .ok()
}

async fn conversation<L: ConversationLog>(
    State(chat): State<Arc<ChatService<L>>>,
) -> Json<ConversationResponse> {
    Json(ConversationResponse {
        messages: chat.conversation().await,
    })
}

async fn health<L: ConversationLog>(State(chat): State<Arc<ChatService<L>>>) -> impl IntoResponse {
    let doctors = chat.roster().snapshot().await.len();
    Json(json!({ "status": "ok", "doctors": doctors }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use clinic_common::conversation::MemoryConversationLog;

    use super::*;
    use crate::roster::{RosterHandle, parse_roster};

    fn app() -> Router {
        let roster = parse_roster(
            r#"[{ "id": 1, "name": "Dr. Ayesha", "symptoms": "fever,cough,headache" }]"#,
            "inline",
        )
        .expect("parse");
        let chat = ChatService::new(
            Arc::new(RosterHandle::new(roster)),
            MemoryConversationLog::default(),
        );
        router(Arc::new(chat))
    }

    async fn call(app: Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn message_returns_ranked_doctors() {
        let (status, body) = call(
            app(),
            Method::POST,
            "/api/message/",
            r#"{"message": "I have a fever and cough"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["next"], "show_doctors");
        assert_eq!(body["doctors"][0]["name"], "Dr. Ayesha");
        assert_eq!(body["doctors"][0]["match_count"], 2);
        assert_eq!(body["conversation"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn invalid_json_is_rejected() {
        let (status, body) = call(app(), Method::POST, "/api/message", "{ nope").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid JSON format");
    }

    #[tokio::test]
    async fn non_object_bodies_are_rejected() {
        for body in ["[]", r#"["I have fever"]"#, r#""fever""#, "42", r#"{"message": 5}"#] {
            let (status, json) = call(app(), Method::POST, "/api/message/", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
            assert_eq!(json["error"], "Invalid JSON format");
        }
    }

    #[tokio::test]
    async fn rejected_bodies_are_not_logged() {
        let app = app();
        let (status, _) = call(app.clone(), Method::POST, "/api/message/", r#"["fever"]"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (_, body) = call(app, Method::GET, "/api/conversation/", "").await;
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn serve_answers_on_the_bound_listener() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let task = tokio::spawn(serve(listener, app()));

        let mut stream = tokio::net::TcpStream::connect(addr).await.expect("connect");
        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .expect("write");
        let mut response = String::new();
        stream.read_to_string(&mut response).await.expect("read");
        assert!(response.starts_with("HTTP/1.1 200"), "{response}");
        assert!(response.contains(r#""doctors":1"#));

        task.abort();
    }

    #[test]
    fn missing_message_field_reads_as_empty() {
        let params = parse_message_body(br#"{"other": 1}"#).expect("object accepted");
        assert!(params.message.is_empty());
        assert!(parse_message_body(b"  ").expect("empty body").message.is_empty());
    }

    #[tokio::test]
    async fn empty_body_asks_for_a_message() {
        let (status, body) = call(app(), Method::POST, "/api/message/", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], "⚠️ Please enter a message.");
        assert!(body.get("next").is_none());
    }

    #[tokio::test]
    async fn health_reports_roster_size() {
        let (status, body) = call(app(), Method::GET, "/health", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["doctors"], 1);
    }

    #[tokio::test]
    async fn conversation_starts_empty() {
        let (status, body) = call(app(), Method::GET, "/api/conversation/", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(0));
    }
}
