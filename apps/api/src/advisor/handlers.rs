//! Axum route handlers for the chat advisor.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures_util::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::advisor::chat::{
    advise, advise_stream, welcome_message, AdvisorContext, ComposedTurn, QuickAction,
};
use crate::errors::AppError;
use crate::llm_client::ChatMessage;
use crate::session::store::SessionState;
use crate::state::AppState;

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AdvisorChatRequest {
    /// Profile and target are read from this session unless given inline.
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub question: String,
    /// Replaces `question` with a canned prompt.
    pub action: Option<QuickAction>,
    pub context: Option<AdvisorContext>,
    /// Prior turns, oldest first, as previously returned by this endpoint.
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct AdvisorChatResponse {
    pub reply: String,
    pub turn: ComposedTurn,
    /// The composed user turn then the reply; the client appends both to its history.
    pub new_messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct WelcomeQuery {
    pub session_id: Option<Uuid>,
    pub target: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: String,
}

fn find_session(state: &AppState, id: Uuid) -> Result<SessionState, AppError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("session {id} not found")))
}

fn resolve_context(
    state: &AppState,
    request: &AdvisorChatRequest,
) -> Result<AdvisorContext, AppError> {
    let mut ctx = request.context.clone().unwrap_or_default();
    if let Some(id) = request.session_id {
        let session = find_session(state, id)?;
        if request.context.is_none() {
            ctx.profile = session.profile;
        }
        if ctx.target_industry.is_none() {
            ctx.target_industry = session.target_industry;
        }
    }
    Ok(ctx)
}

fn resolve_question(
    request: &AdvisorChatRequest,
    ctx: &AdvisorContext,
) -> Result<String, AppError> {
    match request.action {
        Some(action) => action.question(ctx),
        None if request.question.trim().is_empty() => {
            Err(AppError::Validation("question cannot be empty".to_string()))
        }
        None => Ok(request.question.trim().to_string()),
    }
}

fn json_event(name: &str, payload: &impl Serialize) -> Event {
    Event::default()
        .event(name)
        .data(serde_json::to_string(payload).unwrap_or_default())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/advisor/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<AdvisorChatRequest>,
) -> Result<Json<AdvisorChatResponse>, AppError> {
    let ctx = resolve_context(&state, &request)?;
    let question = resolve_question(&request, &ctx)?;
    let table = state.table()?;
    let model = state.llm()?;

    let advice = advise(&table, model, &ctx, &question, &request.history).await?;

    Ok(Json(AdvisorChatResponse {
        new_messages: vec![
            ChatMessage::user(advice.turn.content.clone()),
            ChatMessage::assistant(advice.reply.clone()),
        ],
        reply: advice.reply,
        turn: advice.turn,
    }))
}

/// POST /api/v1/advisor/chat/stream
///
/// SSE events: one `context` (the composed turn), then `delta` chunks, then
/// `done`. A model failure mid-stream is sent as an `error` event.
pub async fn handle_chat_stream(
    State(state): State<AppState>,
    Json(request): Json<AdvisorChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let ctx = resolve_context(&state, &request)?;
    let question = resolve_question(&request, &ctx)?;
    let table = state.table()?;
    let model = state.llm()?;

    let (turn, chunks) = advise_stream(&table, model, &ctx, &question, &request.history).await?;

    let head = stream::once(async move { Ok::<_, Infallible>(json_event("context", &turn)) });
    let body = chunks.map(|chunk| {
        Ok::<_, Infallible>(match chunk {
            Ok(text) => Event::default().event("delta").data(text.replace('\r', "")),
            Err(e) => {
                warn!("Advisor stream interrupted: {e}");
                Event::default().event("error").data(e.to_string())
            }
        })
    });
    let tail =
        stream::once(async { Ok::<_, Infallible>(Event::default().event("done").data("[DONE]")) });

    Ok(Sse::new(head.chain(body).chain(tail)).keep_alive(
        KeepAlive::new().interval(KEEP_ALIVE_INTERVAL).text("ping"),
    ))
}

/// GET /api/v1/advisor/welcome?target=&session_id=
pub async fn handle_welcome(
    State(state): State<AppState>,
    Query(params): Query<WelcomeQuery>,
) -> Result<Json<WelcomeResponse>, AppError> {
    let session_target = match params.session_id {
        Some(id) => find_session(&state, id)?.target_industry,
        None => None,
    };
    let target = params.target.or(session_target);

    let table = state.table()?;
    Ok(Json(WelcomeResponse {
        message: welcome_message(&table, target.as_deref()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> AdvisorChatRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_deserializes_minimal_body() {
        let r = request(r#"{"question": "储能前景如何？"}"#);
        assert!(r.session_id.is_none());
        assert!(r.history.is_empty());
        assert!(r.action.is_none());
    }

    #[test]
    fn test_resolve_question_rejects_blank() {
        let r = request(r#"{"question": "   "}"#);
        let err = resolve_question(&r, &AdvisorContext::default()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_resolve_question_uses_action() {
        let r = request(r#"{"action": "industry_report", "context": {"target_industry": "储能"}}"#);
        let ctx = r.context.clone().unwrap();
        let question = resolve_question(&r, &ctx).unwrap();
        assert!(question.contains("储能"));
    }

    #[test]
    fn test_history_roles_deserialize() {
        let r = request(
            r#"{"question": "q", "history": [{"role": "user", "content": "a"}, {"role": "assistant", "content": "b"}]}"#,
        );
        assert_eq!(r.history.len(), 2);
        assert_eq!(r.history[1].content, "b");
    }
}
