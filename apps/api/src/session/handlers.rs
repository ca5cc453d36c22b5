//! Axum route handlers for session state and the watchlist.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::industry::combination::{CombinationRule, UNKNOWN};
use crate::industry::matcher::match_industry;
use crate::industry::models::{IndustryTable, MatchResult, RiskLevel};
use crate::industry::risk::risk_level;
use crate::session::store::{SessionState, UserProfile, WatchItem};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TargetRequest {
    /// `null` or blank clears the pending handoff.
    pub industry: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WatchRequest {
    pub industry: String,
}

/// A watchlist entry annotated with the deterministic lookup for it.
#[derive(Debug, Serialize)]
pub struct WatchView {
    pub industry: String,
    pub added_at: DateTime<Utc>,
    pub top_match: Option<MatchResult>,
    pub combination: CombinationRule,
    pub risk_level: Option<RiskLevel>,
    pub risk_label: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct WatchlistResponse {
    pub session_id: Uuid,
    pub items: Vec<WatchView>,
}

#[derive(Debug, Serialize)]
pub struct WatchChangeResponse {
    pub industry: String,
    pub changed: bool,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("session {id} not found"))
}

pub fn annotate(table: &IndustryTable, items: &[WatchItem]) -> Vec<WatchView> {
    items
        .iter()
        .map(|item| {
            let top_match = match_industry(table, &item.industry, 1).into_iter().next();
            let level = top_match.as_ref().map(|m| risk_level(&m.record));
            WatchView {
                industry: item.industry.clone(),
                added_at: item.added_at,
                combination: top_match.as_ref().map_or(UNKNOWN, |m| m.combination),
                risk_level: level,
                risk_label: level.map(|l| l.label()),
                top_match,
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionState>) {
    (StatusCode::CREATED, Json(state.sessions.create()))
}

/// GET /api/v1/sessions/:id/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, AppError> {
    let session = state.sessions.get(id).ok_or_else(|| not_found(id))?;
    Ok(Json(session.profile))
}

/// PUT /api/v1/sessions/:id/profile
pub async fn handle_put_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<UserProfile>, AppError> {
    let saved = state
        .sessions
        .update(id, |s| {
            s.profile = profile;
            s.profile.clone()
        })
        .ok_or_else(|| not_found(id))?;
    Ok(Json(saved))
}

/// PUT /api/v1/sessions/:id/target
///
/// Records the industry handed off from another screen (e.g. a recommendation
/// the user wants to track or discuss).
pub async fn handle_put_target(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TargetRequest>,
) -> Result<Json<SessionState>, AppError> {
    let target = request
        .industry
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    let session = state
        .sessions
        .update(id, |s| {
            s.target_industry = target;
            s.clone()
        })
        .ok_or_else(|| not_found(id))?;
    Ok(Json(session))
}

/// GET /api/v1/sessions/:id/watchlist
///
/// Absorbs any pending target handoff before listing.
pub async fn handle_get_watchlist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WatchlistResponse>, AppError> {
    let table = state.table()?;
    let items = state
        .sessions
        .update(id, |s| {
            s.absorb_target(Utc::now());
            s.watchlist.clone()
        })
        .ok_or_else(|| not_found(id))?;

    Ok(Json(WatchlistResponse {
        session_id: id,
        items: annotate(&table, &items),
    }))
}

/// POST /api/v1/sessions/:id/watchlist
pub async fn handle_add_watch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<WatchRequest>,
) -> Result<Json<WatchChangeResponse>, AppError> {
    let industry = request.industry.trim().to_string();
    if industry.is_empty() {
        return Err(AppError::Validation("industry cannot be empty".to_string()));
    }
    let changed = state
        .sessions
        .update(id, |s| s.watch(&industry, Utc::now()))
        .ok_or_else(|| not_found(id))?;
    Ok(Json(WatchChangeResponse { industry, changed }))
}

/// DELETE /api/v1/sessions/:id/watchlist/:industry
pub async fn handle_remove_watch(
    State(state): State<AppState>,
    Path((id, industry)): Path<(Uuid, String)>,
) -> Result<Json<WatchChangeResponse>, AppError> {
    let changed = state
        .sessions
        .update(id, |s| s.unwatch(&industry))
        .ok_or_else(|| not_found(id))?;
    Ok(Json(WatchChangeResponse { industry, changed }))
}
