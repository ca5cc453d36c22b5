pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::advisor::handlers as advisor;
use crate::industry::handlers as industry;
use crate::resume::handlers as resume;
use crate::session::handlers as session;
use crate::simulation::handlers as simulation;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Industry engine
        .route("/api/v1/industries", get(industry::handle_browse))
        .route("/api/v1/industries/stats", get(industry::handle_stats))
        .route("/api/v1/industries/match", get(industry::handle_match))
        .route("/api/v1/industries/risk", get(industry::handle_risk))
        .route(
            "/api/v1/industries/transitions",
            post(industry::handle_transitions),
        )
        .route(
            "/api/v1/industries/narrative",
            get(industry::handle_narrative),
        )
        .route(
            "/api/v1/industries/reload",
            post(industry::handle_reload),
        )
        .route("/api/v1/cycles/theory", get(industry::handle_theory_table))
        .route("/api/v1/cycles/theory/:stage", get(industry::handle_theory))
        .route(
            "/api/v1/cycles/combination",
            get(industry::handle_combination),
        )
        .route(
            "/api/v1/cycles/combinations",
            get(industry::handle_combination_table),
        )
        // Career path simulation
        .route(
            "/api/v1/simulations/backcast",
            post(simulation::handle_backcast),
        )
        .route(
            "/api/v1/simulations/forecast",
            post(simulation::handle_forecast),
        )
        .route(
            "/api/v1/simulations/compare",
            post(simulation::handle_compare),
        )
        // Resume diagnosis
        .route("/api/v1/resume/diagnose", post(resume::handle_diagnose))
        // Chat advisor
        .route("/api/v1/advisor/chat", post(advisor::handle_chat))
        .route(
            "/api/v1/advisor/chat/stream",
            post(advisor::handle_chat_stream),
        )
        .route("/api/v1/advisor/welcome", get(advisor::handle_welcome))
        // Sessions
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id/profile",
            get(session::handle_get_profile).put(session::handle_put_profile),
        )
        .route(
            "/api/v1/sessions/:id/target",
            put(session::handle_put_target),
        )
        .route(
            "/api/v1/sessions/:id/watchlist",
            get(session::handle_get_watchlist).post(session::handle_add_watch),
        )
        .route(
            "/api/v1/sessions/:id/watchlist/:industry",
            delete(session::handle_remove_watch),
        )
        .with_state(state)
}
