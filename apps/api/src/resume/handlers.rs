//! Axum route handlers for resume diagnosis.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::industry::models::Recommendation;
use crate::industry::risk::recommend_transitions;
use crate::resume::diagnosis::{analyze_risks, parse_resume, ResumeExtraction, RiskBreakdown};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DiagnoseRequest {
    #[serde(default)]
    pub resume_text: String,
    /// Industries the user picked explicitly; merged ahead of parsed ones.
    #[serde(default)]
    pub selected_industries: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DiagnoseResponse {
    pub extraction: Option<ResumeExtraction>,
    pub industries: Vec<String>,
    pub risks: RiskBreakdown,
    pub recommendations: Vec<Recommendation>,
    pub message: Option<String>,
}

/// Selected industries first, then parsed ones, without duplicates.
fn merge_industries(selected: &[String], parsed: Vec<String>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    for name in selected.iter().map(|s| s.trim().to_string()).chain(parsed) {
        if !name.is_empty() && !merged.contains(&name) {
            merged.push(name);
        }
    }
    merged
}

/// POST /api/v1/resume/diagnose
///
/// Extracts industries from resume text (LLM with keyword fallback), then
/// returns the risk breakdown and transition recommendations for them.
pub async fn handle_diagnose(
    State(state): State<AppState>,
    Json(request): Json<DiagnoseRequest>,
) -> Result<Json<DiagnoseResponse>, AppError> {
    if request.resume_text.trim().is_empty()
        && request.selected_industries.iter().all(|s| s.trim().is_empty())
    {
        return Err(AppError::Validation(
            "provide resume_text or at least one selected industry".to_string(),
        ));
    }

    let table = state.table()?;

    let extraction = if request.resume_text.trim().is_empty() {
        None
    } else {
        Some(parse_resume(&request.resume_text, state.llm.as_deref()).await?)
    };

    let parsed_names = extraction
        .as_ref()
        .map(|e| e.parsed.industry_names())
        .unwrap_or_default();
    let industries = merge_industries(&request.selected_industries, parsed_names);

    if industries.is_empty() {
        return Ok(Json(DiagnoseResponse {
            extraction,
            industries,
            risks: RiskBreakdown::default(),
            recommendations: Vec::new(),
            message: Some("未能从简历中识别出行业信息，请直接选择行业或补充工作经历".to_string()),
        }));
    }

    let risks = analyze_risks(&table, &industries);
    let recommendations = recommend_transitions(&table, &state.transitions, &industries);
    let message = risks
        .has_high_risk()
        .then(|| "检测到高风险行业，建议尽早规划转型".to_string());

    Ok(Json(DiagnoseResponse {
        extraction,
        industries,
        risks,
        recommendations,
        message,
    }))
}
