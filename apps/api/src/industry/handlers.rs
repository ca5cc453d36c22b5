//! Axum route handlers for the industry engine and the cycle reference data.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::industry::browser::{
    cycle_distribution, filter_industries, growth_industries, industry_cycle_score,
    policy_cycle_score, risk_industries, sentiment_distribution, Bucket, IndustryFilter,
    RiskIndustry,
};
use crate::industry::combination::{classify, defined_pairs, CombinationRule};
use crate::industry::matcher::match_industry;
use crate::industry::models::{IndustryRecord, MatchResult, Recommendation, RiskWarning};
use crate::industry::narrative::build_narrative;
use crate::industry::risk::{assess_risk, recommend_transitions};
use crate::industry::theory::{all_entries, describe, CycleTheoryEntry};
use crate::state::AppState;

const DEFAULT_MATCH_LIMIT: usize = 3;
const MAX_MATCH_LIMIT: usize = 50;

/// User-facing note for a lookup miss. Misses are not errors.
pub fn miss_message(query: &str) -> String {
    format!("暂无'{query}'的行业数据，以下展示通用周期理论指导")
}

/// Splits a comma-separated query value into trimmed, non-empty items.
fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or("")
        .split([',', '，'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    /// Comma-separated lifecycle stages.
    pub stages: Option<String>,
    /// Comma-separated sentiment labels.
    pub sentiments: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IndustryView {
    #[serde(flatten)]
    pub record: IndustryRecord,
    pub industry_cycle_score: u8,
    pub policy_cycle_score: u8,
}

#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    pub total: usize,
    pub industries: Vec<IndustryView>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total: usize,
    pub cycle_distribution: Vec<Bucket>,
    pub sentiment_distribution: Vec<Bucket>,
    pub growth_industries: Vec<IndustryRecord>,
    pub risk_industries: Vec<RiskIndustry>,
}

#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub query: String,
    /// Effective result cap: the requested limit, clamped to `MAX_MATCH_LIMIT`.
    pub limit: usize,
    pub results: Vec<MatchResult>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct RiskResponse {
    pub industry: String,
    pub warning: Option<RiskWarning>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TransitionsRequest {
    pub current_industries: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TransitionsResponse {
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Serialize)]
pub struct NarrativeResponse {
    pub industry: String,
    pub narrative: String,
}

#[derive(Debug, Serialize)]
pub struct TheoryResponse {
    pub stage: String,
    pub theory: Option<&'static CycleTheoryEntry>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CombinationQuery {
    pub industry_stage: String,
    pub policy_stage: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CombinationResponse {
    #[serde(flatten)]
    pub rule: CombinationRule,
    pub risk_label: &'static str,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CombinationEntry {
    pub industry_stage: &'static str,
    pub policy_stage: &'static str,
    #[serde(flatten)]
    pub rule: CombinationRule,
    pub risk_label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub total: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/industries
///
/// Industry browser: filter by stages, sentiments and a name/commentary query.
pub async fn handle_browse(
    State(state): State<AppState>,
    Query(params): Query<BrowseQuery>,
) -> Result<Json<BrowseResponse>, AppError> {
    let table = state.table()?;
    let filter = IndustryFilter {
        stages: split_list(params.stages.as_deref()),
        sentiments: split_list(params.sentiments.as_deref()),
        query: params.q,
    };

    let industries: Vec<IndustryView> = filter_industries(&table, &filter)
        .into_iter()
        .map(|r| IndustryView {
            industry_cycle_score: industry_cycle_score(&r.lifecycle_stage),
            policy_cycle_score: policy_cycle_score(&r.sentiment_label),
            record: r.clone(),
        })
        .collect();

    Ok(Json(BrowseResponse {
        total: industries.len(),
        industries,
    }))
}

/// GET /api/v1/industries/stats
pub async fn handle_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let table = state.table()?;
    Ok(Json(StatsResponse {
        total: table.len(),
        cycle_distribution: cycle_distribution(&table),
        sentiment_distribution: sentiment_distribution(&table),
        growth_industries: growth_industries(&table).into_iter().cloned().collect(),
        risk_industries: risk_industries(&table),
    }))
}

/// GET /api/v1/industries/match?q=&limit=
///
/// `limit` defaults to 3 and is capped at 50; the response echoes the cap applied.
pub async fn handle_match(
    State(state): State<AppState>,
    Query(params): Query<MatchQuery>,
) -> Result<Json<MatchResponse>, AppError> {
    let table = state.table()?;
    let limit = params
        .limit
        .unwrap_or(DEFAULT_MATCH_LIMIT)
        .min(MAX_MATCH_LIMIT);

    let results = match_industry(&table, &params.q, limit);
    let message = results.is_empty().then(|| miss_message(&params.q));

    Ok(Json(MatchResponse {
        query: params.q,
        limit,
        results,
        message,
    }))
}

/// GET /api/v1/industries/risk?name=
///
/// `warning` is null for unknown and low-risk industries.
pub async fn handle_risk(
    State(state): State<AppState>,
    Query(params): Query<NameQuery>,
) -> Result<Json<RiskResponse>, AppError> {
    let table = state.table()?;
    let warning = assess_risk(&table, &params.name);
    let message = match &warning {
        Some(_) => None,
        None if match_industry(&table, &params.name, 1).is_empty() => {
            Some(miss_message(&params.name))
        }
        None => Some("该行业暂无风险预警".to_string()),
    };

    Ok(Json(RiskResponse {
        industry: params.name,
        warning,
        message,
    }))
}

/// POST /api/v1/industries/transitions
pub async fn handle_transitions(
    State(state): State<AppState>,
    Json(request): Json<TransitionsRequest>,
) -> Result<Json<TransitionsResponse>, AppError> {
    let table = state.table()?;
    let recommendations =
        recommend_transitions(&table, &state.transitions, &request.current_industries);
    Ok(Json(TransitionsResponse { recommendations }))
}

/// GET /api/v1/industries/narrative?name=
///
/// The exact text the advisor hands to the LLM for this industry.
pub async fn handle_narrative(
    State(state): State<AppState>,
    Query(params): Query<NameQuery>,
) -> Result<Json<NarrativeResponse>, AppError> {
    let table = state.table()?;
    let narrative = build_narrative(&table, &params.name);
    Ok(Json(NarrativeResponse {
        industry: params.name,
        narrative,
    }))
}

/// GET /api/v1/cycles/theory/:stage
pub async fn handle_theory(Path(stage): Path<String>) -> Json<TheoryResponse> {
    let theory = describe(&stage);
    let message = theory
        .is_none()
        .then(|| format!("'{stage}' 不是可识别的周期阶段，暂无理论指导"));
    Json(TheoryResponse {
        stage,
        theory,
        message,
    })
}

/// GET /api/v1/cycles/theory
pub async fn handle_theory_table() -> Json<Vec<&'static CycleTheoryEntry>> {
    Json(all_entries().collect())
}

/// GET /api/v1/cycles/combination?industry_stage=&policy_stage=
pub async fn handle_combination(
    Query(params): Query<CombinationQuery>,
) -> Json<CombinationResponse> {
    let rule = classify(&params.industry_stage, params.policy_stage.as_deref());
    let message = rule.is_unknown().then(|| {
        format!(
            "'{}' 不是可识别的周期阶段，暂无组合研判",
            params.industry_stage
        )
    });
    Json(CombinationResponse {
        risk_label: rule.risk.label(),
        rule,
        message,
    })
}

/// GET /api/v1/cycles/combinations
///
/// The defined (industry stage, policy stage) pairs and their rules.
pub async fn handle_combination_table() -> Json<Vec<CombinationEntry>> {
    Json(
        defined_pairs()
            .map(|(industry_stage, policy_stage, rule)| CombinationEntry {
                industry_stage,
                policy_stage,
                risk_label: rule.risk.label(),
                rule,
            })
            .collect(),
    )
}

/// POST /api/v1/industries/reload
///
/// Forces a re-parse of the reference table source.
pub async fn handle_reload(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, AppError> {
    let table = state.reload_table()?;
    Ok(Json(ReloadResponse { total: table.len() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::industry::models::RiskLevel;

    const HEADER: &str = "序号,行业名称,当前周期阶段,未来1-3年景气度,评价";

    fn write_table(path: &std::path::Path, contents: &str) {
        std::fs::write(path, contents).unwrap();
    }

    fn valid_table(path: &std::path::Path) {
        write_table(
            path,
            &format!("{HEADER}\n1,储能,成长期,高成长,好\n2,房地产,衰退期,承压,去库存\n"),
        );
    }

    fn match_query(q: &str, limit: Option<usize>) -> Query<MatchQuery> {
        Query(MatchQuery {
            q: q.to_string(),
            limit,
        })
    }

    fn name_query(name: &str) -> Query<NameQuery> {
        Query(NameQuery {
            name: name.to_string(),
        })
    }

    #[test]
    fn test_split_list_accepts_ascii_and_fullwidth_commas() {
        assert_eq!(
            split_list(Some("成长期, 初创期，成熟期,,")),
            vec!["成长期", "初创期", "成熟期"]
        );
        assert!(split_list(None).is_empty());
    }

    #[test]
    fn test_miss_message_names_the_query() {
        assert!(miss_message("元宇宙").contains("元宇宙"));
    }

    #[test]
    fn test_combination_response_flattens_rule() {
        let rule = classify("成长期", None);
        let json = serde_json::to_value(CombinationResponse {
            risk_label: rule.risk.label(),
            rule,
            message: None,
        })
        .unwrap();
        assert_eq!(json["name"], "红利交叠期");
        assert_eq!(json["risk"], "best timing");
        assert_eq!(json["risk_label"], "🟢 最佳时机");
        assert!(json["message"].is_null());
    }

    #[tokio::test]
    async fn test_combination_handler_flags_unknown_stage() {
        let Json(response) = handle_combination(Query(CombinationQuery {
            industry_stage: "复苏期".to_string(),
            policy_stage: None,
        }))
        .await;
        assert!(response.rule.is_unknown());
        assert!(response.message.unwrap().contains("复苏期"));
    }

    #[tokio::test]
    async fn test_combination_table_lists_defined_pairs() {
        let Json(entries) = handle_combination_table().await;
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[1].industry_stage, "成长期");
        assert_eq!(entries[1].policy_stage, "资源聚焦期");
        assert_eq!(entries[1].rule.name, "红利交叠期");
    }

    #[tokio::test]
    async fn test_missing_source_fails_table_backed_handlers() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::for_table(&dir.path().join("industry_cycles.csv"));

        let err = handle_match(State(state.clone()), match_query("储能", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DataSource(_)));

        let err = handle_risk(State(state.clone()), name_query("储能"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DataSource(_)));

        let err = handle_reload(State(state)).await.unwrap_err();
        assert!(matches!(err, AppError::DataSource(_)));
    }

    #[tokio::test]
    async fn test_schema_error_halts_until_source_is_fixed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("industry_cycles.csv");
        write_table(&path, "序号,行业名称,当前周期阶段\n1,储能,成长期\n");
        let state = AppState::for_table(&path);

        let err = handle_match(State(state.clone()), match_query("储能", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));

        let err = handle_risk(State(state.clone()), name_query("储能"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));

        let err = handle_reload(State(state.clone())).await.unwrap_err();
        assert!(matches!(err, AppError::Schema(_)));

        valid_table(&path);
        let Json(reloaded) = handle_reload(State(state.clone())).await.unwrap();
        assert_eq!(reloaded.total, 2);

        let Json(matched) = handle_match(State(state.clone()), match_query("储能", None))
            .await
            .unwrap();
        assert_eq!(matched.results[0].record.name, "储能");

        let Json(risk) = handle_risk(State(state), name_query("房地产"))
            .await
            .unwrap();
        assert!(risk.warning.is_some());
    }

    #[tokio::test]
    async fn test_risk_handler_messages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("industry_cycles.csv");
        valid_table(&path);
        let state = AppState::for_table(&path);

        let Json(unknown) = handle_risk(State(state.clone()), name_query("元宇宙"))
            .await
            .unwrap();
        assert!(unknown.warning.is_none());
        assert_eq!(unknown.message, Some(miss_message("元宇宙")));

        let Json(low) = handle_risk(State(state.clone()), name_query("储能"))
            .await
            .unwrap();
        assert!(low.warning.is_none());
        assert_eq!(low.message.as_deref(), Some("该行业暂无风险预警"));

        let Json(high) = handle_risk(State(state), name_query("房地产"))
            .await
            .unwrap();
        assert_eq!(high.warning.unwrap().risk_level, RiskLevel::High);
        assert!(high.message.is_none());
    }

    #[tokio::test]
    async fn test_match_echoes_effective_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("industry_cycles.csv");
        valid_table(&path);
        let state = AppState::for_table(&path);

        let Json(capped) = handle_match(State(state.clone()), match_query("储能", Some(500)))
            .await
            .unwrap();
        assert_eq!(capped.limit, MAX_MATCH_LIMIT);

        let Json(default) = handle_match(State(state.clone()), match_query("储能", None))
            .await
            .unwrap();
        assert_eq!(default.limit, DEFAULT_MATCH_LIMIT);

        let Json(miss) = handle_match(State(state), match_query("元宇宙", Some(5)))
            .await
            .unwrap();
        assert_eq!(miss.limit, 5);
        assert!(miss.results.is_empty());
        assert!(miss.message.is_some());
    }
}
