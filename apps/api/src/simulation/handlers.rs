//! Axum route handlers for career path simulation.

use axum::{extract::State, Json};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::ChatMessage;
use crate::simulation::projection::{
    backcast, compare, forecast, Backcast, DualTrack, Forecast, MAX_YEARS,
};
use crate::simulation::prompts::{
    BACKCAST_TEMPLATE, COMPARISON_SYSTEM, COMPARISON_TEMPLATE, FORECAST_TEMPLATE,
    SIMULATION_SYSTEM,
};
use crate::state::AppState;

const NO_MODEL_NOTE: &str = "未配置AI模型，仅返回推演结果";

fn default_backcast_years() -> u32 {
    3
}

fn default_entry_level() -> String {
    "应届生/初级".to_string()
}

fn default_forecast_years() -> u32 {
    3
}

fn default_compare_years() -> u32 {
    5
}

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BackcastRequest {
    #[serde(default)]
    pub industry: String,
    #[serde(default = "default_backcast_years")]
    pub years_ago: u32,
    #[serde(default = "default_entry_level")]
    pub entry_level: String,
    /// Ask the model for commentary on the projection.
    #[serde(default)]
    pub analyze: bool,
}

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    #[serde(default)]
    pub current_industry: String,
    #[serde(default)]
    pub target_industry: String,
    #[serde(default = "default_forecast_years")]
    pub years: u32,
    #[serde(default)]
    pub analyze: bool,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub stay_industry: String,
    #[serde(default)]
    pub move_industry: String,
    #[serde(default = "default_compare_years")]
    pub years: u32,
    #[serde(default)]
    pub analyze: bool,
}

#[derive(Debug, Serialize)]
pub struct SimulationResponse<T> {
    pub simulation: Option<T>,
    /// Set when a lookup missed and nothing was projected.
    pub message: Option<String>,
    pub analysis: Option<String>,
    /// Why `analysis` is missing although it was asked for.
    pub analysis_note: Option<String>,
}

impl<T> SimulationResponse<T> {
    fn miss(message: String) -> Self {
        Self {
            simulation: None,
            message: Some(message),
            analysis: None,
            analysis_note: None,
        }
    }

    fn found(simulation: T, (analysis, analysis_note): (Option<String>, Option<String>)) -> Self {
        Self {
            simulation: Some(simulation),
            message: None,
            analysis,
            analysis_note,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn current_year() -> i32 {
    Utc::now().year()
}

fn check_years(years: u32) -> Result<(), AppError> {
    if (1..=MAX_YEARS).contains(&years) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "years must be between 1 and {MAX_YEARS}"
        )))
    }
}

fn required(value: &str, message: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(value.to_string())
}

fn backcast_prompt(b: &Backcast, entry_level: &str) -> String {
    BACKCAST_TEMPLATE
        .replace("{years}", &b.years_ago.to_string())
        .replace("{start_year}", &b.start_year.to_string())
        .replace("{stage}", &b.matched.lifecycle_stage)
        .replace("{sentiment}", &b.matched.sentiment_label)
        .replace("{entry_level}", entry_level)
        .replace("{industry}", &b.industry)
}

fn forecast_prompt(f: &Forecast, years: u32) -> String {
    let current_stage = f
        .current
        .as_ref()
        .map(|r| format!("（周期阶段：{}）", r.lifecycle_stage))
        .unwrap_or_default();
    FORECAST_TEMPLATE
        .replace("{current_stage}", &current_stage)
        .replace("{stage}", &f.target.lifecycle_stage)
        .replace("{sentiment}", &f.target.sentiment_label)
        .replace("{combination}", f.combination.name)
        .replace("{years}", &years.to_string())
        .replace("{current}", &f.current_industry)
        .replace("{target}", &f.target_industry)
}

fn comparison_prompt(d: &DualTrack, years: u32) -> String {
    COMPARISON_TEMPLATE
        .replace("{stay_stage}", &d.stay.matched.lifecycle_stage)
        .replace("{stay_sentiment}", &d.stay.matched.sentiment_label)
        .replace("{move_stage}", &d.transition.matched.lifecycle_stage)
        .replace("{move_sentiment}", &d.transition.matched.sentiment_label)
        .replace("{years}", &years.to_string())
        .replace("{stay}", &d.stay.industry)
        .replace("{move}", &d.transition.industry)
}

/// Model commentary, or a note saying why there is none. Both are `None`
/// when commentary was not asked for. Model failures never fail the request.
async fn commentary(
    state: &AppState,
    requested: bool,
    system: &str,
    prompt: String,
) -> (Option<String>, Option<String>) {
    if !requested {
        return (None, None);
    }
    let Some(model) = state.llm.as_deref() else {
        return (None, Some(NO_MODEL_NOTE.to_string()));
    };
    match model.complete(system, &[ChatMessage::user(prompt)]).await {
        Ok(text) => (Some(text), None),
        Err(e) => {
            warn!("Simulation commentary failed: {e}");
            (None, Some(format!("AI分析失败: {e}")))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/simulations/backcast
///
/// Where the user would stand today had they entered `industry` `years_ago`
/// years ago.
pub async fn handle_backcast(
    State(state): State<AppState>,
    Json(request): Json<BackcastRequest>,
) -> Result<Json<SimulationResponse<Backcast>>, AppError> {
    let industry = required(&request.industry, "请输入行业名称")?;
    check_years(request.years_ago)?;
    let table = state.table()?;

    let Some(simulation) = backcast(&table, &industry, request.years_ago, current_year()) else {
        return Ok(Json(SimulationResponse::miss(format!(
            "未在知识库中找到'{industry}'的相关数据，无法进行推演。"
        ))));
    };

    let prompt = backcast_prompt(&simulation, &request.entry_level);
    let analysis = commentary(&state, request.analyze, SIMULATION_SYSTEM, prompt).await;
    Ok(Json(SimulationResponse::found(simulation, analysis)))
}

/// POST /api/v1/simulations/forecast
///
/// Outlook of moving from the current industry to a target one now. The
/// current industry is optional and only adds context.
pub async fn handle_forecast(
    State(state): State<AppState>,
    Json(request): Json<ForecastRequest>,
) -> Result<Json<SimulationResponse<Forecast>>, AppError> {
    let target = required(&request.target_industry, "请输入目标行业名称")?;
    check_years(request.years)?;
    let table = state.table()?;
    let current = request.current_industry.trim();

    let Some(simulation) = forecast(&table, current, &target, request.years, current_year()) else {
        return Ok(Json(SimulationResponse::miss(format!(
            "未找到'{target}'的行业数据"
        ))));
    };

    let prompt = forecast_prompt(&simulation, request.years);
    let analysis = commentary(&state, request.analyze, SIMULATION_SYSTEM, prompt).await;
    Ok(Json(SimulationResponse::found(simulation, analysis)))
}

/// POST /api/v1/simulations/compare
///
/// Staying in one industry against moving to another over the same horizon.
pub async fn handle_compare(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Result<Json<SimulationResponse<DualTrack>>, AppError> {
    let stay = required(&request.stay_industry, "请输入两个行业名称")?;
    let moved = required(&request.move_industry, "请输入两个行业名称")?;
    check_years(request.years)?;
    let table = state.table()?;

    let Some(simulation) = compare(&table, &stay, &moved, request.years, current_year()) else {
        return Ok(Json(SimulationResponse::miss(
            "需要两个行业的数据才能进行对比".to_string(),
        )));
    };

    let prompt = comparison_prompt(&simulation, request.years);
    let analysis = commentary(&state, request.analyze, COMPARISON_SYSTEM, prompt).await;
    Ok(Json(SimulationResponse::found(simulation, analysis)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm_client::testing::ScriptedModel;
    use crate::llm_client::ChatModel;

    const TABLE: &str = "序号,行业名称,当前周期阶段,未来1-3年景气度,评价\n\
        1,储能,成长期,高成长,好\n\
        2,水泥,调整期,承压,产能过剩\n";

    fn state_with_table(dir: &tempfile::TempDir) -> AppState {
        let path = dir.path().join("industry_cycles.csv");
        std::fs::write(&path, TABLE).unwrap();
        AppState::for_table(&path)
    }

    fn with_model(mut state: AppState, model: &Arc<ScriptedModel>) -> AppState {
        state.llm = Some(model.clone() as Arc<dyn ChatModel>);
        state
    }

    fn backcast_request(industry: &str, years_ago: u32, analyze: bool) -> Json<BackcastRequest> {
        Json(BackcastRequest {
            industry: industry.to_string(),
            years_ago,
            entry_level: default_entry_level(),
            analyze,
        })
    }

    fn compare_request(stay: &str, moved: &str, years: u32) -> Json<CompareRequest> {
        Json(CompareRequest {
            stay_industry: stay.to_string(),
            move_industry: moved.to_string(),
            years,
            analyze: false,
        })
    }

    #[test]
    fn test_request_defaults() {
        let request: BackcastRequest = serde_json::from_str(r#"{"industry": "储能"}"#).unwrap();
        assert_eq!(request.years_ago, 3);
        assert_eq!(request.entry_level, "应届生/初级");
        assert!(!request.analyze);

        let request: CompareRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.years, 5);
        let request: ForecastRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.years, 3);
    }

    #[tokio::test]
    async fn test_backcast_projects_matched_industry() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_table(&dir);

        let Json(resp) = handle_backcast(State(state), backcast_request("储能", 2, false))
            .await
            .unwrap();
        let simulation = resp.simulation.unwrap();
        assert_eq!(simulation.matched.name, "储能");
        assert_eq!(simulation.milestones.len(), 3);
        assert_eq!(simulation.start_year, current_year() - 2);
        assert!(resp.message.is_none());
        assert!(resp.analysis.is_none());
        assert!(resp.analysis_note.is_none());
    }

    #[tokio::test]
    async fn test_backcast_miss_is_a_message() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_table(&dir);

        let Json(resp) = handle_backcast(State(state), backcast_request("元宇宙", 3, true))
            .await
            .unwrap();
        assert!(resp.simulation.is_none());
        assert_eq!(
            resp.message.as_deref(),
            Some("未在知识库中找到'元宇宙'的相关数据，无法进行推演。")
        );
    }

    #[tokio::test]
    async fn test_years_outside_horizon_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_table(&dir);

        for years in [0, MAX_YEARS + 1] {
            let request = backcast_request("储能", years, false);
            let result = handle_backcast(State(state.clone()), request).await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn test_backcast_commentary_uses_model() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(ScriptedModel::replying("入场时机正确"));
        let state = with_model(state_with_table(&dir), &model);

        let Json(resp) = handle_backcast(State(state), backcast_request("储能", 3, true))
            .await
            .unwrap();
        assert_eq!(resp.analysis.as_deref(), Some("入场时机正确"));
        assert!(resp.analysis_note.is_none());

        let calls = model.calls();
        assert_eq!(calls[0].0, SIMULATION_SYSTEM);
        let prompt = &model.prompts()[0];
        assert!(prompt.contains("进入储能行业，入职职级为应届生/初级"));
        assert!(prompt.contains("当前该行业周期阶段：成长期"));
        assert!(prompt.contains("这3年间"));
    }

    #[tokio::test]
    async fn test_commentary_failure_keeps_projection() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(ScriptedModel::failing());
        let state = with_model(state_with_table(&dir), &model);

        let Json(resp) = handle_backcast(State(state), backcast_request("储能", 3, true))
            .await
            .unwrap();
        assert!(resp.simulation.is_some());
        assert!(resp.analysis.is_none());
        assert!(resp.analysis_note.unwrap().starts_with("AI分析失败"));
    }

    #[tokio::test]
    async fn test_commentary_without_model_is_noted() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_table(&dir);

        let Json(resp) = handle_backcast(State(state), backcast_request("储能", 3, true))
            .await
            .unwrap();
        assert!(resp.simulation.is_some());
        assert_eq!(resp.analysis_note.as_deref(), Some(NO_MODEL_NOTE));
    }

    #[tokio::test]
    async fn test_forecast_prompt_carries_both_industries() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(ScriptedModel::replying("可以转型"));
        let state = with_model(state_with_table(&dir), &model);
        let request = Json(ForecastRequest {
            current_industry: "水泥".to_string(),
            target_industry: "储能".to_string(),
            years: 5,
            analyze: true,
        });

        let Json(resp) = handle_forecast(State(state), request).await.unwrap();
        assert_eq!(resp.simulation.unwrap().outlook.risk_level, "中等");

        let prompt = &model.prompts()[0];
        assert!(prompt.contains("从行业：水泥（周期阶段：调整期）"));
        assert!(prompt.contains("到行业：储能（周期阶段：成长期，景气度：高成长）"));
        assert!(prompt.contains("周期组合：红利交叠期"));
        assert!(prompt.contains("5. 5年后的预期状态"));
    }

    #[tokio::test]
    async fn test_forecast_needs_target() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_table(&dir);
        let request = |target: &str| {
            Json(ForecastRequest {
                current_industry: "水泥".to_string(),
                target_industry: target.to_string(),
                years: 3,
                analyze: false,
            })
        };

        let result = handle_forecast(State(state.clone()), request(" ")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let Json(resp) = handle_forecast(State(state), request("元宇宙"))
            .await
            .unwrap();
        assert_eq!(resp.message.as_deref(), Some("未找到'元宇宙'的行业数据"));
    }

    #[tokio::test]
    async fn test_compare_reports_crossover() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_table(&dir);

        let Json(resp) = handle_compare(State(state), compare_request("水泥", "储能", 3))
            .await
            .unwrap();
        let simulation = resp.simulation.unwrap();
        assert_eq!(simulation.crossover_years, vec![current_year() + 2]);
        assert_eq!(simulation.stay.industry, "水泥");
        assert_eq!(simulation.transition.industry, "储能");
    }

    #[tokio::test]
    async fn test_compare_needs_two_known_industries() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_table(&dir);

        let request = compare_request("水泥", "", 3);
        let result = handle_compare(State(state.clone()), request).await;
        match result {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "请输入两个行业名称"),
            other => panic!("expected validation error, got {other:?}"),
        }

        let Json(resp) = handle_compare(State(state), compare_request("水泥", "元宇宙", 3))
            .await
            .unwrap();
        assert!(resp.simulation.is_none());
        assert_eq!(
            resp.message.as_deref(),
            Some("需要两个行业的数据才能进行对比")
        );
    }

    #[tokio::test]
    async fn test_simulation_halts_on_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::for_table(&dir.path().join("missing.csv"));

        let request = compare_request("水泥", "储能", 3);
        let result = handle_compare(State(state), request).await;
        assert!(matches!(result, Err(AppError::DataSource(_))));
    }
}
