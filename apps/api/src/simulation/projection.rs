//! Career path projections over the reference table: what a past entry into
//! an industry would look like today, what a move now would look like ahead,
//! and staying versus moving side by side.
//!
//! Scores are a unitless career value index starting around 50. They follow
//! fixed per-stage curves and carry no market data.

use serde::Serialize;

use crate::industry::combination::CombinationRule;
use crate::industry::matcher::match_industry;
use crate::industry::models::{IndustryRecord, IndustryTable, LifecycleStage, MatchResult};

/// Longest horizon, in years, any projection accepts.
pub const MAX_YEARS: u32 = 10;

const BASE_SCORE: i32 = 50;
const SCORE_CEILING: i32 = 100;
const MATURE_CEILING: i32 = 80;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub year: i32,
    pub score: i32,
    pub label: String,
}

fn top_match(table: &IndustryTable, industry: &str) -> Option<MatchResult> {
    match_industry(table, industry, 1).into_iter().next()
}

// ────────────────────────────────────────────────────────────────────────────
// Backcast
// ────────────────────────────────────────────────────────────────────────────

/// Hypothetical career had the user entered `industry` some years ago.
#[derive(Debug, Clone, Serialize)]
pub struct Backcast {
    pub industry: String,
    pub matched: IndustryRecord,
    pub combination: CombinationRule,
    pub years_ago: u32,
    pub start_year: i32,
    pub career_value: &'static str,
    pub salary_growth: String,
    pub promotion: String,
    /// Empty when the stage has no defined curve.
    pub milestones: Vec<Milestone>,
}

fn backcast_score(stage: Option<LifecycleStage>, i: i32) -> Option<i32> {
    match stage? {
        LifecycleStage::Growth => Some((BASE_SCORE + 15 * i + 2 * i * i).min(SCORE_CEILING)),
        LifecycleStage::Nascent if i < 2 => Some(BASE_SCORE + 5 * i),
        LifecycleStage::Nascent => Some((BASE_SCORE + 10 + (i - 2) * 20).min(SCORE_CEILING)),
        LifecycleStage::Mature | LifecycleStage::Adjustment => {
            Some((BASE_SCORE + 5 * i).min(MATURE_CEILING))
        }
        LifecycleStage::Decline => None,
    }
}

/// `None` when `industry` matches nothing in the table.
pub fn backcast(
    table: &IndustryTable,
    industry: &str,
    years_ago: u32,
    current_year: i32,
) -> Option<Backcast> {
    let top = top_match(table, industry)?;
    let stage = top.record.stage();
    let years = years_ago as i32;
    let start_year = current_year - years;

    let (career_value, salary_growth, promotion) = match stage {
        Some(LifecycleStage::Growth) => (
            "💰 高增值",
            format!("+{}% ~ +{}%", years * 20, years * 35),
            format!("晋升 {} 级", years / 2),
        ),
        Some(LifecycleStage::Nascent) => (
            "🎲 高风险高回报",
            format!("+{}% ~ +{}%（波动大）", years * 15, years * 50),
            "可能快速晋升或原地踏步".to_string(),
        ),
        Some(LifecycleStage::Mature | LifecycleStage::Adjustment) => (
            "📊 稳定/下滑",
            format!("+{}% ~ +{}%", years * 5, years * 10),
            "晋升缓慢".to_string(),
        ),
        _ => ("⚠️ 风险", "不稳定".to_string(), "可能降级/失业".to_string()),
    };

    // Only the growth curve marks its endpoints.
    let milestones = (0..=years)
        .map_while(|i| {
            let score = backcast_score(stage, i)?;
            let label = match (stage, i) {
                (Some(LifecycleStage::Growth), 0) => "入职".to_string(),
                (Some(LifecycleStage::Growth), i) if i == years => "当前".to_string(),
                _ => format!("第{i}年"),
            };
            Some(Milestone {
                year: start_year + i,
                score,
                label,
            })
        })
        .collect();

    Some(Backcast {
        industry: industry.to_string(),
        combination: top.combination,
        matched: top.record,
        years_ago,
        start_year,
        career_value,
        salary_growth,
        promotion,
        milestones,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Forecast
// ────────────────────────────────────────────────────────────────────────────

/// Risk, return and entry difficulty of moving into an industry at a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outlook {
    pub risk_level: &'static str,
    pub return_potential: &'static str,
    pub entry_difficulty: &'static str,
}

pub fn outlook(stage: Option<LifecycleStage>) -> Outlook {
    let (risk_level, return_potential, entry_difficulty) = match stage {
        Some(LifecycleStage::Growth) => ("中等", "高", "中等（人才需求大）"),
        Some(LifecycleStage::Nascent) => ("高", "不确定", "较低（早期机会多）"),
        Some(LifecycleStage::Mature) => ("低", "稳定", "高（格局已定）"),
        _ => ("高", "低/负", "不建议进入"),
    };
    Outlook {
        risk_level,
        return_potential,
        entry_difficulty,
    }
}

/// Hypothetical career after moving from the current industry to a target now.
#[derive(Debug, Clone, Serialize)]
pub struct Forecast {
    pub current_industry: String,
    /// The current industry's top match, if it has one.
    pub current: Option<IndustryRecord>,
    pub target_industry: String,
    pub target: IndustryRecord,
    pub combination: CombinationRule,
    pub outlook: Outlook,
    pub milestones: Vec<Milestone>,
}

fn forecast_milestone(i: i32, years: i32, target_growing: bool) -> (i32, String) {
    match i {
        0 => (40, "转型起点".to_string()),
        1 => (50, "适应期".to_string()),
        i if i == years => (if target_growing { 70 } else { 55 }, format!("{years}年后")),
        i => (BASE_SCORE + 10 * i, format!("第{i}年")),
    }
}

/// `None` when the target industry matches nothing in the table.
pub fn forecast(
    table: &IndustryTable,
    current_industry: &str,
    target_industry: &str,
    years: u32,
    current_year: i32,
) -> Option<Forecast> {
    let target = top_match(table, target_industry)?;
    let current = top_match(table, current_industry).map(|m| m.record);
    let stage = target.record.stage();
    let growing = stage == Some(LifecycleStage::Growth);
    let years = years as i32;

    let milestones = (0..=years)
        .map(|i| {
            let (score, label) = forecast_milestone(i, years, growing);
            Milestone {
                year: current_year + i,
                score: score.min(SCORE_CEILING),
                label,
            }
        })
        .collect();

    Some(Forecast {
        current_industry: current_industry.to_string(),
        current,
        target_industry: target_industry.to_string(),
        combination: target.combination,
        outlook: outlook(stage),
        target: target.record,
        milestones,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Dual-track comparison
// ────────────────────────────────────────────────────────────────────────────

/// One option of a comparison, scored once per year of the horizon.
#[derive(Debug, Clone, Serialize)]
pub struct Track {
    pub industry: String,
    pub matched: IndustryRecord,
    pub combination: CombinationRule,
    pub risk_level: &'static str,
    pub rating: &'static str,
    pub trajectory: Vec<i32>,
    pub final_value: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DualTrack {
    pub years: Vec<i32>,
    pub stay: Track,
    pub transition: Track,
    /// Years in which moving first overtakes staying.
    pub crossover_years: Vec<i32>,
}

fn stay_trajectory(stage: Option<LifecycleStage>, years: i32) -> Vec<i32> {
    let step = match stage {
        Some(LifecycleStage::Growth | LifecycleStage::Nascent) => 12,
        Some(LifecycleStage::Mature) => 5,
        _ => -5,
    };
    (0..=years).map(|i| BASE_SCORE + step * i).collect()
}

fn transition_trajectory(stage: Option<LifecycleStage>, years: i32) -> Vec<i32> {
    // Year 0 is the switch itself; year one dips while adapting.
    std::iter::once(BASE_SCORE)
        .chain((1..=years).map(|i| match stage {
            Some(LifecycleStage::Growth) if i == 1 => 45,
            Some(LifecycleStage::Growth) => 45 + (i - 1) * 15,
            Some(LifecycleStage::Nascent) => 40 + i * 10,
            _ => 45 + i * 5,
        }))
        .collect()
}

/// Moving is ahead in year `i` but was not in the year before.
fn overtakes(stay: &[i32], moved: &[i32], i: usize) -> bool {
    moved[i] > stay[i] && moved[i - 1] <= stay[i - 1]
}

fn track(top: MatchResult, industry: &str, trajectory: Vec<i32>, staying: bool) -> Track {
    let stage = top.record.stage();
    let (risk_level, rating) = if staying {
        match stage {
            Some(LifecycleStage::Mature) => ("低", "⭐⭐"),
            Some(LifecycleStage::Growth) => ("中", "⭐⭐⭐"),
            _ => ("高", "⭐"),
        }
    } else {
        match stage {
            Some(LifecycleStage::Growth) => ("高（短期）→ 低（长期）", "⭐⭐⭐⭐⭐"),
            Some(LifecycleStage::Nascent) => ("高", "⭐⭐⭐"),
            _ => ("高", "⭐⭐"),
        }
    };

    Track {
        industry: industry.to_string(),
        combination: top.combination,
        matched: top.record,
        risk_level,
        rating,
        final_value: trajectory.last().copied().unwrap_or(BASE_SCORE),
        trajectory,
    }
}

/// `None` unless both industries match something in the table.
pub fn compare(
    table: &IndustryTable,
    stay_industry: &str,
    move_industry: &str,
    years: u32,
    current_year: i32,
) -> Option<DualTrack> {
    let stay = top_match(table, stay_industry)?;
    let moved = top_match(table, move_industry)?;
    let horizon = years as i32;

    let stay_points = stay_trajectory(stay.record.stage(), horizon);
    let move_points = transition_trajectory(moved.record.stage(), horizon);
    let year_axis: Vec<i32> = (0..=horizon).map(|i| current_year + i).collect();

    let crossover_years = (1..year_axis.len())
        .filter(|&i| overtakes(&stay_points, &move_points, i))
        .map(|i| year_axis[i])
        .collect();

    Some(DualTrack {
        years: year_axis,
        stay: track(stay, stay_industry, stay_points, true),
        transition: track(moved, move_industry, move_points, false),
        crossover_years,
    })
}
