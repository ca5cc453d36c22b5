//! Risk assessment and transition recommendations.
//!
//! Risk decision table, applied to the top match only:
//! - High:   stage is 调整期 / 衰退期, or sentiment contains 承压
//! - Medium: stage is 成熟期 and sentiment contains 平稳
//! - Low:    anything else (no warning is produced)

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::industry::matcher::match_industry;
use crate::industry::models::{
    IndustryRecord, IndustryTable, LifecycleStage, Recommendation, RiskLevel, RiskWarning,
    TransitionTarget,
};

pub const MAX_RECOMMENDATIONS: usize = 5;

pub fn risk_level(record: &IndustryRecord) -> RiskLevel {
    let stage = record.stage();
    if matches!(
        stage,
        Some(LifecycleStage::Adjustment | LifecycleStage::Decline)
    ) || record.sentiment_label.contains("承压")
    {
        RiskLevel::High
    } else if stage == Some(LifecycleStage::Mature) && record.sentiment_label.contains("平稳") {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Returns a warning for high- and medium-risk industries; `None` when the
/// industry is unknown or low-risk.
pub fn assess_risk(table: &IndustryTable, industry_name: &str) -> Option<RiskWarning> {
    let top = match_industry(table, industry_name, 1).into_iter().next()?;
    let record = top.record;

    let level = risk_level(&record);
    let (category, action) = match level {
        RiskLevel::High => (
            "行业处于下行周期",
            "建议尽早规划转型，利用现有技能向成长期行业迁移",
        ),
        RiskLevel::Medium => ("行业增长放缓", "建议做好防御性规划，储备转型能力"),
        RiskLevel::Low => return None,
    };

    Some(RiskWarning {
        industry: industry_name.to_string(),
        risk_level: level,
        category: category.to_string(),
        lifecycle_stage: record.lifecycle_stage.clone(),
        sentiment_label: record.sentiment_label.clone(),
        action: action.to_string(),
        recommendations: growth_targets(table, MAX_RECOMMENDATIONS),
    })
}

/// Emerging, high-sentiment records in table order, unique by name.
pub fn growth_targets(table: &IndustryTable, limit: usize) -> Vec<TransitionTarget> {
    let mut seen = HashSet::new();
    table
        .records()
        .iter()
        .filter(|r| r.is_emerging() && r.has_high_sentiment())
        .filter(|r| seen.insert(r.name.as_str()))
        .take(limit)
        .map(TransitionTarget::from)
        .collect()
}

/// Source keyword → candidate target industries. Order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "serde_json::Map<String, serde_json::Value>")]
pub struct TransitionMap {
    entries: Vec<(String, Vec<String>)>,
}

impl TransitionMap {
    pub fn new(entries: Vec<(String, Vec<String>)>) -> Self {
        Self { entries }
    }

    /// Reads a JSON object of `{"source keyword": ["target", ...]}`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transition map {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid transition map JSON in {}", path.display()))
    }

    pub fn entries(&self) -> &[(String, Vec<String>)] {
        &self.entries
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for TransitionMap {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        let entries = map
            .into_iter()
            .map(|(key, targets)| {
                let targets = targets
                    .as_array()
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|t| t.as_str().map(str::to_string))
                            .collect()
                    })
                    .unwrap_or_default();
                (key, targets)
            })
            .collect();
        Self { entries }
    }
}

impl Default for TransitionMap {
    fn default() -> Self {
        const DEFAULT: &[(&str, &[&str])] = &[
            (
                "房地产",
                &["智慧城市", "养老产业", "物业管理", "房地产科技"],
            ),
            ("建筑", &["光伏基建", "储能", "虚拟电厂", "智能建造"]),
            (
                "传统制造",
                &["智能制造", "工业机器人", "新能源装备", "半导体设备"],
            ),
            ("教培", &["职业教育", "企业培训", "知识付费", "教育科技"]),
            ("互联网", &["人工智能", "SaaS", "产业互联网", "云计算"]),
            (
                "金融",
                &["金融科技", "绿色金融", "数字人民币", "区块链金融"],
            ),
            ("传媒", &["短视频", "直播电商", "AIGC内容", "数字营销"]),
            ("能源", &["新能源", "储能", "氢能", "碳中和"]),
            ("零售", &["电商", "直播带货", "跨境电商", "新零售"]),
            ("医疗", &["生物医药", "医疗器械", "数字医疗", "AI医疗"]),
        ];
        Self::new(
            DEFAULT
                .iter()
                .map(|(key, targets)| {
                    (
                        key.to_string(),
                        targets.iter().map(|t| t.to_string()).collect(),
                    )
                })
                .collect(),
        )
    }
}

/// Up to five transition targets for the given current industries.
///
/// Mapped candidates survive only if their top match is in 初创期 or 成长期.
/// With no survivors, falls back to the global growth targets.
pub fn recommend_transitions(
    table: &IndustryTable,
    map: &TransitionMap,
    current_industries: &[String],
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    for industry in current_industries {
        for (key, targets) in map.entries() {
            if !industry.contains(key.as_str()) {
                continue;
            }
            for target in targets {
                let Some(top) = match_industry(table, target, 1).into_iter().next() else {
                    continue;
                };
                if !top.record.is_emerging() {
                    continue;
                }
                recommendations.push(Recommendation {
                    from: industry.clone(),
                    to: target.clone(),
                    matched_name: top.record.name.clone(),
                    reason: format!("{key}行业经验可迁移至{target}"),
                    cycle_stage: top.record.lifecycle_stage.clone(),
                    sentiment: top.record.sentiment_label.clone(),
                });
            }
        }
    }

    if recommendations.is_empty() {
        let from = current_industries
            .first()
            .cloned()
            .unwrap_or_else(|| "当前行业".to_string());
        recommendations = growth_targets(table, MAX_RECOMMENDATIONS)
            .into_iter()
            .map(|target| Recommendation {
                from: from.clone(),
                to: target.name.clone(),
                matched_name: target.name,
                reason: "当前处于成长期，人才需求旺盛".to_string(),
                cycle_stage: target.lifecycle_stage,
                sentiment: target.sentiment_label,
            })
            .collect();
    }

    let mut seen = HashSet::new();
    recommendations.retain(|r| seen.insert(r.to.clone()));
    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, stage: &str, sentiment: &str) -> IndustryRecord {
        IndustryRecord {
            sequence_id: name.to_string(),
            name: name.to_string(),
            lifecycle_stage: stage.to_string(),
            sentiment_label: sentiment.to_string(),
            commentary: format!("{name}评价"),
        }
    }

    fn sample() -> IndustryTable {
        IndustryTable::new(vec![
            record("房地产", "调整期", "承压"),
            record("储能", "成长期", "高成长"),
            record("传统零售", "成熟期", "平稳"),
            record("智慧城市", "成长期", "高成长"),
            record("物业管理", "成熟期", "平稳"),
            record("养老产业", "初创期", "较高"),
            record("水泥", "衰退期", "低迷"),
            record("光伏", "成熟期", "承压"),
            record("云计算", "成长期", "平稳"),
        ])
    }

    #[test]
    fn test_adjustment_stage_is_high_risk_with_recommendations() {
        let warning = assess_risk(&sample(), "房地产").unwrap();
        assert_eq!(warning.risk_level, RiskLevel::High);
        assert_eq!(warning.category, "行业处于下行周期");
        let names: Vec<&str> = warning
            .recommendations
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["储能", "智慧城市", "养老产业"]);
    }

    #[test]
    fn test_decline_stage_is_high_risk_with_bounded_unique_recommendations() {
        let mut records = sample().records().to_vec();
        for i in 0..8 {
            records.push(record(&format!("新兴{i}"), "初创期", "高成长"));
        }
        records.push(record("储能", "成长期", "高成长"));
        let table = IndustryTable::new(records);

        let warning = assess_risk(&table, "水泥").unwrap();
        assert_eq!(warning.risk_level, RiskLevel::High);
        assert_eq!(warning.recommendations.len(), 5);
        let unique: HashSet<_> = warning.recommendations.iter().map(|t| &t.name).collect();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn test_under_pressure_sentiment_is_high_risk_even_when_mature() {
        let warning = assess_risk(&sample(), "光伏").unwrap();
        assert_eq!(warning.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_mature_and_stable_is_medium_risk() {
        let warning = assess_risk(&sample(), "传统零售").unwrap();
        assert_eq!(warning.risk_level, RiskLevel::Medium);
        assert_eq!(warning.category, "行业增长放缓");
        assert!(!warning.recommendations.is_empty());
    }

    #[test]
    fn test_growth_industry_has_no_warning() {
        assert!(assess_risk(&sample(), "储能").is_none());
        assert!(assess_risk(&sample(), "云计算").is_none());
    }

    #[test]
    fn test_unknown_industry_has_no_warning() {
        assert!(assess_risk(&sample(), "未知行业XYZ123").is_none());
    }

    #[test]
    fn test_mapped_targets_filtered_to_emerging_stages() {
        let recs = recommend_transitions(
            &sample(),
            &TransitionMap::default(),
            &["房地产".to_string()],
        );
        let to: Vec<&str> = recs.iter().map(|r| r.to.as_str()).collect();
        // 物业管理 is mature and 房地产科技 is absent from the table
        assert_eq!(to, vec!["智慧城市", "养老产业"]);
        assert_eq!(recs[0].from, "房地产");
        assert_eq!(recs[0].reason, "房地产行业经验可迁移至智慧城市");
    }

    #[test]
    fn test_recommendations_are_deduplicated_across_inputs() {
        let recs = recommend_transitions(
            &sample(),
            &TransitionMap::default(),
            &["建筑".to_string(), "能源".to_string()],
        );
        let to: Vec<&str> = recs.iter().map(|r| r.to.as_str()).collect();
        assert_eq!(to, vec!["储能"]);
    }

    #[test]
    fn test_falls_back_to_global_growth_targets() {
        let recs =
            recommend_transitions(&sample(), &TransitionMap::default(), &["航海".to_string()]);
        let to: Vec<&str> = recs.iter().map(|r| r.to.as_str()).collect();
        assert_eq!(to, vec!["储能", "智慧城市", "养老产业"]);
        assert!(recs.iter().all(|r| r.from == "航海"));
    }

    #[test]
    fn test_fallback_without_inputs_uses_generic_source() {
        let recs = recommend_transitions(&sample(), &TransitionMap::default(), &[]);
        assert_eq!(recs[0].from, "当前行业");
    }

    #[test]
    fn test_recommendations_capped_at_five() {
        let mut records = Vec::new();
        let targets: Vec<String> = (0..8).map(|i| format!("目标{i}")).collect();
        for t in &targets {
            records.push(record(t, "成长期", "高成长"));
        }
        let table = IndustryTable::new(records);
        let map = TransitionMap::new(vec![("钢铁".to_string(), targets)]);

        let recs = recommend_transitions(&table, &map, &["钢铁".to_string()]);
        assert_eq!(recs.len(), MAX_RECOMMENDATIONS);
    }

    #[test]
    fn test_transition_map_json_preserves_order() {
        let map: TransitionMap =
            serde_json::from_str(r#"{"钢铁": ["新材料", "氢冶金"], "煤炭": ["储能"]}"#).unwrap();
        assert_eq!(map.entries()[0].0, "钢铁");
        assert_eq!(map.entries()[0].1, vec!["新材料", "氢冶金"]);
        assert_eq!(map.entries()[1].0, "煤炭");
    }
}
