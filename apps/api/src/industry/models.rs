use serde::{Deserialize, Serialize};

use crate::industry::combination::CombinationRule;

/// Placeholder written into any cell left empty after normalization.
pub const NO_COMMENT_PLACEHOLDER: &str = "暂无评价";

/// One row of the industry reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryRecord {
    pub sequence_id: String,
    pub name: String,
    pub lifecycle_stage: String,
    pub sentiment_label: String,
    pub commentary: String,
}

impl IndustryRecord {
    pub fn stage(&self) -> Option<LifecycleStage> {
        LifecycleStage::parse(&self.lifecycle_stage)
    }

    /// Nascent or growth stage, the only stages recommended as transition targets.
    pub fn is_emerging(&self) -> bool {
        matches!(
            self.stage(),
            Some(LifecycleStage::Nascent | LifecycleStage::Growth)
        )
    }

    /// Sentiment flagged as high-growth. `高成长` is covered by the broader `高`.
    pub fn has_high_sentiment(&self) -> bool {
        self.sentiment_label.contains("高")
    }
}

/// The loaded, immutable reference table. Row order is source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndustryTable {
    records: Vec<IndustryRecord>,
}

impl IndustryTable {
    pub fn new(records: Vec<IndustryRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[IndustryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The five canonical industry lifecycle stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStage {
    Nascent,
    Growth,
    Mature,
    Adjustment,
    Decline,
}

impl LifecycleStage {
    pub const ALL: [LifecycleStage; 5] = [
        LifecycleStage::Nascent,
        LifecycleStage::Growth,
        LifecycleStage::Mature,
        LifecycleStage::Adjustment,
        LifecycleStage::Decline,
    ];

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "初创期" => Some(Self::Nascent),
            "成长期" => Some(Self::Growth),
            "成熟期" => Some(Self::Mature),
            "调整期" => Some(Self::Adjustment),
            "衰退期" => Some(Self::Decline),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nascent => "初创期",
            Self::Growth => "成长期",
            Self::Mature => "成熟期",
            Self::Adjustment => "调整期",
            Self::Decline => "衰退期",
        }
    }
}

/// The four policy-cycle stages paired with lifecycle stages in combination rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStage {
    PlanningGuidance,
    ResourceFocus,
    AdjustmentExit,
    Suppression,
}

impl PolicyStage {
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "规划引导期" => Some(Self::PlanningGuidance),
            "资源聚焦期" => Some(Self::ResourceFocus),
            "调整退出期" => Some(Self::AdjustmentExit),
            "政策压降期" => Some(Self::Suppression),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlanningGuidance => "规划引导期",
            Self::ResourceFocus => "资源聚焦期",
            Self::AdjustmentExit => "调整退出期",
            Self::Suppression => "政策压降期",
        }
    }
}

/// Which matcher tier produced a result. Ordering follows tier priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchTier {
    Exact,
    Substring,
    FuzzyToken,
}

impl MatchTier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Exact => "精确匹配",
            Self::Substring => "包含匹配",
            Self::FuzzyToken => "相关匹配",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub record: IndustryRecord,
    pub tier: MatchTier,
    pub combination: CombinationRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "🔴 高风险",
            Self::Medium => "🟡 中等风险",
            Self::Low => "🟢 低风险",
        }
    }
}

/// Lightweight projection of an `IndustryRecord` offered as a move target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionTarget {
    pub name: String,
    pub lifecycle_stage: String,
    pub sentiment_label: String,
    pub reason: String,
}

impl From<&IndustryRecord> for TransitionTarget {
    fn from(record: &IndustryRecord) -> Self {
        Self {
            name: record.name.clone(),
            lifecycle_stage: record.lifecycle_stage.clone(),
            sentiment_label: record.sentiment_label.clone(),
            reason: record.commentary.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskWarning {
    pub industry: String,
    pub risk_level: RiskLevel,
    pub category: String,
    pub lifecycle_stage: String,
    pub sentiment_label: String,
    pub action: String,
    pub recommendations: Vec<TransitionTarget>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub from: String,
    pub to: String,
    pub matched_name: String,
    pub reason: String,
    pub cycle_stage: String,
    pub sentiment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(stage: &str, sentiment: &str) -> IndustryRecord {
        IndustryRecord {
            sequence_id: "1".to_string(),
            name: "储能".to_string(),
            lifecycle_stage: stage.to_string(),
            sentiment_label: sentiment.to_string(),
            commentary: NO_COMMENT_PLACEHOLDER.to_string(),
        }
    }

    #[test]
    fn test_lifecycle_stage_round_trips_canonical_labels() {
        for stage in LifecycleStage::ALL {
            assert_eq!(LifecycleStage::parse(stage.as_str()), Some(stage));
        }
        assert_eq!(LifecycleStage::parse("复苏期"), None);
    }

    #[test]
    fn test_emerging_covers_nascent_and_growth_only() {
        assert!(record("成长期", "高成长").is_emerging());
        assert!(record("初创期", "高成长").is_emerging());
        assert!(!record("成熟期", "平稳").is_emerging());
        assert!(!record("未知", "平稳").is_emerging());
    }

    #[test]
    fn test_high_sentiment_is_substring_check() {
        assert!(record("成长期", "高成长").has_high_sentiment());
        assert!(record("成长期", "较高").has_high_sentiment());
        assert!(!record("成熟期", "平稳").has_high_sentiment());
    }

    #[test]
    fn test_match_tier_orders_by_priority() {
        assert!(MatchTier::Exact < MatchTier::Substring);
        assert!(MatchTier::Substring < MatchTier::FuzzyToken);
    }

    #[test]
    fn test_match_tier_serializes_kebab_case() {
        let json = serde_json::to_string(&MatchTier::FuzzyToken).unwrap();
        assert_eq!(json, r#""fuzzy-token""#);
    }
}
