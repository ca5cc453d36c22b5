//! Combination classifier: maps (industry stage, policy stage) to one of the
//! four named dividend combinations. Total: unknown input yields `UNKNOWN`.

use serde::Serialize;

use crate::industry::models::{LifecycleStage, PolicyStage};

/// Serialized as a stable machine-facing tag, e.g. `"best timing"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CombinationRisk {
    #[serde(rename = "high risk")]
    HighRisk,
    #[serde(rename = "best timing")]
    BestTiming,
    #[serde(rename = "caution")]
    Caution,
    #[serde(rename = "high danger")]
    HighDanger,
    #[serde(rename = "unrecognized")]
    Unrecognized,
}

impl CombinationRisk {
    pub fn label(&self) -> &'static str {
        match self {
            Self::HighRisk => "🔴 高风险",
            Self::BestTiming => "🟢 最佳时机",
            Self::Caution => "🟡 谨慎",
            Self::HighDanger => "🔴 高危",
            Self::Unrecognized => "⚪ 未知",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CombinationRule {
    pub name: &'static str,
    pub risk: CombinationRisk,
    pub characteristics: &'static str,
    pub audience: &'static str,
    pub strategy: &'static str,
}

impl CombinationRule {
    pub fn is_unknown(&self) -> bool {
        self.risk == CombinationRisk::Unrecognized
    }
}

const HIGH_RISK_BET: CombinationRule = CombinationRule {
    name: "高风险押宝期",
    risk: CombinationRisk::HighRisk,
    characteristics: "技术未验证 + 政策刚出台",
    audience: "风险偏好高、抗压能力强的早期探索者",
    strategy: "小步试错，关注技术突破信号",
};

const DIVIDEND_OVERLAP: CombinationRule = CombinationRule {
    name: "红利交叠期",
    risk: CombinationRisk::BestTiming,
    characteristics: "渗透率快速提升 + 政策资金涌入",
    audience: "绝大多数求职者，尤其是转型者",
    strategy: "果断入场，积累核心技能，选择高成长企业",
};

const DIVIDEND_TAPER: CombinationRule = CombinationRule {
    name: "红利退坡期",
    risk: CombinationRisk::Caution,
    characteristics: "增速放缓 + 政策收紧",
    audience: "追求稳定的资深从业者",
    strategy: "防御性规划，储备转型能力，关注细分机会",
};

const DIVIDEND_GONE_ADJUSTMENT: CombinationRule = CombinationRule {
    name: "红利消失期",
    risk: CombinationRisk::HighDanger,
    characteristics: "产能过剩 + 明确限制",
    audience: "不建议进入",
    strategy: "尽早离场，利用可迁移技能转型",
};

const DIVIDEND_GONE_DECLINE: CombinationRule = CombinationRule {
    name: "红利消失期",
    risk: CombinationRisk::HighDanger,
    characteristics: "需求萎缩 + 政策出清",
    audience: "不建议进入",
    strategy: "立即启动转型计划",
};

pub const UNKNOWN: CombinationRule = CombinationRule {
    name: "未知组合",
    risk: CombinationRisk::Unrecognized,
    characteristics: "无法判断",
    audience: "未知",
    strategy: "建议进一步调研",
};

/// The five defined (industry stage, policy stage) pairs.
const RULES: [(LifecycleStage, PolicyStage, &CombinationRule); 5] = [
    (
        LifecycleStage::Nascent,
        PolicyStage::PlanningGuidance,
        &HIGH_RISK_BET,
    ),
    (
        LifecycleStage::Growth,
        PolicyStage::ResourceFocus,
        &DIVIDEND_OVERLAP,
    ),
    (
        LifecycleStage::Mature,
        PolicyStage::AdjustmentExit,
        &DIVIDEND_TAPER,
    ),
    (
        LifecycleStage::Adjustment,
        PolicyStage::Suppression,
        &DIVIDEND_GONE_ADJUSTMENT,
    ),
    (
        LifecycleStage::Decline,
        PolicyStage::Suppression,
        &DIVIDEND_GONE_DECLINE,
    ),
];

/// Same-stage default used when the policy stage is absent or the pair is undefined.
fn stage_default(stage: LifecycleStage) -> CombinationRule {
    match stage {
        LifecycleStage::Nascent => HIGH_RISK_BET,
        LifecycleStage::Growth => DIVIDEND_OVERLAP,
        LifecycleStage::Mature => DIVIDEND_TAPER,
        LifecycleStage::Adjustment => DIVIDEND_GONE_ADJUSTMENT,
        LifecycleStage::Decline => DIVIDEND_GONE_DECLINE,
    }
}

/// The defined (industry stage, policy stage, rule) triples, as labels.
pub fn defined_pairs() -> impl Iterator<Item = (&'static str, &'static str, CombinationRule)> {
    RULES
        .iter()
        .map(|(stage, policy, rule)| (stage.as_str(), policy.as_str(), **rule))
}

pub fn classify(industry_stage: &str, policy_stage: Option<&str>) -> CombinationRule {
    let Some(stage) = LifecycleStage::parse(industry_stage) else {
        return UNKNOWN;
    };

    if let Some(policy) = policy_stage.and_then(PolicyStage::parse) {
        if let Some((_, _, rule)) = RULES.iter().find(|(s, p, _)| *s == stage && *p == policy) {
            return **rule;
        }
    }

    stage_default(stage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_without_policy_is_dividend_overlap() {
        let rule = classify("成长期", None);
        assert_eq!(rule.name, "红利交叠期");
        assert_eq!(rule.risk, CombinationRisk::BestTiming);
    }

    #[test]
    fn test_stage_defaults_for_all_canonical_stages() {
        let expected = [
            ("初创期", "高风险押宝期", CombinationRisk::HighRisk),
            ("成长期", "红利交叠期", CombinationRisk::BestTiming),
            ("成熟期", "红利退坡期", CombinationRisk::Caution),
            ("调整期", "红利消失期", CombinationRisk::HighDanger),
            ("衰退期", "红利消失期", CombinationRisk::HighDanger),
        ];
        for (stage, name, risk) in expected {
            let rule = classify(stage, None);
            assert_eq!(rule.name, name, "stage {stage}");
            assert_eq!(rule.risk, risk, "stage {stage}");
        }
    }

    #[test]
    fn test_defined_pair_is_returned_exactly() {
        let rule = classify("衰退期", Some("政策压降期"));
        assert_eq!(rule, DIVIDEND_GONE_DECLINE);
        assert_eq!(rule.strategy, "立即启动转型计划");
    }

    #[test]
    fn test_undefined_pair_falls_back_to_stage_default() {
        let rule = classify("成长期", Some("政策压降期"));
        assert_eq!(rule, DIVIDEND_OVERLAP);

        let rule = classify("成熟期", Some("不存在的政策期"));
        assert_eq!(rule, DIVIDEND_TAPER);
    }

    #[test]
    fn test_unrecognized_stage_returns_unknown_sentinel() {
        let rule = classify("复苏期", None);
        assert!(rule.is_unknown());
        assert_eq!(
            serde_json::to_value(rule.risk).unwrap(),
            serde_json::json!("unrecognized")
        );
        assert_eq!(rule.strategy, "建议进一步调研");

        assert!(classify("", Some("资源聚焦期")).is_unknown());
    }

    #[test]
    fn test_defined_pairs_round_trip_through_classify() {
        let pairs: Vec<_> = defined_pairs().collect();
        assert_eq!(pairs.len(), 5);
        for (stage, policy, rule) in pairs {
            assert_eq!(classify(stage, Some(policy)), rule);
        }
    }

    #[test]
    fn test_risk_serializes_as_tag() {
        let json = serde_json::to_value(classify("成长期", None)).unwrap();
        assert_eq!(json["risk"], "best timing");
        assert_eq!(json["name"], "红利交叠期");
    }
}
