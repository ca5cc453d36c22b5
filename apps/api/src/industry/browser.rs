//! Industry browser: distributions, filters and scored lists over the table.

use std::collections::HashMap;

use serde::Serialize;

use crate::industry::models::{IndustryRecord, IndustryTable, LifecycleStage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

/// Counts per distinct value, by count descending; ties keep first appearance.
fn distribution<'a>(values: impl Iterator<Item = &'a str>) -> Vec<Bucket> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<Bucket> = Vec::new();
    for value in values {
        match index.get(value) {
            Some(&i) => buckets[i].count += 1,
            None => {
                index.insert(value, buckets.len());
                buckets.push(Bucket {
                    label: value.to_string(),
                    count: 1,
                });
            }
        }
    }
    // stable sort keeps first-appearance order among equal counts
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets
}

pub fn cycle_distribution(table: &IndustryTable) -> Vec<Bucket> {
    distribution(table.records().iter().map(|r| r.lifecycle_stage.as_str()))
}

pub fn sentiment_distribution(table: &IndustryTable) -> Vec<Bucket> {
    distribution(table.records().iter().map(|r| r.sentiment_label.as_str()))
}

#[derive(Debug, Clone, Default)]
pub struct IndustryFilter {
    pub stages: Vec<String>,
    pub sentiments: Vec<String>,
    pub query: Option<String>,
}

pub fn filter_industries<'a>(
    table: &'a IndustryTable,
    filter: &IndustryFilter,
) -> Vec<&'a IndustryRecord> {
    let query = filter
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    table
        .records()
        .iter()
        .filter(|r| filter.stages.is_empty() || filter.stages.contains(&r.lifecycle_stage))
        .filter(|r| filter.sentiments.is_empty() || filter.sentiments.contains(&r.sentiment_label))
        .filter(|r| match &query {
            Some(q) => r.name.to_lowercase().contains(q) || r.commentary.to_lowercase().contains(q),
            None => true,
        })
        .collect()
}

pub fn growth_industries(table: &IndustryTable) -> Vec<&IndustryRecord> {
    table
        .records()
        .iter()
        .filter(|r| r.is_emerging() && r.has_high_sentiment())
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskIndustry {
    pub record: IndustryRecord,
    pub risk_label: &'static str,
}

pub fn risk_industries(table: &IndustryTable) -> Vec<RiskIndustry> {
    table
        .records()
        .iter()
        .filter(|r| {
            matches!(
                r.stage(),
                Some(LifecycleStage::Adjustment | LifecycleStage::Decline)
            ) || r.sentiment_label.contains("承压")
                || r.sentiment_label.contains("低")
        })
        .map(|r| RiskIndustry {
            record: r.clone(),
            risk_label: if r.stage() == Some(LifecycleStage::Decline) {
                "🔴 高风险"
            } else {
                "🟡 中高风险"
            },
        })
        .collect()
}

/// 0–100 position of a lifecycle stage on the industry-cycle axis.
pub fn industry_cycle_score(stage: &str) -> u8 {
    match LifecycleStage::parse(stage) {
        Some(LifecycleStage::Nascent) => 25,
        Some(LifecycleStage::Growth) => 75,
        Some(LifecycleStage::Mature) => 50,
        Some(LifecycleStage::Adjustment) => 25,
        Some(LifecycleStage::Decline) => 10,
        None => 50,
    }
}

/// 0–100 position of a sentiment label on the policy-cycle axis.
pub fn policy_cycle_score(sentiment: &str) -> u8 {
    if sentiment.contains("高") {
        80
    } else if sentiment.contains("平稳") {
        50
    } else if sentiment.contains("承压") || sentiment.contains("低") {
        20
    } else {
        50
    }
}
