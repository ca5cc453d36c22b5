//! Resume Diagnosis: turns free resume text into industries, then into a
//! per-industry risk breakdown.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::industry::matcher::match_industry;
use crate::industry::models::{IndustryTable, RiskLevel, RiskWarning};
use crate::industry::risk::{assess_risk, risk_level};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{complete_json, ChatModel};
use crate::resume::prompts::{RESUME_PARSE_PROMPT_TEMPLATE, RESUME_PARSE_SYSTEM};

/// Shorter input carries too little signal to parse.
pub const MIN_RESUME_CHARS: usize = 20;
/// Only the head of the resume is sent to the model.
pub const MAX_PROMPT_CHARS: usize = 4000;

/// Standard industry → aliases that indicate experience in it.
const INDUSTRY_KEYWORDS: [(&str, &[&str]); 10] = [
    ("房地产", &["房地产", "地产", "置业", "万科", "碧桂园", "恒大"]),
    ("建筑", &["建筑", "施工", "基建", "中建", "中铁", "承包商"]),
    ("互联网", &["互联网", "IT", "软件", "阿里", "腾讯", "字节", "美团"]),
    ("金融", &["金融", "银行", "证券", "保险", "基金", "投资"]),
    ("制造业", &["制造", "生产", "工厂", "工业", "汽车", "电子"]),
    ("教育", &["教育", "培训", "学校", "教培", "新东方", "学而思"]),
    ("医疗", &["医疗", "医药", "医院", "制药", "器械", "健康"]),
    ("零售", &["零售", "电商", "超市", "商场", "销售", "贸易"]),
    ("能源", &["能源", "电力", "石油", "煤炭", "新能源", "光伏"]),
    ("传媒", &["传媒", "广告", "媒体", "影视", "出版", "新闻"]),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndustryExperience {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    #[serde(default)]
    pub industries: Vec<IndustryExperience>,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Models answer with either `6` or `"6年"`; both are kept as text.
    #[serde(default, deserialize_with = "string_or_number")]
    pub total_years: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub current_role: String,
}

impl ParsedResume {
    /// Non-empty industry names in first-seen order.
    pub fn industry_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in self.industries.iter().map(|i| i.name.trim()) {
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionSource {
    Llm,
    Keyword,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeExtraction {
    pub parsed: ParsedResume,
    pub source: ExtractionSource,
    /// Set when the keyword fallback was used, naming the reason.
    pub fallback_reason: Option<String>,
}

/// Keyword fallback: every standard industry with at least one alias present
/// in `text`, reported once, in table order.
pub fn extract_industries(text: &str) -> Vec<String> {
    INDUSTRY_KEYWORDS
        .iter()
        .filter(|(_, aliases)| aliases.iter().any(|alias| text.contains(alias)))
        .map(|(industry, _)| industry.to_string())
        .collect()
}

fn keyword_extraction(text: &str, reason: String) -> ResumeExtraction {
    let industries = extract_industries(text)
        .into_iter()
        .map(|name| IndustryExperience {
            name,
            ..Default::default()
        })
        .collect();

    ResumeExtraction {
        parsed: ParsedResume {
            industries,
            ..Default::default()
        },
        source: ExtractionSource::Keyword,
        fallback_reason: Some(reason),
    }
}

/// Parses resume text with the model when one is available, otherwise (or on
/// any model failure) with the keyword table.
pub async fn parse_resume(
    text: &str,
    llm: Option<&dyn ChatModel>,
) -> Result<ResumeExtraction, AppError> {
    let text = text.trim();
    if text.chars().count() < MIN_RESUME_CHARS {
        return Err(AppError::Validation(format!(
            "resume text must contain at least {MIN_RESUME_CHARS} characters"
        )));
    }

    let Some(model) = llm else {
        return Ok(keyword_extraction(
            text,
            "LLM not configured".to_string(),
        ));
    };

    let head: String = text.chars().take(MAX_PROMPT_CHARS).collect();
    let prompt = RESUME_PARSE_PROMPT_TEMPLATE.replace("{resume_text}", &head);
    let system = format!("{RESUME_PARSE_SYSTEM}\n{JSON_ONLY_SYSTEM}");

    match complete_json::<ParsedResume>(model, &system, &prompt).await {
        Ok(parsed) => Ok(ResumeExtraction {
            parsed,
            source: ExtractionSource::Llm,
            fallback_reason: None,
        }),
        Err(e) => {
            warn!("Resume parsing via LLM failed, using keyword fallback: {e}");
            Ok(keyword_extraction(text, e.to_string()))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Batch risk breakdown
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RiskEntry {
    pub industry: String,
    pub matched_name: String,
    pub lifecycle_stage: String,
    pub sentiment_label: String,
    /// Present for high-risk entries only.
    pub warning: Option<RiskWarning>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RiskBreakdown {
    pub high: Vec<RiskEntry>,
    pub medium: Vec<RiskEntry>,
    pub low: Vec<RiskEntry>,
    pub unrecognized: Vec<String>,
}

impl RiskBreakdown {
    pub fn has_high_risk(&self) -> bool {
        !self.high.is_empty()
    }
}

/// Classifies each industry by the top match's risk level; industries with
/// no match land in `unrecognized`.
pub fn analyze_risks(table: &IndustryTable, industries: &[String]) -> RiskBreakdown {
    let mut breakdown = RiskBreakdown::default();

    for industry in industries {
        let Some(top) = match_industry(table, industry, 1).into_iter().next() else {
            breakdown.unrecognized.push(industry.clone());
            continue;
        };

        let level = risk_level(&top.record);
        let entry = RiskEntry {
            industry: industry.clone(),
            matched_name: top.record.name.clone(),
            lifecycle_stage: top.record.lifecycle_stage.clone(),
            sentiment_label: top.record.sentiment_label.clone(),
            warning: match level {
                RiskLevel::High => assess_risk(table, industry),
                _ => None,
            },
        };

        match level {
            RiskLevel::High => breakdown.high.push(entry),
            RiskLevel::Medium => breakdown.medium.push(entry),
            RiskLevel::Low => breakdown.low.push(entry),
        }
    }

    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::industry::models::IndustryRecord;
    use crate::llm_client::testing::ScriptedModel;

    const RESUME: &str = "2016-2020 万科集团 项目经理，负责住宅开发；2020至今 中建三局 高级工程师，负责基建施工管理。";

    fn record(name: &str, stage: &str, sentiment: &str) -> IndustryRecord {
        IndustryRecord {
            sequence_id: "1".to_string(),
            name: name.to_string(),
            lifecycle_stage: stage.to_string(),
            sentiment_label: sentiment.to_string(),
            commentary: "暂无评价".to_string(),
        }
    }

    fn table() -> IndustryTable {
        IndustryTable::new(vec![
            record("房地产", "调整期", "承压"),
            record("银行", "成熟期", "平稳"),
            record("储能", "成长期", "高成长"),
        ])
    }

    #[test]
    fn test_extract_industries_reports_each_once_in_table_order() {
        let found = extract_industries("在腾讯做过软件开发，后来去了碧桂园，再到万科");
        assert_eq!(found, vec!["房地产", "互联网"]);
    }

    #[test]
    fn test_extract_industries_no_keywords() {
        assert!(extract_industries("热爱生活，喜欢跑步").is_empty());
    }

    #[test]
    fn test_parsed_resume_accepts_numeric_total_years_and_missing_fields() {
        let parsed: ParsedResume =
            serde_json::from_str(r#"{"industries": [{"name": "金融"}], "total_years": 6}"#).unwrap();
        assert_eq!(parsed.total_years, "6");
        assert_eq!(parsed.industries[0].name, "金融");
        assert!(parsed.skills.is_empty());
    }

    #[test]
    fn test_industry_names_dedupes_and_skips_blank() {
        let experience = |name: &str| IndustryExperience {
            name: name.to_string(),
            ..Default::default()
        };
        let parsed = ParsedResume {
            industries: vec![
                experience("房地产"),
                experience(" "),
                experience("房地产"),
                experience("建筑"),
            ],
            ..Default::default()
        };
        assert_eq!(parsed.industry_names(), vec!["房地产", "建筑"]);
    }

    #[tokio::test]
    async fn test_parse_resume_rejects_short_text() {
        let err = parse_resume("  太短了  ", None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_parse_resume_without_llm_uses_keywords() {
        let extraction = parse_resume(RESUME, None).await.unwrap();
        assert_eq!(extraction.source, ExtractionSource::Keyword);
        assert!(extraction.fallback_reason.is_some());
        assert_eq!(extraction.parsed.industry_names(), vec!["房地产", "建筑"]);
    }

    #[tokio::test]
    async fn test_parse_resume_uses_llm_json() {
        let model = ScriptedModel::replying(
            "```json\n{\"industries\": [{\"name\": \"房地产\", \"period\": \"2016-2020\", \"role\": \"项目经理\"}], \"skills\": [\"项目管理\"], \"total_years\": \"8年\", \"education\": \"本科\", \"current_role\": \"高级工程师\"}\n```",
        );
        let extraction = parse_resume(RESUME, Some(&model)).await.unwrap();
        assert_eq!(extraction.source, ExtractionSource::Llm);
        assert_eq!(extraction.parsed.current_role, "高级工程师");
        assert_eq!(extraction.parsed.industries[0].period, "2016-2020");

        let prompts = model.prompts();
        assert!(prompts[0].contains("万科集团"));
    }

    #[tokio::test]
    async fn test_parse_resume_truncates_prompt_input() {
        let long = "z".repeat(MAX_PROMPT_CHARS + 500);
        let model = ScriptedModel::replying("{}");
        parse_resume(&long, Some(&model)).await.unwrap();
        let prompt = &model.prompts()[0];
        assert_eq!(prompt.matches('z').count(), MAX_PROMPT_CHARS);
    }

    #[tokio::test]
    async fn test_parse_resume_falls_back_on_garbage_reply() {
        let model = ScriptedModel::replying("抱歉，我无法解析这份简历。");
        let extraction = parse_resume(RESUME, Some(&model)).await.unwrap();
        assert_eq!(extraction.source, ExtractionSource::Keyword);
        assert_eq!(extraction.parsed.industry_names(), vec!["房地产", "建筑"]);
    }

    #[tokio::test]
    async fn test_parse_resume_falls_back_on_model_failure() {
        let model = ScriptedModel::failing();
        let extraction = parse_resume(RESUME, Some(&model)).await.unwrap();
        assert_eq!(extraction.source, ExtractionSource::Keyword);
    }

    #[test]
    fn test_analyze_risks_groups_by_level() {
        let industries = vec![
            "房地产".to_string(),
            "银行".to_string(),
            "储能".to_string(),
            "元宇宙".to_string(),
        ];
        let breakdown = analyze_risks(&table(), &industries);

        assert!(breakdown.has_high_risk());
        assert_eq!(breakdown.high[0].industry, "房地产");
        let warning = breakdown.high[0].warning.as_ref().unwrap();
        assert_eq!(warning.recommendations[0].name, "储能");

        assert_eq!(breakdown.medium[0].matched_name, "银行");
        assert!(breakdown.medium[0].warning.is_none());
        assert_eq!(breakdown.low[0].industry, "储能");
        assert_eq!(breakdown.unrecognized, vec!["元宇宙"]);
    }

    #[test]
    fn test_analyze_risks_empty_input() {
        let breakdown = analyze_risks(&table(), &[]);
        assert!(!breakdown.has_high_risk());
        assert!(breakdown.unrecognized.is_empty());
    }
}
