//! Context builder: assembles the knowledge-base narrative handed to the LLM.
//! Output is a pure function of the table and the query.

use crate::industry::combination::classify;
use crate::industry::matcher::match_industry;
use crate::industry::models::IndustryTable;
use crate::industry::theory::describe;

const NARRATIVE_MATCHES: usize = 2;

pub fn not_found_narrative(industry_name: &str) -> String {
    format!("未在知识库中找到'{industry_name}'的相关信息。请基于通用周期理论进行分析。")
}

pub fn build_narrative(table: &IndustryTable, industry_name: &str) -> String {
    let matches = match_industry(table, industry_name, NARRATIVE_MATCHES);
    if matches.is_empty() {
        return not_found_narrative(industry_name);
    }

    let mut lines = vec![format!("【知识库检索结果】用户关注行业：{industry_name}\n")];

    for (i, m) in matches.iter().enumerate() {
        let record = &m.record;
        lines.push(format!("\n--- 匹配结果 {} ({}) ---", i + 1, m.tier.label()));
        lines.push(format!("行业名称：{}", record.name));
        lines.push(format!("当前周期阶段：{}", record.lifecycle_stage));
        lines.push(format!("未来1-3年景气度：{}", record.sentiment_label));
        lines.push(format!("评价：{}", record.commentary));

        if let Some(theory) = describe(&record.lifecycle_stage) {
            lines.push("\n周期理论指导：".to_string());
            lines.push(format!("- 阶段特征：{}", theory.characteristics));
            lines.push(format!("- 机会分析：{}", theory.opportunity));
            lines.push(format!("- 风险提示：{}", theory.risk));
            lines.push(format!("- 应对策略：{}", theory.strategy));
        }

        let combo = classify(&record.lifecycle_stage, None);
        lines.push("\n周期组合研判：".to_string());
        lines.push(format!("- 组合类型：{} {}", combo.name, combo.risk.label()));
        lines.push(format!("- 适合人群：{}", combo.audience));
        lines.push(format!("- 行动建议：{}", combo.strategy));
    }

    lines.push("\n--- 分析要求 ---".to_string());
    lines.push(
        "请基于以上知识库数据，结合马江博周期理论，为用户提供有理有据的职业规划建议。".to_string(),
    );
    lines.push("避免使用大话套话，所有建议必须基于上述数据支撑。".to_string());

    lines.join("\n")
}
