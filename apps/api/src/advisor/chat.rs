//! Chat Advisor: grounds each user turn in the knowledge-base narrative for
//! the industry in focus, then hands the conversation to the chat model.

use serde::{Deserialize, Serialize};

use crate::advisor::prompts::{
    CYCLE_MASTER_SYSTEM, INDUSTRY_REPORT_TEMPLATE, PROFILE_HEADING, QUESTION_HEADING,
    SKILL_TRANSFER_TEMPLATE, WELCOME_GREETING,
};
use crate::errors::AppError;
use crate::industry::matcher::match_industry;
use crate::industry::models::IndustryTable;
use crate::industry::narrative::build_narrative;
use crate::industry::risk::assess_risk;
use crate::llm_client::prompts::with_knowledge_context;
use crate::llm_client::{ChatMessage, ChatModel, ChunkStream};
use crate::session::store::UserProfile;

/// Who the user is and what they are looking at, for one turn.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdvisorContext {
    #[serde(default)]
    pub profile: UserProfile,
    #[serde(default)]
    pub target_industry: Option<String>,
    /// Consultation goal, e.g. 职业规划/转型建议.
    #[serde(default)]
    pub goal: Option<String>,
}

impl AdvisorContext {
    fn target(&self) -> Option<&str> {
        self.target_industry
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn current(&self) -> Option<&str> {
        Some(self.profile.current_industry.trim()).filter(|s| !s.is_empty())
    }

    /// Target industry when set, else the current industry.
    pub fn focus_industry(&self) -> Option<&str> {
        self.target().or_else(|| self.current())
    }
}

/// Canned questions the advisor screen offers as one-click actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuickAction {
    IndustryReport,
    SkillTransfer,
}

impl QuickAction {
    pub fn question(&self, ctx: &AdvisorContext) -> Result<String, AppError> {
        match self {
            Self::IndustryReport => {
                let target = ctx.target().ok_or_else(|| {
                    AppError::Validation("industry_report requires target_industry".to_string())
                })?;
                Ok(INDUSTRY_REPORT_TEMPLATE.replace("{target}", target))
            }
            Self::SkillTransfer => match (ctx.current(), ctx.target()) {
                (Some(current), Some(target)) => Ok(SKILL_TRANSFER_TEMPLATE
                    .replace("{current}", current)
                    .replace("{target}", target)),
                _ => Err(AppError::Validation(
                    "skill_transfer requires current_industry and target_industry".to_string(),
                )),
            },
        }
    }
}

/// The user turn as sent to the model.
#[derive(Debug, Clone, Serialize)]
pub struct ComposedTurn {
    /// Full user message content: knowledge context, profile, question.
    pub content: String,
    pub focus_industry: Option<String>,
    pub narrative: Option<String>,
}

fn profile_block(ctx: &AdvisorContext) -> Option<String> {
    let identity = ctx.profile.identity.trim();
    if identity.is_empty() && ctx.current().is_none() && ctx.target().is_none() {
        return None;
    }

    let mut block = format!("{PROFILE_HEADING}\n");
    if !identity.is_empty() {
        block.push_str(&format!("- 当前角色：{identity}\n"));
    }
    if let Some(current) = ctx.current() {
        block.push_str(&format!("- 当前/过往行业：{current}\n"));
    }
    if let Some(target) = ctx.target() {
        block.push_str(&format!("- 目标行业：{target}\n"));
    }
    if let Some(goal) = ctx.goal.as_deref().filter(|g| !g.trim().is_empty()) {
        block.push_str(&format!("- 咨询目的：{}\n", goal.trim()));
    }
    Some(block)
}

pub fn compose_turn(table: &IndustryTable, ctx: &AdvisorContext, question: &str) -> ComposedTurn {
    let mut content = match profile_block(ctx) {
        Some(block) => format!("{block}\n{QUESTION_HEADING}\n{question}"),
        None => question.to_string(),
    };

    let focus = ctx.focus_industry().map(str::to_string);
    let narrative = focus.as_deref().map(|name| build_narrative(table, name));
    if let Some(narrative) = &narrative {
        content = with_knowledge_context(narrative, &content);
    }

    ComposedTurn {
        content,
        focus_industry: focus,
        narrative,
    }
}

fn conversation(history: &[ChatMessage], turn: &ComposedTurn) -> Vec<ChatMessage> {
    let mut messages = history.to_vec();
    messages.push(ChatMessage::user(turn.content.clone()));
    messages
}

#[derive(Debug, Serialize)]
pub struct Advice {
    pub reply: String,
    pub turn: ComposedTurn,
}

pub async fn advise(
    table: &IndustryTable,
    model: &dyn ChatModel,
    ctx: &AdvisorContext,
    question: &str,
    history: &[ChatMessage],
) -> Result<Advice, AppError> {
    let turn = compose_turn(table, ctx, question);
    let reply = model
        .complete(CYCLE_MASTER_SYSTEM, &conversation(history, &turn))
        .await?;
    Ok(Advice { reply, turn })
}

/// Streaming variant of `advise`. Errors before the first chunk are returned
/// directly; later ones arrive inside the stream.
pub async fn advise_stream(
    table: &IndustryTable,
    model: &dyn ChatModel,
    ctx: &AdvisorContext,
    question: &str,
    history: &[ChatMessage],
) -> Result<(ComposedTurn, ChunkStream), AppError> {
    let turn = compose_turn(table, ctx, question);
    let chunks = model
        .complete_stream(CYCLE_MASTER_SYSTEM, &conversation(history, &turn))
        .await?;
    Ok((turn, chunks))
}

/// Deterministic opening message; summarizes the knowledge base's view of
/// the target industry when one is set.
pub fn welcome_message(table: &IndustryTable, target: Option<&str>) -> String {
    let mut msg = format!("{WELCOME_GREETING}\n\n");

    let Some(target) = target.map(str::trim).filter(|t| !t.is_empty()) else {
        msg.push_str("请问您目前关注哪个行业？或者有什么职业规划方面的问题？");
        return msg;
    };

    msg.push_str(&format!(
        "🎯 检测到您关注的行业是 **{target}**，让我为您检索知识库数据...\n\n"
    ));

    match match_industry(table, target, 1).into_iter().next() {
        Some(top) => {
            let record = &top.record;
            msg.push_str("📊 **知识库检索结果**：\n");
            msg.push_str(&format!("- 行业：**{}**\n", record.name));
            msg.push_str(&format!("- 当前周期阶段：**{}**\n", record.lifecycle_stage));
            msg.push_str(&format!(
                "- 未来1-3年景气度：**{}**\n",
                record.sentiment_label
            ));
            msg.push_str(&format!("- 评价：{}\n\n", record.commentary));
            msg.push_str(&format!(
                "🔍 **周期组合研判**：{} {}\n",
                top.combination.name,
                top.combination.risk.label()
            ));
            msg.push_str(&format!("💡 **建议**：{}\n\n", top.combination.strategy));
            if let Some(warning) = assess_risk(table, target) {
                msg.push_str(&format!(
                    "⚠️ **风险预警**：{}，{}\n\n",
                    warning.category, warning.action
                ));
            }
        }
        None => msg.push_str(&format!(
            "未在知识库中找到 **{target}** 的精确匹配，但我可以基于通用周期理论为您分析。\n\n"
        )),
    }

    msg.push_str("请问您想了解该行业的哪些方面？例如：\n");
    msg.push_str("- 当前是否适合进入/转型？\n");
    msg.push_str("- 需要储备哪些核心技能？\n");
    msg.push_str("- 未来3-5年的发展前景如何？");
    msg
}
