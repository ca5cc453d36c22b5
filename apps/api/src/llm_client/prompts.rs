// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Heading placed in front of knowledge-base narratives handed to the model.
pub const KNOWLEDGE_CONTEXT_HEADING: &str = "【知识库上下文】";

/// Prefixes a user question with the knowledge-base narrative it should be grounded on.
pub fn with_knowledge_context(narrative: &str, question: &str) -> String {
    format!("{KNOWLEDGE_CONTEXT_HEADING}\n{narrative}\n\n{question}")
}
