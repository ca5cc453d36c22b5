// Prompts for resume parsing.

pub const RESUME_PARSE_SYSTEM: &str =
    "你是一个专业的简历解析助手，擅长从简历中提取结构化信息，只返回JSON格式。";

/// Placeholder: {resume_text}
pub const RESUME_PARSE_PROMPT_TEMPLATE: &str = r#"请从以下简历中提取关键信息，以JSON格式返回：

简历内容：
{resume_text}

请提取以下字段：
1. industries: 行业经历列表（每个包含 name行业名称, period时间段, role职位）
2. skills: 核心技能列表（字符串数组）
3. total_years: 工作年限（数字或字符串）
4. education: 最高学历
5. current_role: 当前/最近职位

注意：
- 如果找不到某字段，返回空字符串或空数组
- 行业名称请尽量标准，如"房地产"、"互联网"、"金融"等
- 必须返回有效的JSON格式

返回示例：
{
    "industries": [
        {"name": "房地产", "period": "2018-2022", "role": "项目经理"},
        {"name": "建筑", "period": "2022-至今", "role": "高级工程师"}
    ],
    "skills": ["项目管理", "工程管理", "团队协调"],
    "total_years": "6年",
    "education": "本科",
    "current_role": "高级工程师"
}"#;
