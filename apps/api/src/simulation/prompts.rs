// Prompts for the optional commentary on simulation results.

pub const SIMULATION_SYSTEM: &str =
    "你是Cycle-Master AI职业规划专家，基于马江博周期共振理论进行分析。";

pub const COMPARISON_SYSTEM: &str =
    "你是Cycle-Master AI职业规划专家，基于马江博周期共振理论进行客观分析。";

/// Placeholders: {years}, {start_year}, {industry}, {entry_level}, {stage}, {sentiment}
pub const BACKCAST_TEMPLATE: &str = r#"请基于以下场景，为用户提供深度职业推演分析：
场景：用户在{years}年前（{start_year}年）进入{industry}行业，入职职级为{entry_level}。
当前该行业周期阶段：{stage}
未来1-3年景气度：{sentiment}

请分析：
1. 当时进入该行业的时机判断（是否符合周期共振原理）
2. 这{years}年间可能经历的行业波动
3. 当前的假设职业状态（薪资、职级、技能积累）
4. 与当时其他选择的对比（如选择同期调整期行业）
5. 经验教训总结"#;

/// Placeholders: {current}, {current_stage}, {target}, {stage}, {sentiment}, {combination}, {years}
pub const FORECAST_TEMPLATE: &str = r#"请为以下职业转型提供深度分析和建议：
从行业：{current}{current_stage}
到行业：{target}（周期阶段：{stage}，景气度：{sentiment}）
周期组合：{combination}

请分析：
1. 转型的时机判断（现在是否是好的转型时机）
2. 转型的核心风险点
3. 需要补充的关键技能
4. 推荐的转型路径（直接跳槽/先学习/内部转岗等）
5. {years}年后的预期状态
6. 如果转型失败，备选方案是什么"#;

/// Placeholders: {stay}, {stay_stage}, {stay_sentiment}, {move}, {move_stage},
/// {move_sentiment}, {years}
pub const COMPARISON_TEMPLATE: &str = r#"请对以下两个职业选择方案进行综合对比分析：

方案A（留下）：{stay}
- 周期阶段：{stay_stage}
- 景气度：{stay_sentiment}

方案B（转型）：{move}
- 周期阶段：{move_stage}
- 景气度：{move_sentiment}

对比时间跨度：{years}年

请分析：
1. 两个方案的优劣对比
2. 不同风险偏好的选择建议
3. 关键决策节点的判断标准
4. 最终推荐及理由"#;
