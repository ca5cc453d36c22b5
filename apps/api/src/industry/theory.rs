//! Cycle theory map: hand-authored guidance for each lifecycle stage.

use serde::Serialize;

use crate::industry::models::LifecycleStage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleTheoryEntry {
    pub stage: &'static str,
    pub characteristics: &'static str,
    pub opportunity: &'static str,
    pub risk: &'static str,
    pub strategy: &'static str,
    pub exemplars: &'static [&'static str],
}

const NASCENT: CycleTheoryEntry = CycleTheoryEntry {
    stage: "初创期",
    characteristics: "技术突破，市场教育阶段，渗透率低于5%",
    opportunity: "早期进入者可能获得超额回报",
    risk: "技术路线不确定，市场接受度未知",
    strategy: "适合风险偏好高、学习能力强的求职者；关注技术迭代和资本动向",
    exemplars: &["低空经济", "脑机接口", "量子计算"],
};

const GROWTH: CycleTheoryEntry = CycleTheoryEntry {
    stage: "成长期",
    characteristics: "渗透率快速提升(5%-30%)，资本大量涌入",
    opportunity: "行业红利释放，人才需求爆发",
    risk: "竞争加剧，后期进入者成本上升",
    strategy: "最佳入场时机；重点积累行业核心技能；选择头部或高成长企业",
    exemplars: &["人工智能", "新能源汽车", "储能"],
};

const MATURE: CycleTheoryEntry = CycleTheoryEntry {
    stage: "成熟期",
    characteristics: "增速放缓，竞争格局稳定，头部效应明显",
    opportunity: "岗位稳定，薪资基准较高",
    risk: "晋升天花板明显，内卷加剧",
    strategy: "深耕细分领域成为专家；或向上下游延伸；储备转型能力",
    exemplars: &["医药流通", "传统消费电子"],
};

const ADJUSTMENT: CycleTheoryEntry = CycleTheoryEntry {
    stage: "调整期",
    characteristics: "产能过剩，政策收紧，行业洗牌",
    opportunity: "并购整合中的管理岗位",
    risk: "裁员风险高，薪资下滑",
    strategy: "尽早规划转型；向相关成长期行业迁移技能；避免长期停留",
    exemplars: &["传统地产", "水泥", "光伏(当前)"],
};

const DECLINE: CycleTheoryEntry = CycleTheoryEntry {
    stage: "衰退期",
    characteristics: "需求萎缩，政策压降，产能出清",
    opportunity: "极少",
    risk: "失业风险极高",
    strategy: "立即启动转型；利用可迁移技能转向相关行业",
    exemplars: &["传统教培(双减后)", "P2P"],
};

/// Guidance for a stage label. `None` means no theory guidance is available.
pub fn describe(stage: &str) -> Option<&'static CycleTheoryEntry> {
    LifecycleStage::parse(stage).map(entry_for)
}

/// All entries in lifecycle order.
pub fn all_entries() -> impl Iterator<Item = &'static CycleTheoryEntry> {
    LifecycleStage::ALL.into_iter().map(entry_for)
}

pub fn entry_for(stage: LifecycleStage) -> &'static CycleTheoryEntry {
    match stage {
        LifecycleStage::Nascent => &NASCENT,
        LifecycleStage::Growth => &GROWTH,
        LifecycleStage::Mature => &MATURE,
        LifecycleStage::Adjustment => &ADJUSTMENT,
        LifecycleStage::Decline => &DECLINE,
    }
}
