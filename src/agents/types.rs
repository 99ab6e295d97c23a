//! 协同回合中的跨 actor 记录类型
//!
//! 全部为 owned、可序列化的副本：跨 actor 边界不传递可变引用。

use serde::{Deserialize, Serialize};

use crate::memory::ScoredResult;

/// 单个 Reasoner 对一次任务的产出；仅在协同调用期间存活，不持久化
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasonerOutput {
    /// 推理过程的自述（含检索到的相关记忆摘要）
    pub introspection: String,
    /// 提议的行动
    pub action: String,
    /// 检索命中（含刚写入的观察本身）
    pub related: Vec<ScoredResult>,
}

/// 评分后的行动；按分数降序全序，同分保持提交顺序
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredAction {
    pub action: String,
    pub score: f32,
}

/// 回合内单个 agent 的失败记录（超时 / 记忆错误 / panic）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentFailure {
    pub agent: String,
    pub reason: String,
}

/// 一次协同任务的完整决策 trace：不丢弃任何中间产物，便于审计选择依据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinationResult {
    pub task: String,
    /// 按注册顺序排列的各 Reasoner 自述（失败者缺席）
    pub introspections: Vec<String>,
    /// 评分排名（降序；同分保持提交顺序）
    pub actions_scored: Vec<ScoredAction>,
    /// actions_scored[0]；列表为空时为 None，从不凭空合成
    pub chosen: Option<ScoredAction>,
    /// 按注册顺序排列的原始产出（失败者缺席）
    pub raw_results: Vec<ReasonerOutput>,
    /// 本回合失败的 agent 及原因（硬化策略：失败不中止整轮）
    pub failures: Vec<AgentFailure>,
}
