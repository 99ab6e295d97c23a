//! Evaluator：对一批候选行动做无状态启发式排名
//!
//! 评分规则是可插拔策略（ScoringStrategy），由配置选择；排名为稳定降序排序：
//! 同分保持提交顺序，不去重、不丢弃——输入输出基数恒等。

use async_trait::async_trait;

use crate::agents::types::ScoredAction;
use crate::config::EvaluatorSection;

/// 评分策略：action 文本 -> 分数的纯函数
pub trait ScoringStrategy: Send + Sync {
    fn name(&self) -> &str;

    fn score(&self, action: &str) -> f32;
}

/// 默认策略：越短越好（1/(len+1)），含新颖性关键词加固定 bonus
pub struct BrevityNovelty {
    pub novelty_keyword: String,
    pub novelty_bonus: f32,
}

impl Default for BrevityNovelty {
    fn default() -> Self {
        Self {
            novelty_keyword: "investigate".to_string(),
            novelty_bonus: 0.2,
        }
    }
}

impl ScoringStrategy for BrevityNovelty {
    fn name(&self) -> &str {
        "brevity_novelty"
    }

    fn score(&self, action: &str) -> f32 {
        let mut score = 1.0 / (action.len() + 1) as f32;
        if action.contains(&self.novelty_keyword) {
            score += self.novelty_bonus;
        }
        score
    }
}

/// 按配置选择策略；未知名称时回落到默认策略并告警
pub fn strategy_from_config(section: &EvaluatorSection) -> Box<dyn ScoringStrategy> {
    match section.strategy.as_str() {
        "brevity_novelty" => Box::new(BrevityNovelty {
            novelty_keyword: section.novelty_keyword.clone(),
            novelty_bonus: section.novelty_bonus,
        }),
        other => {
            tracing::warn!(strategy = other, "unknown scoring strategy, falling back to brevity_novelty");
            Box::new(BrevityNovelty::default())
        }
    }
}

/// Evaluator 角色接口：对 agent 无状态，整批输入一次性排名
#[async_trait]
pub trait Evaluator: Send + Sync {
    fn name(&self) -> &str;

    /// 评分并降序排名；同分保持输入相对顺序，基数不变
    async fn score_actions(&self, actions: &[String]) -> Vec<ScoredAction>;
}

pub struct HeuristicEvaluator {
    name: String,
    strategy: Box<dyn ScoringStrategy>,
}

impl HeuristicEvaluator {
    pub fn new(name: impl Into<String>, strategy: Box<dyn ScoringStrategy>) -> Self {
        Self {
            name: name.into(),
            strategy,
        }
    }
}

#[async_trait]
impl Evaluator for HeuristicEvaluator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn score_actions(&self, actions: &[String]) -> Vec<ScoredAction> {
        let mut scored: Vec<ScoredAction> = actions
            .iter()
            .map(|a| ScoredAction {
                action: a.clone(),
                score: self.strategy.score(a),
            })
            .collect();
        // Vec::sort_by 是稳定排序：同分条目保持提交顺序
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored
    }
}
