//! Coordinator：scatter/gather 协同回合
//!
//! 对固定注册集的全部 Reasoner 并发派发任务，聚齐全部响应后整批送 Evaluator
//! 排名，选出榜首。聚合按「注册顺序」而非到达顺序：评分结果可确定性对回
//! Reasoner 身份。硬化策略：单个 Reasoner 超时/失败只记入 trace，不拖垮整轮。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::Mutex;

use crate::agents::evaluator::Evaluator;
use crate::agents::reasoner::Reasoner;
use crate::agents::types::{AgentFailure, CoordinationResult, ReasonerOutput};
use crate::core::error::CoordinationError;
use crate::memory::{HierarchicalMemory, MemorySnapshot};
use crate::observability::{Metrics, MetricsSummary};

pub struct Coordinator {
    name: String,
    /// 注册顺序固定，gather 与评分批次都沿用该顺序
    reasoners: Vec<Arc<dyn Reasoner>>,
    evaluator: Arc<dyn Evaluator>,
    /// 单个 Reasoner 的单次调用时限
    call_timeout: Duration,
    /// 协调者自己的分层记忆：元记忆层记各 agent 可靠度
    memory: Mutex<HierarchicalMemory>,
    metrics: Mutex<Metrics>,
}

impl Coordinator {
    pub fn new(
        name: impl Into<String>,
        reasoners: Vec<Arc<dyn Reasoner>>,
        evaluator: Arc<dyn Evaluator>,
        call_timeout: Duration,
    ) -> Self {
        let name = name.into();
        tracing::info!(
            coordinator = %name,
            reasoners = reasoners.len(),
            "coordinator initialized"
        );
        Self {
            name,
            reasoners,
            evaluator,
            call_timeout,
            memory: Mutex::new(HierarchicalMemory::new(64)),
            metrics: Mutex::new(Metrics::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 协同一次任务：fan-out → 屏障聚合 → 整批评分 → 选榜首 → 返回完整 trace
    pub async fn coordinate_task(
        &self,
        task: &str,
    ) -> Result<CoordinationResult, CoordinationError> {
        tracing::info!(coordinator = %self.name, task, "coordinating task");

        // 1) 并发派发：每个 Reasoner 一个任务，单独限时
        let handles: Vec<_> = self
            .reasoners
            .iter()
            .map(|r| {
                let reasoner = Arc::clone(r);
                let task = task.to_string();
                let timeout = self.call_timeout;
                tokio::spawn(async move {
                    match tokio::time::timeout(timeout, reasoner.perceive_and_act(&task)).await {
                        Ok(result) => result,
                        Err(_) => Err(CoordinationError::Timeout {
                            agent: reasoner.name().to_string(),
                            ms: timeout.as_millis() as u64,
                        }),
                    }
                })
            })
            .collect();

        // 2) 屏障：等全部响应；join_all 保持注册顺序，与到达顺序无关
        let joined = futures_util::future::join_all(handles).await;

        let mut raw_results: Vec<ReasonerOutput> = Vec::new();
        let mut failures: Vec<AgentFailure> = Vec::new();
        for (reasoner, joined_result) in self.reasoners.iter().zip(joined) {
            let agent = reasoner.name().to_string();
            let outcome = match joined_result {
                Ok(Ok(output)) => Some(output),
                Ok(Err(e)) => {
                    tracing::warn!(coordinator = %self.name, agent = %agent, error = %e, "reasoner failed");
                    failures.push(AgentFailure {
                        agent: agent.clone(),
                        reason: e.to_string(),
                    });
                    None
                }
                Err(_) => {
                    let e = CoordinationError::TaskPanicked {
                        agent: agent.clone(),
                    };
                    tracing::warn!(coordinator = %self.name, agent = %agent, "reasoner task panicked");
                    failures.push(AgentFailure {
                        agent: agent.clone(),
                        reason: e.to_string(),
                    });
                    None
                }
            };

            let reliability = if outcome.is_some() { 1.0 } else { 0.0 };
            {
                let mut mem = self.memory.lock().await;
                mem.update_meta_memory(&agent, reliability);
            }
            self.metrics.lock().await.record_performance(&agent, reliability);

            if let Some(output) = outcome {
                raw_results.push(output);
            }
        }

        // 3) 提取行动与自述（注册顺序）
        let actions: Vec<String> = raw_results.iter().map(|r| r.action.clone()).collect();
        let introspections: Vec<String> =
            raw_results.iter().map(|r| r.introspection.clone()).collect();

        // 4) 一次调用整批评分
        let actions_scored = self.evaluator.score_actions(&actions).await;

        // 5) 榜首即胜者；空列表时不合成
        let chosen = actions_scored.first().cloned();

        {
            let mut mem = self.memory.lock().await;
            mem.add_to_episodic_memory(format!(
                "task '{task}': {} proposals, {} failures",
                actions_scored.len(),
                failures.len()
            ));
            mem.set_working_memory(HashMap::from([
                ("task".to_string(), json!(task)),
                (
                    "chosen".to_string(),
                    json!(chosen.as_ref().map(|c| c.action.clone())),
                ),
            ]));
        }

        tracing::info!(
            coordinator = %self.name,
            proposals = actions_scored.len(),
            failures = failures.len(),
            chosen = chosen.as_ref().map(|c| c.action.as_str()).unwrap_or("<none>"),
            "round complete"
        );

        // 6) 完整 trace：不丢弃任何中间产物
        Ok(CoordinationResult {
            task: task.to_string(),
            introspections,
            actions_scored,
            chosen,
            raw_results,
            failures,
        })
    }

    /// 协调者记忆快照（元记忆层含各 agent 可靠度）
    pub async fn memory_snapshot(&self) -> MemorySnapshot {
        self.memory.lock().await.snapshot()
    }

    /// 累计性能统计
    pub async fn metrics_summary(&self) -> MetricsSummary {
        self.metrics.lock().await.summary()
    }
}
