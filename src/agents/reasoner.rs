//! Reasoner：感知-行动两阶段推理
//!
//! 严格两阶段且不可换序：先把观察写入自己独占的 MemoryStore（source 标记为自身），
//! 再对同一存储检索 top-k——刚写入的观察本身也是检索候选。这个自指检索是有意设计：
//! 让 agent 自己的运行上下文影响下一步提议。

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::agents::types::ReasonerOutput;
use crate::core::error::{CoordinationError, MemoryError};
use crate::memory::{
    HierarchicalMemory, MemoryRecord, MemorySnapshot, MemoryStoreHandle, ScoredResult, StoreAck,
};

/// Reasoner 角色接口：调用方只经此接口交互，不触碰具体状态
#[async_trait]
pub trait Reasoner: Send + Sync {
    fn name(&self) -> &str;

    /// 感知（写入观察）并行动（检索 + 提议）
    async fn perceive_and_act(&self, observation: &str)
        -> Result<ReasonerOutput, CoordinationError>;
}

/// 基于私有记忆检索上下文的 Reasoner 实现
pub struct ContextReasoner {
    name: String,
    /// 独占的 MemoryStore handle（单写者：handle 不可克隆）
    store: MemoryStoreHandle,
    /// agent 本地分层记忆；perceive_and_act 取 &self，用锁保护
    hierarchical: Mutex<HierarchicalMemory>,
    top_k: usize,
    relevance_threshold: f32,
}

impl ContextReasoner {
    pub fn new(
        name: impl Into<String>,
        store: MemoryStoreHandle,
        top_k: usize,
        relevance_threshold: f32,
        sensory_capacity: usize,
    ) -> Self {
        Self {
            name: name.into(),
            store,
            hierarchical: Mutex::new(HierarchicalMemory::new(sensory_capacity)),
            top_k,
            relevance_threshold,
        }
    }

    /// 预置先验知识（种子记忆）；与观察写入同一存储、同一嵌入
    pub async fn remember(
        &self,
        text: &str,
        metadata: HashMap<String, Value>,
    ) -> Result<StoreAck, MemoryError> {
        self.store.add(text, metadata).await
    }

    /// 导出底层存储内容（不含向量），供检查
    pub async fn dump_memory(&self) -> Result<Vec<MemoryRecord>, MemoryError> {
        self.store.dump().await
    }

    /// 分层记忆快照（owned 副本）
    pub async fn memory_snapshot(&self) -> MemorySnapshot {
        self.hierarchical.lock().await.snapshot()
    }

    /// 提议规则：最强相关记忆超过阈值则延展它，否则调查原始观察
    fn propose(&self, observation: &str, related: &[ScoredResult]) -> String {
        match related.first() {
            Some(top) if top.score > self.relevance_threshold => {
                format!("extend '{}'", top.text)
            }
            _ => format!("investigate '{observation}'"),
        }
    }
}

#[async_trait]
impl Reasoner for ContextReasoner {
    fn name(&self) -> &str {
        &self.name
    }

    async fn perceive_and_act(
        &self,
        observation: &str,
    ) -> Result<ReasonerOutput, CoordinationError> {
        // 阶段一：写入观察，source 归属为自身
        let metadata = HashMap::from([("source".to_string(), json!(self.name))]);
        self.store.add(observation, metadata).await?;

        // 阶段二：对同一存储检索（刚写入的条目也参与）
        let related = self.store.query(observation, self.top_k).await?;

        let mut introspection = format!(
            "Reasoner({}) got observation: '{observation}'",
            self.name
        );
        if !related.is_empty() {
            introspection.push_str(" | related memories:\n");
            for r in &related {
                introspection.push_str(&format!("  - ({:.3}) {}\n", r.score, r.text));
            }
        }

        let proposal = self.propose(observation, &related);
        let action = format!(
            "[PLAN by {}] based on '{observation}' -> propose: '{proposal}'",
            self.name
        );

        // agent 本地记忆簿记：感知缓冲 + 情景记忆追加，工作记忆整体替换为当前上下文
        {
            let mut mem = self.hierarchical.lock().await;
            mem.add_to_sensory_buffer(observation);
            mem.add_to_episodic_memory(format!("observed '{observation}' -> {proposal}"));
            let top_score = related.first().map(|r| r.score).unwrap_or(0.0);
            mem.set_working_memory(HashMap::from([
                ("goal".to_string(), json!(observation)),
                ("top_score".to_string(), json!(top_score)),
                ("proposal".to_string(), json!(proposal)),
            ]));
        }

        tracing::debug!(reasoner = %self.name, related = related.len(), "perceive_and_act done");

        Ok(ReasonerOutput {
            introspection,
            action,
            related,
        })
    }
}
