//! 分层记忆：感知缓冲、工作记忆、情景记忆、长期记忆、元记忆
//!
//! 纯状态容器，无内部并发；并发保护由持有者（Reasoner / Coordinator 内的锁）负责。
//! 感知缓冲有容量上限，满时淘汰最旧事件；快照是 owned 副本，调用方拿不到内部可变引用。

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 五层记忆的只读快照（owned 副本）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub sensory_buffer: Vec<String>,
    pub working_memory: HashMap<String, Value>,
    pub episodic_memory: Vec<String>,
    pub long_term_memory: HashMap<String, Value>,
    pub meta_memory: HashMap<String, f64>,
}

/// 分层记忆：保留期逐层递增、易失性逐层递减
pub struct HierarchicalMemory {
    /// 感知缓冲：容量受限，最旧先淘汰
    sensory_buffer: VecDeque<String>,
    sensory_capacity: usize,
    /// 工作记忆：当前快照，整体替换
    working_memory: HashMap<String, Value>,
    /// 情景记忆：会话内只追加
    episodic_memory: Vec<String>,
    /// 长期记忆：按 key upsert
    long_term_memory: HashMap<String, Value>,
    /// 元记忆：每个已知 agent 一个可靠度分数，更新即覆盖
    meta_memory: HashMap<String, f64>,
}

impl HierarchicalMemory {
    pub fn new(sensory_capacity: usize) -> Self {
        Self {
            sensory_buffer: VecDeque::with_capacity(sensory_capacity.min(64)),
            sensory_capacity: sensory_capacity.max(1),
            working_memory: HashMap::new(),
            episodic_memory: Vec::new(),
            long_term_memory: HashMap::new(),
            meta_memory: HashMap::new(),
        }
    }

    /// 追加感知事件；超出容量时淘汰最旧的
    pub fn add_to_sensory_buffer(&mut self, event: impl Into<String>) {
        if self.sensory_buffer.len() == self.sensory_capacity {
            self.sensory_buffer.pop_front();
        }
        self.sensory_buffer.push_back(event.into());
    }

    /// 显式清空感知缓冲（不会静默发生）
    pub fn clear_sensory_buffer(&mut self) {
        self.sensory_buffer.clear();
    }

    /// 整体替换工作记忆
    pub fn set_working_memory(&mut self, context: HashMap<String, Value>) {
        self.working_memory = context;
    }

    /// 追加一条经验到情景记忆
    pub fn add_to_episodic_memory(&mut self, experience: impl Into<String>) {
        self.episodic_memory.push(experience.into());
    }

    /// 长期记忆 upsert
    pub fn add_to_long_term_memory(&mut self, key: impl Into<String>, value: Value) {
        self.long_term_memory.insert(key.into(), value);
    }

    /// 更新某 agent 的可靠度分数（覆盖旧值）
    pub fn update_meta_memory(&mut self, agent_id: impl Into<String>, reliability: f64) {
        self.meta_memory.insert(agent_id.into(), reliability);
    }

    pub fn reliability_of(&self, agent_id: &str) -> Option<f64> {
        self.meta_memory.get(agent_id).copied()
    }

    /// 五层记忆的只读复合视图
    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            sensory_buffer: self.sensory_buffer.iter().cloned().collect(),
            working_memory: self.working_memory.clone(),
            episodic_memory: self.episodic_memory.clone(),
            long_term_memory: self.long_term_memory.clone(),
            meta_memory: self.meta_memory.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sensory_buffer_evicts_oldest() {
        let mut mem = HierarchicalMemory::new(3);
        for i in 0..5 {
            mem.add_to_sensory_buffer(format!("event-{i}"));
        }
        let snap = mem.snapshot();
        assert_eq!(snap.sensory_buffer, vec!["event-2", "event-3", "event-4"]);
    }

    #[test]
    fn test_working_memory_replaced_wholesale() {
        let mut mem = HierarchicalMemory::new(8);
        mem.set_working_memory(HashMap::from([("goal".to_string(), json!("a"))]));
        mem.set_working_memory(HashMap::from([("step".to_string(), json!(2))]));
        let snap = mem.snapshot();
        assert!(!snap.working_memory.contains_key("goal"));
        assert_eq!(snap.working_memory.get("step"), Some(&json!(2)));
    }

    #[test]
    fn test_meta_memory_overwrites_reliability() {
        let mut mem = HierarchicalMemory::new(8);
        mem.update_meta_memory("r-0", 1.0);
        mem.update_meta_memory("r-0", 0.0);
        assert_eq!(mem.reliability_of("r-0"), Some(0.0));
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let mut mem = HierarchicalMemory::new(8);
        mem.add_to_episodic_memory("before");
        let snap = mem.snapshot();
        mem.add_to_episodic_memory("after");
        assert_eq!(snap.episodic_memory, vec!["before"]);
    }

    #[test]
    fn test_clear_sensory_buffer() {
        let mut mem = HierarchicalMemory::new(4);
        mem.add_to_sensory_buffer("x");
        mem.clear_sensory_buffer();
        assert!(mem.snapshot().sensory_buffer.is_empty());
    }
}
