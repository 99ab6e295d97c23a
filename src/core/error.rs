//! 错误类型：记忆、任务图、思维树与协同轮次的前置条件失败
//!
//! 全部为即时返回的本地错误：不自动重试、不静默吞掉。Coordinator 将单个
//! Reasoner 的失败记入 trace（CoordinationResult::failures）而非中止整轮，
//! 仅自身基础设施错误向上传播。

use thiserror::Error;

/// 记忆层错误（VectorIndex / MemoryStore）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// 向量维度与构造时配置不符；条目不会写入，存储保持原状
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// MemoryStore actor 已退出，信箱关闭
    #[error("Memory store mailbox closed")]
    MailboxClosed,
}

/// 任务图（DAG）错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// 重复添加同一节点 ID；图保持原状
    #[error("Node '{0}' already exists")]
    DuplicateNode(String),

    /// 边引用了不存在的节点；图保持原状
    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    /// 拓扑排序遇到环，{0} 为环上的一个节点
    #[error("Cycle detected at node '{0}'")]
    CycleDetected(String),
}

/// 思维树错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// 指定的父思维不存在；树保持原状
    #[error("Parent thought '{0}' does not exist")]
    ParentNotFound(String),
}

/// 协同过程错误（Reasoner / Coordinator）
#[derive(Error, Debug)]
pub enum CoordinationError {
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    /// 单个 Reasoner 超过单次调用时限（硬化策略：记入 trace 而非中止整轮）
    #[error("Reasoner '{agent}' timed out after {ms}ms")]
    Timeout { agent: String, ms: u64 },

    /// fan-out 任务 panic / join 失败
    #[error("Reasoner task '{agent}' panicked")]
    TaskPanicked { agent: String },
}
