//! Hive - Rust 多智能体协同系统
//!
//! 模块划分：
//! - **agents**: 三种角色——Reasoner（感知-行动）、Evaluator（启发式排名）、Coordinator（scatter/gather）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型
//! - **embedding**: 确定性嵌入与余弦相似度
//! - **graph**: 任务依赖图（DAG）与思维树
//! - **memory**: 向量索引、MemoryStore actor、分层记忆
//! - **observability**: tracing 初始化与性能计数

pub mod agents;
pub mod config;
pub mod core;
pub mod embedding;
pub mod graph;
pub mod memory;
pub mod observability;

pub use agents::{Coordinator, CoordinationResult};
pub use memory::MemoryStoreHandle;
