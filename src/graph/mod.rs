//! 图结构层：任务依赖图（DAG）与思维树

pub mod dag;
pub mod tot;

pub use dag::TaskGraph;
pub use tot::ThoughtTree;
