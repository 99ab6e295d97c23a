//! agent 层：Reasoner / Evaluator / Coordinator 三种角色与跨 actor 记录类型

pub mod coordinator;
pub mod evaluator;
pub mod reasoner;
pub mod types;

pub use coordinator::Coordinator;
pub use evaluator::{strategy_from_config, BrevityNovelty, Evaluator, HeuristicEvaluator, ScoringStrategy};
pub use reasoner::{ContextReasoner, Reasoner};
pub use types::{AgentFailure, CoordinationResult, ReasonerOutput, ScoredAction};
