//! Hive - Rust 多智能体协同系统
//!
//! 入口：初始化日志与配置，启动 N 个带私有记忆的 Reasoner，预置种子知识，
//! 跑若干协同回合并输出决策 trace。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hive::agents::{strategy_from_config, ContextReasoner, Coordinator, HeuristicEvaluator, Reasoner};
use hive::config::load_config;
use hive::memory::MemoryStoreHandle;

/// 模拟各 agent 的先验知识
const SEED_TEXTS: [&str; 5] = [
    "The system should prioritize safety checks before deploying.",
    "We experimented with lightweight retrieval-augmented generation.",
    "Memory sharding reduces latency for localized queries.",
    "Investigate anomalies in the telemetry pipeline.",
    "Autoscaling may increase cost but reduces latency peaks.",
];

const TASKS: [&str; 3] = [
    "Optimize response latency for user queries",
    "Reduce cost of the cluster while preserving QoS",
    "Investigate telemetry spikes in the past hour",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 日志：默认 info，可通过 RUST_LOG 覆盖
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with(fmt::layer())
        .init();

    let cfg = load_config(None).context("Failed to load config")?;
    let cancel = CancellationToken::new();

    // 每个 Reasoner 独占一个 MemoryStore（嵌入维度来自配置，seed 随实例）
    let reasoners: Vec<Arc<ContextReasoner>> = (0..cfg.agents.n_reasoners)
        .map(|i| {
            let store = MemoryStoreHandle::spawn_default(
                format!("mem-{i}"),
                cfg.memory.embed_dim,
                cancel.child_token(),
            );
            Arc::new(ContextReasoner::new(
                format!("reasoner-{i}"),
                store,
                cfg.agents.top_k,
                cfg.agents.relevance_threshold,
                cfg.memory.sensory_buffer_capacity,
            ))
        })
        .collect();

    // 种子知识轮流分发到各 agent 的私有记忆
    for (i, reasoner) in reasoners.iter().enumerate() {
        for text in SEED_TEXTS.iter().skip(i).step_by(reasoners.len()) {
            reasoner
                .remember(text, HashMap::from([("seed_for".to_string(), json!(format!("mem-{i}")))]))
                .await
                .context("Failed to seed memory")?;
        }
    }

    let evaluator = Arc::new(HeuristicEvaluator::new(
        "eval-1",
        strategy_from_config(&cfg.evaluator),
    ));
    let coordinator = Coordinator::new(
        "meta-1",
        reasoners
            .iter()
            .map(|r| Arc::clone(r) as Arc<dyn Reasoner>)
            .collect(),
        evaluator,
        Duration::from_secs(cfg.agents.timeout_secs),
    );

    for task in TASKS {
        let result = coordinator
            .coordinate_task(task)
            .await
            .context("Coordination round failed")?;

        for introspection in &result.introspections {
            tracing::info!("{introspection}");
        }
        for scored in &result.actions_scored {
            tracing::info!(score = format!("{:.4}", scored.score), action = %scored.action, "ranked");
        }
        match &result.chosen {
            Some(chosen) => tracing::info!(action = %chosen.action, "chosen"),
            None => tracing::warn!(task, "no action chosen"),
        }
    }

    let summary = coordinator.metrics_summary().await;
    tracing::info!(
        agents = summary.total_agents,
        average = summary.average_performance,
        "done"
    );

    cancel.cancel();
    Ok(())
}
