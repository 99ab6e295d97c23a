//! 可观测性：tracing 初始化与简单性能计数

use std::collections::HashSet;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init() {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with(fmt::layer())
        .init();
}

/// 一条性能记录：agent 与一次取值（如可靠度 1.0 / 0.0）
#[derive(Debug, Clone)]
pub struct PerformanceRecord {
    pub agent_id: String,
    pub value: f64,
}

/// 平面计数器：按 agent 累积性能取值，可求均值与汇总
#[derive(Debug, Default)]
pub struct Metrics {
    records: Vec<PerformanceRecord>,
}

/// 汇总视图
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub total_agents: usize,
    pub average_performance: f64,
    pub samples: usize,
}

impl Metrics {
    pub fn record_performance(&mut self, agent_id: impl Into<String>, value: f64) {
        self.records.push(PerformanceRecord {
            agent_id: agent_id.into(),
            value,
        });
    }

    pub fn average_performance(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        let total: f64 = self.records.iter().map(|r| r.value).sum();
        total / self.records.len() as f64
    }

    pub fn summary(&self) -> MetricsSummary {
        let agents: HashSet<&str> = self.records.iter().map(|r| r.agent_id.as_str()).collect();
        MetricsSummary {
            total_agents: agents.len(),
            average_performance: self.average_performance(),
            samples: self.records.len(),
        }
    }

    pub fn reset(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_of_empty_is_zero() {
        assert_eq!(Metrics::default().average_performance(), 0.0);
    }

    #[test]
    fn test_summary_counts_distinct_agents() {
        let mut m = Metrics::default();
        m.record_performance("a", 1.0);
        m.record_performance("a", 0.0);
        m.record_performance("b", 1.0);
        let s = m.summary();
        assert_eq!(s.total_agents, 2);
        assert_eq!(s.samples, 3);
        assert!((s.average_performance - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_clears_records() {
        let mut m = Metrics::default();
        m.record_performance("a", 1.0);
        m.reset();
        assert_eq!(m.summary().samples, 0);
    }
}
