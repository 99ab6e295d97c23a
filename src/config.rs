//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `HIVE__*` 覆盖（双下划线表示嵌套，
//! 如 `HIVE__AGENTS__N_REASONERS=5`）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub agents: AgentsSection,
    pub memory: MemorySection,
    pub evaluator: EvaluatorSection,
}

/// [app] 段：应用名
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppSection {
    pub name: Option<String>,
}

/// [agents] 段：Reasoner 数量与协同参数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentsSection {
    /// 注册的 Reasoner 个数
    pub n_reasoners: usize,
    /// 每次检索的 top-k
    pub top_k: usize,
    /// 相关记忆采信阈值：超过才延展，否则提议调查
    pub relevance_threshold: f32,
    /// 单个 Reasoner 的单次调用时限（秒）
    pub timeout_secs: u64,
}

impl Default for AgentsSection {
    fn default() -> Self {
        Self {
            n_reasoners: 3,
            top_k: 3,
            relevance_threshold: 0.1,
            timeout_secs: 5,
        }
    }
}

/// [memory] 段：嵌入维度与感知缓冲容量
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemorySection {
    /// 每个 MemoryStore 的向量维度（构造后固定）
    pub embed_dim: usize,
    /// 感知缓冲容量，满时最旧先淘汰
    pub sensory_buffer_capacity: usize,
}

impl Default for MemorySection {
    fn default() -> Self {
        Self {
            embed_dim: 64,
            sensory_buffer_capacity: 100,
        }
    }
}

/// [evaluator] 段：评分策略选择与参数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EvaluatorSection {
    /// 策略名（当前内置 brevity_novelty）
    pub strategy: String,
    /// 新颖性关键词：action 含该词加 bonus
    pub novelty_keyword: String,
    pub novelty_bonus: f32,
}

impl Default for EvaluatorSection {
    fn default() -> Self {
        Self {
            strategy: "brevity_novelty".to_string(),
            novelty_keyword: "investigate".to_string(),
            novelty_bonus: 0.2,
        }
    }
}

/// 加载配置：
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 HIVE__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("HIVE")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

/// 重新从磁盘与环境变量加载配置（运行时热更新用）
pub fn reload_config() -> Result<AppConfig, config::ConfigError> {
    load_config(None)
}
