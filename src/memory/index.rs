//! 向量索引：单 owner 的 (text, vector, metadata, timestamp) 条目序列
//!
//! 保持插入顺序：相同分数时先插入的条目排前，保证重复查询结果确定。
//! 条目一经写入不可变；向量是检索内部产物，dump() 不对外暴露。

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::MemoryError;
use crate::embedding::cosine_similarity;

/// 一条记忆：写入后不可变，仅以序列化副本跨 actor 边界
#[derive(Debug, Clone)]
pub struct MemoryEntry {
    pub text: String,
    pub vector: Vec<f32>,
    pub metadata: HashMap<String, Value>,
    pub timestamp: DateTime<Utc>,
}

/// 查询命中：瞬态结果，不持久化
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResult {
    pub text: String,
    pub score: f32,
    pub metadata: HashMap<String, Value>,
}

/// dump() 返回的外部可见条目（不含向量）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: HashMap<String, Value>,
}

/// 向量索引：固定维度，插入序即排序稳定性的依据
pub struct VectorIndex {
    dim: usize,
    entries: Vec<MemoryEntry>,
}

impl VectorIndex {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 追加一条记忆；向量维度不符时拒绝写入，索引保持原状
    pub fn add(
        &mut self,
        text: impl Into<String>,
        vector: Vec<f32>,
        metadata: HashMap<String, Value>,
    ) -> Result<(), MemoryError> {
        if vector.len() != self.dim {
            return Err(MemoryError::DimensionMismatch {
                expected: self.dim,
                actual: vector.len(),
            });
        }
        self.entries.push(MemoryEntry {
            text: text.into(),
            vector,
            metadata,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// top-k 余弦检索：分数降序，相同分数按插入序（稳定排序）；k 超界自动收窄，空索引返回空
    pub fn query(&self, query_vector: &[f32], k: usize) -> Vec<ScoredResult> {
        let mut scored: Vec<(f32, &MemoryEntry)> = self
            .entries
            .iter()
            .map(|e| (cosine_similarity(query_vector, &e.vector), e))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(k.min(self.entries.len()))
            .map(|(score, e)| ScoredResult {
                text: e.text.clone(),
                score,
                metadata: e.metadata.clone(),
            })
            .collect()
    }

    /// 按插入序返回全部条目（不含向量）
    pub fn dump(&self) -> Vec<MemoryRecord> {
        self.entries
            .iter()
            .map(|e| MemoryRecord {
                text: e.text.clone(),
                timestamp: e.timestamp,
                metadata: e.metadata.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::{Embedder, HashEmbedder};

    fn index_with(texts: &[&str]) -> (VectorIndex, HashEmbedder) {
        let embedder = HashEmbedder::new(64, 42);
        let mut index = VectorIndex::new(64);
        for t in texts {
            index
                .add(*t, embedder.embed(t), HashMap::new())
                .unwrap();
        }
        (index, embedder)
    }

    #[test]
    fn test_query_sorted_descending() {
        let (index, embedder) = index_with(&["alpha", "beta", "gamma", "delta"]);
        let results = index.query(&embedder.embed("alpha"), 4);
        assert_eq!(results.len(), 4);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        // 完全相同文本的向量必然排第一，自相似度 ≈ 1
        assert_eq!(results[0].text, "alpha");
        assert!((results[0].score - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_query_tie_breaks_by_insertion_order() {
        // 相同文本向量相同 → 分数完全相等，先插入者在前（以 metadata 区分条目）
        let embedder = HashEmbedder::new(64, 42);
        let mut index = VectorIndex::new(64);
        for i in 0..3 {
            let metadata = HashMap::from([("pos".to_string(), serde_json::json!(i))]);
            index.add("same", embedder.embed("same"), metadata).unwrap();
        }

        let results = index.query(&embedder.embed("other"), 3);
        assert_eq!(results.len(), 3);
        assert!((results[0].score - results[1].score).abs() < f32::EPSILON);
        assert!((results[1].score - results[2].score).abs() < f32::EPSILON);
        for (i, r) in results.iter().enumerate() {
            assert_eq!(r.metadata.get("pos"), Some(&serde_json::json!(i)));
        }
    }

    #[test]
    fn test_query_empty_index_returns_empty() {
        let index = VectorIndex::new(8);
        assert!(index.query(&[0.0; 8], 5).is_empty());
    }

    #[test]
    fn test_k_clamped_to_len() {
        let (index, embedder) = index_with(&["one", "two"]);
        assert_eq!(index.query(&embedder.embed("one"), 100).len(), 2);
        assert_eq!(index.query(&embedder.embed("one"), 1).len(), 1);
    }

    #[test]
    fn test_dimension_mismatch_leaves_index_unchanged() {
        let mut index = VectorIndex::new(4);
        let err = index.add("bad", vec![1.0; 3], HashMap::new()).unwrap_err();
        assert_eq!(
            err,
            MemoryError::DimensionMismatch {
                expected: 4,
                actual: 3
            }
        );
        assert!(index.is_empty());
    }

    #[test]
    fn test_dump_has_no_vectors_and_keeps_order() {
        let (index, _) = index_with(&["first", "second"]);
        let records = index.dump();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text, "first");
        assert_eq!(records[1].text, "second");
    }
}
