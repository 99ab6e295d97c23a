//! MemoryStore actor：独占持有一个 VectorIndex 的 tokio 任务
//!
//! 唯一的读写入口是 mpsc 命令信箱 + oneshot 回执；状态从不以可变引用跨出
//! actor 边界。单写者纪律：每个 handle 由恰好一个 Reasoner 持有（handle 不实现
//! Clone），多写者会破坏 metadata.source 的归属语义。

use std::collections::HashMap;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::core::error::MemoryError;
use crate::embedding::{Embedder, HashEmbedder};
use crate::memory::index::{MemoryRecord, ScoredResult, VectorIndex};

/// add 成功回执（stored 为原文，便于调用方核对）
#[derive(Debug, Clone)]
pub struct StoreAck {
    pub stored: String,
}

enum StoreCommand {
    Add {
        text: String,
        metadata: HashMap<String, Value>,
        reply: oneshot::Sender<Result<StoreAck, MemoryError>>,
    },
    Query {
        text: String,
        top_k: usize,
        reply: oneshot::Sender<Vec<ScoredResult>>,
    },
    Dump {
        reply: oneshot::Sender<Vec<MemoryRecord>>,
    },
}

/// MemoryStore 的外部接口：所有方法经信箱往返，actor 退出后返回 MailboxClosed
pub struct MemoryStoreHandle {
    name: String,
    tx: mpsc::Sender<StoreCommand>,
}

impl MemoryStoreHandle {
    /// 启动一个 MemoryStore actor；嵌入函数与维度在此显式注入，无全局状态
    pub fn spawn(
        name: impl Into<String>,
        embedder: Box<dyn Embedder>,
        cancel: CancellationToken,
    ) -> Self {
        let name = name.into();
        let (tx, rx) = mpsc::channel(32);
        let store = MemoryStore {
            name: name.clone(),
            index: VectorIndex::new(embedder.dim()),
            embedder,
        };
        tokio::spawn(store.run(rx, cancel));
        Self { name, tx }
    }

    /// 便捷构造：每个实例用随机 id 派生 seed 的 HashEmbedder（同实例内嵌入确定）
    pub fn spawn_default(name: impl Into<String>, dim: usize, cancel: CancellationToken) -> Self {
        let id = Uuid::new_v4();
        let seed = u64::from_le_bytes(id.as_bytes()[..8].try_into().expect("uuid has 16 bytes"));
        Self::spawn(name, Box::new(HashEmbedder::new(dim, seed)), cancel)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 写入一条观察；嵌入失败（维度不符）时不产生任何条目
    pub async fn add(
        &self,
        text: &str,
        metadata: HashMap<String, Value>,
    ) -> Result<StoreAck, MemoryError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::Add {
                text: text.to_string(),
                metadata,
                reply,
            })
            .await
            .map_err(|_| MemoryError::MailboxClosed)?;
        rx.await.map_err(|_| MemoryError::MailboxClosed)?
    }

    /// 只读检索：不改变存储状态
    pub async fn query(&self, text: &str, top_k: usize) -> Result<Vec<ScoredResult>, MemoryError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::Query {
                text: text.to_string(),
                top_k,
                reply,
            })
            .await
            .map_err(|_| MemoryError::MailboxClosed)?;
        rx.await.map_err(|_| MemoryError::MailboxClosed)
    }

    /// 按插入序返回全部条目（不含向量），供检查 / 调试
    pub async fn dump(&self) -> Result<Vec<MemoryRecord>, MemoryError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(StoreCommand::Dump { reply })
            .await
            .map_err(|_| MemoryError::MailboxClosed)?;
        rx.await.map_err(|_| MemoryError::MailboxClosed)
    }
}

/// actor 本体：状态私有，命令循环内单线程处理
struct MemoryStore {
    name: String,
    index: VectorIndex,
    embedder: Box<dyn Embedder>,
}

impl MemoryStore {
    async fn run(mut self, mut rx: mpsc::Receiver<StoreCommand>, cancel: CancellationToken) {
        tracing::debug!(store = %self.name, dim = self.index.dim(), "memory store started");
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                cmd = rx.recv() => {
                    let Some(cmd) = cmd else { break };
                    self.handle(cmd);
                }
            }
        }
        tracing::debug!(store = %self.name, entries = self.index.len(), "memory store stopped");
    }

    fn handle(&mut self, cmd: StoreCommand) {
        match cmd {
            StoreCommand::Add {
                text,
                metadata,
                reply,
            } => {
                let vector = self.embedder.embed(&text);
                let result = self
                    .index
                    .add(text.clone(), vector, metadata)
                    .map(|_| StoreAck { stored: text });
                let _ = reply.send(result);
            }
            StoreCommand::Query {
                text,
                top_k,
                reply,
            } => {
                let qvec = self.embedder.embed(&text);
                let _ = reply.send(self.index.query(&qvec, top_k));
            }
            StoreCommand::Dump { reply } => {
                let _ = reply.send(self.index.dump());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// 声称 dim=4 但产出 3 维向量的坏嵌入，用于触发 DimensionMismatch
    struct BrokenEmbedder;

    impl Embedder for BrokenEmbedder {
        fn dim(&self) -> usize {
            4
        }

        fn embed(&self, _text: &str) -> Vec<f32> {
            vec![1.0, 0.0, 0.0]
        }
    }

    fn test_store(name: &str) -> MemoryStoreHandle {
        MemoryStoreHandle::spawn(
            name,
            Box::new(HashEmbedder::new(64, 7)),
            CancellationToken::new(),
        )
    }

    #[tokio::test]
    async fn test_add_and_dump() {
        let store = test_store("mem-a");
        let ack = store
            .add("hello", HashMap::from([("source".to_string(), json!("r-0"))]))
            .await
            .unwrap();
        assert_eq!(ack.stored, "hello");

        let records = store.dump().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "hello");
        assert_eq!(records[0].metadata.get("source"), Some(&json!("r-0")));
    }

    #[tokio::test]
    async fn test_query_ranks_closer_text_first() {
        let store = test_store("mem-b");
        store.add("hello", HashMap::new()).await.unwrap();
        store.add("hello world", HashMap::new()).await.unwrap();

        let results = store.query("hello", 1).await.unwrap();
        assert_eq!(results.len(), 1);
        // 与查询完全一致的条目相似度为 1，必然胜出
        assert_eq!(results[0].text, "hello");
    }

    #[tokio::test]
    async fn test_query_empty_store() {
        let store = test_store("mem-c");
        assert!(store.query("anything", 3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dimension_mismatch_rejects_add() {
        let store = MemoryStoreHandle::spawn(
            "mem-d",
            Box::new(BrokenEmbedder),
            CancellationToken::new(),
        );
        let err = store.add("bad", HashMap::new()).await.unwrap_err();
        assert_eq!(
            err,
            MemoryError::DimensionMismatch {
                expected: 4,
                actual: 3
            }
        );
        assert!(store.dump().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_store_reports_mailbox_closed() {
        let cancel = CancellationToken::new();
        let store =
            MemoryStoreHandle::spawn("mem-e", Box::new(HashEmbedder::new(8, 1)), cancel.clone());
        cancel.cancel();
        // actor 退出后信箱关闭
        tokio::task::yield_now().await;
        let mut saw_closed = false;
        for _ in 0..10 {
            match store.add("late", HashMap::new()).await {
                Err(MemoryError::MailboxClosed) => {
                    saw_closed = true;
                    break;
                }
                _ => tokio::task::yield_now().await,
            }
        }
        assert!(saw_closed);
    }
}
