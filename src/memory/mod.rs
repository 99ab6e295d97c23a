//! 记忆层：向量索引、MemoryStore actor、分层记忆

pub mod hierarchical;
pub mod index;
pub mod store;

pub use hierarchical::{HierarchicalMemory, MemorySnapshot};
pub use index::{MemoryEntry, MemoryRecord, ScoredResult, VectorIndex};
pub use store::{MemoryStoreHandle, StoreAck};
