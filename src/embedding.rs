//! 嵌入：确定性向量生成与余弦相似度
//!
//! embed(text) 是文本加 owner seed 的纯函数：同一文本 + 同一 seed 必得同一向量，
//! 检索结果可确定性复现。不依赖外部模型服务；需要真实模型时实现 Embedder 即可替换。

/// 零向量保护用 ε（分母 ‖v‖+ε，避免除零）
pub const EPSILON: f32 = 1e-8;

/// 嵌入提供方：每个 MemoryStore 构造时显式注入（维度与 seed 随实例固定，无全局状态）
pub trait Embedder: Send + Sync {
    /// 向量维度（构造时固定）
    fn dim(&self) -> usize;

    /// 将文本编码为 dim 维向量
    fn embed(&self, text: &str) -> Vec<f32>;
}

/// 哈希嵌入：FNV-1a 哈希文本、混入 seed，用 splitmix64 生成 [-1,1) 分量并做 L2 归一化
pub struct HashEmbedder {
    dim: usize,
    seed: u64,
}

impl HashEmbedder {
    pub fn new(dim: usize, seed: u64) -> Self {
        Self { dim, seed }
    }
}

/// FNV-1a：跨进程稳定的文本哈希（std 的 DefaultHasher 不保证跨版本稳定）
fn fnv1a(text: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for b in text.as_bytes() {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// splitmix64：确定性伪随机序列，种子即状态
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut state = fnv1a(text) ^ self.seed;
        let mut vec: Vec<f32> = (0..self.dim)
            .map(|_| {
                let r = splitmix64(&mut state);
                // 取高 24 位映射到 [-1, 1)
                (r >> 40) as f32 / (1u64 << 23) as f32 - 1.0
            })
            .collect();
        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        for x in vec.iter_mut() {
            *x /= norm + EPSILON;
        }
        vec
    }
}

/// 余弦相似度：dot / ((‖a‖+ε)(‖b‖+ε))；长度不一致或为空时返回 0.0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    dot / ((norm_a + EPSILON) * (norm_b + EPSILON))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_deterministic() {
        let embedder = HashEmbedder::new(64, 42);
        let a = embedder.embed("hello world");
        let b = embedder.embed("hello world");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_embed_seed_changes_vector() {
        let a = HashEmbedder::new(64, 1).embed("hello");
        let b = HashEmbedder::new(64, 2).embed("hello");
        assert_ne!(a, b);
    }

    #[test]
    fn test_embed_is_normalized() {
        let v = HashEmbedder::new(32, 7).embed("normalize me");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_self_similarity_is_one() {
        let v = HashEmbedder::new(64, 0).embed("self similarity");
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_orthogonal_and_degenerate() {
        let a = vec![1.0, 0.0, 0.0];
        let c = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &c).abs() < 0.001);

        // 长度不一致 / 空输入 / 零向量都不应 panic
        assert_eq!(cosine_similarity(&a, &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        let zero = vec![0.0, 0.0, 0.0];
        assert!(cosine_similarity(&a, &zero).abs() < 0.001);
    }
}
