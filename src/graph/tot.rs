//! 思维树：候选推理分支的展开与剪枝（tree-of-thoughts 搜索的载体）
//!
//! 每个思维映射到其子思维列表；无父者为根。剪枝只摘除目标思维本身并清洗所有
//! 子列表引用（不留悬挂引用）；后代保留为孤儿条目，需单独剪枝——搜索循环常会
//! 把分支重新挂接，所以不做级联删除。

use std::collections::{HashMap, HashSet};

use crate::core::error::TreeError;

/// 多叉思维树
pub struct ThoughtTree {
    /// 思维 ID -> 子思维 ID（按加入顺序）
    thoughts: HashMap<String, Vec<String>>,
}

impl ThoughtTree {
    pub fn new() -> Self {
        Self {
            thoughts: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.thoughts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thoughts.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.thoughts.contains_key(id)
    }

    /// 某思维的子列表；思维不存在时为 None
    pub fn children(&self, id: &str) -> Option<&[String]> {
        self.thoughts.get(id).map(Vec::as_slice)
    }

    /// 不出现在任何子列表中的思维（按任意顺序）
    pub fn roots(&self) -> Vec<&str> {
        let referenced: HashSet<&str> = self
            .thoughts
            .values()
            .flat_map(|children| children.iter().map(String::as_str))
            .collect();
        self.thoughts
            .keys()
            .map(String::as_str)
            .filter(|id| !referenced.contains(id))
            .collect()
    }

    /// 加入思维：无父 ID 时注册为根；有父 ID 时父必须已存在（否则拒绝，树保持原状），
    /// 并把新思维挂到父的子列表尾部
    pub fn add_thought(
        &mut self,
        id: impl Into<String>,
        parent: Option<&str>,
    ) -> Result<(), TreeError> {
        let id = id.into();
        if let Some(parent) = parent {
            if !self.thoughts.contains_key(parent) {
                return Err(TreeError::ParentNotFound(parent.to_string()));
            }
            self.thoughts
                .get_mut(parent)
                .expect("parent checked above")
                .push(id.clone());
        }
        self.thoughts.entry(id).or_default();
        Ok(())
    }

    /// 剪枝：删除该思维的条目，并从所有其他思维的子列表中清洗其引用。
    /// 后代不被级联删除：它们脱离遍历面但条目仍在，需单独剪枝。
    pub fn prune_thoughts(&mut self, id: &str) {
        self.thoughts.remove(id);
        for children in self.thoughts.values_mut() {
            children.retain(|c| c != id);
        }
    }
}

impl Default for ThoughtTree {
    fn default() -> Self {
        Self::new()
    }
}
