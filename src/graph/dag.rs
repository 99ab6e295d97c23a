//! 任务图：带依赖边的有向无环图与拓扑排序
//!
//! 节点 ID 唯一；边的两端必须已存在（违规即拒绝，不静默丢弃）；允许平行边。
//! 拓扑排序用显式栈迭代 DFS + 白/灰/黑三色标记：深图不会爆栈，遇环快速失败
//! 返回 CycleDetected 而非无限递归。

use std::collections::HashMap;

use crate::core::error::GraphError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// 任务/计划依赖图；T 为节点负载
pub struct TaskGraph<T> {
    nodes: HashMap<String, T>,
    edges: HashMap<String, Vec<String>>,
    /// 节点插入顺序：DFS 根的遍历顺序由此决定，排序结果可复现
    order: Vec<String>,
}

impl<T> TaskGraph<T> {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    pub fn node(&self, id: &str) -> Option<&T> {
        self.nodes.get(id)
    }

    /// 出边邻接表（按添加顺序）
    pub fn neighbors(&self, id: &str) -> Option<&[String]> {
        self.edges.get(id).map(Vec::as_slice)
    }

    /// 添加节点；ID 已存在时拒绝，图保持原状
    pub fn add_node(&mut self, id: impl Into<String>, payload: T) -> Result<(), GraphError> {
        let id = id.into();
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        self.edges.insert(id.clone(), Vec::new());
        self.order.push(id.clone());
        self.nodes.insert(id, payload);
        Ok(())
    }

    /// 添加依赖边 from -> to；任一端不存在时拒绝，图保持原状
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<(), GraphError> {
        if !self.nodes.contains_key(from) {
            return Err(GraphError::NodeNotFound(from.to_string()));
        }
        if !self.nodes.contains_key(to) {
            return Err(GraphError::NodeNotFound(to.to_string()));
        }
        self.edges
            .get_mut(from)
            .expect("edge list created with node")
            .push(to.to_string());
        Ok(())
    }

    /// 拓扑排序（逆后序）：对每条边 u -> v，u 在结果中先于 v；遇环返回 CycleDetected
    pub fn topological_sort(&self) -> Result<Vec<String>, GraphError> {
        let mut color: HashMap<&str, Color> = self
            .order
            .iter()
            .map(|id| (id.as_str(), Color::White))
            .collect();
        let mut output: Vec<String> = Vec::with_capacity(self.nodes.len());

        for root in &self.order {
            if color[root.as_str()] != Color::White {
                continue;
            }
            color.insert(root.as_str(), Color::Gray);
            // (节点, 下一个待访问的子下标)
            let mut stack: Vec<(&str, usize)> = vec![(root.as_str(), 0)];

            while let Some(frame) = stack.last_mut() {
                let node = frame.0;
                let children = self
                    .edges
                    .get(node)
                    .map(Vec::as_slice)
                    .unwrap_or_default();

                if frame.1 < children.len() {
                    let child = children[frame.1].as_str();
                    frame.1 += 1;
                    match color[child] {
                        Color::White => {
                            color.insert(child, Color::Gray);
                            stack.push((child, 0));
                        }
                        // 灰色 = 仍在当前 DFS 路径上，回边成环
                        Color::Gray => return Err(GraphError::CycleDetected(child.to_string())),
                        Color::Black => {}
                    }
                } else {
                    color.insert(node, Color::Black);
                    output.push(node.to_string());
                    stack.pop();
                }
            }
        }

        output.reverse();
        Ok(output)
    }
}

impl<T> Default for TaskGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}
