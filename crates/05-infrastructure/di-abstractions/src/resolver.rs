//! 组件解析上下文
//!
//! 记录当前解析链，用于检测循环依赖和限制解析深度

use infrastructure_common::{DependencyError, DependencyResult};

/// 解析上下文
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// 当前解析链
    pub resolution_chain: Vec<String>,
    /// 解析选项
    pub options: ResolveOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new() -> Self {
        Self::with_options(ResolveOptions::default())
    }

    pub fn with_options(options: ResolveOptions) -> Self {
        Self {
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 添加名称到解析链
    pub fn push(&mut self, name: &str) -> DependencyResult<()> {
        if self.resolution_chain.iter().any(|n| n == name) {
            return Err(DependencyError::CircularDependency {
                dependency_chain: format!("{} -> {}", self.resolution_chain.join(" -> "), name),
            });
        }
        if self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::CircularDependency {
                dependency_chain: format!(
                    "解析深度超过 {}: {} -> {}",
                    self.options.max_depth,
                    self.resolution_chain.join(" -> "),
                    name
                ),
            });
        }
        self.resolution_chain.push(name.to_string());
        Ok(())
    }

    /// 从解析链中移除最后一个名称
    pub fn pop(&mut self) {
        self.resolution_chain.pop();
    }

    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 解析选项
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// 最大递归深度
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { max_depth: 100 }
    }
}
