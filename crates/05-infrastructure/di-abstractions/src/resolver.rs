//! 解析上下文
//!
//! 记录一条解析链上正在构建的 (注入器, bean) 组合，用于检测循环依赖。
//! 并发解析的各个分支各自持有上下文的副本。

use infrastructure_common::{DependencyError, DependencyResult};
use std::fmt;
use uuid::Uuid;

/// 解析链上的一个节点
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolutionKey {
    /// 构建该 bean 的注入器
    pub injector_id: Uuid,
    /// bean 名称
    pub name: String,
}

impl fmt::Display for ResolutionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// 解析上下文
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// 当前解析链，用于检测循环依赖
    pub resolution_chain: Vec<ResolutionKey>,
    /// 解析选项
    pub options: ResolveOptions,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(options: ResolveOptions) -> Self {
        Self {
            resolution_chain: Vec::new(),
            options,
        }
    }

    /// 进入一个 bean 的构建，返回子分支使用的上下文
    pub fn enter(&self, injector_id: Uuid, name: &str) -> DependencyResult<Self> {
        let key = ResolutionKey {
            injector_id,
            name: name.to_string(),
        };

        if self.resolution_chain.contains(&key) {
            let chain = self
                .resolution_chain
                .iter()
                .chain(std::iter::once(&key))
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" -> ");

            return Err(DependencyError::CircularDependency {
                dependency_chain: chain,
            });
        }

        if self.resolution_chain.len() >= self.options.max_depth {
            return Err(DependencyError::ResolutionDepthExceeded {
                name: key.name,
                max_depth: self.options.max_depth,
            });
        }

        let mut next = self.clone();
        next.resolution_chain.push(key);
        Ok(next)
    }

    /// 当前解析深度
    pub fn depth(&self) -> usize {
        self.resolution_chain.len()
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new(ResolveOptions::default())
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
