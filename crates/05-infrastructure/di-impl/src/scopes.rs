//! 内置作用域实现

use async_trait::async_trait;
use di_abstractions::{
    BeanRef, DependencyError, DependencyResult, DestroyCallback, ObjectFactory, Scope,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// 原型作用域
///
/// 每次解析都创建新实例，实例不被跟踪，因此销毁时没有任何动作。
#[derive(Debug, Default)]
pub struct PrototypeScope;

impl PrototypeScope {
    /// 创建原型作用域
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Scope for PrototypeScope {
    async fn get(
        &self,
        name: &str,
        factory: Box<dyn ObjectFactory>,
        _on_destroy: Option<DestroyCallback>,
    ) -> DependencyResult<BeanRef> {
        debug!("原型作用域创建实例: {}", name);
        factory.build().await
    }

    fn destroy(&self) {}
}

/// 单例作用域
///
/// 每个名称只保留一个实例。同一名称的并发首次请求共享同一次构建；
/// 构建失败不会被缓存，下一次请求会重新构建。
#[derive(Default)]
pub struct SingletonScope {
    /// 实例缓存，每个名称一个初始化单元
    storage: Mutex<HashMap<String, Arc<OnceCell<BeanRef>>>>,
    /// 销毁回调
    destroy_callbacks: Mutex<HashMap<String, DestroyCallback>>,
}

impl SingletonScope {
    /// 创建单例作用域
    pub fn new() -> Self {
        Self::default()
    }

    /// 已缓存的实例数量
    pub fn len(&self) -> usize {
        self.storage
            .lock()
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    /// 是否没有缓存实例
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell(&self, name: &str) -> Arc<OnceCell<BeanRef>> {
        self.storage
            .lock()
            .entry(name.to_string())
            .or_default()
            .clone()
    }
}

impl std::fmt::Debug for SingletonScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingletonScope")
            .field("instances", &self.len())
            .field("destroy_callbacks", &self.destroy_callbacks.lock().len())
            .finish()
    }
}

#[async_trait]
impl Scope for SingletonScope {
    async fn get(
        &self,
        name: &str,
        factory: Box<dyn ObjectFactory>,
        on_destroy: Option<DestroyCallback>,
    ) -> DependencyResult<BeanRef> {
        let cell = self.cell(name);

        if let Some(instance) = cell.get() {
            debug!("单例缓存命中: {}", name);
            return Ok(instance.clone());
        }

        let instance = cell
            .get_or_try_init(|| async move {
                debug!("单例作用域创建实例: {}", name);
                let instance = factory.build().await?;

                if let Some(callback) = on_destroy {
                    self.destroy_callbacks
                        .lock()
                        .insert(name.to_string(), callback);
                }

                Ok::<_, DependencyError>(instance)
            })
            .await?;

        Ok(instance.clone())
    }

    fn destroy(&self) {
        let callbacks: Vec<_> = self.destroy_callbacks.lock().drain().collect();
        let storage = std::mem::take(&mut *self.storage.lock());

        info!(
            "销毁单例作用域: {} 个实例, {} 个销毁回调",
            storage.len(),
            callbacks.len()
        );

        for (name, callback) in callbacks {
            if let Some(instance) = storage.get(&name).and_then(|cell| cell.get()) {
                debug!("调用销毁回调: {}", name);
                callback(instance.clone());
            }
        }
    }
}
