//! 作用域抽象接口
//!
//! 作用域决定 bean 实例是否被缓存、如何复用以及何时销毁。

use crate::definition::DestroyCallback;
use async_trait::async_trait;
use infrastructure_common::{BeanRef, DependencyResult};

/// 单例作用域名称
pub const SINGLETON_SCOPE: &str = "singleton";

/// 原型作用域名称
pub const PROTOTYPE_SCOPE: &str = "prototype";

/// 对象工厂 trait
///
/// 作用域中没有可用实例时调用，负责解析依赖并构造新实例。
#[async_trait]
pub trait ObjectFactory: Send + Sync {
    /// 构造新实例
    async fn build(&self) -> DependencyResult<BeanRef>;
}

/// 作用域 trait
#[async_trait]
pub trait Scope: Send + Sync {
    /// 获取名为 `name` 的实例，缓存未命中时使用 `factory` 构造
    async fn get(
        &self,
        name: &str,
        factory: Box<dyn ObjectFactory>,
        on_destroy: Option<DestroyCallback>,
    ) -> DependencyResult<BeanRef>;

    /// 销毁作用域，对保留的实例调用销毁回调
    fn destroy(&self);
}
