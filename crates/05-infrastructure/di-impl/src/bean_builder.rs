//! bean 构建器

use crate::injector::Injector;
use async_trait::async_trait;
use di_abstractions::{
    BeanArgs, BeanDefinition, BeanRef, BeanStrategy, DependencyResult, ObjectFactory,
    ResolveContext,
};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::debug;

/// 按 bean 定义构建实例的对象工厂
///
/// 依赖请求按声明顺序同时发出，全部完成后按声明顺序传给构造函数；
/// 任一依赖失败则整个构建失败。
pub struct BeanBuilder {
    injector: Arc<Injector>,
    definition: Arc<BeanDefinition>,
    context: ResolveContext,
}

impl BeanBuilder {
    /// 创建 bean 构建器
    pub fn new(
        injector: Arc<Injector>,
        definition: Arc<BeanDefinition>,
        context: ResolveContext,
    ) -> Self {
        Self {
            injector,
            definition,
            context,
        }
    }

    /// 正在构建的 bean 定义
    pub fn definition(&self) -> &BeanDefinition {
        &self.definition
    }
}

impl std::fmt::Debug for BeanBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanBuilder")
            .field("injector", &self.injector.id())
            .field("definition", &self.definition)
            .field("depth", &self.context.depth())
            .finish()
    }
}

#[async_trait]
impl ObjectFactory for BeanBuilder {
    async fn build(&self) -> DependencyResult<BeanRef> {
        let (dependencies, constructor) = match self.definition.strategy() {
            BeanStrategy::Type {
                dependencies,
                constructor,
                ..
            } => (dependencies, constructor),
            BeanStrategy::Builder {
                dependencies,
                builder,
            } => (dependencies, builder),
            BeanStrategy::Instance(instance) => return Ok(instance.clone()),
            BeanStrategy::Injector => return Ok(Arc::clone(&self.injector) as BeanRef),
        };

        debug!(
            "构建 bean: {}，依赖: {:?}",
            self.definition.name(),
            dependencies
        );

        let pending = dependencies
            .iter()
            .map(|dependency| self.injector.resolve(dependency, self.context.clone()));
        let values = try_join_all(pending).await?;

        constructor(BeanArgs::new(dependencies.clone(), values)).await
    }
}
