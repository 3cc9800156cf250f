//! 以注入器解析参数并调用函数

use crate::injector::Injector;
use di_abstractions::{BeanArgs, BeanRef, DependencyError, DependencyResult};
use futures::future::{self, try_join_all, FutureExt};
use std::sync::Arc;
use tracing::debug;

/// 解析 `dependencies` 后调用 `f`
///
/// `overrides` 按位置覆盖依赖：第 `i` 个覆盖值存在时直接使用，不再解析
/// 第 `i` 个依赖；超出依赖个数的覆盖值被忽略。全部待解析的依赖同时发出，
/// 任一失败则不调用 `f`。
pub async fn injector_call<R, F, I>(
    injector: &Arc<Injector>,
    dependencies: I,
    overrides: Vec<BeanRef>,
    f: F,
) -> DependencyResult<R>
where
    F: FnOnce(BeanArgs) -> DependencyResult<R>,
    I: IntoIterator,
    I::Item: Into<String>,
{
    let args = resolve_arguments(injector, dependencies, overrides).await?;
    f(args)
}

/// 以 `receiver` 为接收者解析 `dependencies` 后调用 `f`
///
/// 覆盖规则与 [`injector_call`] 相同。
pub async fn injector_invoke<S, R, F, I>(
    injector: &Arc<Injector>,
    receiver: &S,
    dependencies: I,
    overrides: Vec<BeanRef>,
    f: F,
) -> DependencyResult<R>
where
    S: ?Sized,
    F: FnOnce(&S, BeanArgs) -> DependencyResult<R>,
    I: IntoIterator,
    I::Item: Into<String>,
{
    let args = resolve_arguments(injector, dependencies, overrides).await?;
    f(receiver, args)
}

async fn resolve_arguments<I>(
    injector: &Arc<Injector>,
    dependencies: I,
    overrides: Vec<BeanRef>,
) -> DependencyResult<BeanArgs>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let names: Vec<String> = dependencies.into_iter().map(Into::into).collect();
    let mut overrides = overrides.into_iter();

    debug!("解析调用参数: {:?}", names);

    let pending = names.iter().map(|name| match overrides.next() {
        Some(value) => future::ready(Ok::<_, DependencyError>(value)).boxed(),
        None => injector.get_bean(name).boxed(),
    });
    let values = try_join_all(pending.collect::<Vec<_>>()).await?;

    Ok(BeanArgs::new(names, values))
}
