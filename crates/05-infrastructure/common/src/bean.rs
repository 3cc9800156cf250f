//! bean 实例引用
//!
//! 容器不关心 bean 的具体类型，实例统一以 [`BeanRef`] 的形式保存和传递，
//! 使用方通过 [`FromBean`] 取回具体类型。

use crate::errors::{DependencyError, DependencyResult};
use std::any::{type_name, Any};
use std::sync::Arc;

/// bean 实例引用
pub type BeanRef = Arc<dyn Any + Send + Sync>;

/// 将值包装为 bean 实例引用
pub fn into_bean<T>(value: T) -> BeanRef
where
    T: Any + Send + Sync,
{
    Arc::new(value)
}

/// 从 bean 实例引用转换为具体类型
pub trait FromBean: Sized {
    /// 转换 bean，`name` 仅用于错误信息
    fn from_bean(name: &str, bean: BeanRef) -> DependencyResult<Self>;
}

impl<T> FromBean for Arc<T>
where
    T: Any + Send + Sync,
{
    fn from_bean(name: &str, bean: BeanRef) -> DependencyResult<Self> {
        bean.downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>().to_string(),
            })
    }
}

impl FromBean for BeanRef {
    fn from_bean(_name: &str, bean: BeanRef) -> DependencyResult<Self> {
        Ok(bean)
    }
}
