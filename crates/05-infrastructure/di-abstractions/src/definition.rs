//! bean 定义
//!
//! 模块通过 [`ModuleEntry`] 的链式方法描述一个 bean，模块执行结束后
//! 由模块读取器冻结为不可变的 [`BeanDefinition`]。

use crate::scope::SINGLETON_SCOPE;
use futures::future::{self, BoxFuture, FutureExt};
use infrastructure_common::{into_bean, BeanRef, DependencyError, DependencyResult, FromBean};
use std::any::{type_name, Any};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// 构造 bean 的异步结果
pub type BeanFuture = BoxFuture<'static, DependencyResult<BeanRef>>;

/// bean 构造函数，接收按声明顺序解析好的依赖
pub type BeanConstructor = Arc<dyn Fn(BeanArgs) -> BeanFuture + Send + Sync>;

/// 作用域销毁时对已构建实例调用的回调
pub type DestroyCallback = Arc<dyn Fn(BeanRef) + Send + Sync>;

/// 没有依赖的构建函数使用的空依赖列表
pub const NO_DEPENDENCIES: [&str; 0] = [];

/// 可由容器构造的类型
///
/// `dependencies` 按构造参数的声明顺序给出依赖的 bean 名称，
/// 容器解析完全部依赖后以同样的顺序传给 `construct`。
/// 通常通过 `#[derive(Injectable)]` 生成。
pub trait Injectable: Any + Send + Sync + Sized {
    /// 依赖的 bean 名称
    fn dependencies() -> &'static [&'static str];

    /// 使用解析好的依赖构造实例
    fn construct(args: BeanArgs) -> DependencyResult<Self>;
}

/// 已解析的依赖参数
#[derive(Clone, Default)]
pub struct BeanArgs {
    names: Vec<String>,
    values: Vec<BeanRef>,
}

impl BeanArgs {
    /// 创建参数列表，`names` 与 `values` 按位置对应
    pub fn new(names: Vec<String>, values: Vec<BeanRef>) -> Self {
        Self { names, values }
    }

    /// 参数个数
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否没有参数
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 按位置取出参数并转换为具体类型
    pub fn get<T: FromBean>(&self, index: usize) -> DependencyResult<T> {
        let bean = self
            .values
            .get(index)
            .cloned()
            .ok_or(DependencyError::ArgumentOutOfRange {
                index,
                len: self.values.len(),
            })?;
        let name = self.names.get(index).map_or("", String::as_str);

        T::from_bean(name, bean)
    }

    /// 按依赖名称取出参数
    pub fn named<T: FromBean>(&self, name: &str) -> DependencyResult<T> {
        let index = self
            .names
            .iter()
            .position(|candidate| candidate == name)
            .ok_or_else(|| DependencyError::UnknownBean {
                name: name.to_string(),
                known_beans: self.names.clone(),
            })?;

        self.get(index)
    }

    /// 依赖名称
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// 原始参数值
    pub fn values(&self) -> &[BeanRef] {
        &self.values
    }
}

impl fmt::Debug for BeanArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanArgs")
            .field("names", &self.names)
            .field("values", &format_args!("<{} values>", self.values.len()))
            .finish()
    }
}

/// bean 的构造方式
#[derive(Clone)]
pub enum BeanStrategy {
    /// 通过 [`Injectable`] 类型构造
    Type {
        type_name: &'static str,
        dependencies: Vec<String>,
        constructor: BeanConstructor,
    },
    /// 通过构建函数构造
    Builder {
        dependencies: Vec<String>,
        builder: BeanConstructor,
    },
    /// 固定实例
    Instance(BeanRef),
    /// 绑定到持有该定义的注入器自身
    Injector,
}

impl BeanStrategy {
    /// 依赖的 bean 名称，固定实例没有依赖
    pub fn dependencies(&self) -> &[String] {
        match self {
            Self::Type { dependencies, .. } | Self::Builder { dependencies, .. } => dependencies,
            Self::Instance(_) | Self::Injector => &[],
        }
    }

    /// 是否为无需构建的固定实例
    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Instance(_) | Self::Injector)
    }
}

impl fmt::Debug for BeanStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type {
                type_name,
                dependencies,
                ..
            } => f
                .debug_struct("Type")
                .field("type_name", type_name)
                .field("dependencies", dependencies)
                .field("constructor", &"<function>")
                .finish(),
            Self::Builder { dependencies, .. } => f
                .debug_struct("Builder")
                .field("dependencies", dependencies)
                .field("builder", &"<function>")
                .finish(),
            Self::Instance(_) => f.write_str("Instance(<bean>)"),
            Self::Injector => f.write_str("Injector"),
        }
    }
}

/// 冻结后的 bean 定义
#[derive(Clone)]
pub struct BeanDefinition {
    name: String,
    strategy: BeanStrategy,
    scope: String,
    scope_destroy: Option<DestroyCallback>,
}

impl BeanDefinition {
    /// bean 名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 构造方式
    pub fn strategy(&self) -> &BeanStrategy {
        &self.strategy
    }

    /// 所属作用域名称
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// 作用域销毁回调
    pub fn scope_destroy(&self) -> Option<&DestroyCallback> {
        self.scope_destroy.as_ref()
    }

    /// 固定实例（如果有）
    pub fn instance(&self) -> Option<&BeanRef> {
        match &self.strategy {
            BeanStrategy::Instance(instance) => Some(instance),
            _ => None,
        }
    }
}

impl fmt::Debug for BeanDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanDefinition")
            .field("name", &self.name)
            .field("strategy", &self.strategy)
            .field("scope", &self.scope)
            .field("scope_destroy", &self.scope_destroy.as_ref().map(|_| "<function>"))
            .finish()
    }
}

/// 模块中的一条 bean 配置
///
/// 由 `ModuleConfiguration::register` 创建，通过链式方法配置。
/// 多次设置构造方式时以最后一次为准。
pub struct ModuleEntry {
    name: String,
    strategy: Option<BeanStrategy>,
    scope: Option<String>,
    scope_destroy: Option<DestroyCallback>,
}

impl ModuleEntry {
    /// 创建空的 bean 配置
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strategy: None,
            scope: None,
            scope_destroy: None,
        }
    }

    /// bean 名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 通过 [`Injectable`] 类型构造
    pub fn to<T: Injectable>(&mut self) -> &mut Self {
        let constructor: BeanConstructor =
            Arc::new(|args| future::ready(T::construct(args).map(into_bean)).boxed());

        self.strategy = Some(BeanStrategy::Type {
            type_name: type_name::<T>(),
            dependencies: T::dependencies().iter().map(ToString::to_string).collect(),
            constructor,
        });
        self
    }

    /// 通过构建函数构造，`dependencies` 按构建函数参数顺序给出
    pub fn to_builder<T, F, I>(&mut self, dependencies: I, builder: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(BeanArgs) -> DependencyResult<T> + Send + Sync + 'static,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let builder: BeanConstructor =
            Arc::new(move |args| future::ready(builder(args).map(into_bean)).boxed());

        self.strategy = Some(BeanStrategy::Builder {
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            builder,
        });
        self
    }

    /// 通过直接返回 bean 引用的构建函数构造
    ///
    /// 返回值不再包装，适合转发某个依赖或返回已共享的实例。
    /// [`ModuleEntry::to_builder`] 会把返回值再包装一层，
    /// 返回 `BeanRef` 时得到的是 `Arc<BeanRef>`。
    pub fn to_bean_builder<F, I>(&mut self, dependencies: I, builder: F) -> &mut Self
    where
        F: Fn(BeanArgs) -> DependencyResult<BeanRef> + Send + Sync + 'static,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let builder: BeanConstructor = Arc::new(move |args| future::ready(builder(args)).boxed());

        self.strategy = Some(BeanStrategy::Builder {
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            builder,
        });
        self
    }

    /// 通过异步构建函数构造
    pub fn to_async_builder<T, F, Fut, I>(&mut self, dependencies: I, builder: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(BeanArgs) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = DependencyResult<T>> + Send + 'static,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let builder: BeanConstructor =
            Arc::new(move |args| builder(args).map(|result| result.map(into_bean)).boxed());

        self.strategy = Some(BeanStrategy::Builder {
            dependencies: dependencies.into_iter().map(Into::into).collect(),
            builder,
        });
        self
    }

    /// 绑定固定实例
    pub fn to_instance<T>(&mut self, instance: T) -> &mut Self
    where
        T: Any + Send + Sync,
    {
        self.strategy = Some(BeanStrategy::Instance(into_bean(instance)));
        self
    }

    /// 绑定已共享的固定实例，`get_bean` 返回的就是这个引用
    pub fn to_shared_instance<T>(&mut self, instance: Arc<T>) -> &mut Self
    where
        T: Any + Send + Sync,
    {
        self.strategy = Some(BeanStrategy::Instance(instance));
        self
    }

    /// 绑定到解析该 bean 的注入器自身
    pub fn to_injector(&mut self) -> &mut Self {
        self.strategy = Some(BeanStrategy::Injector);
        self
    }

    /// 指定作用域，默认为 `singleton`
    pub fn in_scope(&mut self, scope: impl Into<String>) -> &mut Self {
        self.scope = Some(scope.into());
        self
    }

    /// 注册作用域销毁回调，只有 singleton 作用域会保留并调用
    pub fn on_scope_destroy<F>(&mut self, callback: F) -> &mut Self
    where
        F: Fn(BeanRef) + Send + Sync + 'static,
    {
        self.scope_destroy = Some(Arc::new(callback));
        self
    }

    /// 冻结为 bean 定义
    pub fn into_definition(self, default_scope: &str) -> DependencyResult<BeanDefinition> {
        let strategy = self.strategy.ok_or_else(|| {
            DependencyError::invalid_definition(
                &self.name,
                "未指定构造方式（to / to_builder / to_instance）",
            )
        })?;

        if let Some(dependency) = strategy.dependencies().iter().find(|name| name.is_empty()) {
            return Err(DependencyError::invalid_definition(
                &self.name,
                format!("依赖名称不能为空: {dependency:?}"),
            ));
        }

        let scope = self.scope.unwrap_or_else(|| default_scope.to_string());
        if scope.is_empty() {
            return Err(DependencyError::invalid_definition(&self.name, "作用域名称不能为空"));
        }

        Ok(BeanDefinition {
            name: self.name,
            strategy,
            scope,
            scope_destroy: self.scope_destroy,
        })
    }
}

impl Default for ModuleEntry {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl fmt::Debug for ModuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleEntry")
            .field("name", &self.name)
            .field("strategy", &self.strategy)
            .field("scope", &self.scope.as_deref().unwrap_or(SINGLETON_SCOPE))
            .finish_non_exhaustive()
    }
}
