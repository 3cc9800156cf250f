//! 注入器
//!
//! 注入器持有本地 bean 注册表和作用域表，可以链接一个父注入器。
//! 本地找不到的 bean 和作用域逐级交给父注入器查找，本地定义总是
//! 遮蔽父注入器中的同名定义。

use crate::bean_builder::BeanBuilder;
use crate::module_reader::ModuleReader;
use crate::registry::BeanRegistry;
use crate::scopes::{PrototypeScope, SingletonScope};
use di_abstractions::{
    BeanRef, BeanStrategy, DependencyError, DependencyResult, FromBean, InjectorSettings, Module,
    ModuleConfiguration, ResolveContext, Scope, PROTOTYPE_SCOPE, SINGLETON_SCOPE,
};
use futures::future::{try_join_all, BoxFuture, FutureExt};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 每个注入器自动注册的、指向其自身的 bean 名称
pub const INJECTOR_BEAN: &str = "injector";

/// 注入器
pub struct Injector {
    /// 注入器标识
    id: Uuid,
    /// 父注入器
    parent: Option<Arc<Injector>>,
    /// 本地 bean 注册表，模块读取完成后只读
    beans: BeanRegistry,
    /// 本地作用域
    scopes: RwLock<HashMap<String, Arc<dyn Scope>>>,
    /// 配置
    settings: InjectorSettings,
}

impl Injector {
    /// 创建构建器
    pub fn builder() -> InjectorBuilder {
        InjectorBuilder::new()
    }

    /// 使用一组模块创建没有父注入器的注入器
    pub fn new<I>(modules: I) -> DependencyResult<Arc<Self>>
    where
        I: IntoIterator,
        I::Item: Module + 'static,
    {
        Self::builder().modules(modules).build()
    }

    /// 创建以当前注入器为父注入器的构建器
    pub fn child(self: &Arc<Self>) -> InjectorBuilder {
        InjectorBuilder::new()
            .parent(Arc::clone(self))
            .settings(self.settings.clone())
    }

    /// 注入器标识
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 父注入器
    pub fn parent(&self) -> Option<&Arc<Injector>> {
        self.parent.as_ref()
    }

    /// 配置
    pub fn settings(&self) -> &InjectorSettings {
        &self.settings
    }

    /// 获取 bean 实例，必要时通过其作用域创建
    pub async fn get_bean(self: &Arc<Self>, name: &str) -> DependencyResult<BeanRef> {
        self.resolve(name, self.new_context()).await
    }

    /// 获取 bean 实例并转换为具体类型
    pub async fn get_bean_as<T>(self: &Arc<Self>, name: &str) -> DependencyResult<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let bean = self.get_bean(name).await?;
        Arc::<T>::from_bean(name, bean)
    }

    /// 同时解析多个 bean，返回名称到实例的映射
    pub async fn get_beans<I>(self: &Arc<Self>, names: I) -> DependencyResult<HashMap<String, BeanRef>>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let pending = names
            .iter()
            .map(|name| self.resolve(name, self.new_context()));
        let values = try_join_all(pending).await?;

        Ok(names.into_iter().zip(values).collect())
    }

    /// 当前注入器或其祖先是否定义了该 bean
    pub fn has_bean(&self, name: &str) -> bool {
        self.beans.contains(name)
            || self
                .parent
                .as_ref()
                .is_some_and(|parent| parent.has_bean(name))
    }

    /// 整条注入器链上可见的全部 bean 名称
    pub fn known_beans(&self) -> BTreeSet<String> {
        let mut beans = self
            .parent
            .as_ref()
            .map(|parent| parent.known_beans())
            .unwrap_or_default();
        beans.extend(self.beans.names().map(str::to_string));
        beans
    }

    /// 在本地固定实例中查找第一个类型为 `T` 的实例
    ///
    /// 只检查以固定实例注册的 bean（包括 `injector` 自身），通过类型或
    /// 构建函数创建、缓存在作用域中的实例不参与查找，即使已经被解析过。
    pub fn get_by_type<T>(self: &Arc<Self>) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.fixed_instances()
            .find_map(|instance| instance.downcast::<T>().ok())
    }

    /// 在本地固定实例中查找全部类型为 `T` 的实例
    ///
    /// 与 [`Injector::get_by_type`] 有同样的限制。
    pub fn get_all_by_type<T>(self: &Arc<Self>) -> Vec<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.fixed_instances()
            .filter_map(|instance| instance.downcast::<T>().ok())
            .collect()
    }

    /// 注册作用域，只影响本地作用域表
    pub fn register_scope(&self, name: impl Into<String>, scope: Arc<dyn Scope>) {
        let name = name.into();
        info!("注册作用域: {}", name);
        self.scopes.write().insert(name, scope);
    }

    /// 移除本地作用域，父注入器中的同名作用域不受影响
    pub fn unregister_scope(&self, name: &str) -> Option<Arc<dyn Scope>> {
        let removed = self.scopes.write().remove(name);
        if removed.is_some() {
            info!("移除作用域: {}", name);
        }
        removed
    }

    /// 销毁本地同名作用域，然后对父注入器执行同样的销毁
    pub fn destroy(&self, scope_name: &str) {
        let scope = self.scopes.read().get(scope_name).cloned();

        if let Some(scope) = scope {
            info!("销毁作用域: {} (注入器 {})", scope_name, self.id);
            scope.destroy();
        }

        if let Some(parent) = &self.parent {
            parent.destroy(scope_name);
        }
    }

    /// 在给定解析上下文中解析 bean
    pub(crate) fn resolve(
        self: &Arc<Self>,
        name: &str,
        context: ResolveContext,
    ) -> BoxFuture<'static, DependencyResult<BeanRef>> {
        let injector = Arc::clone(self);
        let name = name.to_string();

        async move { injector.resolve_local(&name, context).await }.boxed()
    }

    async fn resolve_local(
        self: &Arc<Self>,
        name: &str,
        context: ResolveContext,
    ) -> DependencyResult<BeanRef> {
        let Some(definition) = self.beans.get(name).cloned() else {
            return match &self.parent {
                Some(parent) => {
                    debug!("本地未定义 bean {}，交由父注入器解析", name);
                    parent.resolve(name, context).await
                }
                None => {
                    warn!("未知的 bean: {}", name);
                    Err(DependencyError::UnknownBean {
                        name: name.to_string(),
                        known_beans: self.known_beans().into_iter().collect(),
                    })
                }
            };
        };

        match definition.strategy() {
            BeanStrategy::Instance(instance) => return Ok(instance.clone()),
            BeanStrategy::Injector => return Ok(Arc::clone(self) as BeanRef),
            BeanStrategy::Type { .. } | BeanStrategy::Builder { .. } => {}
        }

        let context = context.enter(self.id, name)?;
        let scope = self.find_scope(definition.scope()).ok_or_else(|| {
            warn!("bean {} 所需的作用域不存在: {}", name, definition.scope());
            DependencyError::UnknownScope {
                scope: definition.scope().to_string(),
                bean: name.to_string(),
            }
        })?;

        debug!(
            "解析 bean: {} (作用域: {}, 深度: {})",
            name,
            definition.scope(),
            context.depth()
        );

        let on_destroy = definition.scope_destroy().cloned();
        let builder = BeanBuilder::new(Arc::clone(self), definition, context);
        scope.get(name, Box::new(builder), on_destroy).await
    }

    /// 查找作用域，本地没有时交给父注入器
    fn find_scope(&self, scope_name: &str) -> Option<Arc<dyn Scope>> {
        let local = self.scopes.read().get(scope_name).cloned();

        local.or_else(|| {
            self.parent
                .as_ref()
                .and_then(|parent| parent.find_scope(scope_name))
        })
    }

    fn fixed_instances(self: &Arc<Self>) -> impl Iterator<Item = BeanRef> + '_ {
        self.beans
            .definitions()
            .filter_map(move |definition| match definition.strategy() {
                BeanStrategy::Instance(instance) => Some(instance.clone()),
                BeanStrategy::Injector => Some(Arc::clone(self) as BeanRef),
                BeanStrategy::Type { .. } | BeanStrategy::Builder { .. } => None,
            })
    }

    fn new_context(&self) -> ResolveContext {
        ResolveContext::new(self.settings.resolve_options())
    }
}

impl std::fmt::Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut scopes: Vec<String> = self.scopes.read().keys().cloned().collect();
        scopes.sort();

        f.debug_struct("Injector")
            .field("id", &self.id)
            .field("parent", &self.parent.as_ref().map(|parent| parent.id))
            .field("beans", &self.beans.names().collect::<Vec<_>>())
            .field("scopes", &scopes)
            .field("settings", &self.settings)
            .finish()
    }
}

/// 注入器构建器
pub struct InjectorBuilder {
    /// 父注入器
    parent: Option<Arc<Injector>>,
    /// 按顺序读取的模块
    modules: Vec<Box<dyn Module>>,
    /// 配置
    settings: InjectorSettings,
}

impl InjectorBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            parent: None,
            modules: Vec::new(),
            settings: InjectorSettings::default(),
        }
    }

    /// 设置父注入器
    pub fn parent(mut self, parent: Arc<Injector>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// 设置配置
    pub fn settings(mut self, settings: InjectorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// 添加模块
    pub fn module<M>(mut self, module: M) -> Self
    where
        M: Module + 'static,
    {
        self.modules.push(Box::new(module));
        self
    }

    /// 添加一组模块
    pub fn modules<I>(mut self, modules: I) -> Self
    where
        I: IntoIterator,
        I::Item: Module + 'static,
    {
        for module in modules {
            self.modules.push(Box::new(module));
        }
        self
    }

    /// 读取全部模块并构建注入器
    pub fn build(self) -> DependencyResult<Arc<Injector>> {
        self.settings.validate()?;

        let reader = ModuleReader::new(self.settings.default_scope.clone());
        let mut beans = BeanRegistry::new();

        let self_module = |config: &mut ModuleConfiguration| {
            config.register(INJECTOR_BEAN).to_injector();
        };
        reader.read_configuration(&self_module, &mut beans)?;

        for module in &self.modules {
            reader.read_configuration(module.as_ref(), &mut beans)?;
        }

        let mut scopes: HashMap<String, Arc<dyn Scope>> = HashMap::new();
        scopes.insert(SINGLETON_SCOPE.to_string(), Arc::new(SingletonScope::new()));
        scopes.insert(PROTOTYPE_SCOPE.to_string(), Arc::new(PrototypeScope::new()));

        let injector = Arc::new(Injector {
            id: Uuid::new_v4(),
            parent: self.parent,
            beans,
            scopes: RwLock::new(scopes),
            settings: self.settings,
        });

        info!(
            "构建注入器完成: {} (父注入器: {:?})，读取了 {} 个模块，注册了 {} 个 bean",
            injector.id,
            injector.parent.as_ref().map(|parent| parent.id),
            self.modules.len(),
            injector.beans.len()
        );

        Ok(injector)
    }
}

impl Default for InjectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InjectorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectorBuilder")
            .field("parent", &self.parent.as_ref().map(|parent| parent.id))
            .field("modules", &self.modules.len())
            .field("settings", &self.settings)
            .finish()
    }
}
