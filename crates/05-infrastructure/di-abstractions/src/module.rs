//! 模块抽象接口
//!
//! 模块是一组 bean 声明，注入器创建时依次执行各模块并收集其中的定义。

use crate::definition::ModuleEntry;
use infrastructure_common::{DependencyError, DependencyResult};
use std::any::type_name;
use std::collections::HashMap;

/// 以普通函数形式编写的模块
pub type ModuleFn = fn(&mut ModuleConfiguration);

/// 模块执行时使用的配置对象
#[derive(Debug, Default)]
pub struct ModuleConfiguration {
    entries: Vec<ModuleEntry>,
    /// 名称到 `entries` 下标
    index: HashMap<String, usize>,
}

impl ModuleConfiguration {
    /// 创建空配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册 bean，同名的已有配置会被覆盖
    pub fn register(&mut self, name: impl Into<String>) -> &mut ModuleEntry {
        let name = name.into();

        let index = match self.index.get(&name) {
            Some(&index) => {
                self.entries[index] = ModuleEntry::new(name);
                index
            }
            None => {
                let index = self.entries.len();
                self.index.insert(name.clone(), index);
                self.entries.push(ModuleEntry::new(name));
                index
            }
        };

        &mut self.entries[index]
    }

    /// 已注册的 bean 名称
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(ModuleEntry::name)
    }

    /// 取出全部配置，按首次注册顺序
    pub fn into_entries(self) -> Vec<ModuleEntry> {
        self.entries
    }
}

/// 模块 trait
///
/// 所有 `Fn(&mut ModuleConfiguration)` 闭包和函数都是模块。
pub trait Module: Send + Sync {
    /// 向配置中声明 bean
    fn configure(&self, config: &mut ModuleConfiguration) -> DependencyResult<()>;
}

impl<F> Module for F
where
    F: Fn(&mut ModuleConfiguration) + Send + Sync,
{
    fn configure(&self, config: &mut ModuleConfiguration) -> DependencyResult<()> {
        self(config);
        Ok(())
    }
}

/// 对象形式的模块
///
/// 适合需要携带状态、可以被多次执行的模块。实现方必须覆盖
/// [`ModuleObject::configure`]，否则执行时返回
/// [`DependencyError::AbstractMethod`]。
pub trait ModuleObject: Send + Sync + 'static {
    /// 向配置中声明 bean
    fn configure(&self, _config: &mut ModuleConfiguration) -> DependencyResult<()> {
        Err(DependencyError::AbstractMethod {
            type_name: type_name::<Self>().to_string(),
            method: "configure".to_string(),
        })
    }

    /// 转换为可交给注入器的模块
    fn into_module(self) -> ObjectModule<Self>
    where
        Self: Sized,
    {
        ObjectModule(self)
    }
}

/// [`ModuleObject`] 的模块适配器
#[derive(Debug)]
pub struct ObjectModule<M>(M);

impl<M: ModuleObject> ObjectModule<M> {
    /// 取回模块对象
    pub fn into_inner(self) -> M {
        self.0
    }
}

impl<M: ModuleObject> Module for ObjectModule<M> {
    fn configure(&self, config: &mut ModuleConfiguration) -> DependencyResult<()> {
        self.0.configure(config)
    }
}
