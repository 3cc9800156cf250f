//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义 bean 声明、模块和作用域的核心接口。
//!
//! ## 核心接口
//!
//! - [`ModuleEntry`] / [`BeanDefinition`] - bean 定义（可变配置 / 冻结后的定义）
//! - [`Module`] / [`ModuleObject`] - 模块，向注册表声明 bean
//! - [`Scope`] - 实例生命周期策略
//! - [`ObjectFactory`] - 作用域缓存未命中时使用的实例工厂
//! - [`Injectable`] - 可由容器构造的类型
//! - [`ResolveContext`] - 单条解析链的上下文，用于检测循环依赖

pub mod definition;
pub mod module;
pub mod resolver;
pub mod scope;
pub mod settings;

pub use definition::*;
pub use module::*;
pub use resolver::*;
pub use scope::*;
pub use settings::*;

pub use infrastructure_common::{
    into_bean, BeanRef, ConfigError, ConfigResult, DependencyError, DependencyResult, FromBean,
};
