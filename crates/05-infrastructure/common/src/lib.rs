//! # Infrastructure Common
//!
//! 这个 crate 提供了依赖注入运行时各层共享的基础类型。
//!
//! ## 核心类型
//!
//! - [`BeanRef`] - 容器中流转的 bean 实例引用
//! - [`FromBean`] - 从 bean 引用到具体类型的转换
//! - [`DependencyError`] - 依赖解析错误
//! - [`ConfigError`] - 配置加载错误

pub mod bean;
pub mod errors;

pub use bean::*;
pub use errors::*;
