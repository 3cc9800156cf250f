//! # 依赖注入具体实现
//!
//! 提供注入器、内置作用域、模块读取器和 bean 构建器。
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use di_impl::Injector;
//! use di_abstractions::ModuleConfiguration;
//! use std::sync::Arc;
//!
//! # async fn demo() -> di_abstractions::DependencyResult<()> {
//! let injector = Injector::builder()
//!     .module(|config: &mut ModuleConfiguration| {
//!         config.register("port").to_instance(8080u16);
//!     })
//!     .build()?;
//!
//! let port: Arc<u16> = injector.get_bean_as("port").await?;
//! assert_eq!(*port, 8080);
//! # Ok(())
//! # }
//! ```

pub mod bean_builder;
pub mod injector;
pub mod invoke;
pub mod module_reader;
pub mod registry;
pub mod scopes;

pub use bean_builder::BeanBuilder;
pub use injector::{Injector, InjectorBuilder, INJECTOR_BEAN};
pub use invoke::{injector_call, injector_invoke};
pub use module_reader::ModuleReader;
pub use registry::BeanRegistry;
pub use scopes::{PrototypeScope, SingletonScope};
