//! 模块读取器

use crate::registry::BeanRegistry;
use di_abstractions::{DependencyResult, Module, ModuleConfiguration, SINGLETON_SCOPE};
use tracing::debug;

/// 执行模块并把声明的 bean 定义写入注册表
#[derive(Debug, Clone)]
pub struct ModuleReader {
    default_scope: String,
}

impl ModuleReader {
    /// 创建模块读取器，未指定作用域的 bean 使用 `default_scope`
    pub fn new(default_scope: impl Into<String>) -> Self {
        Self {
            default_scope: default_scope.into(),
        }
    }

    /// 读取一个模块，返回其中声明的 bean 数量
    pub fn read_configuration(
        &self,
        module: &dyn Module,
        registry: &mut BeanRegistry,
    ) -> DependencyResult<usize> {
        let mut config = ModuleConfiguration::new();
        module.configure(&mut config)?;

        let entries = config.into_entries();
        let count = entries.len();

        for entry in entries {
            let definition = entry.into_definition(&self.default_scope)?;
            debug!(
                "注册 bean: {} (作用域: {}, 构造方式: {:?})",
                definition.name(),
                definition.scope(),
                definition.strategy()
            );

            if let Some(previous) = registry.insert(definition) {
                debug!("覆盖已有的 bean 定义: {}", previous.name());
            }
        }

        Ok(count)
    }
}

impl Default for ModuleReader {
    fn default() -> Self {
        Self::new(SINGLETON_SCOPE)
    }
}
