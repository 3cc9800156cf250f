//! 注入器配置
//!
//! 可以在代码中构造，也可以从配置文件和环境变量加载。

use crate::resolver::ResolveOptions;
use crate::scope::SINGLETON_SCOPE;
use infrastructure_common::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// 默认的环境变量前缀
pub const DEFAULT_ENV_PREFIX: &str = "BEAN_INJECT";

/// 注入器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectorSettings {
    /// 未调用 `in_scope` 的 bean 使用的作用域
    pub default_scope: String,
    /// 单条解析链的最大深度
    pub max_resolution_depth: usize,
}

impl Default for InjectorSettings {
    fn default() -> Self {
        Self {
            default_scope: SINGLETON_SCOPE.to_string(),
            max_resolution_depth: 100,
        }
    }
}

impl InjectorSettings {
    /// 从可选的配置文件和带前缀的环境变量加载配置
    ///
    /// 环境变量优先于文件，例如 `BEAN_INJECT_MAX_RESOLUTION_DEPTH=32`。
    pub fn load(path: Option<&Path>, env_prefix: &str) -> ConfigResult<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            debug!("加载注入器配置文件: {}", path.display());
            builder = builder.add_source(config::File::from(path));
        }

        let settings: Self = builder
            .add_source(config::Environment::with_prefix(env_prefix).try_parsing(true))
            .build()
            .map_err(ConfigError::parse_error)?
            .try_deserialize()
            .map_err(ConfigError::parse_error)?;

        settings.validate()?;
        Ok(settings)
    }

    /// 仅从环境变量加载配置
    pub fn from_env() -> ConfigResult<Self> {
        Self::load(None, DEFAULT_ENV_PREFIX)
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.default_scope.trim().is_empty() {
            return Err(ConfigError::validation_error("default_scope 不能为空"));
        }
        if self.max_resolution_depth == 0 {
            return Err(ConfigError::validation_error(
                "max_resolution_depth 必须大于 0",
            ));
        }
        Ok(())
    }

    /// 解析选项
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            max_depth: self.max_resolution_depth,
        }
    }
}
