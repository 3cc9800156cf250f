//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

impl ConfigError {
    /// 创建配置解析错误
    pub fn parse_error(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::ParseError {
            source: source.into(),
        }
    }

    /// 创建配置验证错误
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("未知的 bean '{name}'，已知的 bean: {}", .known_beans.join(", "))]
    UnknownBean {
        name: String,
        known_beans: Vec<String>,
    },

    #[error("作用域不存在: '{scope}'（bean '{bean}' 所需）")]
    UnknownScope { scope: String, bean: String },

    #[error("抽象方法未实现: {type_name}::{method}")]
    AbstractMethod { type_name: String, method: String },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("解析深度超过上限 {max_depth}: {name}")]
    ResolutionDepthExceeded { name: String, max_depth: usize },

    #[error("bean 定义无效: {name}, 原因: {message}")]
    InvalidDefinition { name: String, message: String },

    #[error("bean 类型不匹配: {name}, 期望 {expected}")]
    TypeMismatch { name: String, expected: String },

    #[error("参数位置越界: 第 {index} 个参数, 共 {len} 个")]
    ArgumentOutOfRange { index: usize, len: usize },

    #[error("bean 创建失败: {name}, 原因: {source}")]
    BeanCreationFailed {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("注入器配置无效: {source}")]
    InvalidSettings {
        #[from]
        source: ConfigError,
    },
}

impl DependencyError {
    /// 创建 bean 创建失败错误
    pub fn creation_failed(
        name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::BeanCreationFailed {
            name: name.into(),
            source: source.into(),
        }
    }

    /// 创建 bean 定义无效错误
    pub fn invalid_definition(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
