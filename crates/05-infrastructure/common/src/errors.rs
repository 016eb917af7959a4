//! 错误类型定义

use std::path::PathBuf;
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },

    #[error("清单文件无效: {path}, 原因: {message}")]
    InvalidManifest { path: String, message: String },
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {name}")]
    ComponentNotRegistered { name: String },

    #[error("组件创建失败: {name}, 原因: {source}")]
    ComponentCreationFailed {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("作用域不匹配: {name} 期望 {expected}, 实际 {actual}")]
    ScopeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("类型转换失败: {name}, 期望类型 {expected}")]
    TypeMismatch { name: String, expected: &'static str },

    #[error("组件不可构造: {name}")]
    NotConstructible { name: String },
}

impl DependencyError {
    /// 用任意错误信息创建组件创建失败错误
    pub fn creation_failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ComponentCreationFailed {
            name: name.into(),
            source: message.into().into(),
        }
    }
}

/// 目录打包错误类型
///
/// 打包过程中绝大多数失败都会在发现处被吸收，只有这里列出的错误会终止整个打包。
#[derive(Error, Debug)]
pub enum PackError {
    #[error(
        "未找到模拟实现: {name}, 已尝试 {} 和 {}",
        candidates.0.display(),
        candidates.1.display()
    )]
    MockNotFound {
        name: String,
        candidates: (PathBuf, PathBuf),
    },

    #[error("文件名模式无效: {pattern}, 原因: {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("目录打包错误: {source}")]
    PackError {
        #[from]
        source: PackError,
    },

    #[error("容器启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type PackResult<T> = Result<T, PackError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
