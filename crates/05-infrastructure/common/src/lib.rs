//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn ADSP 平台基础设施层的公共类型和工具。
//!
//! ## 核心内容
//!
//! - [`Lifetime`] / [`Scope`] - 组件生命周期与作用域
//! - [`NamingResolver`] - 文件/目录命名约定解析
//! - [`singular`] / [`plural`] - 英文单复数转换
//! - [`NamedSlots`] / [`SetOps`] - 按名称覆盖的有序槽位表与集合运算
//! - 错误类型：[`PackError`]、[`DependencyError`]、[`ConfigError`]、[`InfrastructureError`]
//!
//! ## 设计原则
//!
//! - 约定优于配置
//! - 无法识别的约定静默回退到默认值，而不是报错

pub mod collections;
pub mod conventions;
pub mod errors;
pub mod inflection;
pub mod lifecycle;

pub use collections::*;
pub use conventions::*;
pub use errors::*;
pub use inflection::*;
pub use lifecycle::*;
