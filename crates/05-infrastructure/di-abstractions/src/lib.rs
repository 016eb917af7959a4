//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义组件单元、加载器和注册表的核心接口。
//!
//! ## 核心接口
//!
//! - [`Unit`] - 加载器产出的组件单元（值、工厂或可构造类型）
//! - [`UnitLoader`] - 按路径加载组件单元
//! - [`ComponentRegistry`] - 组件注册表接口
//! - [`Cradle`] - 工厂构造时可用的依赖解析入口
//! - [`ResolveContext`] - 解析链与循环依赖检测

pub mod loader;
pub mod registry;
pub mod resolver;
pub mod unit;

pub use loader::*;
pub use registry::*;
pub use resolver::*;
pub use unit::*;
