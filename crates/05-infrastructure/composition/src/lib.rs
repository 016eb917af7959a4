//! # 基础设施组合层
//!
//! 按约定遍历源码目录，把发现的组件装配进依赖注入容器。
//!
//! ## 主要功能
//!
//! - **目录打包**: [`TreePacker`] 深度优先遍历，按命名约定推断名称和生命周期
//! - **构造策略分类**: [`ConstructionClassifier`] 区分值、工厂和可构造类型
//! - **模拟实现替换**: [`MockResolver`] 按调用方请求替换为测试替身
//! - **注册组装**: [`RegistrationAssembler`] 折叠为驼峰命名的注册配方
//! - **清单注册**: [`ManifestRegistrar`] 注册 `Cargo.toml` 及其依赖
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::{ContainerBuilder, UnitCatalog};
//! use di_abstractions::{ComponentRegistry, Cradle, Unit};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = UnitCatalog::new("./src")
//!         .with("services/user.rs", Unit::class(|_: &dyn Cradle| Ok(String::from("user"))));
//!
//!     let container = ContainerBuilder::from_config(None)?
//!         .with_loader(catalog)
//!         .build()
//!         .await?;
//!
//!     let user = container.resolve_as::<String>("userService")?;
//!     println!("{}", user);
//!     Ok(())
//! }
//! ```

pub mod assembler;
pub mod bootstrapper;
pub mod builder;
pub mod classifier;
pub mod loaders;
pub mod manifest;
pub mod mocks;
pub mod node;
pub mod options;
pub mod packer;


// 重新导出主要类型
pub use assembler::RegistrationAssembler;
pub use bootstrapper::ContainerBootstrapper;
pub use builder::{ContainerBuilder, LoggingConfig};
pub use classifier::ConstructionClassifier;
pub use loaders::{ChainLoader, JsonValueLoader, UnitCatalog};
pub use manifest::{ExternalDependency, ManifestRegistrar, PackageManifest, PackageSection};
pub use mocks::{MockOverride, MockOverrideRequest, MockOverrides, MockResolver};
pub use node::ResourceNode;
pub use options::{FileRules, ManifestTableOptions, PackerOptions, ENV_PREFIX};
pub use packer::{RegistrationDescriptor, TreePacker};

// 重新导出错误类型
pub use infrastructure_common::{InfrastructureError, PackError};
