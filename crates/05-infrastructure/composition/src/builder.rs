//! 容器构建器

use crate::bootstrapper::ContainerBootstrapper;
use crate::mocks::MockOverrides;
use crate::options::PackerOptions;
use di_abstractions::{Instance, UnitLoader};
use di_impl::DiContainerImpl;
use infrastructure_common::{InfrastructureError, InfrastructureResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 容器构建器
///
/// 使用建造者模式收集打包选项、加载器、模拟实现和外部库，最后构建容器
pub struct ContainerBuilder {
    options: PackerOptions,
    loader: Option<Arc<dyn UnitLoader>>,
    mocks: MockOverrides,
    mock_resolution: bool,
    libraries: HashMap<String, Instance>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    logging_config: LoggingConfig,
}

impl ContainerBuilder {
    /// 使用默认打包选项创建构建器
    pub fn new() -> Self {
        Self::with_options(PackerOptions::default())
    }

    pub fn with_options(options: PackerOptions) -> Self {
        Self {
            options,
            loader: None,
            mocks: MockOverrides::default(),
            mock_resolution: true,
            libraries: HashMap::new(),
            logging_enabled: false,
            logging_config: LoggingConfig::default(),
        }
    }

    /// 从配置文件和 `PACKER_` 环境变量加载打包选项
    pub fn from_config(file: Option<&Path>) -> InfrastructureResult<Self> {
        let options = PackerOptions::load(file)?;
        info!("加载打包配置: {}", options.src_dir.display());
        Ok(Self::with_options(options))
    }

    pub fn src_dir(mut self, src_dir: impl Into<PathBuf>) -> Self {
        self.options.src_dir = src_dir.into();
        self
    }

    pub fn manifest(mut self, manifest: impl Into<PathBuf>) -> Self {
        self.options.manifest = Some(manifest.into());
        self
    }

    pub fn with_loader(mut self, loader: impl UnitLoader + 'static) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    pub fn with_mocks(mut self, mocks: MockOverrides) -> Self {
        self.mocks = mocks;
        self
    }

    /// 关闭模拟实现替换，替换表被忽略
    pub fn disable_mocks(mut self) -> Self {
        self.mock_resolution = false;
        self
    }

    /// 为依赖名提供具体实例
    pub fn with_library(mut self, name: impl Into<String>, instance: Instance) -> Self {
        self.libraries.insert(name.into(), instance);
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true;
        self
    }

    /// 构建容器
    pub async fn build(self) -> InfrastructureResult<DiContainerImpl> {
        // 只有在明确配置了日志时才初始化日志，避免在测试环境中重复初始化
        if self.logging_enabled {
            self.logging_config.init()?;
        }

        let mut bootstrapper = ContainerBootstrapper::new(self.options)
            .with_mocks(self.mocks)
            .with_mock_resolution(self.mock_resolution)
            .with_libraries(self.libraries);
        if let Some(loader) = self.loader {
            bootstrapper = bootstrapper.with_loader(loader);
        }

        bootstrapper.bootstrap().await
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别，`RUST_LOG` 存在时以其为准
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 日志过滤器
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level.to_string()))
    }

    /// 初始化全局日志订阅者
    pub fn init(&self) -> InfrastructureResult<()> {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(self.env_filter())
            .with_target(self.show_target)
            .with_thread_ids(self.show_thread_ids)
            .with_file(self.show_file)
            .with_line_number(self.show_line_number);

        if self.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| InfrastructureError::BootstrapFailed {
            message: format!("日志初始化失败: {}", e),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}
