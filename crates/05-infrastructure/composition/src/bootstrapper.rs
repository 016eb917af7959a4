//! 容器启动器

use crate::assembler::RegistrationAssembler;
use crate::loaders::JsonValueLoader;
use crate::manifest::{ManifestRegistrar, PackageManifest};
use crate::mocks::MockOverrides;
use crate::options::PackerOptions;
use crate::packer::TreePacker;
use di_abstractions::{Instance, Registration, UnitLoader};
use di_impl::DiContainerImpl;
use infrastructure_common::{ConfigError, InfrastructureError, InfrastructureResult, NamedSlots};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// 容器启动器
///
/// 负责协调清单注册、目录打包和批量注册的顺序
pub struct ContainerBootstrapper {
    options: PackerOptions,
    loader: Arc<dyn UnitLoader>,
    mocks: MockOverrides,
    mock_resolution: bool,
    libraries: HashMap<String, Instance>,
}

impl ContainerBootstrapper {
    /// 创建启动器，默认只加载 JSON 值文件
    pub fn new(options: PackerOptions) -> Self {
        Self {
            options,
            loader: Arc::new(JsonValueLoader),
            mocks: MockOverrides::default(),
            mock_resolution: true,
            libraries: HashMap::new(),
        }
    }

    pub fn options(&self) -> &PackerOptions {
        &self.options
    }

    pub fn with_loader(mut self, loader: Arc<dyn UnitLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_mocks(mut self, mocks: MockOverrides) -> Self {
        self.mocks = mocks;
        self
    }

    pub fn with_mock_resolution(mut self, enabled: bool) -> Self {
        self.mock_resolution = enabled;
        self
    }

    pub fn with_libraries(mut self, libraries: HashMap<String, Instance>) -> Self {
        self.libraries.extend(libraries);
        self
    }

    /// 启动并返回装配好的容器
    pub async fn bootstrap(self) -> InfrastructureResult<DiContainerImpl> {
        let started = Instant::now();
        let src_dir = self.options.src_dir.clone();
        info!("开始打包容器: {}", src_dir.display());

        if !tokio::fs::try_exists(&src_dir).await.unwrap_or(false) {
            return Err(InfrastructureError::BootstrapFailed {
                message: format!("源码目录不存在: {}", src_dir.display()),
            });
        }

        // 第一步：清单和外部库
        let base = self.manifest_registrations().await?;

        // 第二步：目录打包
        let packer = TreePacker::new(&self.options, self.loader.clone())?
            .with_mocks(self.mocks)
            .with_mock_resolution(self.mock_resolution);
        let descriptors = tokio::task::spawn_blocking(move || packer.pack_root())
            .await
            .map_err(|e| InfrastructureError::BootstrapFailed {
                message: format!("打包任务异常结束: {}", e),
            })??;
        debug!("打包得到 {} 条注册描述", descriptors.len());

        // 第三步：组装并注册
        let assembler = RegistrationAssembler::new(self.options.default_lifetime);
        let registrations = assembler.assemble_into(base, descriptors);
        let container = DiContainerImpl::new();
        assembler.register(&container, registrations)?;

        if self.options.packing_stats {
            info!(
                "容器打包完成，用时 {:.1} 秒，共 {} 个组件",
                started.elapsed().as_secs_f64(),
                container.len()
            );
        }
        Ok(container)
    }

    async fn manifest_registrations(&self) -> InfrastructureResult<NamedSlots<Registration>> {
        let registrar = ManifestRegistrar::from_options(&self.options).with_libraries(self.libraries.clone());

        let manifest = match &self.options.manifest {
            Some(path) => {
                debug!("读取包清单: {}", path.display());
                let content = tokio::fs::read_to_string(path)
                    .await
                    .map_err(ConfigError::from)?;
                PackageManifest::parse(path, &content)?
            }
            None => PackageManifest::default(),
        };

        Ok(registrar.registrations(&manifest))
    }
}
