//! 打包配置
//!
//! 配置来源按优先级从低到高：默认值、TOML 配置文件、`PACKER_` 前缀环境变量。

use infrastructure_common::{plural, ConfigError, ConfigResult, Lifetime, PackError, PackResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::debug;

/// 默认环境变量前缀
pub const ENV_PREFIX: &str = "PACKER";

/// 打包配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackerOptions {
    /// 扫描根目录
    pub src_dir: PathBuf,
    /// 允许注册的文件扩展名（不含 `.`）
    pub extensions: Vec<String>,
    /// 模拟实现文件标记，`user.mock.rs`
    pub mock_marker: String,
    /// 测试文件标记，`user.test.rs`
    pub test_marker: String,
    /// 共享模拟实现目录，相对路径基于 `src_dir`；缺省为模拟标记的复数形式
    pub mocks_dir: Option<PathBuf>,
    /// 未标记生命周期时使用的默认值
    pub default_lifetime: Lifetime,
    /// 是否输出打包耗时
    pub packing_stats: bool,
    /// 可选的 `Cargo.toml` 清单路径
    pub manifest: Option<PathBuf>,
    /// `[dependencies]` 注册选项
    pub dependencies: ManifestTableOptions,
    /// `[dev-dependencies]` 注册选项
    pub dev_dependencies: ManifestTableOptions,
}

impl Default for PackerOptions {
    fn default() -> Self {
        Self {
            src_dir: PathBuf::from("./src"),
            extensions: vec!["rs".to_string(), "json".to_string()],
            mock_marker: "mock".to_string(),
            test_marker: "test".to_string(),
            mocks_dir: None,
            default_lifetime: Lifetime::default(),
            packing_stats: true,
            manifest: None,
            dependencies: ManifestTableOptions::default(),
            dev_dependencies: ManifestTableOptions::default(),
        }
    }
}

/// 清单依赖表的注册选项
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestTableOptions {
    /// 跳过整张表
    pub skip: bool,
    /// 非空时只注册这些依赖
    pub include: BTreeSet<String>,
    /// 不注册的依赖
    pub exclude: BTreeSet<String>,
    /// 依赖名到注册名的重命名
    pub rename: HashMap<String, String>,
}

impl PackerOptions {
    /// 从配置文件和 `PACKER_` 环境变量加载
    pub fn load(file: Option<&Path>) -> ConfigResult<Self> {
        Self::load_with_prefix(file, ENV_PREFIX)
    }

    /// 从配置文件和指定前缀的环境变量加载
    pub fn load_with_prefix(file: Option<&Path>, env_prefix: &str) -> ConfigResult<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            debug!("加载打包配置文件: {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("extensions"),
        );

        let options: Self = builder
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| ConfigError::ParseError {
                source: Box::new(e),
            })?;
        options.validate()?;
        Ok(options)
    }

    /// 校验配置项之间的约束
    pub fn validate(&self) -> ConfigResult<()> {
        if self.extensions.iter().all(|ext| ext.trim_start_matches('.').is_empty()) {
            return Err(ConfigError::ValidationError {
                message: "extensions 不能为空".to_string(),
            });
        }
        if self.mock_marker.is_empty() || self.test_marker.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "mock_marker 和 test_marker 不能为空".to_string(),
            });
        }
        if self.mock_marker == self.test_marker {
            return Err(ConfigError::ValidationError {
                message: format!("mock_marker 与 test_marker 相同: {}", self.mock_marker),
            });
        }
        Ok(())
    }

    /// 共享模拟实现目录
    pub fn mocks_dir(&self) -> PathBuf {
        match &self.mocks_dir {
            Some(dir) => self.src_dir.join(dir),
            None => self.src_dir.join(plural(&self.mock_marker)),
        }
    }

    /// 编译文件过滤规则
    pub fn file_rules(&self) -> PackResult<FileRules> {
        FileRules::new(
            &self.extensions,
            &self.test_marker,
            &self.mock_marker,
            self.mocks_dir(),
        )
    }
}

/// 文件过滤规则
///
/// 决定一个节点是否参与注册：扩展名白名单、测试文件、模拟实现文件和共享模拟目录。
#[derive(Debug, Clone)]
pub struct FileRules {
    extensions: Vec<String>,
    mock_marker: String,
    mocks_dir: PathBuf,
    test_file: Regex,
    mock_file: Regex,
    mock_dir: Regex,
}

impl FileRules {
    pub fn new(
        extensions: &[String],
        test_marker: &str,
        mock_marker: &str,
        mocks_dir: PathBuf,
    ) -> PackResult<Self> {
        let extensions: Vec<String> = extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();
        let alternatives = extensions
            .iter()
            .map(|ext| regex::escape(ext))
            .collect::<Vec<_>>()
            .join("|");

        let test_file = compile(&format!(
            r"(?:^|\.){}\.(?:{})$",
            regex::escape(test_marker),
            alternatives
        ))?;
        let mock_file = compile(&format!(
            r"(?:^|\.){}\.(?:{})$",
            regex::escape(mock_marker),
            alternatives
        ))?;
        let mock_dir = compile(&format!(r"(?:^|\.){}$", regex::escape(mock_marker)))?;

        Ok(Self {
            extensions,
            mock_marker: mock_marker.to_string(),
            mocks_dir,
            test_file,
            mock_file,
            mock_dir,
        })
    }

    pub fn mock_marker(&self) -> &str {
        &self.mock_marker
    }

    pub fn mocks_dir(&self) -> &Path {
        &self.mocks_dir
    }

    /// 扩展名是否在白名单中
    pub fn is_allowed_extension(&self, extension: Option<&str>) -> bool {
        extension.map_or(false, |ext| self.extensions.iter().any(|e| e == ext))
    }

    /// 是否为测试文件
    pub fn is_test_file(&self, base_name: &str) -> bool {
        self.test_file.is_match(base_name)
    }

    /// 是否为模拟实现（文件或目录）
    pub fn is_mock(&self, base_name: &str, is_directory: bool) -> bool {
        if is_directory {
            self.mock_dir.is_match(base_name)
        } else {
            self.mock_file.is_match(base_name)
        }
    }

    /// 是否位于共享模拟目录（包括目录本身）
    pub fn is_in_mocks_dir(&self, path: &Path) -> bool {
        path.starts_with(&self.mocks_dir)
    }
}

fn compile(pattern: &str) -> PackResult<Regex> {
    Regex::new(pattern).map_err(|e| PackError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}
