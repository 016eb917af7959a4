//! 模拟实现替换
//!
//! 调用方以 `<mockMarker><LogicalName>` 为键请求替换，例如 `mockUserService`。
//! 请求后依次尝试同目录的 `<identifier>.<mockMarker>.<ext>` 和共享模拟目录中的同名文件，
//! 都无法加载时整个打包失败，不会静默回退到真实实现。

use crate::node::ResourceNode;
use crate::options::FileRules;
use di_abstractions::{Unit, UnitLoader};
use infrastructure_common::{to_pascal_case, NamingInfo, PackError, PackResult};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// 单个替换请求
#[derive(Debug, Clone)]
pub enum MockOverride {
    /// 直接使用调用方提供的替身
    Replace(Unit),
    /// 从文件系统的约定位置加载替身
    FromFilesystem,
}

/// 调用方提供的替换表
#[derive(Debug, Clone, Default)]
pub struct MockOverrides {
    entries: HashMap<String, MockOverride>,
}

impl MockOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以替身直接替换
    pub fn replace(mut self, key: impl Into<String>, unit: Unit) -> Self {
        self.entries.insert(key.into(), MockOverride::Replace(unit));
        self
    }

    /// 从约定位置加载替身
    pub fn from_filesystem(mut self, key: impl Into<String>) -> Self {
        self.entries.insert(key.into(), MockOverride::FromFilesystem);
        self
    }

    pub fn get(&self, key: &str) -> Option<&MockOverride> {
        self.entries.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// 针对单个节点计算出的替换请求
#[derive(Debug)]
pub struct MockOverrideRequest<'a> {
    /// 替换表中的键
    pub key: String,
    /// 调用方的请求，未请求时为 `None`
    pub requested: Option<&'a MockOverride>,
    /// 同目录候选路径
    pub colocated: PathBuf,
    /// 共享模拟目录候选路径
    pub shared: PathBuf,
}

/// 模拟实现解析器
pub struct MockResolver<'a> {
    rules: &'a FileRules,
    loader: &'a dyn UnitLoader,
    overrides: &'a MockOverrides,
}

impl<'a> MockResolver<'a> {
    pub fn new(rules: &'a FileRules, loader: &'a dyn UnitLoader, overrides: &'a MockOverrides) -> Self {
        Self {
            rules,
            loader,
            overrides,
        }
    }

    /// 替换表中的键
    pub fn mock_key(&self, logical_name: &str) -> String {
        format!("{}{}", self.rules.mock_marker(), to_pascal_case(logical_name))
    }

    /// 计算节点的替换请求
    pub fn request(
        &self,
        node: &ResourceNode,
        naming: &NamingInfo,
        logical_name: &str,
    ) -> MockOverrideRequest<'a> {
        let key = self.mock_key(logical_name);
        let file_name = match &node.extension {
            Some(ext) => format!("{}.{}.{}", naming.identifier, self.rules.mock_marker(), ext),
            None => format!("{}.{}", naming.identifier, self.rules.mock_marker()),
        };

        MockOverrideRequest {
            requested: self.overrides.get(&key),
            key,
            colocated: node.parent().join(&file_name),
            shared: self.rules.mocks_dir().join(&file_name),
        }
    }

    /// 解析替身
    ///
    /// 未请求替换时返回 `Ok(None)`；请求了但两个候选位置都无法加载时返回
    /// [`PackError::MockNotFound`]。
    pub fn resolve_mock(
        &self,
        node: &ResourceNode,
        naming: &NamingInfo,
        logical_name: &str,
    ) -> PackResult<Option<Unit>> {
        let request = self.request(node, naming, logical_name);

        match request.requested {
            None => Ok(None),
            Some(MockOverride::Replace(unit)) => {
                info!("使用调用方提供的模拟实现: {}", request.key);
                Ok(Some(unit.clone()))
            }
            Some(MockOverride::FromFilesystem) => {
                for candidate in [&request.colocated, &request.shared] {
                    match self.loader.load(candidate) {
                        Ok(unit) => {
                            info!("加载模拟实现: {} <- {}", request.key, candidate.display());
                            return Ok(Some(unit));
                        }
                        Err(e) => debug!("模拟实现候选不可用: {}", e),
                    }
                }

                Err(PackError::MockNotFound {
                    name: logical_name.to_string(),
                    candidates: (request.colocated, request.shared),
                })
            }
        }
    }
}
