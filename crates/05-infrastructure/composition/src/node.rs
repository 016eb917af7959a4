//! 扫描时的文件系统节点

use infrastructure_common::NamingResolver;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 文件系统节点，扫描时读取一次，之后不再变化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNode {
    pub path: PathBuf,
    pub is_directory: bool,
    pub base_name: String,
    /// 文件扩展名（不含 `.`），目录没有扩展名
    pub extension: Option<String>,
}

impl ResourceNode {
    /// 读取路径状态
    pub fn inspect(path: &Path) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        Ok(Self::new(path, metadata.is_dir()))
    }

    pub fn new(path: &Path, is_directory: bool) -> Self {
        let base_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = if is_directory {
            None
        } else {
            NamingResolver::split_extension(&base_name)
                .1
                .map(str::to_string)
        };

        Self {
            path: path.to_path_buf(),
            is_directory,
            base_name,
            extension,
        }
    }

    /// 所在目录
    pub fn parent(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// 按名称排序的直接子节点路径
    pub fn children(&self) -> io::Result<Vec<PathBuf>> {
        let mut children = fs::read_dir(&self.path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()?;
        children.sort();
        Ok(children)
    }
}
