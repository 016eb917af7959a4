//! 组件单元加载器抽象接口

use crate::unit::Unit;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// 路径无法作为组件单元加载
///
/// 这是可恢复的情况：目录会退回到逐项聚合，文件会被跳过。
#[derive(Error, Debug, Clone)]
#[error("无法加载组件单元: {}, 原因: {reason}", path.display())]
pub struct NotLoadable {
    pub path: PathBuf,
    pub reason: String,
}

impl NotLoadable {
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// 组件单元加载器 trait
///
/// 文件加载其内容；目录尝试以单一聚合入口加载
pub trait UnitLoader: Send + Sync {
    /// 加载指定路径
    fn load(&self, path: &Path) -> Result<Unit, NotLoadable>;
}

impl<L: UnitLoader + ?Sized> UnitLoader for Arc<L> {
    fn load(&self, path: &Path) -> Result<Unit, NotLoadable> {
        (**self).load(path)
    }
}

impl<L: UnitLoader + ?Sized> UnitLoader for Box<L> {
    fn load(&self, path: &Path) -> Result<Unit, NotLoadable> {
        (**self).load(path)
    }
}
