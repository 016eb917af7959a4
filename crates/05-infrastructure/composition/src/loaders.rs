//! 组件单元加载器实现

use di_abstractions::{NotLoadable, Unit, UnitLoader};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// 代码中登记的组件目录
///
/// 单元按相对于扫描根目录的路径登记。目录可以登记自身，也可以通过
/// `index.<ext>` 入口暴露一个聚合单元。
#[derive(Debug, Clone)]
pub struct UnitCatalog {
    root: PathBuf,
    entries: HashMap<PathBuf, Unit>,
    index_extensions: Vec<String>,
}

impl UnitCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: HashMap::new(),
            index_extensions: vec!["rs".to_string()],
        }
    }

    /// 登记一个单元，路径相对于扫描根目录
    pub fn with(mut self, relative: impl AsRef<Path>, unit: Unit) -> Self {
        self.insert(relative, unit);
        self
    }

    pub fn insert(&mut self, relative: impl AsRef<Path>, unit: Unit) {
        self.entries.insert(relative.as_ref().to_path_buf(), unit);
    }

    /// 目录入口文件允许的扩展名
    pub fn with_index_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

impl UnitLoader for UnitCatalog {
    fn load(&self, path: &Path) -> Result<Unit, NotLoadable> {
        let relative = self.relative(path);

        if let Some(unit) = self.entries.get(relative) {
            return Ok(unit.clone());
        }

        if path.is_dir() {
            for ext in &self.index_extensions {
                let index = relative.join(format!("index.{ext}"));
                if let Some(unit) = self.entries.get(&index) {
                    debug!("通过入口文件加载目录: {}", index.display());
                    return Ok(unit.clone());
                }
            }
        }

        Err(NotLoadable::new(path, "组件目录中没有对应条目"))
    }
}

/// JSON 文件加载器，文件内容按原样作为值注册
#[derive(Debug, Clone, Default)]
pub struct JsonValueLoader;

impl UnitLoader for JsonValueLoader {
    fn load(&self, path: &Path) -> Result<Unit, NotLoadable> {
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            return Err(NotLoadable::new(path, "不是 JSON 文件"));
        }

        let content = fs::read_to_string(path).map_err(|e| NotLoadable::new(path, e.to_string()))?;
        let value: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| NotLoadable::new(path, e.to_string()))?;
        Ok(Unit::value(value))
    }
}

/// 按顺序尝试多个加载器，第一个成功的结果生效
#[derive(Clone, Default)]
pub struct ChainLoader {
    loaders: Vec<Arc<dyn UnitLoader>>,
}

impl ChainLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, loader: impl UnitLoader + 'static) -> Self {
        self.loaders.push(Arc::new(loader));
        self
    }

    pub fn push(&mut self, loader: Arc<dyn UnitLoader>) {
        self.loaders.push(loader);
    }
}

impl UnitLoader for ChainLoader {
    fn load(&self, path: &Path) -> Result<Unit, NotLoadable> {
        let mut reasons = Vec::with_capacity(self.loaders.len());
        for loader in &self.loaders {
            match loader.load(path) {
                Ok(unit) => return Ok(unit),
                Err(e) => reasons.push(e.reason),
            }
        }

        if reasons.is_empty() {
            reasons.push("没有可用的加载器".to_string());
        }
        Err(NotLoadable::new(path, reasons.join("; ")))
    }
}
