//! 目录打包
//!
//! 深度优先遍历源码目录，为每个可注册的节点产出一条注册描述。
//! 能直接加载的节点（包括暴露了入口的目录）被视为不透明单元，不再展开；
//! 无法加载的目录退回到逐项打包，并在非顶层时折叠为一个聚合工厂。

use crate::classifier::ConstructionClassifier;
use crate::mocks::{MockOverrides, MockResolver};
use crate::node::ResourceNode;
use crate::options::{FileRules, PackerOptions};
use di_abstractions::{
    Aggregate, Callable, ConstructionKind, Constructor, Cradle, Instance, Unit, UnitLoader,
};
use infrastructure_common::{singular, Lifetime, NamedSlots, NamingInfo, NamingResolver, PackResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// 注册描述，打包的输出单位
#[derive(Debug, Clone)]
pub struct RegistrationDescriptor {
    /// 单数化、带命名空间的逻辑名称（尚未转为驼峰）
    pub name: String,
    pub kind: ConstructionKind,
    /// 名称中标记的生命周期，未标记时由调用方的默认值决定
    pub lifetime: Option<Lifetime>,
    pub payload: Unit,
}

impl RegistrationDescriptor {
    pub fn lifetime_or(&self, default: Lifetime) -> Lifetime {
        self.lifetime.unwrap_or(default)
    }
}

/// 目录打包器
pub struct TreePacker {
    root: PathBuf,
    rules: FileRules,
    loader: Arc<dyn UnitLoader>,
    mocks: MockOverrides,
    mock_resolution: bool,
}

impl TreePacker {
    pub fn new(options: &PackerOptions, loader: Arc<dyn UnitLoader>) -> PackResult<Self> {
        Ok(Self {
            root: options.src_dir.clone(),
            rules: options.file_rules()?,
            loader,
            mocks: MockOverrides::default(),
            mock_resolution: true,
        })
    }

    /// 设置调用方的模拟实现替换表
    pub fn with_mocks(mut self, mocks: MockOverrides) -> Self {
        self.mocks = mocks;
        self
    }

    /// 启用或禁用模拟实现替换
    pub fn with_mock_resolution(mut self, enabled: bool) -> Self {
        self.mock_resolution = enabled;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 打包扫描根目录的所有直接子节点
    ///
    /// 根目录本身不参与命名，子节点以空的祖先栈开始。
    pub fn pack_root(&self) -> PackResult<Vec<RegistrationDescriptor>> {
        let root = match ResourceNode::inspect(&self.root) {
            Ok(node) if node.is_directory => node,
            Ok(_) => {
                warn!("扫描根路径不是目录: {}", self.root.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!("无法读取扫描根目录 {}: {}", self.root.display(), e);
                return Ok(Vec::new());
            }
        };

        let children = match root.children() {
            Ok(children) => children,
            Err(e) => {
                warn!("无法列出扫描根目录 {}: {}", self.root.display(), e);
                return Ok(Vec::new());
            }
        };

        let mut descriptors = Vec::new();
        for child in children {
            descriptors.extend(self.pack(&child, &[])?);
        }
        Ok(descriptors)
    }

    /// 打包单个节点
    ///
    /// `stack` 为祖先目录标识，最近的祖先在前。只有模拟实现缺失会返回错误，
    /// 其余失败都在本层吸收，对应节点不产出描述。
    pub fn pack(
        &self,
        path: &Path,
        stack: &[String],
    ) -> PackResult<Vec<RegistrationDescriptor>> {
        let node = match ResourceNode::inspect(path) {
            Ok(node) => node,
            Err(e) => {
                debug!("跳过无法读取的路径 {}: {}", path.display(), e);
                return Ok(Vec::new());
            }
        };

        if !self.is_registrable(&node) {
            debug!("不注册: {}", node.path.display());
            return Ok(Vec::new());
        }

        let naming = NamingResolver::parse(&node.base_name, node.is_directory);

        match self.loader.load(&node.path) {
            Ok(unit) => self.pack_unit(&node, &naming, stack, unit),
            Err(e) if node.is_directory => {
                debug!("目录无法直接加载，逐项打包: {}", e);
                self.pack_directory(&node, &naming, stack)
            }
            Err(e) => {
                debug!("跳过无法加载的文件: {}", e);
                Ok(Vec::new())
            }
        }
    }

    fn is_registrable(&self, node: &ResourceNode) -> bool {
        if self.rules.is_in_mocks_dir(&node.path) {
            return false;
        }

        if node.is_directory {
            return !self.rules.is_mock(&node.base_name, true);
        }

        self.rules.is_allowed_extension(node.extension.as_deref())
            && !self.rules.is_test_file(&node.base_name)
            && !self.rules.is_mock(&node.base_name, false)
    }

    fn pack_unit(
        &self,
        node: &ResourceNode,
        naming: &NamingInfo,
        stack: &[String],
        unit: Unit,
    ) -> PackResult<Vec<RegistrationDescriptor>> {
        let name = NamingResolver::scoped_name(&naming.identifier, stack);
        let payload = match self.substitute_mock(node, naming, &name)? {
            Some(mock) => mock,
            None => unit,
        };

        let kind = ConstructionClassifier::classify(&payload);
        if kind == ConstructionKind::Skip {
            debug!("单元没有导出内容，不注册: {}", node.path.display());
            return Ok(Vec::new());
        }

        debug!("发现组件: {} ({}) <- {}", name, kind, node.path.display());
        Ok(vec![RegistrationDescriptor {
            name,
            kind,
            lifetime: naming.lifetime_tag,
            payload,
        }])
    }

    fn substitute_mock(
        &self,
        node: &ResourceNode,
        naming: &NamingInfo,
        name: &str,
    ) -> PackResult<Option<Unit>> {
        if !self.mock_resolution || self.mocks.is_empty() {
            return Ok(None);
        }

        MockResolver::new(&self.rules, self.loader.as_ref(), &self.mocks).resolve_mock(node, naming, name)
    }

    fn pack_directory(
        &self,
        node: &ResourceNode,
        naming: &NamingInfo,
        stack: &[String],
    ) -> PackResult<Vec<RegistrationDescriptor>> {
        let children = match node.children() {
            Ok(children) => children,
            Err(e) => {
                warn!("无法列出目录 {}: {}", node.path.display(), e);
                return Ok(Vec::new());
            }
        };

        let mut child_stack = Vec::with_capacity(stack.len() + 1);
        child_stack.push(naming.identifier.clone());
        child_stack.extend_from_slice(stack);

        let mut descriptors = Vec::new();
        for child in children {
            descriptors.extend(self.pack(&child, &child_stack)?);
        }

        if stack.is_empty() || descriptors.is_empty() {
            return Ok(descriptors);
        }

        let name = singular(&child_stack.join("."));
        debug!("聚合目录 {}: {} 个成员", name, descriptors.len());

        Ok(vec![RegistrationDescriptor {
            payload: aggregate(&name, descriptors),
            name,
            kind: ConstructionKind::Factory,
            lifetime: naming.lifetime_tag,
        }])
    }
}

/// 把子描述折叠为一个聚合工厂
///
/// 工厂以同一个选项对象构造每个成员，单个成员失败只记录日志并从结果中省略。
fn aggregate(name: &str, descriptors: Vec<RegistrationDescriptor>) -> Unit {
    let members: NamedSlots<Unit> = descriptors
        .into_iter()
        .map(|descriptor| (descriptor.name, descriptor.payload))
        .collect();
    let name = name.to_string();

    let constructor: Constructor = Arc::new(move |cradle: &dyn Cradle| {
        let mut produced = NamedSlots::new();
        for (member, unit) in members.iter() {
            match unit.produce(member, cradle) {
                Ok(instance) => {
                    produced.insert(member, instance);
                }
                Err(e) => warn!("聚合成员构造失败，已省略: {}.{}: {}", name, member, e),
            }
        }
        Ok(Arc::new(Aggregate::new(produced)) as Instance)
    });

    Unit::Callable(Callable::from_constructor(constructor, 1, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::UnitCatalog;
    use di_abstractions::MapCradle;
    use infrastructure_common::{DependencyError, PackError};
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    fn packer(root: &Path, catalog: UnitCatalog) -> TreePacker {
        let options = PackerOptions {
            src_dir: root.to_path_buf(),
            ..PackerOptions::default()
        };
        TreePacker::new(&options, Arc::new(catalog)).unwrap()
    }

    fn names(descriptors: &[RegistrationDescriptor]) -> Vec<&str> {
        descriptors.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_filtered_files_yield_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let mut catalog = UnitCatalog::new(root);
        for file in ["user.test.rs", "user.mock.rs", "mocks/user.mock.rs", "mocks/order.rs", "notes.md"] {
            touch(root, file);
            catalog.insert(file, Unit::value(0_u8));
        }
        let packer = packer(root, catalog);

        for file in ["user.test.rs", "user.mock.rs", "mocks/user.mock.rs", "mocks/order.rs", "notes.md"] {
            assert!(packer.pack(&root.join(file), &[]).unwrap().is_empty(), "{file}");
        }
        assert!(packer.pack(&root.join("mocks"), &[]).unwrap().is_empty());
    }

    #[test]
    fn test_top_level_directory_is_flattened_and_scoped() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "services/user.transient.rs");
        touch(root, "services/order.rs");
        touch(root, "settings.json");
        let catalog = UnitCatalog::new(root)
            .with("services/user.transient.rs", Unit::factory(|_: &dyn Cradle| Ok(1_u8)))
            .with("services/order.rs", Unit::class(|_: &dyn Cradle| Ok(2_u8)))
            .with("settings.json", Unit::value(3_u8));

        let descriptors = packer(root, catalog).pack_root().unwrap();
        assert_eq!(names(&descriptors), vec!["order.service", "user.service", "settings"]);

        assert_eq!(descriptors[0].kind, ConstructionKind::Class);
        assert_eq!(descriptors[0].lifetime, None);
        assert_eq!(descriptors[1].kind, ConstructionKind::Factory);
        assert_eq!(descriptors[1].lifetime, Some(Lifetime::Transient));
        assert_eq!(descriptors[2].kind, ConstructionKind::Value);
    }

    #[test]
    fn test_unknown_tag_is_kept_in_name() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "widget.xyz.rs");
        let catalog = UnitCatalog::new(root).with("widget.xyz.rs", Unit::value(1_u8));

        let descriptors = packer(root, catalog).pack_root().unwrap();
        assert_eq!(names(&descriptors), vec!["widget.xyz"]);
        assert_eq!(descriptors[0].lifetime_or(Lifetime::Scoped), Lifetime::Scoped);
    }

    #[test]
    fn test_loadable_directory_is_opaque() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "repositories/index.rs");
        touch(root, "repositories/user.rs");
        let catalog = UnitCatalog::new(root)
            .with("repositories/index.rs", Unit::value("curated".to_string()))
            .with("repositories/user.rs", Unit::value(1_u8));

        let descriptors = packer(root, catalog).pack_root().unwrap();
        assert_eq!(names(&descriptors), vec!["repositories"]);
        assert_eq!(descriptors[0].kind, ConstructionKind::Value);
    }

    #[test]
    fn test_nested_directory_is_aggregated_best_effort() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "services/admin.scoped/a.rs");
        touch(root, "services/admin.scoped/b.rs");
        let catalog = UnitCatalog::new(root)
            .with(
                "services/admin.scoped/a.rs",
                Unit::factory(|cradle: &dyn Cradle| Ok(*cradle.resolve_as::<i32>("x")? + 1)),
            )
            .with(
                "services/admin.scoped/b.rs",
                Unit::factory(|_: &dyn Cradle| -> Result<i32, DependencyError> {
                    Err(DependencyError::creation_failed("b", "boom"))
                }),
            );

        let descriptors = packer(root, catalog).pack_root().unwrap();
        assert_eq!(names(&descriptors), vec!["admin.service"]);
        assert_eq!(descriptors[0].kind, ConstructionKind::Factory);
        assert_eq!(descriptors[0].lifetime, Some(Lifetime::Scoped));

        let cradle = MapCradle::new().with("x", 1_i32);
        let instance = descriptors[0].payload.produce("adminService", &cradle).unwrap();
        let aggregate = instance.downcast::<Aggregate>().unwrap();
        assert_eq!(aggregate.len(), 1);
        assert_eq!(*aggregate.get_as::<i32>("a").unwrap(), 2);
        assert!(!aggregate.contains("b"));
    }

    #[test]
    fn test_aggregate_collects_every_member() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "services/admin/a.rs");
        touch(root, "services/admin/b.rs");
        touch(root, "services/admin/c.json");
        let catalog = UnitCatalog::new(root)
            .with(
                "services/admin/a.rs",
                Unit::factory(|cradle: &dyn Cradle| Ok(*cradle.resolve_as::<i32>("x")? + 1)),
            )
            .with(
                "services/admin/b.rs",
                Unit::factory(|cradle: &dyn Cradle| Ok(*cradle.resolve_as::<i32>("x")? * 10)),
            )
            .with("services/admin/c.json", Unit::value("limits".to_string()));

        let descriptors = packer(root, catalog).pack_root().unwrap();
        assert_eq!(names(&descriptors), vec!["admin.service"]);

        let cradle = MapCradle::new().with("x", 1_i32);
        let instance = descriptors[0].payload.produce("adminService", &cradle).unwrap();
        let aggregate = instance.downcast::<Aggregate>().unwrap();
        assert_eq!(aggregate.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(*aggregate.get_as::<i32>("a").unwrap(), 2);
        assert_eq!(*aggregate.get_as::<i32>("b").unwrap(), 10);
        assert_eq!(*aggregate.get_as::<String>("c").unwrap(), "limits");
    }

    #[test]
    fn test_directory_without_registrable_children_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "services/docs/readme.md");
        touch(root, "services/docs/a.test.rs");
        let catalog = UnitCatalog::new(root).with("services/docs/a.test.rs", Unit::value(1_u8));

        let packer = packer(root, catalog);
        assert!(packer.pack(&root.join("services/docs"), &["services".to_string()]).unwrap().is_empty());
        assert!(packer.pack_root().unwrap().is_empty());
    }

    #[test]
    fn test_undefined_units_and_unloadable_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "empty.rs");
        touch(root, "asset.rs");
        let catalog = UnitCatalog::new(root).with("empty.rs", Unit::Undefined);

        assert!(packer(root, catalog).pack_root().unwrap().is_empty());
    }

    #[test]
    fn test_caller_replacement_substitutes_unit() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "services/user.rs");
        let catalog = UnitCatalog::new(root).with("services/user.rs", Unit::value("real".to_string()));
        let mocks = MockOverrides::new().replace("mockUserService", Unit::value("double".to_string()));

        let descriptors = packer(root, catalog).with_mocks(mocks).pack_root().unwrap();
        let instance = descriptors[0].payload.produce("userService", &MapCradle::new()).unwrap();
        assert_eq!(instance.downcast_ref::<String>().unwrap(), "double");
    }

    #[test]
    fn test_colocated_mock_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "services/user.rs");
        touch(root, "services/user.mock.rs");
        let catalog = UnitCatalog::new(root)
            .with("services/user.rs", Unit::value("real".to_string()))
            .with("services/user.mock.rs", Unit::value("fake".to_string()));
        let mocks = MockOverrides::new().from_filesystem("mockUserService");

        let descriptors = packer(root, catalog).with_mocks(mocks).pack_root().unwrap();
        assert_eq!(names(&descriptors), vec!["user.service"]);
        let instance = descriptors[0].payload.produce("userService", &MapCradle::new()).unwrap();
        assert_eq!(instance.downcast_ref::<String>().unwrap(), "fake");
    }

    #[test]
    fn test_missing_mock_aborts_pack() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "services/user.rs");
        let catalog = UnitCatalog::new(root).with("services/user.rs", Unit::value("real".to_string()));
        let mocks = MockOverrides::new().from_filesystem("mockUserService");

        let result = packer(root, catalog.clone()).with_mocks(mocks.clone()).pack_root();
        assert!(matches!(result, Err(PackError::MockNotFound { .. })));

        let descriptors = packer(root, catalog)
            .with_mocks(mocks)
            .with_mock_resolution(false)
            .pack_root()
            .unwrap();
        let instance = descriptors[0].payload.produce("userService", &MapCradle::new()).unwrap();
        assert_eq!(instance.downcast_ref::<String>().unwrap(), "real");
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let packer = packer(&missing, UnitCatalog::new(&missing));
        assert!(packer.pack_root().unwrap().is_empty());
    }

    #[test]
    fn test_packing_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "services/user.rs");
        touch(root, "services/admin/a.rs");
        touch(root, "config.json");
        let catalog = UnitCatalog::new(root)
            .with("services/user.rs", Unit::value(1_u8))
            .with("services/admin/a.rs", Unit::value(2_u8))
            .with("config.json", Unit::value(3_u8));
        let packer = packer(root, catalog);

        let summarize = |descriptors: Vec<RegistrationDescriptor>| {
            let mut summary: Vec<_> = descriptors
                .into_iter()
                .map(|d| (d.name, d.kind, d.lifetime))
                .collect();
            summary.sort_by(|a, b| a.0.cmp(&b.0));
            summary
        };

        assert_eq!(
            summarize(packer.pack_root().unwrap()),
            summarize(packer.pack_root().unwrap())
        );
    }
}
