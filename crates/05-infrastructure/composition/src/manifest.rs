//! 包清单注册
//!
//! 在打包之前把 `Cargo.toml` 本身和其中声明的依赖作为值注册，
//! 调用方可以为依赖名提供具体实例来替代描述值。

use crate::options::{ManifestTableOptions, PackerOptions};
use di_abstractions::{Instance, Registration};
use infrastructure_common::{to_camel_case, ConfigError, NamedSlots, SetOps};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use tracing::debug;

/// `Cargo.toml` 中与注册相关的部分
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    pub package: Option<PackageSection>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, toml::Value>,
    #[serde(default, rename = "dev-dependencies")]
    pub dev_dependencies: BTreeMap<String, toml::Value>,
}

/// `[package]` 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    pub name: String,
    #[serde(flatten)]
    pub fields: toml::Table,
}

impl PackageSection {
    pub fn version(&self) -> Option<&str> {
        self.fields.get("version").and_then(toml::Value::as_str)
    }
}

impl PackageManifest {
    /// 解析清单内容，`path` 仅用于错误信息
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidManifest {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// 清单中声明的外部依赖
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalDependency {
    pub name: String,
    /// 依赖声明原文，字符串版本号或表
    pub requirement: toml::Value,
    /// 是否来自 `[dev-dependencies]`
    pub dev: bool,
}

impl ExternalDependency {
    pub fn version(&self) -> Option<&str> {
        match &self.requirement {
            toml::Value::String(version) => Some(version.as_str()),
            toml::Value::Table(table) => table.get("version").and_then(toml::Value::as_str),
            _ => None,
        }
    }
}

/// 清单注册器
#[derive(Clone, Default)]
pub struct ManifestRegistrar {
    dependencies: ManifestTableOptions,
    dev_dependencies: ManifestTableOptions,
    libraries: HashMap<String, Instance>,
}

impl ManifestRegistrar {
    pub fn new(dependencies: ManifestTableOptions, dev_dependencies: ManifestTableOptions) -> Self {
        Self {
            dependencies,
            dev_dependencies,
            libraries: HashMap::new(),
        }
    }

    pub fn from_options(options: &PackerOptions) -> Self {
        Self::new(options.dependencies.clone(), options.dev_dependencies.clone())
    }

    /// 为依赖名提供具体实例
    ///
    /// 清单中声明的依赖改为注册该实例；清单中没有的名称直接注册。
    pub fn with_library(mut self, name: impl Into<String>, instance: Instance) -> Self {
        self.libraries.insert(name.into(), instance);
        self
    }

    pub fn with_libraries(mut self, libraries: HashMap<String, Instance>) -> Self {
        self.libraries.extend(libraries);
        self
    }

    /// 生成清单相关的注册配方
    pub fn registrations(&self, manifest: &PackageManifest) -> NamedSlots<Registration> {
        let mut registrations = NamedSlots::new();

        if let Some(package) = &manifest.package {
            debug!("注册包清单: {}", package.name);
            registrations.insert(to_camel_case(&package.name), Registration::value(package.clone()));
        }

        let tables = [
            (&manifest.dependencies, &self.dependencies, false),
            (&manifest.dev_dependencies, &self.dev_dependencies, true),
        ];
        for (table, options, dev) in tables {
            if options.skip {
                debug!("跳过依赖表 (dev: {})", dev);
                continue;
            }

            for name in selected(table, options) {
                let registered = to_camel_case(options.rename.get(&name).unwrap_or(&name));
                let registration = match self.libraries.get(&name) {
                    Some(instance) => Registration::instance(instance.clone()),
                    None => Registration::value(ExternalDependency {
                        requirement: table.get(&name).cloned().unwrap_or(toml::Value::Boolean(true)),
                        name: name.clone(),
                        dev,
                    }),
                };
                debug!("注册外部依赖: {} -> {}", name, registered);
                registrations.insert(registered, registration);
            }
        }

        for (name, instance) in &self.libraries {
            let declared =
                manifest.dependencies.contains_key(name) || manifest.dev_dependencies.contains_key(name);
            if !declared {
                registrations.insert(to_camel_case(name), Registration::instance(instance.clone()));
            }
        }

        registrations
    }
}

fn selected(table: &BTreeMap<String, toml::Value>, options: &ManifestTableOptions) -> BTreeSet<String> {
    let mut names: BTreeSet<String> = table.keys().cloned().collect();
    if !options.include.is_empty() {
        names = names.intersection_with(&options.include);
    }
    if !options.exclude.is_empty() {
        names = names.difference_with(&options.exclude);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const MANIFEST: &str = r#"
[package]
name = "order-service"
version = "0.3.0"
edition = "2021"

[dependencies]
serde = { version = "1.0", features = ["derive"] }
serde_json = "1.0"
regex = "1.10"

[dev-dependencies]
tempfile = "3.8"
"#;

    fn manifest() -> PackageManifest {
        PackageManifest::parse(Path::new("Cargo.toml"), MANIFEST).unwrap()
    }

    fn value(registrations: &NamedSlots<Registration>, name: &str) -> Arc<ExternalDependency> {
        let unit = &registrations.get(name).unwrap().unit;
        match unit {
            di_abstractions::Unit::Value(instance) => {
                instance.clone().downcast::<ExternalDependency>().unwrap()
            }
            other => panic!("unexpected unit {other:?}"),
        }
    }

    #[test]
    fn test_registers_package_and_dependencies() {
        let registrations = ManifestRegistrar::default().registrations(&manifest());
        let names: Vec<_> = registrations.names().collect();
        assert_eq!(
            names,
            vec!["orderService", "regex", "serde", "serdeJson", "tempfile"]
        );

        let serde = value(&registrations, "serde");
        assert_eq!(serde.version(), Some("1.0"));
        assert!(!serde.dev);
        assert!(value(&registrations, "tempfile").dev);
    }

    #[test]
    fn test_package_section_keeps_fields() {
        let manifest = manifest();
        let package = manifest.package.as_ref().unwrap();
        assert_eq!(package.name, "order-service");
        assert_eq!(package.version(), Some("0.3.0"));
    }

    #[test]
    fn test_include_exclude_rename_and_skip() {
        let dependencies = ManifestTableOptions {
            include: ["serde", "serde_json"].into_iter().map(String::from).collect(),
            exclude: ["serde"].into_iter().map(String::from).collect(),
            rename: HashMap::from([("serde_json".to_string(), "json".to_string())]),
            ..ManifestTableOptions::default()
        };
        let dev_dependencies = ManifestTableOptions {
            skip: true,
            ..ManifestTableOptions::default()
        };

        let registrations =
            ManifestRegistrar::new(dependencies, dev_dependencies).registrations(&manifest());
        let names: Vec<_> = registrations.names().collect();
        assert_eq!(names, vec!["orderService", "json"]);
        assert_eq!(value(&registrations, "json").name, "serde_json");
    }

    #[test]
    fn test_library_instances_replace_descriptions() {
        let registrar = ManifestRegistrar::default()
            .with_library("regex", Arc::new("compiled".to_string()))
            .with_library("clock", Arc::new(42_u64));

        let registrations = registrar.registrations(&manifest());
        let regex = registrations.get("regex").unwrap().unit.clone();
        match regex {
            di_abstractions::Unit::Value(instance) => {
                assert_eq!(instance.downcast_ref::<String>().unwrap(), "compiled")
            }
            other => panic!("unexpected unit {other:?}"),
        }
        assert!(registrations.contains("clock"));
    }

    #[test]
    fn test_workspace_manifest_without_package() {
        let manifest =
            PackageManifest::parse(Path::new("Cargo.toml"), "[workspace]\nmembers = []\n").unwrap();
        assert!(ManifestRegistrar::default().registrations(&manifest).is_empty());
    }

    #[test]
    fn test_invalid_manifest() {
        let result = PackageManifest::parse(Path::new("broken/Cargo.toml"), "[package\nname =");
        assert!(matches!(result, Err(ConfigError::InvalidManifest { .. })));
    }
}
