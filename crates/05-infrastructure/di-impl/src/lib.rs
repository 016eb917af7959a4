//! # 依赖注入具体实现
//!
//! 提供按名称注册和解析的依赖注入容器，支持单例、瞬时和作用域三种生命周期

use dashmap::DashMap;
use di_abstractions::{
    ComponentRegistry, ConstructionKind, Cradle, Instance, Registration, ResolveContext,
};
use infrastructure_common::{DependencyError, DependencyResult, Lifetime, NamedSlots, Scope};
use parking_lot::RwLock;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 具体的依赖注入容器实现
#[derive(Clone, Default)]
pub struct DiContainerImpl {
    /// 组件注册信息
    registrations: Arc<RwLock<HashMap<String, Registration>>>,
    /// 单例实例缓存
    singletons: Arc<DashMap<String, Instance>>,
}

impl DiContainerImpl {
    /// 创建新的容器
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建子作用域，作用域内的 scoped 组件只构造一次
    pub fn create_scope(&self, name: impl Into<String>) -> ScopedContainer {
        let scope = Scope::root().child(name);
        debug!("创建作用域: {} ({})", scope.name, scope.id);
        ScopedContainer {
            root: self.clone(),
            scope,
            instances: DashMap::new(),
        }
    }

    /// 获取注册配方
    pub fn registration(&self, name: &str) -> Option<Registration> {
        self.registrations.read().get(name).cloned()
    }

    /// 已注册组件数量
    pub fn len(&self) -> usize {
        self.registrations.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.read().is_empty()
    }
}

impl ComponentRegistry for DiContainerImpl {
    fn register_bulk(&self, registrations: NamedSlots<Registration>) -> DependencyResult<usize> {
        let mut table = self.registrations.write();
        let mut count = 0;

        for (name, registration) in registrations {
            if registration.kind == ConstructionKind::Skip {
                warn!("跳过不可注册的组件: {}", name);
                continue;
            }

            debug!(
                "注册组件: {} ({}, {})",
                name, registration.kind, registration.lifetime
            );
            self.singletons.remove(&name);
            table.insert(name, registration);
            count += 1;
        }

        info!("批量注册完成，注册了 {} 个组件", count);
        Ok(count)
    }

    fn resolve(&self, name: &str) -> DependencyResult<Instance> {
        Resolution::new(self, None).resolve_name(name)
    }

    fn is_registered(&self, name: &str) -> bool {
        self.registrations.read().contains_key(name)
    }

    fn registered_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registrations.read().keys().cloned().collect();
        names.sort();
        names
    }
}

/// 作用域容器
///
/// 与根容器共享注册信息和单例缓存，scoped 组件缓存在作用域内
pub struct ScopedContainer {
    root: DiContainerImpl,
    scope: Scope,
    instances: DashMap<String, Instance>,
}

impl ScopedContainer {
    /// 获取作用域
    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl ComponentRegistry for ScopedContainer {
    fn register_bulk(&self, registrations: NamedSlots<Registration>) -> DependencyResult<usize> {
        self.root.register_bulk(registrations)
    }

    fn resolve(&self, name: &str) -> DependencyResult<Instance> {
        Resolution::new(&self.root, Some(self)).resolve_name(name)
    }

    fn is_registered(&self, name: &str) -> bool {
        self.root.is_registered(name)
    }

    fn registered_names(&self) -> Vec<String> {
        self.root.registered_names()
    }
}

/// 一次解析过程
///
/// 作为 [`Cradle`] 传给工厂，工厂内部的解析共享同一条解析链
struct Resolution<'a> {
    container: &'a DiContainerImpl,
    scope: Option<&'a ScopedContainer>,
    context: RefCell<ResolveContext>,
}

impl<'a> Resolution<'a> {
    fn new(container: &'a DiContainerImpl, scope: Option<&'a ScopedContainer>) -> Self {
        Self {
            container,
            scope,
            context: RefCell::new(ResolveContext::new()),
        }
    }

    fn resolve_name(&self, name: &str) -> DependencyResult<Instance> {
        self.context.borrow_mut().push(name)?;
        let result = self.resolve_registered(name);
        self.context.borrow_mut().pop();
        result
    }

    fn resolve_registered(&self, name: &str) -> DependencyResult<Instance> {
        let registration =
            self.container
                .registration(name)
                .ok_or_else(|| DependencyError::ComponentNotRegistered {
                    name: name.to_string(),
                })?;

        match registration.lifetime {
            Lifetime::Transient => self.construct(name, &registration),
            Lifetime::Singleton => self.cached(&self.container.singletons, name, &registration),
            Lifetime::Scoped => {
                let scope = self.scope.ok_or_else(|| DependencyError::ScopeMismatch {
                    name: name.to_string(),
                    expected: Lifetime::Scoped.to_string(),
                    actual: "root".to_string(),
                })?;
                self.cached(&scope.instances, name, &registration)
            }
        }
    }

    fn cached(
        &self,
        cache: &DashMap<String, Instance>,
        name: &str,
        registration: &Registration,
    ) -> DependencyResult<Instance> {
        if let Some(existing) = cache.get(name) {
            return Ok(existing.value().clone());
        }

        let instance = self.construct(name, registration)?;
        let cached = cache.entry(name.to_string()).or_insert(instance).value().clone();
        Ok(cached)
    }

    fn construct(&self, name: &str, registration: &Registration) -> DependencyResult<Instance> {
        debug!("构造组件: {} ({})", name, registration.kind);
        registration.unit.produce(name, self)
    }
}

impl Cradle for Resolution<'_> {
    fn resolve(&self, name: &str) -> DependencyResult<Instance> {
        self.resolve_name(name)
    }
}
