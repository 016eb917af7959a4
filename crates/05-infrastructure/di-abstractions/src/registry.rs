//! 组件注册表抽象接口

use crate::unit::{ConstructionKind, Instance, Unit};
use infrastructure_common::{DependencyError, DependencyResult, Lifetime, NamedSlots};
use std::any::{type_name, Any};
use std::sync::Arc;

/// 组件注册表 trait
///
/// 提供按名称批量注册构造配方和按名称解析的核心接口
pub trait ComponentRegistry: Send + Sync {
    /// 批量注册，同名注册后写覆盖先写，返回本次注册的数量
    fn register_bulk(&self, registrations: NamedSlots<Registration>) -> DependencyResult<usize>;

    /// 注册单个组件
    fn register(&self, name: &str, registration: Registration) -> DependencyResult<()> {
        let mut slots = NamedSlots::new();
        slots.insert(name, registration);
        self.register_bulk(slots).map(|_| ())
    }

    /// 按名称解析组件
    fn resolve(&self, name: &str) -> DependencyResult<Instance>;

    /// 检查组件是否已注册
    fn is_registered(&self, name: &str) -> bool;

    /// 获取所有已注册的名称
    fn registered_names(&self) -> Vec<String>;

    /// 解析并转换为具体类型
    fn resolve_as<T: Any + Send + Sync>(&self, name: &str) -> DependencyResult<Arc<T>>
    where
        Self: Sized,
    {
        self.resolve(name)?
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>(),
            })
    }
}

/// 组件注册配方
#[derive(Debug, Clone)]
pub struct Registration {
    /// 构造策略
    pub kind: ConstructionKind,
    /// 生命周期
    pub lifetime: Lifetime,
    /// 组件单元
    pub unit: Unit,
}

impl Registration {
    pub fn new(kind: ConstructionKind, lifetime: Lifetime, unit: Unit) -> Self {
        Self {
            kind,
            lifetime,
            unit,
        }
    }

    /// 以单例值注册
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Self::new(ConstructionKind::Value, Lifetime::Singleton, Unit::value(value))
    }

    /// 以已包装实例注册单例值
    pub fn instance(instance: Instance) -> Self {
        Self::new(ConstructionKind::Value, Lifetime::Singleton, Unit::Value(instance))
    }
}
