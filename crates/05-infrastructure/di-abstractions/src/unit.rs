//! 组件单元
//!
//! 加载器在边界处把每个被发现的组件表示为显式的和类型，
//! 构造策略由单元形状一次性决定，而不是在注册时反复探测。

use infrastructure_common::{DependencyError, NamedSlots};
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// 组件实例
pub type Instance = Arc<dyn Any + Send + Sync>;

/// 构造函数类型
pub type Constructor = Arc<dyn Fn(&dyn Cradle) -> Result<Instance, DependencyError> + Send + Sync>;

/// 工厂构造时传入的选项对象，可按名称解析其他依赖
pub trait Cradle {
    /// 按注册名称解析
    fn resolve(&self, name: &str) -> Result<Instance, DependencyError>;
}

impl<'a> dyn Cradle + 'a {
    /// 解析并转换为具体类型
    pub fn resolve_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, DependencyError> {
        self.resolve(name)?
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>(),
            })
    }
}

/// 基于固定映射的选项对象
#[derive(Clone, Default)]
pub struct MapCradle {
    values: NamedSlots<Instance>,
}

impl MapCradle {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一个具名值
    pub fn with<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.values.insert(name, Arc::new(value) as Instance);
        self
    }

    /// 添加一个已包装的实例
    pub fn with_instance(mut self, name: impl Into<String>, instance: Instance) -> Self {
        self.values.insert(name, instance);
        self
    }
}

impl Cradle for MapCradle {
    fn resolve(&self, name: &str) -> Result<Instance, DependencyError> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| DependencyError::ComponentNotRegistered {
                name: name.to_string(),
            })
    }
}

/// 可调用单元
#[derive(Clone)]
pub struct Callable {
    /// 声明的参数个数
    pub arity: usize,
    /// 是否为可构造类型
    pub constructible: bool,
    invoke: Constructor,
}

impl Callable {
    /// 直接调用的工厂函数
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&dyn Cradle) -> Result<T, DependencyError> + Send + Sync + 'static,
    {
        Self {
            arity: 1,
            constructible: false,
            invoke: Arc::new(move |cradle: &dyn Cradle| Ok(Arc::new(factory(cradle)?) as Instance)),
        }
    }

    /// 由注册表实例化的可构造类型
    pub fn class<T, F>(constructor: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&dyn Cradle) -> Result<T, DependencyError> + Send + Sync + 'static,
    {
        Self {
            constructible: true,
            ..Self::factory(constructor)
        }
    }

    /// 直接返回已包装实例的构造函数
    pub fn from_constructor(constructor: Constructor, arity: usize, constructible: bool) -> Self {
        Self {
            arity,
            constructible,
            invoke: constructor,
        }
    }

    /// 覆盖声明的参数个数
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    /// 调用构造函数
    pub fn invoke(&self, cradle: &dyn Cradle) -> Result<Instance, DependencyError> {
        (self.invoke)(cradle)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("arity", &self.arity)
            .field("constructible", &self.constructible)
            .field("invoke", &"<function>")
            .finish()
    }
}

/// 组件单元
#[derive(Clone)]
pub enum Unit {
    /// 加载成功但没有导出任何内容
    Undefined,
    /// 普通数据，按原样注册
    Value(Instance),
    /// 工厂函数或可构造类型
    Callable(Callable),
}

impl Unit {
    /// 包装一个值
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Self::Value(Arc::new(value))
    }

    /// 包装一个工厂函数
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&dyn Cradle) -> Result<T, DependencyError> + Send + Sync + 'static,
    {
        Self::Callable(Callable::factory(factory))
    }

    /// 包装一个可构造类型
    pub fn class<T, F>(constructor: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&dyn Cradle) -> Result<T, DependencyError> + Send + Sync + 'static,
    {
        Self::Callable(Callable::class(constructor))
    }

    /// 以选项对象产出实例：值直接返回，可调用单元被调用
    pub fn produce(&self, name: &str, cradle: &dyn Cradle) -> Result<Instance, DependencyError> {
        match self {
            Self::Undefined => Err(DependencyError::NotConstructible {
                name: name.to_string(),
            }),
            Self::Value(instance) => Ok(instance.clone()),
            Self::Callable(callable) => callable.invoke(cradle),
        }
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("Undefined"),
            Self::Value(_) => f.write_str("Value(<instance>)"),
            Self::Callable(callable) => f.debug_tuple("Callable").field(callable).finish(),
        }
    }
}

/// 构造策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstructionKind {
    /// 按原样注册的值
    Value,
    /// 以选项对象调用的工厂函数
    Factory,
    /// 由注册表实例化的类型
    Class,
    /// 无法解析，不注册
    Skip,
}

impl fmt::Display for ConstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Value => "value",
            Self::Factory => "factory",
            Self::Class => "class",
            Self::Skip => "skip",
        };
        f.write_str(name)
    }
}

/// 目录聚合工厂产出的实例：子组件名称到其实例的映射
#[derive(Default)]
pub struct Aggregate {
    members: NamedSlots<Instance>,
}

impl Aggregate {
    pub fn new(members: NamedSlots<Instance>) -> Self {
        Self { members }
    }

    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.members.get(name)
    }

    /// 取出成员并转换为具体类型
    pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.members.get(name).cloned()?.downcast::<T>().ok()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains(name)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.names()
    }
}

impl fmt::Debug for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.members.names()).finish()
    }
}
