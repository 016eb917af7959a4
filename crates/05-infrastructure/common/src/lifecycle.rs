//! 组件生命周期管理

use serde::{Deserialize, Serialize};
use std::fmt;

/// 组件生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifetime {
    /// 单例模式 - 整个容器生命周期内只创建一个实例
    Singleton,
    /// 作用域模式 - 在同一作用域内共享实例
    Scoped,
    /// 瞬时模式 - 每次解析都创建新实例
    Transient,
}

impl Lifetime {
    /// 从文件名中的生命周期标记解析
    ///
    /// 标记区分大小写，同时接受完整名称和两个字母的缩写。
    /// 无法识别的标记返回 `None`，由调用方回退到默认生命周期。
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "singleton" | "si" => Some(Self::Singleton),
            "transient" | "tr" => Some(Self::Transient),
            "scoped" | "sc" => Some(Self::Scoped),
            _ => None,
        }
    }

    /// 生命周期的规范名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Singleton => "singleton",
            Self::Scoped => "scoped",
            Self::Transient => "transient",
        }
    }
}

/// 未标记生命周期的组件按单例注册
impl Default for Lifetime {
    fn default() -> Self {
        Self::Singleton
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 组件作用域
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: uuid::Uuid,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Scope {
    /// 创建新作用域
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            name: name.into(),
            created_at: chrono::Utc::now(),
        }
    }

    /// 创建根作用域
    pub fn root() -> Self {
        Self::new("root")
    }

    /// 创建子作用域
    pub fn child(&self, name: impl Into<String>) -> Self {
        Self::new(format!("{}.{}", self.name, name.into()))
    }

    /// 是否为根作用域
    pub fn is_root(&self) -> bool {
        self.name == "root"
    }
}
