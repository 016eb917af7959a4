//! 构造策略分类

use di_abstractions::{ConstructionKind, Unit};

/// 构造策略分类器
#[derive(Debug)]
pub struct ConstructionClassifier;

impl ConstructionClassifier {
    /// 根据单元形状决定构造策略
    ///
    /// 可调用单元同时带有参数和可构造标记时按可构造类型处理。
    pub fn classify(unit: &Unit) -> ConstructionKind {
        match unit {
            Unit::Undefined => ConstructionKind::Skip,
            Unit::Value(_) => ConstructionKind::Value,
            Unit::Callable(callable) if callable.constructible => ConstructionKind::Class,
            Unit::Callable(_) => ConstructionKind::Factory,
        }
    }
}
