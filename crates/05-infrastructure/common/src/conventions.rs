//! 约定规范定义
//!
//! 文件和目录按 `<identifier>.<lifetimeTag>.<extension>` 命名，
//! 从名称中推断组件标识与生命周期。

use crate::inflection::singular;
use crate::lifecycle::Lifetime;

/// 命名信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingInfo {
    /// 生命周期标记之前的逻辑名称
    pub identifier: String,
    /// 可识别的生命周期标记
    pub lifetime_tag: Option<Lifetime>,
}

impl NamingInfo {
    /// 有标记时使用标记，否则回退到默认生命周期
    pub fn lifetime_or(&self, default: Lifetime) -> Lifetime {
        self.lifetime_tag.unwrap_or(default)
    }
}

/// 命名约定规范
#[derive(Debug)]
pub struct NamingResolver;

impl NamingResolver {
    /// 解析文件或目录名
    ///
    /// 文件先去掉扩展名；目录名整体参与解析。最后一段若是可识别的生命周期标记则被剥离，
    /// 否则保留在标识中（`widget.xyz.rs` 的标识为 `widget.xyz`）。
    pub fn parse(base_name: &str, is_directory: bool) -> NamingInfo {
        let stem = if is_directory {
            base_name
        } else {
            Self::split_extension(base_name).0
        };

        match stem.rsplit_once('.') {
            Some((identifier, tag)) if !identifier.is_empty() => match Lifetime::from_tag(tag) {
                Some(lifetime) => NamingInfo {
                    identifier: identifier.to_string(),
                    lifetime_tag: Some(lifetime),
                },
                None => NamingInfo {
                    identifier: stem.to_string(),
                    lifetime_tag: None,
                },
            },
            _ => NamingInfo {
                identifier: stem.to_string(),
                lifetime_tag: None,
            },
        }
    }

    /// 拆分文件名与扩展名，扩展名不含 `.`
    pub fn split_extension(base_name: &str) -> (&str, Option<&str>) {
        match base_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
            _ => (base_name, None),
        }
    }

    /// 计算带命名空间的逻辑名称
    ///
    /// `stack` 为祖先目录标识，最近的祖先在前。只有根命名空间的直接子项
    /// （祖先栈恰好一项）会与祖先名拼接并转为单数，例如 `services/user.rs` 得到
    /// `user.service`；更深的层级保留自身名称。
    pub fn scoped_name(identifier: &str, stack: &[String]) -> String {
        match stack {
            [parent] => singular(&format!("{}.{}", identifier, parent)),
            _ => identifier.to_string(),
        }
    }
}

/// 首字母大写
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// 转换为驼峰命名，按空白、`-`、`_`、`:`、`;`、`.` 分词
pub fn to_camel_case(s: &str) -> String {
    let mut words = s.split(|c: char| c.is_whitespace() || "-_:;.".contains(c));
    let first = words.next().unwrap_or_default().to_string();
    words.fold(first, |mut acc, word| {
        acc.push_str(&capitalize(word));
        acc
    })
}

/// 转换为帕斯卡命名
pub fn to_pascal_case(s: &str) -> String {
    capitalize(&to_camel_case(s))
}
