//! 集合工具
//!
//! [`NamedSlots`] 保持首次插入顺序，同名写入覆盖原槽位（后写覆盖先写）。

use std::collections::{BTreeSet, HashMap};

/// 按名称索引的有序槽位表
#[derive(Debug, Clone)]
pub struct NamedSlots<T> {
    slots: Vec<(String, T)>,
    index: HashMap<String, usize>,
}

impl<T> NamedSlots<T> {
    /// 创建空槽位表
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// 插入或覆盖，返回被覆盖的旧值
    pub fn insert(&mut self, name: impl Into<String>, value: T) -> Option<T> {
        let name = name.into();
        match self.index.get(&name) {
            Some(&slot) => Some(std::mem::replace(&mut self.slots[slot].1, value)),
            None => {
                self.index.insert(name.clone(), self.slots.len());
                self.slots.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.index.get(name).map(|&slot| &self.slots[slot].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// 按槽位顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.slots.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|(name, _)| name.as_str())
    }

    /// 合并另一张表，同名项以 `other` 为准
    pub fn extend(&mut self, other: NamedSlots<T>) {
        for (name, value) in other {
            self.insert(name, value);
        }
    }
}

impl<T> Default for NamedSlots<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntoIterator for NamedSlots<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}

impl<S: Into<String>, T> FromIterator<(S, T)> for NamedSlots<T> {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        let mut slots = Self::new();
        for (name, value) in iter {
            slots.insert(name, value);
        }
        slots
    }
}

/// 集合运算扩展
pub trait SetOps {
    /// 交集
    fn intersection_with<I, S>(&self, other: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>;

    /// 差集
    fn difference_with<I, S>(&self, other: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>;
}

impl SetOps for BTreeSet<String> {
    fn intersection_with<I, S>(&self, other: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let other: BTreeSet<String> = other.into_iter().map(|s| s.as_ref().to_string()).collect();
        self.intersection(&other).cloned().collect()
    }

    fn difference_with<I, S>(&self, other: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let other: BTreeSet<String> = other.into_iter().map(|s| s.as_ref().to_string()).collect();
        self.difference(&other).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_wins_keeps_first_position() {
        let mut slots = NamedSlots::new();
        slots.insert("a", 1);
        slots.insert("b", 2);
        assert_eq!(slots.insert("a", 3), Some(1));

        let collected: Vec<_> = slots.iter().map(|(n, v)| (n.to_string(), *v)).collect();
        assert_eq!(collected, vec![("a".to_string(), 3), ("b".to_string(), 2)]);
        assert_eq!(slots.len(), 2);
    }

    #[test]
    fn test_extend_overrides() {
        let mut base: NamedSlots<i32> = [("a", 1), ("b", 2)].into_iter().collect();
        let other: NamedSlots<i32> = [("b", 20), ("c", 30)].into_iter().collect();
        base.extend(other);

        assert_eq!(base.get("b"), Some(&20));
        assert_eq!(base.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_set_ops() {
        let deps: BTreeSet<String> = ["serde", "tokio", "tracing"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let kept = deps.intersection_with(["tokio", "regex"]);
        assert_eq!(kept.into_iter().collect::<Vec<_>>(), vec!["tokio"]);

        let rest = deps.difference_with(vec!["serde".to_string()]);
        assert_eq!(rest.into_iter().collect::<Vec<_>>(), vec!["tokio", "tracing"]);
    }
}
