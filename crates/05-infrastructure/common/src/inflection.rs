//! 英文单复数转换
//!
//! 只覆盖组件目录命名中常见的规则：不可数词、不规则词和常见后缀。
//! 无法识别的词原样返回。

const UNCOUNTABLE: &[&str] = &[
    "config",
    "data",
    "equipment",
    "information",
    "metadata",
    "middleware",
    "news",
    "series",
    "species",
    "software",
];

/// 以 `s` 结尾、复数加 `es` 的单数词
const SIBILANT_SINGULAR: &[&str] = &[
    "alias", "apparatus", "atlas", "bonus", "bus", "campus", "canvas", "census", "corpus",
    "focus", "gas", "lens", "plus", "status", "virus",
];

/// 复数只加 `s` 的单数词，避免被 `-ches` / `-ies` 规则误伤
const PLAIN_S_SINGULAR: &[&str] = &[
    "avalanche", "cache", "cliche", "headache", "moustache", "niche", "brownie", "calorie",
    "cookie", "genie", "goalie", "hoodie", "movie", "rookie", "selfie", "smoothie", "zombie",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("index", "indices"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("knife", "knives"),
    ("half", "halves"),
    ("self", "selves"),
    ("shelf", "shelves"),
];

/// 将单词转换为单数形式
///
/// 仅处理最后一个 `.` 之后的部分，因此复合名称 `user.services` 变为 `user.service`。
pub fn singular(word: &str) -> String {
    map_last_segment(word, singular_word)
}

/// 将单词转换为复数形式
pub fn plural(word: &str) -> String {
    map_last_segment(word, plural_word)
}

fn map_last_segment(word: &str, convert: fn(&str) -> String) -> String {
    match word.rsplit_once('.') {
        Some((head, last)) => format!("{}.{}", head, convert(last)),
        None => convert(word),
    }
}

fn singular_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if !word.is_ascii() || lower.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((one, _)) = IRREGULAR.iter().find(|(_, many)| *many == lower) {
        return restore_case(word, one);
    }
    if IRREGULAR.iter().any(|(one, _)| *one == lower) {
        return word.to_string();
    }

    let stem = |suffix_len: usize| &word[..word.len() - suffix_len];

    for one in SIBILANT_SINGULAR {
        if ends_with_word(word, &lower, one) {
            return word.to_string();
        }
        if ends_with_word(word, &lower, &format!("{}es", one)) {
            return stem(2).to_string();
        }
    }
    for one in PLAIN_S_SINGULAR {
        if ends_with_word(word, &lower, &format!("{}s", one)) {
            return stem(1).to_string();
        }
    }

    if lower.ends_with("ies") && lower.len() > 4 {
        return format!("{}y", stem(3));
    }
    for suffix in ["sses", "shes", "ches", "xes", "zes"] {
        if lower.ends_with(suffix) {
            return stem(2).to_string();
        }
    }
    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return word.to_string();
    }
    if lower.ends_with('s') && lower.len() > 1 {
        return stem(1).to_string();
    }
    word.to_string()
}

fn plural_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if !word.is_ascii() || lower.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, many)) = IRREGULAR.iter().find(|(one, _)| *one == lower) {
        return restore_case(word, many);
    }
    if IRREGULAR.iter().any(|(_, many)| *many == lower) {
        return word.to_string();
    }

    let ends_with_consonant_y = lower.ends_with('y')
        && lower
            .chars()
            .rev()
            .nth(1)
            .map_or(false, |c| !"aeiou".contains(c));
    if ends_with_consonant_y {
        return format!("{}ies", &word[..word.len() - 1]);
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        return format!("{}es", word);
    }
    format!("{}s", word)
}

/// `lower` 是否以完整单词 `ending` 结尾
///
/// 单词边界为字符串开头、非字母字符或驼峰大写字母，`sessionCaches` 以 `caches` 结尾，
/// `reaches` 不以 `aches` 结尾。
fn ends_with_word(word: &str, lower: &str, ending: &str) -> bool {
    if !lower.ends_with(ending) {
        return false;
    }
    let start = lower.len() - ending.len();
    let bytes = word.as_bytes();
    start == 0 || bytes[start].is_ascii_uppercase() || !bytes[start - 1].is_ascii_alphabetic()
}

/// 保留原词首字母大小写
fn restore_case(original: &str, replacement: &str) -> String {
    match original.chars().next() {
        Some(first) if first.is_uppercase() => crate::capitalize(replacement),
        _ => replacement.to_string(),
    }
}
