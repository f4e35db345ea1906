//! logger 名称的解析规则

use crate::error::{HierarchyError, Result};

/// 根 logger 的保留名称
pub const ROOT_NAME: &str = "root";

/// 把名称拆成从短到长的前缀序列
///
/// `"a.b.c"` 得到 `["a", "a.b", "a.b.c"]`。空名称和根名称返回空序列，
/// 表示根 logger。含空段的名称（`"a..b"`、`".a"`、`"a."`）以及以保留
/// 根名称开头的名称（`"root.x"`）属于用法错误。
pub(crate) fn split_prefixes(name: &str, delimiter: char) -> Result<Vec<&str>> {
    if name.is_empty() || name == ROOT_NAME {
        return Ok(Vec::new());
    }

    let mut segments = name.split(delimiter);
    if segments.clone().any(str::is_empty) || segments.next() == Some(ROOT_NAME) {
        return Err(HierarchyError::invalid_name(name));
    }

    let mut prefixes: Vec<&str> = name
        .char_indices()
        .filter(|&(_, ch)| ch == delimiter)
        .map(|(idx, _)| &name[..idx])
        .collect();
    prefixes.push(name);
    Ok(prefixes)
}

/// 语法上的父名称；第一段的父亲是根
pub(crate) fn parent_name(name: &str, delimiter: char) -> &str {
    match name.rfind(delimiter) {
        Some(idx) => &name[..idx],
        None => ROOT_NAME,
    }
}
