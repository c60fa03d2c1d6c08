//! 以斜線分隔的虛擬路徑工具。 / Helpers for slash-separated virtual paths.

/// 路徑分隔字元。 / Separator between path segments.
pub const SEPARATOR: char = '/';

/// 取得父路徑；頂層項目回傳空字串。 / Returns every segment except the last, or `""` for top-level items.
pub fn parent_of(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(index) => &path[..index],
        None => "",
    }
}

/// 取得最後一段名稱。 / Returns the last path segment.
pub fn leaf_of(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(index) => &path[index + 1..],
        None => path,
    }
}

/// 將父路徑與名稱組合；父路徑為空時僅回傳名稱。 / Joins a parent path and a leaf name.
pub fn join(parent: &str, leaf: &str) -> String {
    if parent.is_empty() {
        leaf.to_string()
    } else {
        format!("{parent}{SEPARATOR}{leaf}")
    }
}

/// 名稱是否含有類似副檔名的字尾。 / Whether the leaf name carries an extension-like suffix.
pub fn has_extension(path: &str) -> bool {
    leaf_of(path).contains('.')
}

/// 取得副檔名（不含點）。 / Returns the suffix after the last `.` in the leaf name.
pub fn extension(path: &str) -> Option<&str> {
    let leaf = leaf_of(path);
    leaf.rfind('.').map(|index| &leaf[index + 1..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_and_leaf_split_on_last_separator() {
        assert_eq!(parent_of("src/components/Button.jsx"), "src/components");
        assert_eq!(leaf_of("src/components/Button.jsx"), "Button.jsx");
        assert_eq!(parent_of("README.md"), "");
        assert_eq!(leaf_of("README.md"), "README.md");
    }

    #[test]
    fn degenerate_inputs_are_accepted() {
        assert_eq!(parent_of(""), "");
        assert_eq!(leaf_of(""), "");
        assert_eq!(parent_of("src/"), "src");
        assert_eq!(leaf_of("src/"), "");
    }

    #[test]
    fn join_skips_empty_parent() {
        assert_eq!(join("", "App.js"), "App.js");
        assert_eq!(join("src", "App.js"), "src/App.js");
    }

    #[test]
    fn extension_only_looks_at_leaf() {
        assert!(has_extension("src/main.css"));
        assert!(!has_extension("v1.2/Makefile"));
        assert_eq!(extension("src/index.test.js"), Some("js"));
        assert_eq!(extension("v1.2/Makefile"), None);
    }
}
