use codev_core::path;
use log::warn;

/// Default suffix appended to new files whose name carries none.
pub const DEFAULT_FILE_SUFFIX: &str = "js";

/// Naming policy applied to user-entered file names before insertion.
/// 新增檔案時套用的命名規則。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFilePolicy {
    default_suffix: Option<String>,
}

impl Default for NewFilePolicy {
    fn default() -> Self {
        Self::with_suffix(DEFAULT_FILE_SUFFIX)
    }
}

impl NewFilePolicy {
    /// Appends `.{suffix}` to names without an extension.
    /// 對沒有副檔名的名稱補上 `.{suffix}`。
    ///
    /// Leading dots are dropped. A suffix that is blank or contains `/`, `.` or whitespace
    /// disables the policy.
    pub fn with_suffix(suffix: impl AsRef<str>) -> Self {
        let raw = suffix.as_ref();
        let default_suffix = clean_suffix(raw);
        if default_suffix.is_none() && !raw.trim().is_empty() {
            warn!("new-file suffix '{raw}' is not a single extension; suffix policy disabled");
        }
        Self { default_suffix }
    }

    /// Leaves every name as entered.
    /// 保留使用者輸入的名稱。
    pub fn disabled() -> Self {
        Self {
            default_suffix: None,
        }
    }

    pub fn default_suffix(&self) -> Option<&str> {
        self.default_suffix.as_deref()
    }

    /// Computes the path a new file will be created at.
    /// 計算新檔案的實際路徑。
    pub fn apply(&self, raw: &str) -> String {
        match self.default_suffix.as_deref() {
            Some(suffix) if !path::has_extension(raw) => format!("{raw}.{suffix}"),
            _ => raw.to_string(),
        }
    }
}

fn clean_suffix(raw: &str) -> Option<String> {
    let suffix = raw.trim().trim_start_matches('.');
    let invalid = suffix.is_empty()
        || suffix.contains(|c: char| c == path::SEPARATOR || c == '.' || c.is_whitespace());
    (!invalid).then(|| suffix.to_string())
}
