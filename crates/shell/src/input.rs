use codev_core::NodeKind;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

static SEPARATOR_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*/+\s*").expect("separator pattern is valid"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("a name is required")]
    Empty,
    #[error("'{0}' is not allowed as a path segment")]
    RelativeSegment(String),
}

/// 正規化使用者輸入的名稱：去除空白、合併重複的 `/`、移除頭尾的 `/`。
/// / Cleans a user-entered name: trims whitespace, collapses `/` runs and strips edge separators.
pub fn normalize_name(raw: &str) -> Result<String, InputError> {
    let collapsed = SEPARATOR_RUN.replace_all(raw.trim(), "/");
    let name = collapsed.trim_matches('/');
    if name.is_empty() {
        return Err(InputError::Empty);
    }
    if let Some(segment) = name.split('/').find(|segment| matches!(*segment, "." | "..")) {
        return Err(InputError::RelativeSegment(segment.to_string()));
    }
    Ok(name.to_string())
}

/// 送出後要建立的項目。 / Item requested by a submitted prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub kind: NodeKind,
    pub name: String,
}

/// 檔案總管中新增檔案/資料夾的輸入框狀態。
/// / State of the explorer's inline "new file" / "new folder" text entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntryPrompt {
    kind: Option<NodeKind>,
    text: String,
}

impl EntryPrompt {
    pub fn begin_file(&mut self) {
        self.kind = Some(NodeKind::File);
    }

    pub fn begin_folder(&mut self) {
        self.kind = Some(NodeKind::Folder);
    }

    pub fn input(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn kind(&self) -> Option<NodeKind> {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_active(&self) -> bool {
        self.kind.is_some()
    }

    /// Escape：關閉輸入框。 / Escape: closes the prompt and clears the text.
    pub fn cancel(&mut self) {
        self.kind = None;
        self.text.clear();
    }

    /// Enter 或失焦：驗證名稱並關閉輸入框；名稱無效時保持開啟。
    /// / Enter or blur: validates the name and closes the prompt. Invalid names keep it open.
    pub fn submit(&mut self) -> Result<Option<NewEntry>, InputError> {
        let Some(kind) = self.kind else {
            return Ok(None);
        };
        let name = normalize_name(&self.text)?;
        self.cancel();
        Ok(Some(NewEntry { kind, name }))
    }
}
