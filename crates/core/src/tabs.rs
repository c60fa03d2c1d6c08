use std::collections::HashSet;

use log::debug;
use serde::Serialize;

/// 目前選取的項目：歡迎頁或某個已開啟的檔案。
/// / The active editor target: the welcome page or one open file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "type", content = "path", rename_all = "lowercase")]
pub enum Selection {
    #[default]
    Welcome,
    File(String),
}

impl Selection {
    pub fn path(&self) -> Option<&str> {
        match self {
            Selection::Welcome => None,
            Selection::File(path) => Some(path),
        }
    }

    pub fn is_welcome(&self) -> bool {
        matches!(self, Selection::Welcome)
    }
}

/// 開啟中的分頁與目前選取。 / Open tabs (in tab order) plus the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TabSession {
    open: Vec<String>,
    selected: Selection,
}

impl TabSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_paths(&self) -> &[String] {
        &self.open
    }

    pub fn selected(&self) -> &Selection {
        &self.selected
    }

    pub fn selected_path(&self) -> Option<&str> {
        self.selected.path()
    }

    pub fn is_open(&self, path: &str) -> bool {
        self.open.iter().any(|open| open == path)
    }

    /// 選取檔案：尚未開啟則附加至尾端，已開啟則順序不變。
    /// / Selects a path, appending it as a new tab when absent; tab order is otherwise untouched.
    pub fn select(&mut self, path: &str) {
        if !self.is_open(path) {
            self.open.push(path.to_string());
        }
        self.selected = Selection::File(path.to_string());
        debug!("selected '{path}'");
    }

    /// 關閉分頁；若為目前選取則改選第一個剩餘分頁或歡迎頁。
    /// / Closes a tab. Closing the selected tab falls back to the first remaining tab or welcome.
    pub fn close(&mut self, path: &str) {
        self.evict([path]);
    }

    /// 批次移除分頁（刪除檔案後呼叫），以移除後的清單一次決定新的選取。
    /// / Removes a batch of paths at once and re-resolves the selection against the result,
    /// so the order inside the batch never changes the fallback target.
    pub fn evict<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let doomed: HashSet<String> = paths
            .into_iter()
            .map(|path| path.as_ref().to_string())
            .collect();
        if doomed.is_empty() {
            return;
        }
        let before = self.open.len();
        self.open.retain(|path| !doomed.contains(path));

        let selection_removed = self
            .selected
            .path()
            .map_or(false, |selected| doomed.contains(selected));
        if selection_removed {
            self.selected = match self.open.first() {
                Some(first) => Selection::File(first.clone()),
                None => Selection::Welcome,
            };
        }
        debug!(
            "evicted {} tab(s); selection is now {:?}",
            before - self.open.len(),
            self.selected
        );
    }
}
