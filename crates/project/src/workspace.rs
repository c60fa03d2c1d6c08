use codev_core::{path, ContentStore, FileTree, Language, Selection, TabSession};
use log::debug;
use serde::Serialize;

use crate::explorer::select_existing;

/// One tab of the tab strip.
/// 分頁列中的單一分頁。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabView {
    pub path: String,
    pub title: String,
    pub language: Language,
    pub is_selected: bool,
}

/// What the editing area shows.
/// 編輯區目前顯示的內容。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum ActiveView {
    Welcome,
    Document {
        path: String,
        language: Language,
        content: String,
    },
}

/// Drives the tab strip and resolves the active tab to its content.
/// 控制分頁列，並將目前分頁對應到檔案內容。
pub struct Workspace<'s> {
    tree: &'s FileTree,
    contents: &'s mut ContentStore,
    tabs: &'s mut TabSession,
}

impl<'s> Workspace<'s> {
    pub(crate) fn new(
        tree: &'s FileTree,
        contents: &'s mut ContentStore,
        tabs: &'s mut TabSession,
    ) -> Self {
        Self {
            tree,
            contents,
            tabs,
        }
    }

    /// Opens a file in a tab (or focuses its existing tab).
    /// 開啟檔案分頁（已開啟則切換過去）。
    pub fn open(&mut self, path: &str) -> bool {
        select_existing(self.tree, self.tabs, path)
    }

    /// Focuses an already open tab; unknown tabs are ignored.
    /// 切換至已開啟的分頁。
    pub fn switch(&mut self, path: &str) -> bool {
        if !self.tabs.is_open(path) {
            debug!("switch ignored: '{path}' is not open");
            return false;
        }
        self.tabs.select(path);
        true
    }

    /// Closes a tab.
    /// 關閉分頁。
    pub fn close(&mut self, path: &str) {
        self.tabs.close(path);
    }

    /// Writes edited text of the active document back into the content store.
    /// 將目前文件的編輯內容寫回內容儲存。
    pub fn apply_edit(&mut self, text: impl Into<String>) -> bool {
        let Some(path) = self.tabs.selected_path() else {
            return false;
        };
        self.contents.set(path, text).is_ok()
    }

    pub fn tab_strip(&self) -> Vec<TabView> {
        tab_strip(&*self.tabs)
    }

    pub fn active_view(&self) -> ActiveView {
        active_view(&*self.tabs, &*self.contents)
    }
}

pub(crate) fn tab_strip(tabs: &TabSession) -> Vec<TabView> {
    let selected = tabs.selected_path();
    tabs.open_paths()
        .iter()
        .map(|open| TabView {
            path: open.clone(),
            title: path::leaf_of(open).to_string(),
            language: Language::from_path(open),
            is_selected: selected == Some(open.as_str()),
        })
        .collect()
}

pub(crate) fn active_view(tabs: &TabSession, contents: &ContentStore) -> ActiveView {
    match tabs.selected() {
        Selection::Welcome => ActiveView::Welcome,
        Selection::File(path) => ActiveView::Document {
            path: path.clone(),
            language: Language::from_path(path),
            content: contents.get(path).unwrap_or_default().to_string(),
        },
    }
}
