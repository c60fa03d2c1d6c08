use std::collections::HashMap;

use log::debug;
use thiserror::Error;

/// 內容儲存錯誤。 / Errors raised by the content store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("no content entry exists for '{0}'")]
    UnknownPath(String),
}

/// 路徑至文字內容的平面對應。 / Flat mapping from file path to text content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentStore {
    entries: HashMap<String, String>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建立空內容；已存在時保留原內容並回傳 `false`。
    /// / Creates an empty entry. Existing content is kept and `false` is returned.
    pub fn create(&mut self, path: &str) -> bool {
        if self.entries.contains_key(path) {
            return false;
        }
        self.entries.insert(path.to_string(), String::new());
        debug!("created content entry '{path}'");
        true
    }

    /// 以給定內容建立項目；已存在時不變更並回傳 `false`。
    /// / Creates an entry holding `text`. Existing content is kept and `false` is returned.
    pub fn create_with(&mut self, path: &str, text: impl Into<String>) -> bool {
        if self.entries.contains_key(path) {
            return false;
        }
        self.entries.insert(path.to_string(), text.into());
        true
    }

    /// 取代既有項目的內容。 / Replaces the text of an existing entry.
    pub fn set(&mut self, path: &str, text: impl Into<String>) -> Result<(), ContentError> {
        match self.entries.get_mut(path) {
            Some(slot) => {
                *slot = text.into();
                Ok(())
            }
            None => Err(ContentError::UnknownPath(path.to_string())),
        }
    }

    /// 移除所有給定路徑，不存在者忽略；回傳實際移除數量。
    /// / Removes every given key, ignoring absent ones. Returns how many entries were dropped.
    pub fn remove<I, S>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths
            .into_iter()
            .filter(|path| self.entries.remove(path.as_ref()).is_some())
            .count()
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 所有路徑（無特定順序）。 / Every stored path, in no particular order.
    pub fn paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }
}
