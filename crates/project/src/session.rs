use std::collections::HashSet;

use codev_core::{path, ContentStore, FileTree, NodeKind, TabSession, TreeNode};
use thiserror::Error;

use crate::explorer::Explorer;
use crate::policy::NewFilePolicy;
use crate::seed::{ProjectSeed, SeedError};
use crate::workspace::{self, ActiveView, TabView, Workspace};

/// Owns the file tree, file contents and open tabs of one editor view.
/// 單一編輯畫面所擁有的檔案樹、檔案內容與分頁狀態。
///
/// All mutation goes through [`EditorSession::explorer`] and [`EditorSession::workspace`], which
/// keep the three parts consistent with each other.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    tree: FileTree,
    contents: ContentStore,
    tabs: TabSession,
    policy: NewFilePolicy,
}

impl EditorSession {
    /// Starts an empty session with the default new-file policy.
    /// 以預設命名規則建立空的工作階段。
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts an empty session with the given new-file policy.
    /// 以指定命名規則建立空的工作階段。
    pub fn with_policy(policy: NewFilePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Starts a session pre-seeded with a project.
    /// 以初始專案建立工作階段。
    pub fn from_seed(seed: &ProjectSeed, policy: NewFilePolicy) -> Result<Self, SeedError> {
        let (tree, contents) = seed.plant()?;
        Ok(Self {
            tree,
            contents,
            tabs: TabSession::new(),
            policy,
        })
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn contents(&self) -> &ContentStore {
        &self.contents
    }

    pub fn tabs(&self) -> &TabSession {
        &self.tabs
    }

    pub fn policy(&self) -> &NewFilePolicy {
        &self.policy
    }

    /// Immutable snapshot of the tree for the presentation layer.
    /// 提供給呈現層的檔案樹快照。
    pub fn snapshot(&self) -> Vec<TreeNode> {
        self.tree.snapshot()
    }

    /// Controller for explorer intents (add, delete, select, toggle).
    /// 處理檔案總管操作的控制器。
    pub fn explorer(&mut self) -> Explorer<'_> {
        Explorer::new(
            &mut self.tree,
            &mut self.contents,
            &mut self.tabs,
            &self.policy,
        )
    }

    /// Controller for the tabbed editing area.
    /// 處理分頁編輯區的控制器。
    pub fn workspace(&mut self) -> Workspace<'_> {
        Workspace::new(&self.tree, &mut self.contents, &mut self.tabs)
    }

    pub fn tab_strip(&self) -> Vec<TabView> {
        workspace::tab_strip(&self.tabs)
    }

    pub fn active_view(&self) -> ActiveView {
        workspace::active_view(&self.tabs, &self.contents)
    }

    /// Checks that tree, contents and tabs agree with each other.
    /// 檢查檔案樹、內容與分頁三者是否一致。
    pub fn verify(&self) -> Result<(), ConsistencyError> {
        verify_nodes(&self.tree.snapshot(), "")?;

        let files: HashSet<String> = self.tree.file_paths().into_iter().collect();
        for file in &files {
            if !self.contents.contains(file) {
                return Err(ConsistencyError::MissingContent(file.clone()));
            }
        }
        for stored in self.contents.paths() {
            if !files.contains(stored) {
                return Err(ConsistencyError::OrphanContent(stored.to_string()));
            }
        }

        let mut seen = HashSet::new();
        for tab in self.tabs.open_paths() {
            if !files.contains(tab) {
                return Err(ConsistencyError::DanglingTab(tab.clone()));
            }
            if !seen.insert(tab.as_str()) {
                return Err(ConsistencyError::DuplicateTab(tab.clone()));
            }
        }
        if let Some(selected) = self.tabs.selected_path() {
            if !self.tabs.is_open(selected) {
                return Err(ConsistencyError::SelectionNotOpen(selected.to_string()));
            }
        }
        Ok(())
    }
}

fn verify_nodes(nodes: &[TreeNode], parent: &str) -> Result<(), ConsistencyError> {
    for node in nodes {
        if node.path != path::join(parent, &node.name) {
            return Err(ConsistencyError::MisplacedNode(node.path.clone()));
        }
        match (node.kind, &node.children, node.is_open) {
            (NodeKind::File, None, None) => {}
            (NodeKind::Folder, Some(children), Some(_)) => verify_nodes(children, &node.path)?,
            _ => return Err(ConsistencyError::MalformedNode(node.path.clone())),
        }
    }
    Ok(())
}

/// Invariant violations reported by [`EditorSession::verify`].
/// [`EditorSession::verify`] 回報的不一致狀況。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsistencyError {
    #[error("node '{0}' does not sit at its parent path plus its name")]
    MisplacedNode(String),
    #[error("node '{0}' has fields that do not match its kind")]
    MalformedNode(String),
    #[error("file '{0}' has no content entry")]
    MissingContent(String),
    #[error("content entry '{0}' has no matching file")]
    OrphanContent(String),
    #[error("open tab '{0}' is not a file in the tree")]
    DanglingTab(String),
    #[error("tab '{0}' is open more than once")]
    DuplicateTab(String),
    #[error("selected file '{0}' is not an open tab")]
    SelectionNotOpen(String),
}
