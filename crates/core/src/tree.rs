use std::collections::HashMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::path;

/// 節點類型。 / Kind of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Folder => "folder",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeBody {
    File,
    Folder { children: Vec<String>, is_open: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeRecord {
    name: String,
    parent: Option<String>,
    body: NodeBody,
}

impl NodeRecord {
    fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::File => NodeKind::File,
            NodeBody::Folder { .. } => NodeKind::Folder,
        }
    }
}

/// 指向樹中節點的唯讀參考。 / Read-only handle to a node stored in the tree.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    path: &'a str,
    record: &'a NodeRecord,
}

impl<'a> NodeRef<'a> {
    pub fn path(&self) -> &'a str {
        self.path
    }

    pub fn name(&self) -> &'a str {
        &self.record.name
    }

    pub fn kind(&self) -> NodeKind {
        self.record.kind()
    }

    pub fn is_folder(&self) -> bool {
        self.kind() == NodeKind::Folder
    }

    /// 父節點路徑；根節點為 `None`。 / Parent path, `None` for roots.
    pub fn parent(&self) -> Option<&'a str> {
        self.record.parent.as_deref()
    }

    /// 子節點路徑（僅資料夾）。 / Child paths in order; `None` for files.
    pub fn children(&self) -> Option<&'a [String]> {
        match &self.record.body {
            NodeBody::Folder { children, .. } => Some(children.as_slice()),
            NodeBody::File => None,
        }
    }

    /// 資料夾展開狀態（僅資料夾）。 / Expansion state; `None` for files.
    pub fn is_open(&self) -> Option<bool> {
        match self.record.body {
            NodeBody::Folder { is_open, .. } => Some(is_open),
            NodeBody::File => None,
        }
    }
}

/// 新節點最終被放置的位置。 / Where a newly inserted node ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// 放入既有的父資料夾。 / Appended to an existing parent folder.
    Nested,
    /// 路徑本身即為頂層項目。 / The path named a top-level item.
    Root,
    /// 父路徑不是資料夾，改放到頂層。 / The parent did not resolve to a folder; placed at root level.
    RootFallback,
}

/// 插入結果。 / Result of an insertion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Created(Placement),
    /// 該路徑已存在節點，樹保持不變。 / A node already owns the path; nothing changed.
    Existing(NodeKind),
}

/// 插入後的實際路徑與結果。 / Effective path of an insertion plus its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub path: String,
    pub outcome: InsertOutcome,
}

impl Insertion {
    pub fn created(&self) -> bool {
        matches!(self.outcome, InsertOutcome::Created(_))
    }
}

/// 專案樹的不可變巢狀快照。 / Immutable nested snapshot handed to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub name: String,
    pub kind: NodeKind,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
}

/// 檔案總管中可見的一列。 / One visible explorer row, depth-first, honoring folder expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeRow {
    pub path: String,
    pub name: String,
    pub kind: NodeKind,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_open: Option<bool>,
}

/// 樹操作錯誤。 / Errors raised by tree mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("cannot insert '{0}': the item name is empty")]
    EmptyName(String),
}

/// 以路徑為鍵的虛擬檔案樹（節點平面存放，父子關係以路徑表示）。
/// / Virtual file forest stored as a flat arena keyed by path; parent/child links are paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTree {
    nodes: HashMap<String, NodeRecord>,
    roots: Vec<String>,
    revision: u64,
}

impl FileTree {
    /// 建立空樹。 / Creates an empty forest.
    pub fn new() -> Self {
        Self::default()
    }

    /// 每次實際變更後遞增的版本號。 / Counter bumped on every effective mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    /// 依完整路徑尋找節點。 / Looks a node up by exact path.
    pub fn find(&self, path: &str) -> Option<NodeRef<'_>> {
        self.nodes
            .get_key_value(path)
            .map(|(path, record)| NodeRef { path, record })
    }

    /// 頂層節點路徑（依插入順序）。 / Root paths in insertion order.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// 新增檔案節點。 / Inserts a file node, see [`FileTree::insert_folder`] for placement.
    pub fn insert_file(&mut self, path: &str) -> Result<Insertion, TreeError> {
        self.insert(path, NodeKind::File)
    }

    /// 新增資料夾節點（預設收合）。 / Inserts a collapsed, empty folder node.
    ///
    /// 父路徑若為既有資料夾則附加為最後一個子節點，否則放在頂層並以名稱為路徑；
    /// 目標路徑已存在時不做任何變更。
    /// / The node is appended as the last child of the folder named by the parent path.
    /// When that parent is missing or is a file, the node is placed at root level under its
    /// leaf name. If the effective path already exists the tree is left untouched.
    pub fn insert_folder(&mut self, path: &str) -> Result<Insertion, TreeError> {
        self.insert(path, NodeKind::Folder)
    }

    fn insert(&mut self, requested: &str, kind: NodeKind) -> Result<Insertion, TreeError> {
        let leaf = path::leaf_of(requested);
        if leaf.is_empty() {
            return Err(TreeError::EmptyName(requested.to_string()));
        }
        let parent = path::parent_of(requested);
        let (target, placement) = if parent.is_empty() {
            (leaf.to_string(), Placement::Root)
        } else if self.is_folder(parent) {
            (requested.to_string(), Placement::Nested)
        } else {
            warn!("parent '{parent}' is not a folder; placing '{leaf}' at the top level");
            (leaf.to_string(), Placement::RootFallback)
        };

        if let Some(existing) = self.nodes.get(&target) {
            debug!("'{target}' already exists; insertion skipped");
            return Ok(Insertion {
                path: target,
                outcome: InsertOutcome::Existing(existing.kind()),
            });
        }

        let body = match kind {
            NodeKind::File => NodeBody::File,
            NodeKind::Folder => NodeBody::Folder {
                children: Vec::new(),
                is_open: false,
            },
        };
        let parent_path = match placement {
            Placement::Nested => {
                if let Some(NodeBody::Folder { children, .. }) =
                    self.nodes.get_mut(parent).map(|record| &mut record.body)
                {
                    children.push(target.clone());
                }
                Some(parent.to_string())
            }
            Placement::Root | Placement::RootFallback => {
                self.roots.push(target.clone());
                None
            }
        };
        self.nodes.insert(
            target.clone(),
            NodeRecord {
                name: leaf.to_string(),
                parent: parent_path,
                body,
            },
        );
        self.bump();
        debug!("inserted {} '{target}'", kind.as_str());
        Ok(Insertion {
            path: target,
            outcome: InsertOutcome::Created(placement),
        })
    }

    /// 移除節點及其所有子孫，回傳被移除的路徑（深度優先、先序）。
    /// / Removes the node and, for folders, every descendant. Returns the removed paths
    /// in depth-first pre-order; empty when `path` does not exist.
    pub fn remove_subtree(&mut self, path: &str) -> Vec<String> {
        let Some(record) = self.nodes.get(path) else {
            return Vec::new();
        };
        match record.parent.clone() {
            Some(parent) => {
                if let Some(NodeBody::Folder { children, .. }) =
                    self.nodes.get_mut(&parent).map(|record| &mut record.body)
                {
                    children.retain(|child| child != path);
                }
            }
            None => self.roots.retain(|root| root != path),
        }

        let mut removed = Vec::new();
        let mut stack = vec![path.to_string()];
        while let Some(current) = stack.pop() {
            let Some(record) = self.nodes.remove(&current) else {
                continue;
            };
            if let NodeBody::Folder { children, .. } = record.body {
                stack.extend(children.into_iter().rev());
            }
            removed.push(current);
        }
        self.bump();
        debug!("removed '{path}' ({} node(s))", removed.len());
        removed
    }

    /// 切換資料夾展開狀態，回傳新狀態；檔案或不存在時回傳 `None`。
    /// / Flips `is_open` on a folder and returns the new state; `None` for files or absent paths.
    pub fn toggle_open(&mut self, path: &str) -> Option<bool> {
        let current = self.find(path)?.is_open()?;
        self.set_open(path, !current);
        Some(!current)
    }

    /// 設定資料夾展開狀態。 / Sets a folder's expansion state; returns `false` if `path` is not a folder.
    pub fn set_open(&mut self, path: &str, open: bool) -> bool {
        match self.nodes.get_mut(path).map(|record| &mut record.body) {
            Some(NodeBody::Folder { is_open, .. }) => {
                if *is_open != open {
                    *is_open = open;
                    self.bump();
                }
                true
            }
            _ => false,
        }
    }

    /// 以深度優先順序列出所有檔案路徑。 / All file paths in depth-first order.
    pub fn file_paths(&self) -> Vec<String> {
        let mut files = Vec::new();
        self.walk(|node, _| {
            if node.kind() == NodeKind::File {
                files.push(node.path().to_string());
            }
            true
        });
        files
    }

    /// 產生巢狀快照。 / Builds a nested, owned snapshot of the forest.
    pub fn snapshot(&self) -> Vec<TreeNode> {
        self.roots
            .iter()
            .filter_map(|root| self.snapshot_node(root))
            .collect()
    }

    fn snapshot_node(&self, path: &str) -> Option<TreeNode> {
        let node = self.find(path)?;
        let children = node.children().map(|children| {
            children
                .iter()
                .filter_map(|child| self.snapshot_node(child))
                .collect()
        });
        Some(TreeNode {
            name: node.name().to_string(),
            kind: node.kind(),
            path: node.path().to_string(),
            children,
            is_open: node.is_open(),
        })
    }

    /// 產生可見列（收合資料夾的子節點不列出）。 / Flattened rows, skipping children of closed folders.
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        self.walk(|node, depth| {
            rows.push(TreeRow {
                path: node.path().to_string(),
                name: node.name().to_string(),
                kind: node.kind(),
                depth,
                is_open: node.is_open(),
            });
            node.is_open().unwrap_or(false)
        });
        rows
    }

    /// 先序走訪；回呼回傳 `false` 時不進入該節點的子節點。
    /// / Pre-order walk; the visitor returns whether to descend into the node's children.
    fn walk<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(NodeRef<'a>, usize) -> bool,
    {
        let mut stack: Vec<(&'a str, usize)> =
            self.roots.iter().rev().map(|root| (root.as_str(), 0)).collect();
        while let Some((path, depth)) = stack.pop() {
            let Some(node) = self.find(path) else {
                continue;
            };
            if visit(node, depth) {
                if let Some(children) = node.children() {
                    stack.extend(children.iter().rev().map(|child| (child.as_str(), depth + 1)));
                }
            }
        }
    }

    fn is_folder(&self, path: &str) -> bool {
        self.find(path).map_or(false, |node| node.is_folder())
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
