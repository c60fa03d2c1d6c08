//! In-memory editor state for CoDev: the virtual file tree, file contents and open tabs.
//! CoDev 編輯器的記憶體狀態：虛擬檔案樹、檔案內容與分頁。

pub mod content;
pub mod language;
pub mod path;
pub mod tabs;
pub mod tree;

pub use content::{ContentError, ContentStore};
pub use language::Language;
pub use tabs::{Selection, TabSession};
pub use tree::{
    FileTree, InsertOutcome, Insertion, NodeKind, NodeRef, Placement, TreeError, TreeNode, TreeRow,
};
