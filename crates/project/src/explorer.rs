use codev_core::{ContentStore, FileTree, Insertion, NodeKind, TabSession};
use log::{debug, warn};

use crate::policy::NewFilePolicy;

/// Applies explorer intents to the tree and keeps contents and tabs in step.
/// 將檔案總管的操作套用到檔案樹，並同步更新內容與分頁。
///
/// None of the operations fail: requests that cannot apply are logged and leave the session
/// unchanged.
pub struct Explorer<'s> {
    tree: &'s mut FileTree,
    contents: &'s mut ContentStore,
    tabs: &'s mut TabSession,
    policy: &'s NewFilePolicy,
}

impl<'s> Explorer<'s> {
    pub(crate) fn new(
        tree: &'s mut FileTree,
        contents: &'s mut ContentStore,
        tabs: &'s mut TabSession,
        policy: &'s NewFilePolicy,
    ) -> Self {
        Self {
            tree,
            contents,
            tabs,
            policy,
        }
    }

    /// Creates a file (suffix policy applied) with empty content.
    /// 新增檔案（套用預設副檔名）並建立空白內容。
    ///
    /// Returns the insertion, whose `path` is where the file actually lives, or `None` when the
    /// name was rejected.
    pub fn add_file(&mut self, raw: &str) -> Option<Insertion> {
        let target = self.policy.apply(raw);
        match self.tree.insert_file(&target) {
            Ok(insertion) => {
                if insertion.created() {
                    self.contents.create(&insertion.path);
                }
                Some(insertion)
            }
            Err(err) => {
                warn!("add file ignored: {err}");
                None
            }
        }
    }

    /// Creates an empty, collapsed folder.
    /// 新增空白且收合的資料夾。
    pub fn add_folder(&mut self, raw: &str) -> Option<Insertion> {
        match self.tree.insert_folder(raw) {
            Ok(insertion) => Some(insertion),
            Err(err) => {
                warn!("add folder ignored: {err}");
                None
            }
        }
    }

    /// Deletes a file or folder (recursively) and prunes contents and tabs.
    /// 刪除檔案或資料夾（含子項目），並清除對應內容與分頁。
    ///
    /// Returns every removed path. Nothing happens when `path` is absent or is not a `kind`.
    pub fn delete_item(&mut self, path: &str, kind: NodeKind) -> Vec<String> {
        match self.tree.find(path).map(|node| node.kind()) {
            Some(actual) if actual == kind => {}
            Some(actual) => {
                warn!(
                    "delete ignored: '{path}' is a {}, not a {}",
                    actual.as_str(),
                    kind.as_str()
                );
                return Vec::new();
            }
            None => {
                debug!("delete ignored: '{path}' does not exist");
                return Vec::new();
            }
        }

        let removed = self.tree.remove_subtree(path);
        self.contents.remove(&removed);
        self.tabs.evict(&removed);
        removed
    }

    /// Opens a file in a tab and makes it the selection.
    /// 於分頁開啟檔案並設為目前選取。
    pub fn select_file(&mut self, path: &str) -> bool {
        select_existing(self.tree, self.tabs, path)
    }

    /// Expands or collapses a folder, returning its new state.
    /// 展開或收合資料夾，回傳新的狀態。
    pub fn toggle_folder(&mut self, path: &str) -> Option<bool> {
        let state = self.tree.toggle_open(path);
        if state.is_none() {
            debug!("toggle ignored: '{path}' is not a folder");
        }
        state
    }
}

/// Selects `path` only when it names a file in the tree, so tabs never point at folders.
pub(crate) fn select_existing(tree: &FileTree, tabs: &mut TabSession, path: &str) -> bool {
    match tree.find(path) {
        Some(node) if node.kind() == NodeKind::File => {
            tabs.select(path);
            true
        }
        _ => {
            warn!("select ignored: '{path}' is not a file");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use codev_core::{InsertOutcome, Placement, Selection};

    use crate::{EditorSession, NewFilePolicy};

    use super::*;

    #[test]
    fn add_file_applies_policy_and_creates_content() {
        let mut session = EditorSession::new();
        session.explorer().add_folder("src");
        let insertion = session.explorer().add_file("src/index").unwrap();
        assert_eq!(insertion.path, "src/index.js");
        assert_eq!(insertion.outcome, InsertOutcome::Created(Placement::Nested));
        assert_eq!(session.contents().get("src/index.js"), Some(""));
        session.verify().unwrap();
    }

    #[test]
    fn fallback_placement_keys_content_by_actual_path() {
        let mut session = EditorSession::new();
        let insertion = session.explorer().add_file("missing/child.js").unwrap();
        assert_eq!(insertion.path, "child.js");
        assert!(session.contents().get("missing/child.js").is_none());
        assert_eq!(session.contents().get("child.js"), Some(""));
        session.verify().unwrap();
    }

    #[test]
    fn duplicate_add_keeps_existing_content() {
        let mut session = EditorSession::with_policy(NewFilePolicy::disabled());
        session.explorer().add_file("notes.txt");
        session.explorer().select_file("notes.txt");
        assert!(session.workspace().apply_edit("keep me"));
        let again = session.explorer().add_file("notes.txt").unwrap();
        assert_eq!(again.outcome, InsertOutcome::Existing(NodeKind::File));
        assert_eq!(session.contents().get("notes.txt"), Some("keep me"));
    }

    #[test]
    fn empty_names_are_ignored() {
        let mut session = EditorSession::with_policy(NewFilePolicy::disabled());
        assert!(session.explorer().add_file("").is_none());
        assert!(session.explorer().add_folder("src/").is_none());
        assert!(session.tree().is_empty());
    }

    #[test]
    fn deleting_folder_prunes_descendants_everywhere() {
        let mut session = EditorSession::new();
        {
            let mut explorer = session.explorer();
            explorer.add_folder("app");
            explorer.add_folder("app/lib");
            explorer.add_file("app/lib/a.js");
            explorer.add_file("app/b.js");
            explorer.add_file("top.js");
            explorer.select_file("top.js");
            explorer.select_file("app/lib/a.js");
            explorer.select_file("app/b.js");
        }
        let removed = session.explorer().delete_item("app", NodeKind::Folder);
        assert_eq!(removed, vec!["app", "app/lib", "app/lib/a.js", "app/b.js"]);
        for path in &removed {
            assert!(session.contents().get(path).is_none());
            assert!(!session.tabs().is_open(path));
        }
        assert_eq!(session.tabs().open_paths(), &["top.js"]);
        assert_eq!(session.tabs().selected_path(), Some("top.js"));
        session.verify().unwrap();
    }

    #[test]
    fn deleting_closed_file_keeps_selection() {
        let mut session = EditorSession::new();
        session.explorer().add_file("a.js");
        session.explorer().add_file("b.js");
        session.explorer().select_file("a.js");
        session.explorer().delete_item("b.js", NodeKind::File);
        assert_eq!(session.tabs().selected_path(), Some("a.js"));
        assert!(!session.tree().contains("b.js"));
    }

    #[test]
    fn deleting_open_unselected_file_drops_only_its_tab() {
        let mut session = EditorSession::new();
        session.explorer().add_file("a.js");
        session.explorer().add_file("b.js");
        session.explorer().select_file("a.js");
        session.explorer().select_file("b.js");
        session.workspace().switch("a.js");

        let removed = session.explorer().delete_item("b.js", NodeKind::File);
        assert_eq!(removed, vec!["b.js"]);
        assert_eq!(session.tabs().open_paths(), &["a.js"]);
        assert_eq!(session.tabs().selected_path(), Some("a.js"));
        session.verify().unwrap();
    }

    #[test]
    fn nested_suffix_never_reroutes_new_files() {
        let mut session = EditorSession::with_policy(NewFilePolicy::with_suffix("js/x"));
        let insertion = session.explorer().add_file("index").unwrap();
        assert_eq!(insertion.path, "index");
        assert_eq!(insertion.outcome, InsertOutcome::Created(Placement::Root));
        assert!(!session.tree().contains("x"));
        session.verify().unwrap();
    }

    #[test]
    fn delete_with_wrong_kind_is_ignored() {
        let mut session = EditorSession::new();
        session.explorer().add_folder("src");
        assert!(session.explorer().delete_item("src", NodeKind::File).is_empty());
        assert!(session.explorer().delete_item("ghost", NodeKind::Folder).is_empty());
        assert!(session.tree().contains("src"));
    }

    #[test]
    fn selecting_folders_or_missing_paths_is_refused() {
        let mut session = EditorSession::new();
        session.explorer().add_folder("src");
        assert!(!session.explorer().select_file("src"));
        assert!(!session.explorer().select_file("nope.js"));
        assert_eq!(session.tabs().selected(), &Selection::Welcome);
    }

    #[test]
    fn toggle_reports_new_state() {
        let mut session = EditorSession::new();
        session.explorer().add_folder("src");
        session.explorer().add_file("main.js");
        assert_eq!(session.explorer().toggle_folder("src"), Some(true));
        assert_eq!(session.explorer().toggle_folder("main.js"), None);
        assert_eq!(session.tree().find("src").unwrap().is_open(), Some(true));
    }
}
