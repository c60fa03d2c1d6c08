use codev_core::{NodeKind, Selection};
use codev_project::{ActiveView, EditorSession, NewFilePolicy, ProjectSeed};

#[test]
fn create_open_and_cascade_delete_folder() {
    let mut session = EditorSession::new();

    session.explorer().add_folder("src");
    session.explorer().add_file("src/index.js");
    assert!(session.explorer().select_file("src/index.js"));

    assert_eq!(session.tabs().open_paths(), &["src/index.js"]);
    assert_eq!(session.tabs().selected_path(), Some("src/index.js"));
    assert_eq!(session.contents().get("src/index.js"), Some(""));
    session.verify().expect("consistent after create");

    let removed = session.explorer().delete_item("src", NodeKind::Folder);
    assert_eq!(removed, vec!["src", "src/index.js"]);

    assert!(session.tree().find("src").is_none());
    assert!(session.tree().find("src/index.js").is_none());
    assert!(session.contents().get("src/index.js").is_none());
    assert!(session.tabs().open_paths().is_empty());
    assert_eq!(session.tabs().selected(), &Selection::Welcome);
    assert_eq!(session.active_view(), ActiveView::Welcome);
    session.verify().expect("consistent after delete");
}

#[test]
fn selection_fallback_through_tab_closes() {
    let mut session = EditorSession::with_policy(NewFilePolicy::disabled());
    for name in ["a", "b", "c"] {
        session.explorer().add_file(name);
        session.explorer().select_file(name);
    }
    session.workspace().switch("b");

    session.workspace().close("b");
    assert_eq!(session.tabs().selected_path(), Some("a"));

    session.workspace().close("c");
    session.workspace().close("a");
    assert!(session.tabs().selected().is_welcome());
    session.verify().expect("consistent after closing everything");
}

#[test]
fn sample_project_survives_mixed_operations() {
    let mut session = EditorSession::from_seed(&ProjectSeed::sample(), NewFilePolicy::default())
        .expect("sample seed");

    {
        let mut explorer = session.explorer();
        explorer.select_file("src/components/Button.jsx");
        explorer.select_file("README.md");
        explorer.add_folder("src/hooks");
        explorer.add_file("src/hooks/useThing");
        explorer.select_file("src/hooks/useThing.js");
        explorer.toggle_folder("styles");
        explorer.add_file("styles/theme.css");
    }
    session.verify().expect("consistent after additions");
    assert_eq!(
        session.tabs().open_paths(),
        &["src/components/Button.jsx", "README.md", "src/hooks/useThing.js"]
    );

    session.explorer().delete_item("src", NodeKind::Folder);
    assert_eq!(session.tabs().open_paths(), &["README.md"]);
    assert_eq!(session.tabs().selected_path(), Some("README.md"));
    assert_eq!(
        session.tree().file_paths(),
        vec!["styles/main.css", "styles/theme.css", "README.md"]
    );
    session.verify().expect("consistent after cascade");
}

#[test]
fn deleting_an_open_background_tab_keeps_the_selection() {
    let mut session = EditorSession::new();
    {
        let mut explorer = session.explorer();
        explorer.add_folder("src");
        explorer.add_file("src/a");
        explorer.add_file("src/b");
        explorer.select_file("src/a.js");
        explorer.select_file("src/b.js");
    }
    session.workspace().switch("src/a.js");

    session.explorer().delete_item("src/b.js", NodeKind::File);

    assert_eq!(session.tabs().open_paths(), &["src/a.js"]);
    assert_eq!(session.tabs().selected_path(), Some("src/a.js"));
    assert!(session.contents().get("src/b.js").is_none());
    session.verify().expect("consistent after deleting a background tab");
}
