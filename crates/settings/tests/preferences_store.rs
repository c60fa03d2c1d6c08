use codev_settings::{Preferences, PreferencesStore};
use std::fs;
use tempfile::tempdir;

#[test]
fn load_missing_file_returns_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");

    let store = PreferencesStore::load(&path).expect("load defaults");
    let prefs = store.preferences();
    assert_eq!(prefs.explorer.default_file_suffix.as_deref(), Some("js"));
    assert!(prefs.explorer.seed_sample_project);
    assert_eq!(prefs.editor.font_size, 14);
    assert_eq!(prefs.ui.min_desktop_width, 1024);
    assert!(!path.exists(), "loading defaults must not create the file");
}

#[test]
fn save_and_reload_roundtrip() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("nested").join("preferences.json");

    let mut store = PreferencesStore::new(path.clone(), Preferences::default());
    store
        .update(|prefs| {
            prefs.explorer.default_file_suffix = Some(".py".to_string());
            prefs.explorer.seed_sample_project = false;
            prefs.editor.minimap = true;
        })
        .expect("save");

    let reloaded = PreferencesStore::load(&path).expect("reload");
    assert_eq!(
        reloaded.preferences().explorer.default_file_suffix.as_deref(),
        Some("py")
    );
    assert!(!reloaded.preferences().explorer.seed_sample_project);
    assert!(reloaded.preferences().editor.minimap);
}

#[test]
fn update_sanitizes_values() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");

    let mut store = PreferencesStore::load(&path).expect("default");
    store
        .update(|prefs| {
            prefs.editor.font_size = 0;
            prefs.ui.theme = String::new();
            prefs.explorer.default_file_suffix = Some("   ".into());
        })
        .expect("update");

    let current = store.preferences();
    assert_eq!(current.editor.font_size, 14);
    assert_eq!(current.ui.theme, "vs-dark");
    assert_eq!(current.explorer.default_file_suffix, None);
}

#[test]
fn legacy_version_is_upgraded_on_load() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");
    fs::write(
        &path,
        r#"{
            "version": 0,
            "explorer": { "default_file_suffix": "ts" },
            "ui": { "min_desktop_width": 0, "theme": "" }
        }"#,
    )
    .expect("write legacy prefs");

    let store = PreferencesStore::load(&path).expect("load legacy file");
    let prefs = store.preferences();
    assert_eq!(prefs.version, 1, "legacy preferences should be upgraded");
    assert_eq!(prefs.explorer.default_file_suffix.as_deref(), Some("ts"));
    assert!(
        prefs.explorer.seed_sample_project,
        "missing fields should fall back to defaults"
    );
    assert_eq!(prefs.ui.min_desktop_width, 1024);
    assert_eq!(prefs.ui.theme, "vs-dark");
}

#[test]
fn import_backs_up_previous_file() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");
    let incoming = temp.path().join("incoming.json");

    let mut store = PreferencesStore::load(&path).expect("default");
    store.save().expect("initial save");
    fs::write(&incoming, r#"{ "editor": { "font_size": 18 } }"#).expect("write import");

    store.import_from(&incoming).expect("import");
    assert_eq!(store.preferences().editor.font_size, 18);
    assert!(path.with_extension("bak").exists());

    let exported = temp.path().join("out").join("exported.json");
    store.export_to(&exported).expect("export");
    let reloaded = PreferencesStore::load(&exported).expect("reload export");
    assert_eq!(reloaded.preferences(), store.preferences());
}

#[test]
fn malformed_file_reports_parse_error() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("preferences.json");
    fs::write(&path, "{ not json").expect("write");

    let err = PreferencesStore::load(&path).unwrap_err();
    assert!(err.to_string().contains("failed to parse preferences"));
}
