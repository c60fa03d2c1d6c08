pub mod preferences;

pub use preferences::{
    EditorPreferences, ExplorerPreferences, Preferences, PreferencesError, PreferencesStore,
    UiPreferences, PREFERENCES_VERSION,
};
