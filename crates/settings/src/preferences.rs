use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PREFERENCES_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to read preferences {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse preferences {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize preferences {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write preferences {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub explorer: ExplorerPreferences,
    #[serde(default)]
    pub editor: EditorPreferences,
    #[serde(default)]
    pub ui: UiPreferences,
}

fn default_version() -> u32 {
    PREFERENCES_VERSION
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            version: PREFERENCES_VERSION,
            explorer: ExplorerPreferences::default(),
            editor: EditorPreferences::default(),
            ui: UiPreferences::default(),
        }
    }
}

impl Preferences {
    pub fn sanitize(&mut self) {
        if self.version == 0 {
            self.version = PREFERENCES_VERSION;
        }
        self.explorer.sanitize();
        self.editor.sanitize();
        self.ui.sanitize();
    }
}

/// Explorer behaviour: new-file naming and the project a fresh editor starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerPreferences {
    /// Suffix appended to new file names without one; `null` leaves names untouched.
    #[serde(default = "default_file_suffix")]
    pub default_file_suffix: Option<String>,
    #[serde(default = "default_true")]
    pub seed_sample_project: bool,
}

fn default_file_suffix() -> Option<String> {
    Some("js".to_string())
}

fn default_true() -> bool {
    true
}

impl Default for ExplorerPreferences {
    fn default() -> Self {
        Self {
            default_file_suffix: default_file_suffix(),
            seed_sample_project: true,
        }
    }
}

impl ExplorerPreferences {
    /// 字尾只能是單一副檔名；含 `/`、`.` 或空白時停用。
    /// / The suffix must be one extension; anything with `/`, `.` or whitespace disables it.
    fn sanitize(&mut self) {
        self.default_file_suffix = self
            .default_file_suffix
            .as_deref()
            .map(|suffix| suffix.trim().trim_start_matches('.'))
            .filter(|suffix| {
                !suffix.is_empty()
                    && !suffix.contains(|c: char| c == '/' || c == '.' || c.is_whitespace())
            })
            .map(str::to_string);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorPreferences {
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default)]
    pub minimap: bool,
}

fn default_font_size() -> u32 {
    14
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            minimap: false,
        }
    }
}

impl EditorPreferences {
    fn sanitize(&mut self) {
        if self.font_size == 0 {
            self.font_size = default_font_size();
        }
        self.font_size = self.font_size.clamp(8, 48);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiPreferences {
    #[serde(default = "default_min_desktop_width")]
    pub min_desktop_width: u32,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_min_desktop_width() -> u32 {
    1024
}

fn default_theme() -> String {
    "vs-dark".to_string()
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            min_desktop_width: default_min_desktop_width(),
            theme: default_theme(),
        }
    }
}

impl UiPreferences {
    fn sanitize(&mut self) {
        if self.min_desktop_width == 0 {
            self.min_desktop_width = default_min_desktop_width();
        }
        self.min_desktop_width = self.min_desktop_width.clamp(320, 7680);
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
    }
}

#[derive(Debug)]
pub struct PreferencesStore {
    path: PathBuf,
    data: Preferences,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>, preferences: Preferences) -> Self {
        Self {
            path: path.into(),
            data: preferences,
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PreferencesError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            log::debug!("no preferences at {}; using defaults", path.display());
            let mut data = Preferences::default();
            data.sanitize();
            return Ok(Self { path, data });
        }

        let contents = fs::read_to_string(&path).map_err(|source| PreferencesError::Read {
            path: path.clone(),
            source,
        })?;
        let mut data: Preferences =
            serde_json::from_str(&contents).map_err(|source| PreferencesError::Parse {
                path: path.clone(),
                source,
            })?;
        data.sanitize();
        log::debug!("loaded preferences from {}", path.display());
        Ok(Self { path, data })
    }

    pub fn preferences(&self) -> &Preferences {
        &self.data
    }

    pub fn update<F>(&mut self, mut op: F) -> Result<(), PreferencesError>
    where
        F: FnMut(&mut Preferences),
    {
        op(&mut self.data);
        self.data.sanitize();
        self.save()
    }

    pub fn save(&self) -> Result<(), PreferencesError> {
        ensure_parent(&self.path)?;
        let payload = to_payload(&self.data, &self.path)?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload.as_bytes()).map_err(|source| PreferencesError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| PreferencesError::Write {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("saved preferences to {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn export_to(&self, path: impl AsRef<Path>) -> Result<(), PreferencesError> {
        let path = path.as_ref().to_path_buf();
        ensure_parent(&path)?;
        let payload = to_payload(&self.data, &path)?;
        fs::write(&path, payload.as_bytes())
            .map_err(|source| PreferencesError::Write { path, source })
    }

    pub fn import_from(&mut self, source: impl AsRef<Path>) -> Result<(), PreferencesError> {
        let source = source.as_ref().to_path_buf();
        let contents = fs::read_to_string(&source).map_err(|err| PreferencesError::Read {
            path: source.clone(),
            source: err,
        })?;
        let mut data: Preferences =
            serde_json::from_str(&contents).map_err(|err| PreferencesError::Parse {
                path: source.clone(),
                source: err,
            })?;
        data.sanitize();
        self.backup_existing()?;
        self.data = data;
        self.save()
    }

    fn backup_existing(&self) -> Result<(), PreferencesError> {
        if self.path.exists() {
            let backup = self.path.with_extension("bak");
            fs::copy(&self.path, &backup).map_err(|source| PreferencesError::Write {
                path: backup,
                source,
            })?;
        }
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<(), PreferencesError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| PreferencesError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

fn to_payload(data: &Preferences, path: &Path) -> Result<String, PreferencesError> {
    serde_json::to_string_pretty(data).map_err(|source| PreferencesError::Serialize {
        path: path.to_path_buf(),
        source,
    })
}
