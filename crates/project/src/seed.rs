use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use codev_core::{path, ContentStore, FileTree, InsertOutcome};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry of an initial project description.
/// 初始專案描述中的單一項目。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SeedEntry {
    Folder {
        name: String,
        #[serde(default)]
        is_open: bool,
        #[serde(default)]
        children: Vec<SeedEntry>,
    },
    File {
        name: String,
        #[serde(default)]
        content: String,
    },
}

impl SeedEntry {
    pub fn folder(name: impl Into<String>, is_open: bool, children: Vec<SeedEntry>) -> Self {
        SeedEntry::Folder {
            name: name.into(),
            is_open,
            children,
        }
    }

    pub fn file(name: impl Into<String>, content: impl Into<String>) -> Self {
        SeedEntry::File {
            name: name.into(),
            content: content.into(),
        }
    }

    fn name(&self) -> &str {
        match self {
            SeedEntry::Folder { name, .. } | SeedEntry::File { name, .. } => name,
        }
    }
}

/// Nested description of the project an editor session starts with.
/// 編輯工作階段啟動時載入的專案描述。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSeed {
    #[serde(default)]
    pub entries: Vec<SeedEntry>,
}

impl ProjectSeed {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sample project shown to new users.
    /// 新使用者看到的範例專案。
    pub fn sample() -> Self {
        Self {
            entries: vec![
                SeedEntry::folder(
                    "src",
                    true,
                    vec![
                        SeedEntry::file(
                            "Main.tsx",
                            "const Main = () => {\n  return <h1>Hello from Main.tsx</h1>;\n};",
                        ),
                        SeedEntry::file(
                            "App.js",
                            "function App() {\n  return <div>App Component</div>;\n}",
                        ),
                        SeedEntry::folder(
                            "components",
                            false,
                            vec![SeedEntry::file("Button.jsx", SAMPLE_BUTTON)],
                        ),
                    ],
                ),
                SeedEntry::folder(
                    "styles",
                    false,
                    vec![SeedEntry::file("main.css", SAMPLE_CSS)],
                ),
                SeedEntry::file("README.md", SAMPLE_README),
            ],
        }
    }

    /// Parses a JSON seed.
    /// 解析 JSON 專案描述。
    pub fn from_json(payload: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Loads a JSON seed from disk.
    /// 從磁碟載入 JSON 專案描述。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref().to_path_buf();
        let payload = fs::read_to_string(&path).map_err(|source| SeedError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&payload).map_err(|source| SeedError::Parse { path, source })
    }

    /// Builds tree and contents from the description.
    pub(crate) fn plant(&self) -> Result<(FileTree, ContentStore), SeedError> {
        let mut tree = FileTree::new();
        let mut contents = ContentStore::new();
        for entry in &self.entries {
            plant_entry(entry, "", &mut tree, &mut contents)?;
        }
        Ok((tree, contents))
    }
}

fn plant_entry(
    entry: &SeedEntry,
    parent: &str,
    tree: &mut FileTree,
    contents: &mut ContentStore,
) -> Result<(), SeedError> {
    let name = entry.name();
    if name.trim().is_empty() || name.contains(path::SEPARATOR) {
        return Err(SeedError::InvalidName(name.to_string()));
    }
    let target = path::join(parent, name);
    let insertion = match entry {
        SeedEntry::Folder { .. } => tree.insert_folder(&target),
        SeedEntry::File { .. } => tree.insert_file(&target),
    }
    .map_err(|_| SeedError::InvalidName(name.to_string()))?;
    if let InsertOutcome::Existing(_) = insertion.outcome {
        return Err(SeedError::Duplicate(target));
    }

    match entry {
        SeedEntry::Folder {
            is_open, children, ..
        } => {
            tree.set_open(&target, *is_open);
            for child in children {
                plant_entry(child, &target, tree, contents)?;
            }
        }
        SeedEntry::File { content, .. } => {
            if !contents.create_with(&target, content.as_str()) {
                return Err(SeedError::Duplicate(target));
            }
        }
    }
    Ok(())
}

/// Errors raised while reading or planting a project seed.
/// 讀取或建立初始專案時的錯誤。
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read project seed {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse project seed {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid project seed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid item name '{0}' in project seed")]
    InvalidName(String),
    #[error("duplicate item '{0}' in project seed")]
    Duplicate(String),
}

const SAMPLE_BUTTON: &str = "const Button = ({ children, onClick }) => {
  return (
    <button
      onClick={onClick}
      className=\"bg-blue-500 hover:bg-blue-600 text-white px-4 py-2 rounded\"
    >
      {children}
    </button>
  );
};

export default Button;";

const SAMPLE_CSS: &str = "body {
  margin: 0;
  padding: 0;
  font-family: sans-serif;
}

.container {
  max-width: 1200px;
  margin: 0 auto;
}";

const SAMPLE_README: &str = "# CoDev Project

This is a collaborative coding project.

## Getting Started

Follow these instructions to set up the project locally.";
