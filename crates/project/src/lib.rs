//! Editor-session orchestration for CoDev: explorer and workspace controllers over the core state.
//! CoDev 編輯工作階段：在核心狀態之上協調檔案總管與分頁工作區。

pub mod explorer;
pub mod policy;
pub mod seed;
pub mod session;
pub mod workspace;

pub use explorer::Explorer;
pub use policy::{NewFilePolicy, DEFAULT_FILE_SUFFIX};
pub use seed::{ProjectSeed, SeedEntry, SeedError};
pub use session::{ConsistencyError, EditorSession};
pub use workspace::{ActiveView, TabView, Workspace};
