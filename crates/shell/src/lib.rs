//! Editor-page shell for CoDev: identity gate, navigation, the explorer entry prompt and the
//! frame model handed to the presentation layer.
//! CoDev 編輯器頁面外殼：身分檢查、導覽、檔案總管輸入框與畫面模型。

pub mod identity;
pub mod input;
pub mod navigation;
pub mod view;

pub use identity::{
    Identity, IdentityError, IdentityListener, IdentityProvider, ListenerId, LocalIdentityProvider,
    Subscription,
};
pub use input::{normalize_name, EntryPrompt, InputError, NewEntry};
pub use navigation::{HistoryNavigator, Navigator, Route};
pub use view::{EditorFrame, EditorOptions, EditorView, ShellError, Workbench};
