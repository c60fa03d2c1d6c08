use std::cell::RefCell;
use std::rc::Rc;

use codev_core::{Insertion, NodeKind, TreeRow};
use codev_project::{ActiveView, EditorSession, NewFilePolicy, ProjectSeed, SeedError, TabView};
use codev_settings::Preferences;
use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;

use crate::identity::{Identity, IdentityError, IdentityProvider, Subscription};
use crate::input::{EntryPrompt, InputError};
use crate::navigation::{Navigator, Route};

const FALLBACK_DISPLAY_NAME: &str = "User";
const TERMINAL_PLACEHOLDER: [&str; 2] = ["$ npm start", "Starting development server..."];

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("no signed-in user")]
    SignedOut,
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("failed to seed the project: {0}")]
    Seed(#[from] SeedError),
}

/// 編輯器頁面：結合身分、導覽、輸入框與編輯工作階段。
/// / The editor page: ties the identity gate, navigation, entry prompt and editor session together.
///
/// The identity subscription lives exactly as long as the view; dropping the view (or calling
/// [`EditorView::close`]) releases it.
pub struct EditorView {
    identity: Rc<dyn IdentityProvider>,
    user: Rc<RefCell<Option<Identity>>>,
    subscription: Option<Subscription>,
    session: EditorSession,
    prompt: EntryPrompt,
    min_desktop_width: u32,
    editor_options: EditorOptions,
}

impl EditorView {
    /// 依偏好設定開啟編輯器。 / Opens the editor with the project and policy chosen by preferences.
    pub fn open(
        identity: Rc<dyn IdentityProvider>,
        navigator: Rc<dyn Navigator>,
        preferences: &Preferences,
    ) -> Result<Self, ShellError> {
        let seed = if preferences.explorer.seed_sample_project {
            ProjectSeed::sample()
        } else {
            ProjectSeed::empty()
        };
        Self::open_with_seed(identity, navigator, preferences, &seed)
    }

    pub fn open_with_seed(
        identity: Rc<dyn IdentityProvider>,
        navigator: Rc<dyn Navigator>,
        preferences: &Preferences,
        seed: &ProjectSeed,
    ) -> Result<Self, ShellError> {
        let Some(current) = identity.current() else {
            warn!("editor opened without a signed-in user");
            navigator.navigate(Route::Home);
            return Err(ShellError::SignedOut);
        };

        let policy = match preferences.explorer.default_file_suffix.as_deref() {
            Some(suffix) => NewFilePolicy::with_suffix(suffix),
            None => NewFilePolicy::disabled(),
        };
        let session = EditorSession::from_seed(seed, policy)?;

        let user = Rc::new(RefCell::new(Some(current)));
        let slot = Rc::clone(&user);
        let subscription = Subscription::new(
            Rc::clone(&identity),
            Box::new(move |changed: Option<&Identity>| {
                *slot.borrow_mut() = changed.cloned();
                if changed.is_none() {
                    navigator.navigate(Route::Home);
                }
            }),
        );
        debug!("editor view opened with {} nodes", session.tree().len());

        Ok(Self {
            identity,
            user,
            subscription: Some(subscription),
            session,
            prompt: EntryPrompt::default(),
            min_desktop_width: preferences.ui.min_desktop_width,
            editor_options: EditorOptions::from_preferences(preferences),
        })
    }

    /// 關閉編輯器並取消身分訂閱。 / Closes the view and releases the identity subscription.
    pub fn close(mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
        debug!("editor view closed");
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.borrow().is_some()
    }

    pub fn user(&self) -> Option<Identity> {
        self.user.borrow().clone()
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut EditorSession {
        &mut self.session
    }

    pub fn prompt(&self) -> &EntryPrompt {
        &self.prompt
    }

    pub fn begin_new_file(&mut self) {
        self.prompt.begin_file();
    }

    pub fn begin_new_folder(&mut self) {
        self.prompt.begin_folder();
    }

    pub fn type_name(&mut self, text: impl Into<String>) {
        self.prompt.input(text);
    }

    pub fn cancel_entry(&mut self) {
        self.prompt.cancel();
    }

    /// 送出輸入框並交給檔案總管建立項目。
    /// / Submits the prompt and hands the cleaned name to the explorer.
    ///
    /// `Ok(None)` means nothing was created: no prompt was open, or the explorer rejected the name.
    pub fn submit_entry(&mut self) -> Result<Option<Insertion>, ShellError> {
        let Some(entry) = self.prompt.submit()? else {
            return Ok(None);
        };
        let mut explorer = self.session.explorer();
        let insertion = match entry.kind {
            NodeKind::File => explorer.add_file(&entry.name),
            NodeKind::Folder => explorer.add_folder(&entry.name),
        };
        Ok(insertion)
    }

    /// 登出；導回首頁由身分訂閱處理。 / Signs out; the identity subscription redirects home.
    pub fn sign_out(&mut self) -> Result<(), ShellError> {
        self.identity.sign_out()?;
        Ok(())
    }

    /// 依視窗寬度產生畫面模型。 / Builds the frame model for the given viewport width.
    pub fn frame(&self, viewport_width: u32) -> EditorFrame {
        let user = self.user.borrow();
        let Some(user) = user.as_ref() else {
            return EditorFrame::SignedOut;
        };
        if viewport_width < self.min_desktop_width {
            return EditorFrame::DesktopRequired {
                min_width: self.min_desktop_width,
            };
        }
        EditorFrame::Workbench(Workbench {
            user_initial: user.initial(),
            display_name: user
                .display_name
                .clone()
                .unwrap_or_else(|| FALLBACK_DISPLAY_NAME.to_string()),
            email: user.email.clone(),
            explorer: self.session.tree().visible_rows(),
            prompt: self.prompt.clone(),
            tabs: self.session.tab_strip(),
            active: self.session.active_view(),
            editor: self.editor_options.clone(),
            terminal: TERMINAL_PLACEHOLDER.iter().map(|line| line.to_string()).collect(),
        })
    }
}

/// 編輯器畫面模型。 / What the editor page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "frame", rename_all = "snake_case")]
pub enum EditorFrame {
    SignedOut,
    DesktopRequired { min_width: u32 },
    Workbench(Workbench),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workbench {
    pub user_initial: char,
    pub display_name: String,
    pub email: Option<String>,
    pub explorer: Vec<TreeRow>,
    pub prompt: EntryPrompt,
    pub tabs: Vec<TabView>,
    pub active: ActiveView,
    pub editor: EditorOptions,
    pub terminal: Vec<String>,
}

/// 交給文字編輯元件的顯示選項。 / Display options handed to the text-editing surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorOptions {
    pub theme: String,
    pub font_size: u32,
    pub minimap: bool,
}

impl EditorOptions {
    pub fn from_preferences(preferences: &Preferences) -> Self {
        Self {
            theme: preferences.ui.theme.clone(),
            font_size: preferences.editor.font_size,
            minimap: preferences.editor.minimap,
        }
    }
}
