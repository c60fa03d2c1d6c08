use std::cell::RefCell;
use std::fmt;

use serde::Serialize;

/// 應用程式頁面。 / Pages the application can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Home,
    Login,
    Signup,
    Dashboard,
    Editor,
    Documentation,
    Success,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Home,
        Route::Login,
        Route::Signup,
        Route::Dashboard,
        Route::Editor,
        Route::Documentation,
        Route::Success,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Dashboard => "/dashboard",
            Route::Editor => "/editor",
            Route::Documentation => "/documentation",
            Route::Success => "/success",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL.into_iter().find(|route| route.path() == normalized)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// 接收「前往某頁」請求的對象。 / Receives "go to page" requests issued by user actions.
pub trait Navigator {
    fn navigate(&self, route: Route);
}

/// 記錄導覽歷程的實作。 / Navigator that records every request.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    history: RefCell<Vec<Route>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Route> {
        self.history.borrow().clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.history.borrow().last().copied()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, route: Route) {
        log::debug!("navigate to {route}");
        self.history.borrow_mut().push(route);
    }
}
