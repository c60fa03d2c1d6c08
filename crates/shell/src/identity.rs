use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 已登入使用者的顯示資訊。 / Display data of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            email: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// 頭像字母：顯示名稱首字大寫，沒有名稱時為 `?`。 / Avatar letter, `?` without a display name.
    pub fn initial(&self) -> char {
        self.display_name
            .as_deref()
            .and_then(|name| name.chars().next())
            .map(|first| first.to_uppercase().next().unwrap_or(first))
            .unwrap_or('?')
    }
}

/// 身分變更回呼。 / Callback invoked with the new identity (or `None` after sign-out).
pub type IdentityListener = Box<dyn FnMut(Option<&Identity>)>;

/// 訂閱識別碼。 / Handle identifying one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("sign-out failed: {0}")]
    SignOut(String),
}

/// 身分提供者介面（單執行緒）。 / Source of the current identity and its changes (single-threaded).
pub trait IdentityProvider {
    fn current(&self) -> Option<Identity>;
    fn subscribe(&self, listener: IdentityListener) -> ListenerId;
    fn unsubscribe(&self, id: ListenerId);
    fn sign_out(&self) -> Result<(), IdentityError>;
}

/// 離開作用域時自動取消的訂閱。 / Listener registration released when dropped.
pub struct Subscription {
    provider: Rc<dyn IdentityProvider>,
    id: Option<ListenerId>,
}

impl Subscription {
    pub fn new(provider: Rc<dyn IdentityProvider>, listener: IdentityListener) -> Self {
        let id = provider.subscribe(listener);
        Self {
            provider,
            id: Some(id),
        }
    }

    pub fn id(&self) -> Option<ListenerId> {
        self.id
    }

    /// 立即取消訂閱。 / Releases the registration now.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(id) = self.id.take() {
            self.provider.unsubscribe(id);
            log::debug!("released identity listener {id:?}");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

type SharedListener = Rc<RefCell<IdentityListener>>;

#[derive(Default)]
struct LocalState {
    current: Option<Identity>,
    listeners: Vec<(ListenerId, SharedListener)>,
    next_id: u64,
}

/// 記憶體內的身分提供者。 / In-memory identity provider for local sessions and tests.
#[derive(Default)]
pub struct LocalIdentityProvider {
    state: RefCell<LocalState>,
}

impl LocalIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: Identity) -> Self {
        let provider = Self::default();
        provider.state.borrow_mut().current = Some(identity);
        provider
    }

    pub fn sign_in(&self, identity: Identity) {
        self.state.borrow_mut().current = Some(identity);
        self.notify();
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    fn notify(&self) {
        let (current, listeners) = {
            let state = self.state.borrow();
            let listeners: Vec<SharedListener> = state
                .listeners
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect();
            (state.current.clone(), listeners)
        };
        for listener in listeners {
            let mut callback = listener.borrow_mut();
            (*callback)(current.as_ref());
        }
    }
}

impl IdentityProvider for LocalIdentityProvider {
    fn current(&self) -> Option<Identity> {
        self.state.borrow().current.clone()
    }

    fn subscribe(&self, listener: IdentityListener) -> ListenerId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = ListenerId(state.next_id);
        state.listeners.push((id, Rc::new(RefCell::new(listener))));
        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.state
            .borrow_mut()
            .listeners
            .retain(|(existing, _)| *existing != id);
    }

    fn sign_out(&self) -> Result<(), IdentityError> {
        self.state.borrow_mut().current = None;
        self.notify();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_uses_display_name() {
        let ada = Identity::new("u1").with_display_name("ada lovelace");
        assert_eq!(ada.initial(), 'A');
        assert_eq!(Identity::new("u2").initial(), '?');
        assert_eq!(Identity::new("u3").with_display_name("").initial(), '?');
    }

    #[test]
    fn listeners_see_changes_until_dropped() {
        let provider: Rc<LocalIdentityProvider> = Rc::new(LocalIdentityProvider::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let subscription = Subscription::new(
            provider.clone(),
            Box::new(move |identity: Option<&Identity>| {
                sink.borrow_mut()
                    .push(identity.map(|identity| identity.uid.clone()))
            }),
        );
        assert_eq!(provider.listener_count(), 1);

        provider.sign_in(Identity::new("u1"));
        provider.sign_out().unwrap();
        drop(subscription);
        provider.sign_in(Identity::new("u2"));

        assert_eq!(*seen.borrow(), vec![Some("u1".to_string()), None]);
        assert_eq!(provider.listener_count(), 0);
    }

    #[test]
    fn cancel_releases_immediately() {
        let provider = Rc::new(LocalIdentityProvider::signed_in(Identity::new("u1")));
        let subscription =
            Subscription::new(provider.clone(), Box::new(|_: Option<&Identity>| {}));
        assert!(subscription.id().is_some());
        subscription.cancel();
        assert_eq!(provider.listener_count(), 0);
    }

    #[test]
    fn listener_may_unsubscribe_during_notification() {
        let provider = Rc::new(LocalIdentityProvider::signed_in(Identity::new("u1")));
        let slot: Rc<RefCell<Option<ListenerId>>> = Rc::new(RefCell::new(None));
        let handle = Rc::clone(&provider);
        let own_id = Rc::clone(&slot);
        let id = provider.subscribe(Box::new(move |_: Option<&Identity>| {
            if let Some(id) = own_id.borrow_mut().take() {
                handle.unsubscribe(id);
            }
        }));
        *slot.borrow_mut() = Some(id);

        provider.sign_out().unwrap();
        assert_eq!(provider.listener_count(), 0);
    }
}
