use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    content: Mutex<String>,
    /// Token of the most recent navigation.
    generation: AtomicU64,
}

/// The single container views render into. Clones share the same container.
#[derive(Clone, Debug, Default)]
pub struct Mount {
    inner: Arc<Inner>,
}

impl Mount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current markup.
    pub fn content(&self) -> String {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, String> {
        // A panicking view cannot leave the String half-written.
        self.inner
            .content
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Starts a navigation. Outlets holding an older token stop writing.
    pub(super) fn issue_token(&self) -> u64 {
        self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, token: u64) -> bool {
        self.inner.generation.load(Ordering::SeqCst) == token
    }

    /// Clears the container for the navigation holding `token`, or returns
    /// `None` when a newer navigation has started since.
    pub(super) fn claim(&self, token: u64) -> Option<Outlet> {
        let mut content = self.lock();
        if !self.is_current(token) {
            return None;
        }
        content.clear();
        Some(Outlet {
            mount: self.clone(),
            token,
        })
    }
}

/// Write access to the [`Mount`] for one navigation. Once a newer navigation
/// starts, writes through this outlet are dropped.
#[derive(Clone, Debug)]
pub struct Outlet {
    mount: Mount,
    token: u64,
}

impl Outlet {
    pub fn is_current(&self) -> bool {
        self.mount.is_current(self.token)
    }

    /// Replaces the container's markup. Returns `false` if the write was
    /// dropped as stale.
    pub fn render(&self, markup: impl Into<String>) -> bool {
        let mut content = self.mount.lock();
        if !self.is_current() {
            return false;
        }
        *content = markup.into();
        true
    }

    pub fn append(&self, markup: &str) -> bool {
        let mut content = self.mount.lock();
        if !self.is_current() {
            return false;
        }
        content.push_str(markup);
        true
    }
}
