//! Hash-location router with a single navigation guard.
//!
//! Routes are tried in registration order and the first structural match
//! wins. Non-public routes pass through the guard before their handler runs.
//! Every navigation takes a fresh token from the [`Mount`]; a handler that
//! finishes after a newer navigation has started can no longer write to the
//! container, so the latest navigation always owns what is shown.

mod mount;
mod pattern;

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use mount::{Mount, Outlet};
pub use pattern::{Params, RoutePattern, location_path};

pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("invalid route pattern {pattern:?}: {reason}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },

    /// A route handler failed. Not retried.
    #[error("handler for {path} failed: {source}")]
    Handler { path: String, source: HandlerError },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteOptions {
    /// Skips the navigation guard.
    pub public: bool,
}

impl RouteOptions {
    pub fn public() -> Self {
        Self { public: true }
    }
}

/// What the guard sees of the navigation it is asked about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteInfo {
    pub pattern: String,
    pub path: String,
    pub params: Params,
}

/// How a single navigation ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The handler ran to completion and its output is on screen.
    Rendered { pattern: String },
    /// No registered pattern matches the path.
    Unresolved { path: String },
    /// The guard refused; the handler was not invoked.
    Rejected { pattern: String },
    /// A newer navigation started first; anything this one wrote was dropped.
    Superseded { pattern: String },
}

#[async_trait]
pub trait RouteHandler: Send + Sync {
    async fn render(&self, outlet: Outlet, params: Params) -> Result<(), HandlerError>;
}

#[async_trait]
impl<F, Fut> RouteHandler for F
where
    F: Fn(Outlet, Params) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn render(&self, outlet: Outlet, params: Params) -> Result<(), HandlerError> {
        (self)(outlet, params).await
    }
}

/// Runs before every non-public route. Returning `false` aborts the
/// navigation; any redirect is the guard's own business.
#[async_trait]
pub trait NavigationGuard: Send + Sync {
    async fn allow(&self, route: &RouteInfo) -> bool;
}

#[async_trait]
impl<F, Fut> NavigationGuard for F
where
    F: Fn(RouteInfo) -> Fut + Send + Sync,
    Fut: Future<Output = bool> + Send + 'static,
{
    async fn allow(&self, route: &RouteInfo) -> bool {
        (self)(route.clone()).await
    }
}

struct Route {
    pattern: RoutePattern,
    handler: Arc<dyn RouteHandler>,
    public: bool,
}

/// Shared handle onto the current location.
#[derive(Clone, Debug)]
pub struct Navigator {
    location: Arc<Mutex<String>>,
    events: mpsc::UnboundedSender<String>,
}

impl Navigator {
    /// Current location, e.g. `#/onboarding/42`.
    pub fn location(&self) -> String {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, String> {
        self.location
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Moves to `path`. Like a hash change, moving to the current location
    /// fires nothing; returns whether a navigation event was issued.
    pub fn navigate(&self, path: &str) -> bool {
        let target = format!("#{path}");
        {
            let mut location = self.lock();
            if *location == target {
                return false;
            }
            location.clone_from(&target);
        }
        if self.events.send(target).is_err() {
            log::debug!("router not running; location set to {path}");
        }
        true
    }
}

pub struct Router {
    routes: Vec<Route>,
    guard: Option<Arc<dyn NavigationGuard>>,
    navigator: Navigator,
    events: Mutex<Option<mpsc::UnboundedReceiver<String>>>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self::with_location("#/")
    }

    pub fn with_location(location: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            routes: Vec::new(),
            guard: None,
            navigator: Navigator {
                location: Arc::new(Mutex::new(location.into())),
                events: tx,
            },
            events: Mutex::new(Some(rx)),
        }
    }

    /// Registers a route after those already present. Overlapping patterns
    /// are allowed; the earlier one wins.
    pub fn add_route(
        &mut self,
        pattern: &str,
        handler: impl RouteHandler + 'static,
        options: RouteOptions,
    ) -> Result<(), RouterError> {
        let pattern = RoutePattern::parse(pattern)?;
        self.routes.push(Route {
            pattern,
            handler: Arc::new(handler),
            public: options.public,
        });
        Ok(())
    }

    /// Installs the guard, replacing any previous one.
    pub fn set_auth_guard(&mut self, guard: impl NavigationGuard + 'static) {
        self.guard = Some(Arc::new(guard));
    }

    pub fn navigator(&self) -> Navigator {
        self.navigator.clone()
    }

    pub fn navigate(&self, path: &str) -> bool {
        self.navigator.navigate(path)
    }

    /// First registered route whose pattern matches `path`.
    pub fn match_route(&self, path: &str) -> Option<(&RoutePattern, Params)> {
        self.routes
            .iter()
            .find_map(|r| r.pattern.match_path(path).map(|p| (&r.pattern, p)))
    }

    /// Resolves one navigation to `location` into `mount`. Handler failures
    /// come back as [`RouterError::Handler`].
    pub async fn resolve(&self, mount: &Mount, location: &str) -> Result<Outcome, RouterError> {
        let token = mount.issue_token();
        self.resolve_with(mount, location, token).await
    }

    async fn resolve_with(
        &self,
        mount: &Mount,
        location: &str,
        token: u64,
    ) -> Result<Outcome, RouterError> {
        let path = location_path(location);
        let found = self
            .routes
            .iter()
            .find_map(|r| r.pattern.match_path(path).map(|p| (r, p)));
        let Some((route, params)) = found else {
            log::warn!("no route for {path}");
            return Ok(Outcome::Unresolved {
                path: path.to_string(),
            });
        };
        let pattern = route.pattern.as_str().to_string();

        if !route.public
            && let Some(guard) = &self.guard
        {
            let info = RouteInfo {
                pattern: pattern.clone(),
                path: path.to_string(),
                params: params.clone(),
            };
            if !guard.allow(&info).await {
                log::debug!("guard refused {path}");
                return Ok(Outcome::Rejected { pattern });
            }
        }

        let Some(outlet) = mount.claim(token) else {
            return Ok(Outcome::Superseded { pattern });
        };
        route
            .handler
            .render(outlet.clone(), params)
            .await
            .map_err(|source| RouterError::Handler {
                path: path.to_string(),
                source,
            })?;

        if outlet.is_current() {
            log::debug!("rendered {path} via {pattern}");
            Ok(Outcome::Rendered { pattern })
        } else {
            Ok(Outcome::Superseded { pattern })
        }
    }

    /// Binds the router to `mount`: resolves the current location at once,
    /// then every later navigation. Each navigation runs as its own task, so
    /// a slow handler never holds up the next one. Handler failures are
    /// logged.
    pub fn init(mut self, mount: Mount) -> JoinHandle<()> {
        let events = self
            .events
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        let router = Arc::new(self);

        tokio::spawn(async move {
            router.spawn_resolution(&mount, router.navigator.location());
            let Some(mut events) = events else {
                return;
            };
            while let Some(location) = events.recv().await {
                router.spawn_resolution(&mount, location);
            }
        })
    }

    fn spawn_resolution(self: &Arc<Self>, mount: &Mount, location: String) {
        // Issued here, in event order, not inside the spawned task.
        let token = mount.issue_token();
        let router = Arc::clone(self);
        let mount = mount.clone();
        tokio::spawn(async move {
            match router.resolve_with(&mount, &location, token).await {
                Ok(outcome) => log::debug!("{location}: {outcome:?}"),
                Err(e) => log::error!("{e}"),
            }
        });
    }
}
