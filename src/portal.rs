//! The portal's route table and manager-only access policy.
//!
//! Screens themselves are rendered by a [`ScreenRenderer`] supplied by the
//! embedding view layer; this module only decides which screen a location
//! maps to and who may see it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::router::{
    HandlerError, NavigationGuard, Navigator, Outlet, Params, RouteHandler, RouteInfo,
    RouteOptions, Router, RouterError,
};

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    Login,
    Dashboard,
    NewRecord,
    RecordDetail,
    EditRecord,
    Network,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortalRoute {
    pub pattern: &'static str,
    pub screen: Screen,
    pub public: bool,
}

const fn route(pattern: &'static str, screen: Screen) -> PortalRoute {
    PortalRoute {
        pattern,
        screen,
        public: false,
    }
}

/// Registration order matters: the first matching pattern wins.
pub const ROUTES: [PortalRoute; 6] = [
    PortalRoute {
        pattern: LOGIN_PATH,
        screen: Screen::Login,
        public: true,
    },
    route(HOME_PATH, Screen::Dashboard),
    route("/new", Screen::NewRecord),
    route("/onboarding/:id", Screen::RecordDetail),
    route("/onboarding/:id/edit", Screen::EditRecord),
    route("/network", Screen::Network),
];

/// Who is signed in, as reported by the auth service.
#[async_trait]
pub trait SessionSource: Send + Sync {
    async fn has_session(&self) -> bool;
    async fn is_manager(&self) -> bool;
}

/// Draws a screen into the outlet. `params` carries `id` for the record
/// screens.
#[async_trait]
pub trait ScreenRenderer: Send + Sync {
    async fn render(
        &self,
        screen: Screen,
        outlet: Outlet,
        params: Params,
    ) -> Result<(), HandlerError>;
}

async fn signed_in_manager<S: SessionSource + ?Sized>(sessions: &S) -> bool {
    sessions.has_session().await && sessions.is_manager().await
}

/// Only managers get past; everyone else is sent to the login screen.
pub struct ManagerGuard<S> {
    sessions: Arc<S>,
    navigator: Navigator,
}

impl<S> ManagerGuard<S> {
    pub fn new(sessions: Arc<S>, navigator: Navigator) -> Self {
        Self {
            sessions,
            navigator,
        }
    }
}

#[async_trait]
impl<S: SessionSource + 'static> NavigationGuard for ManagerGuard<S> {
    async fn allow(&self, route: &RouteInfo) -> bool {
        if signed_in_manager(self.sessions.as_ref()).await {
            return true;
        }
        log::info!("{} requires a manager session", route.path);
        self.navigator.navigate(LOGIN_PATH);
        false
    }
}

struct ScreenRoute<S, V> {
    screen: Screen,
    sessions: Arc<S>,
    views: Arc<V>,
    navigator: Navigator,
}

#[async_trait]
impl<S, V> RouteHandler for ScreenRoute<S, V>
where
    S: SessionSource + 'static,
    V: ScreenRenderer + 'static,
{
    async fn render(&self, outlet: Outlet, params: Params) -> Result<(), HandlerError> {
        // The login screen is pointless for a manager who is already in.
        if self.screen == Screen::Login && signed_in_manager(self.sessions.as_ref()).await {
            self.navigator.navigate(HOME_PATH);
            return Ok(());
        }
        self.views.render(self.screen, outlet, params).await
    }
}

/// Router with every portal route and the manager guard installed.
pub fn portal_router<S, V>(
    location: &str,
    sessions: Arc<S>,
    views: Arc<V>,
) -> Result<Router, RouterError>
where
    S: SessionSource + 'static,
    V: ScreenRenderer + 'static,
{
    let mut router = Router::with_location(location);
    let navigator = router.navigator();
    for entry in ROUTES {
        let handler = ScreenRoute {
            screen: entry.screen,
            sessions: Arc::clone(&sessions),
            views: Arc::clone(&views),
            navigator: navigator.clone(),
        };
        router.add_route(
            entry.pattern,
            handler,
            RouteOptions {
                public: entry.public,
            },
        )?;
    }
    router.set_auth_guard(ManagerGuard::new(sessions, navigator));
    Ok(router)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavTab {
    Onboarding,
    Network,
}

/// Highlighted tab for a hash location. An empty location is the root.
pub fn active_tab(location: &str) -> NavTab {
    let hash = if location.is_empty() { "#/" } else { location };
    if hash.starts_with("#/network") {
        NavTab::Network
    } else {
        NavTab::Onboarding
    }
}
