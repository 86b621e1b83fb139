use crate::config::RoutesConfig;
use crate::models::{same_route, Location, NavigationOutcome, RouteDescriptor};
use crate::session::SessionState;

/// Query parameter carrying the originally requested path through login.
pub const NEXT_PARAM: &str = "next";

/// The two routes the rules redirect to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardRoutes {
    pub login: String,
    pub landing: String,
}

impl GuardRoutes {
    pub fn new(login: impl Into<String>, landing: impl Into<String>) -> Self {
        GuardRoutes {
            login: login.into(),
            landing: landing.into(),
        }
    }

    pub fn is_login(&self, target: &Location) -> bool {
        same_route(&target.path, &self.login)
    }

    fn landing(&self) -> Location {
        Location::new(self.landing.clone())
    }
}

impl Default for GuardRoutes {
    fn default() -> Self {
        GuardRoutes::new("/login", "/dashboard")
    }
}

impl From<&RoutesConfig> for GuardRoutes {
    fn from(config: &RoutesConfig) -> Self {
        GuardRoutes::new(config.login.clone(), config.default.clone())
    }
}

/// Full decision for a navigation to `target` (resolved to `route`).
///
/// Rules, first match wins:
/// 1. login route while authenticated: go to `?next=` if it is a single string, else the landing route
/// 2. public route: allow
/// 3. not authenticated: login with `next` set to the requested full path
/// 4. admin route without the admin role: fall back to the landing route
/// 5. allow
pub fn decide(
    target: &Location,
    route: &RouteDescriptor,
    session: &SessionState,
    routes: &GuardRoutes,
) -> NavigationOutcome {
    decide_before_identity(target, route, session, routes)
        .unwrap_or_else(|| decide_after_identity(target, route, session, routes))
}

/// Rules 1 and 2, which never need the user's identity.
pub fn decide_before_identity(
    target: &Location,
    route: &RouteDescriptor,
    session: &SessionState,
    routes: &GuardRoutes,
) -> Option<NavigationOutcome> {
    if routes.is_login(target) && session.is_authenticated() {
        let destination = match target.query_str(NEXT_PARAM) {
            Some(next) => Location::parse(next),
            None => routes.landing(),
        };
        return Some(NavigationOutcome::Redirect(destination));
    }
    if route.public {
        return Some(NavigationOutcome::Allow);
    }
    None
}

/// Rules 3 to 5, evaluated once the identity is as fresh as it will get.
pub fn decide_after_identity(
    target: &Location,
    route: &RouteDescriptor,
    session: &SessionState,
    routes: &GuardRoutes,
) -> NavigationOutcome {
    if !session.is_authenticated() {
        return login_redirect(target, routes);
    }
    if route.admin_required && !session.is_admin() {
        return NavigationOutcome::Deny(routes.landing());
    }
    NavigationOutcome::Allow
}

/// Send the user to the login screen, remembering where they wanted to go.
pub fn login_redirect(target: &Location, routes: &GuardRoutes) -> NavigationOutcome {
    NavigationOutcome::Redirect(
        Location::new(routes.login.clone()).with_query(NEXT_PARAM, target.full_path()),
    )
}
