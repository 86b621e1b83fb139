use std::sync::Arc;

use tracing::{debug, warn};

use super::decision::{self, GuardRoutes};
use crate::error::SessionError;
use crate::models::{Identity, Location, NavigationOutcome, RouteDescriptor};
use crate::session::Session;

/// Runs the decision rules for every navigation attempt, loading the
/// identity first when the session holds a token but no user yet.
///
/// Nothing is cached between calls; each attempt reads the session afresh.
pub struct NavigationGuard {
    session: Arc<Session>,
    routes: GuardRoutes,
}

impl NavigationGuard {
    pub fn new(session: Arc<Session>, routes: GuardRoutes) -> Self {
        NavigationGuard { session, routes }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn routes(&self) -> &GuardRoutes {
        &self.routes
    }

    /// Decides whether the navigation from `from` to `target` may proceed.
    pub async fn check(
        &self,
        target: &Location,
        route: &RouteDescriptor,
        from: Option<&Location>,
    ) -> NavigationOutcome {
        let snapshot = self.session.snapshot();
        if let Some(outcome) =
            decision::decide_before_identity(target, route, &snapshot, &self.routes)
        {
            debug!(
                "Navigation {} -> {}: {}",
                from.map(Location::full_path).unwrap_or_default(),
                target,
                outcome
            );
            return outcome;
        }

        if let Some(credential) = snapshot.credential().filter(|_| snapshot.needs_identity()) {
            if let Err(e) = self.refresh_identity().await {
                // Only the token the lookup was made for is dropped; a login
                // that landed meanwhile keeps its session.
                if self.session.logout_if_current(credential).await {
                    warn!(
                        "Could not load identity while navigating to {}, logged out: {}",
                        target,
                        e.message()
                    );
                    return decision::login_redirect(target, &self.routes);
                }
                debug!(
                    "Session changed while loading identity for {}: {}",
                    target,
                    e.message()
                );
            }
        }

        let outcome =
            decision::decide_after_identity(target, route, &self.session.snapshot(), &self.routes);
        debug!(
            "Navigation {} -> {}: {}",
            from.map(Location::full_path).unwrap_or_default(),
            target,
            outcome
        );
        outcome
    }

    /// The suspend point: either a fresh identity or the reason there is none.
    async fn refresh_identity(&self) -> Result<Identity, SessionError> {
        self.session
            .fetch_identity()
            .await?
            .ok_or(SessionError::NotAuthenticated)
    }
}
