use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use super::route_table::RouteTable;
use crate::config::RoutesConfig;
use crate::error::NavigationError;
use crate::guard::{GuardRoutes, NavigationGuard};
use crate::models::{Location, NavigationOutcome};
use crate::session::Session;

/// Where a navigation settled and every location it passed through on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub location: Location,
    pub trail: Vec<Location>,
}

impl Navigation {
    /// Whether the user ended up somewhere other than where they asked to go.
    pub fn was_redirected(&self) -> bool {
        self.trail.len() > 1
    }
}

/// Minimal navigation engine: one guard invocation per attempt, redirects
/// followed until a location is allowed.
pub struct Navigator {
    table: RouteTable,
    guard: NavigationGuard,
    max_redirects: usize,
    current: Mutex<Option<Location>>,
}

impl Navigator {
    pub fn new(config: &RoutesConfig, session: Arc<Session>) -> Self {
        Navigator {
            table: RouteTable::new(&config.table),
            guard: NavigationGuard::new(session, GuardRoutes::from(config)),
            max_redirects: config.max_redirects,
            current: Mutex::new(None),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        self.guard.session()
    }

    pub fn login_path(&self) -> &str {
        &self.guard.routes().login
    }

    /// The last location a navigation settled on.
    pub fn current(&self) -> Option<Location> {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Navigates to `full_path`, following static and guard redirects.
    pub async fn navigate(&self, full_path: &str) -> Result<Navigation, NavigationError> {
        let from = self.current();
        let mut target = Location::parse(full_path);
        let mut trail = vec![target.clone()];

        loop {
            let next = match self.table.redirect_for(&target.path) {
                Some(redirect) => target.redirected_to(redirect),
                None => {
                    let route = self.table.resolve(&target.path);
                    match self.guard.check(&target, &route, from.as_ref()).await {
                        NavigationOutcome::Allow => break,
                        NavigationOutcome::Redirect(location) | NavigationOutcome::Deny(location) => {
                            location
                        }
                    }
                }
            };
            debug!("Redirecting {} -> {}", target, next);
            trail.push(next.clone());
            if trail.len() > self.max_redirects + 1 {
                return Err(NavigationError::TooManyRedirects {
                    limit: self.max_redirects,
                    trail: trail.iter().map(Location::full_path).collect(),
                });
            }
            target = next;
        }

        info!("Navigated to {}", target);
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = Some(target.clone());
        Ok(Navigation {
            location: target,
            trail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::scripted::ScriptedIdentityClient;
    use crate::config::RouteConfig;
    use crate::models::{Credential, Identity, Role};
    use crate::store::MemoryTokenStore;

    async fn navigator_with(token: Option<&str>, config: &RoutesConfig) -> Navigator {
        let client = ScriptedIdentityClient::new()
            .account(Identity::new(1, "ada", Role::Admin), "pw", "tok-ada")
            .account(Identity::new(2, "bo", Role::Staff), "pw", "tok-bo");
        let store = match token.and_then(Credential::parse) {
            Some(credential) => MemoryTokenStore::with_credential(credential),
            None => MemoryTokenStore::new(),
        };
        let session = Session::restore(Arc::new(store), Arc::new(client)).await;
        Navigator::new(config, Arc::new(session))
    }

    fn paths(navigation: &Navigation) -> Vec<String> {
        navigation.trail.iter().map(Location::full_path).collect()
    }

    #[tokio::test]
    async fn test_root_sends_anonymous_user_to_login() {
        let navigator = navigator_with(None, &RoutesConfig::default()).await;
        let navigation = navigator.navigate("/").await.unwrap();
        assert_eq!(navigation.location.full_path(), "/login?next=/dashboard");
        assert_eq!(
            paths(&navigation),
            vec!["/", "/dashboard", "/login?next=/dashboard"]
        );
        assert_eq!(navigator.current(), Some(navigation.location));
    }

    #[tokio::test]
    async fn test_staff_lands_on_dashboard_instead_of_audit_log() {
        let navigator = navigator_with(Some("tok-bo"), &RoutesConfig::default()).await;
        let navigation = navigator.navigate("/audit-logs").await.unwrap();
        assert_eq!(navigation.location.full_path(), "/dashboard");
        assert!(navigation.was_redirected());
    }

    #[tokio::test]
    async fn test_admin_reaches_audit_log() {
        let navigator = navigator_with(Some("tok-ada"), &RoutesConfig::default()).await;
        let navigation = navigator.navigate("/audit-logs").await.unwrap();
        assert_eq!(navigation.location.full_path(), "/audit-logs");
        assert!(!navigation.was_redirected());
    }

    #[tokio::test]
    async fn test_signed_in_login_visit_follows_next() {
        let navigator = navigator_with(Some("tok-bo"), &RoutesConfig::default()).await;
        let navigation = navigator.navigate("/login?next=/leads").await.unwrap();
        assert_eq!(navigation.location.full_path(), "/leads");
    }

    #[tokio::test]
    async fn test_signed_in_login_visit_with_trailing_slash_follows_next() {
        let navigator = navigator_with(Some("tok-bo"), &RoutesConfig::default()).await;
        let navigation = navigator.navigate("/login/?next=/leads").await.unwrap();
        assert_eq!(navigation.location.full_path(), "/leads");
    }

    #[tokio::test]
    async fn test_revoked_token_ends_at_login() {
        let navigator = navigator_with(Some("tok-gone"), &RoutesConfig::default()).await;
        let navigation = navigator.navigate("/clients").await.unwrap();
        assert_eq!(navigation.location.full_path(), "/login?next=/clients");
        assert!(!navigator.session().is_authenticated());
    }

    #[tokio::test]
    async fn test_redirect_loop_is_cut_off() {
        let config = RoutesConfig {
            max_redirects: 3,
            table: vec![
                RouteConfig {
                    path: "/a".to_string(),
                    public: false,
                    admin: false,
                    redirect: Some("/b".to_string()),
                },
                RouteConfig {
                    path: "/b".to_string(),
                    public: false,
                    admin: false,
                    redirect: Some("/a".to_string()),
                },
            ],
            ..RoutesConfig::default()
        };
        let navigator = navigator_with(None, &config).await;
        match navigator.navigate("/a").await {
            Err(NavigationError::TooManyRedirects { limit, trail }) => {
                assert_eq!(limit, 3);
                assert_eq!(trail, vec!["/a", "/b", "/a", "/b", "/a"]);
            }
            other => panic!("expected a redirect loop, got {:?}", other),
        }
        assert_eq!(navigator.current(), None);
    }
}
