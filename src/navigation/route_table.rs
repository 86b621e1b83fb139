use tracing::debug;

use crate::config::RouteConfig;
use crate::models::{same_route, RouteDescriptor};

/// The static routing configuration, matched on exact paths.
/// A trailing slash is ignored, as the browser router does.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteConfig>,
}

impl RouteTable {
    pub fn new(routes: &[RouteConfig]) -> Self {
        debug!("Building route table with {} routes", routes.len());
        RouteTable {
            routes: routes.to_vec(),
        }
    }

    fn find(&self, path: &str) -> Option<&RouteConfig> {
        self.routes
            .iter()
            .find(|route| same_route(&route.path, path))
    }

    /// The descriptor for `path`. Unknown paths carry no flags, so they
    /// still require a logged-in user.
    pub fn resolve(&self, path: &str) -> RouteDescriptor {
        match self.find(path) {
            Some(route) => RouteDescriptor::from(route),
            None => RouteDescriptor::protected(path),
        }
    }

    /// Static redirect configured for `path`, applied before any guard runs.
    pub fn redirect_for(&self, path: &str) -> Option<&str> {
        self.find(path).and_then(|route| route.redirect.as_deref())
    }
}
