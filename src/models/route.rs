use crate::config::RouteConfig;

/// Static metadata about a navigable path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: String,
    pub public: bool,
    pub admin_required: bool,
}

impl RouteDescriptor {
    /// A route with no access flags; it still requires a logged-in user.
    pub fn protected(path: impl Into<String>) -> Self {
        RouteDescriptor {
            path: path.into(),
            public: false,
            admin_required: false,
        }
    }

    pub fn public(path: impl Into<String>) -> Self {
        RouteDescriptor {
            public: true,
            ..Self::protected(path)
        }
    }

    pub fn admin(path: impl Into<String>) -> Self {
        RouteDescriptor {
            admin_required: true,
            ..Self::protected(path)
        }
    }
}

impl From<&RouteConfig> for RouteDescriptor {
    fn from(config: &RouteConfig) -> Self {
        RouteDescriptor {
            path: config.path.clone(),
            public: config.public,
            admin_required: config.admin,
        }
    }
}
