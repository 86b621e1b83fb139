use std::fmt;

use super::location::Location;

/// The guard's verdict for one navigation attempt.
///
/// There is no terminal deny: an under-privileged user is sent to the default
/// landing route, so every non-`Allow` verdict names a concrete location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Allow,
    /// Go somewhere else first (login screen, post-login destination).
    Redirect(Location),
    /// Authenticated but lacking the role; fall back to the default route.
    Deny(Location),
}

impl NavigationOutcome {
    /// Where the navigation engine should go next, if anywhere.
    pub fn location(&self) -> Option<&Location> {
        match self {
            NavigationOutcome::Allow => None,
            NavigationOutcome::Redirect(location) | NavigationOutcome::Deny(location) => {
                Some(location)
            }
        }
    }

    pub fn is_allow(&self) -> bool {
        matches!(self, NavigationOutcome::Allow)
    }
}

impl fmt::Display for NavigationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationOutcome::Allow => f.write_str("allow"),
            NavigationOutcome::Redirect(location) => write!(f, "redirect to {}", location),
            NavigationOutcome::Deny(location) => write!(f, "deny, fall back to {}", location),
        }
    }
}
