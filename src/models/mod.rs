pub mod credential;
pub mod identity;
pub mod location;
pub mod outcome;
pub mod route;

pub use credential::Credential;
pub use identity::{Identity, Role};
pub use location::{same_route, Location, QueryValue};
pub use outcome::NavigationOutcome;
pub use route::RouteDescriptor;
