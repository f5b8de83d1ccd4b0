//! Admin frontend for a public-sector digital marketplace.
//!
//! Staff sign in, look up users, download supplier reports, replace service
//! documents and publish framework communications. Pages are served as JSON
//! view models by the handlers in [`inbound::http`].

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(feature = "test-support")]
pub mod test_support;

pub use middleware::Trace;
