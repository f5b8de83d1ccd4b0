//! Inbound adapters translating external requests into domain calls.
//!
//! The admin pages are served over HTTP from [`http`].

pub mod http;
