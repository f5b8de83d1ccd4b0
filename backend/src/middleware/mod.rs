//! Request middleware: trace identifiers and canonical paths.

pub mod trace;
pub mod trailing_slash;

pub use trace::{TRACE_ID_HEADER, Trace};
pub use trailing_slash::StripTrailingSlash;
