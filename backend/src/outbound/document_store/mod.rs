//! Object store adapter backed by the local filesystem.

mod local;
mod signing;

pub use local::{LocalDocumentStore, ObjectMeta};
pub use signing::{EXPIRES_PARAM, SIGNATURE_PARAM, UrlSigner};
