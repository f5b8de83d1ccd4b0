//! Outbound adapters implementing the driven ports.
//!
//! - **data_api**: reqwest JSON client for the marketplace data API
//! - **document_store**: `cap_std` directory per bucket with signed links
//!
//! Adapters translate between domain types and wire or disk formats. They
//! contain no business logic.

pub mod data_api;
pub mod document_store;
