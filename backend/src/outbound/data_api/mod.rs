//! Adapter for the marketplace data API.

mod dto;
mod http_client;

pub use http_client::HttpDataApi;
