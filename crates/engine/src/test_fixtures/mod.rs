//! Shared test helpers.

pub mod http_stub;
