//! HTTP request builder and API surface for the storefront.

pub mod endpoints;
pub mod payload;
pub mod request;

pub use payload::User;
pub use request::{ApiResponse, Body, Method, Request};
