//! HTTP capability used by virtual users.
//!
//! The engine only sees [`HttpCapability`]; connection handling, TLS and
//! pooling belong to the implementation.
mod capability;
mod client;


pub use capability::{HttpCapability, HttpResponse, RequestSpec};
pub use client::{DEFAULT_USER_AGENT, HttpClientConfig, ReqwestCapability};
pub use reqwest::Method;
