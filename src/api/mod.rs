mod client;
mod error;
mod transport;

pub use client::ApiClient;
pub use error::ApiError;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};

#[cfg(test)]
pub(crate) mod fake;
