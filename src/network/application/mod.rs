//! # Application layer protocols
//!
//! Protocols built on the byte-stream traits in [`crate::network`]. Both
//! work with any [`Connect`](crate::network::Connect) implementation and
//! use fixed-size buffers only.
//!
//! - **[`http`]**: minimal HTTP/1.1 client with a line-oriented response reader
//! - **[`sidecar`]**: signed requests to the Sidecar provisioning and event APIs

/// HTTP client implementation.
///
/// One request per connection, `GET`, `POST` and `DELETE`, custom headers
/// and percent-encoded query parameters.
pub mod http;

/// Sidecar API client built on [`http`].
pub mod sidecar;
