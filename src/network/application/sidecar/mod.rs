//! Client for the Sidecar REST API.
//!
//! [`SidecarClient`] signs each request with an access key pair and sends it
//! over the [`http`](super::http) transport:
//!
//! * provisioning calls (create, authenticate, delete users) are signed with
//!   the application's API key pair,
//! * event publishing is signed with the user's key pair.
//!
//! Signed requests carry `Date`, `Content-Type: application/json`,
//! `Content-MD5` (hex MD5 of the body), `Signature-Version: 1` and
//! `Authorization: SIDECAR <keyId>:<signature>`, where the signature is
//! the Base64 HMAC-SHA1 of method, path, date, body hash and version.
//!
//! Key pairs and event defaults live in a [`Context`]; the clock that
//! stamps requests is a [`DateTime`](crate::time::DateTime), usually fed
//! by an [`HttpTimeSource`].

/// The signed API client.
pub mod client;

/// Write-once credentials and event defaults.
pub mod context;

/// Network time over HTTP.
pub mod time_source;


pub use client::{Options, SidecarClient, UserResponse};
pub use context::{Context, Credentials};
pub use time_source::{HttpTimeSource, TimeOptions};
