//! # qsense - Sidecar device SDK
//!
//! Collects sensor readings on embedded devices, packages them into signed
//! JSON events and publishes them to the Sidecar REST API. The crate is
//! `no_std` by default and allocates nothing: every buffer is a fixed-size
//! `heapless` collection.
//!
//! ## Building blocks
//!
//! - **[`time`]**: wall-clock time from a tick counter, seeded from network time
//!   and re-synced daily
//! - **[`hash`]**: MD5, SHA1 and HMAC-SHA1 plus the Sidecar request signature
//! - **[`network`]**: byte-stream connection traits, an HTTP/1.1 client and the
//!   Sidecar API client
//! - **[`event`]**: readings, tags and their JSON form
//!
//! ## Usage
//!
//! ```rust,no_run
//! # #[cfg(feature = "std")]
//! # fn main() {
//! use qsense::event::{Event, Location};
//! use qsense::network::application::sidecar::{
//!     Context, HttpTimeSource, Options, SidecarClient, TimeOptions,
//! };
//! use qsense::network::tcp::TcpNetwork;
//! use qsense::time::{DateTime, SystemTimer};
//!
//! let source = HttpTimeSource::new(TcpNetwork::default(), TimeOptions::default());
//! let clock = DateTime::new(SystemTimer::new(), source);
//!
//! let mut context = Context::new([0x02, 0x00, 0x00, 0x00, 0x00, 0x01]);
//! context.init_user_key("user-key", "user-secret");
//! context.init_event_defaults("weather-1", "climate", Location::new(51.5, -0.12));
//!
//! let mut sidecar = SidecarClient::new(TcpNetwork::default(), clock, context, Options::default());
//!
//! let mut event = Event::new();
//! event.add_reading(sidecar.reading("temp", 23.5).unwrap()).unwrap();
//! event.add_tag("outdoor").unwrap();
//! assert!(sidecar.publish(&event));
//! # }
//! # #[cfg(not(feature = "std"))]
//! # fn main() {}
//! ```
//!
//! ## Optional Features
//!
//! - `std`: TCP backend and `Instant` based tick counter (default: disabled)
//! - `defmt`: `defmt::Format` for error types

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Sensor events and their JSON serialization.
pub mod event;

/// Digests and request signing.
///
/// MD5 for body hashes, SHA1 and HMAC-SHA1 for request signatures.
pub mod hash;

/// Connection traits, transport backends and application protocols.
pub mod network;

/// Drift-corrected wall-clock time.
pub mod time;
