//! Minimal HTTP/1.1 client for embedded systems.
//!
//! One request per connection, fixed-size buffers, and a line-oriented
//! response reader: after [`Client::get`], [`Client::post`] or
//! [`Client::remove`] return the status code, the caller decides whether to
//! read headers and body or drop the connection.
//!
//! ```rust
//! use qsense::network::application::http::{Client, Request};
//! use qsense::network::{Close, Connect, Connection, Read, Write};
//!
//! struct Canned(&'static [u8]);
//! impl Read for Canned {
//!     type Error = ();
//!     fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
//!         let n = self.0.len().min(buf.len());
//!         buf[..n].copy_from_slice(&self.0[..n]);
//!         self.0 = &self.0[n..];
//!         Ok(n)
//!     }
//! }
//! impl Write for Canned {
//!     type Error = ();
//!     fn write(&mut self, buf: &[u8]) -> Result<usize, ()> { Ok(buf.len()) }
//!     fn flush(&mut self) -> Result<(), ()> { Ok(()) }
//! }
//! impl Close for Canned {
//!     type Error = ();
//!     fn close(self) -> Result<(), ()> { Ok(()) }
//! }
//! impl Connection for Canned {}
//!
//! struct Network;
//! impl Connect for Network {
//!     type Connection = Canned;
//!     type Error = ();
//!     fn connect(&mut self, _remote: &str) -> Result<Canned, ()> {
//!         Ok(Canned(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nhello\r\n"))
//!     }
//! }
//!
//! let mut client = Client::new(Network);
//! assert!(client.connect("example.com", 80));
//! assert_eq!(client.get(&Request::new("/")), Ok(200));
//! assert_eq!(client.read_body().as_str(), "hello");
//! ```

/// The blocking client and response reader.
pub mod client;

/// Request model and query-string encoding.
pub mod request;

#[cfg(test)]
mod tests;

pub use client::{Client, Method, Response, status_code};
pub use request::{Headers, Request, encode};
