//! A network abstraction layer for embedded systems
//!
//! The traits here are the whole capability surface the SDK needs from a
//! socket backend: open a stream, read bytes, write bytes, close. Ethernet,
//! WiFi and desktop sockets all plug in by implementing [`Connect`] once and
//! handing the value to the HTTP client, instead of one client type per
//! backend.
//!

#![deny(unsafe_code)]

/// Common error types for network operations
pub mod error;

/// Application layer protocols built on the traits below
pub mod application;

/// TCP backend for hosts with `std`
#[cfg(feature = "std")]
pub mod tcp;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{Close, Connect, Connection, Read, Write};
}

/// Byte input of a connection.
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection.
    ///
    /// Blocks until at least one byte is available. `Ok(0)` means the peer
    /// closed the stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Byte output of a connection.
pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Release of a connection.
pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous connection
pub trait Connection: Read + Write + Close {}

/// A synchronous connector (client)
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Open a connection to `remote`, given as `host:port`.
    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error>;
}

impl<N: Connect> Connect for &mut N {
    type Connection = N::Connection;
    type Error = N::Error;

    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error> {
        (**self).connect(remote)
    }
}
