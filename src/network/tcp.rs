//! [`Connect`] backend over `std::net::TcpStream`.
//!
//! This is the desktop-portable variant of the socket layer. Embedded
//! targets provide their own [`Connect`] implementation around the
//! Ethernet or WiFi driver instead.

use super::error::Error;
use super::{Close, Connect, Connection, Read, Write};
use std::io::{ErrorKind, Read as StdRead, Write as StdWrite};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

/// Opens [`TcpConnection`]s.
#[derive(Debug, Clone, Copy)]
pub struct TcpNetwork {
    /// Read timeout applied to every opened stream. `None` blocks forever.
    pub read_timeout: Option<Duration>,
}

impl Default for TcpNetwork {
    fn default() -> Self {
        Self {
            read_timeout: Some(Duration::from_secs(5)),
        }
    }
}

impl Connect for TcpNetwork {
    type Connection = TcpConnection;
    type Error = Error;

    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error> {
        let stream = TcpStream::connect(remote).map_err(|e| match e.kind() {
            ErrorKind::InvalidInput => Error::InvalidAddress,
            ErrorKind::TimedOut => Error::Timeout,
            _ => Error::ConnectionRefused,
        })?;
        stream
            .set_read_timeout(self.read_timeout)
            .map_err(|_| Error::ConnectionRefused)?;
        Ok(TcpConnection { stream })
    }
}

/// A connected TCP stream.
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
}

impl Read for TcpConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.stream.read(buf).map_err(|e| match e.kind() {
            ErrorKind::WouldBlock | ErrorKind::TimedOut => Error::Timeout,
            _ => Error::ReadError,
        })
    }
}

impl Write for TcpConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.stream.write(buf).map_err(|_| Error::WriteError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.stream.flush().map_err(|_| Error::WriteError)
    }
}

impl Close for TcpConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        match self.stream.shutdown(Shutdown::Both) {
            // The peer may already have torn the stream down after `Connection: close`.
            Err(e) if e.kind() != ErrorKind::NotConnected => Err(Error::ConnectionClosed),
            _ => Ok(()),
        }
    }
}

impl Connection for TcpConnection {}
