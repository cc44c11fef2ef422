//! In-memory network for exercising the HTTP and Sidecar clients.

#![allow(dead_code)]

use qsense::network::error::Error;
use qsense::network::{Close, Connect, Connection, Read, Write};
use qsense::time::{ServerTime, TimeSource, Timer};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Everything the clients did on the network.
#[derive(Debug, Default)]
pub struct Log {
    /// `host:port` of each connection attempt, refused ones included.
    pub remotes: Vec<String>,
    /// Bytes written on each accepted connection, in connection order.
    pub requests: Vec<Vec<u8>>,
    /// Number of connections closed.
    pub closes: usize,
}

impl Log {
    /// The bytes written on connection `index`, as text.
    pub fn request(&self, index: usize) -> String {
        String::from_utf8(self.requests[index].clone()).unwrap()
    }
}

/// Answers each connection with the next scripted response.
#[derive(Debug, Clone)]
pub struct MockNetwork {
    responses: Rc<RefCell<VecDeque<&'static [u8]>>>,
    pub log: Rc<RefCell<Log>>,
    /// Maximum bytes returned by one read.
    pub chunk: usize,
    /// Refuse every connection.
    pub refuse: bool,
}

impl MockNetwork {
    pub fn new(responses: &[&'static [u8]]) -> Self {
        Self {
            responses: Rc::new(RefCell::new(responses.iter().copied().collect())),
            log: Rc::new(RefCell::new(Log::default())),
            chunk: usize::MAX,
            refuse: false,
        }
    }

    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::new(&[])
        }
    }
}

impl Connect for MockNetwork {
    type Connection = MockConnection;
    type Error = Error;

    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error> {
        let mut log = self.log.borrow_mut();
        log.remotes.push(remote.to_string());
        if self.refuse {
            return Err(Error::ConnectionRefused);
        }
        let data = self.responses.borrow_mut().pop_front().unwrap_or(b"");
        log.requests.push(Vec::new());
        Ok(MockConnection {
            data,
            read_pos: 0,
            chunk: self.chunk,
            index: log.requests.len() - 1,
            log: Rc::clone(&self.log),
        })
    }
}

#[derive(Debug)]
pub struct MockConnection {
    data: &'static [u8],
    read_pos: usize,
    chunk: usize,
    index: usize,
    log: Rc<RefCell<Log>>,
}

impl Read for MockConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = &self.data[self.read_pos..];
        let len = remaining.len().min(buf.len()).min(self.chunk);
        buf[..len].copy_from_slice(&remaining[..len]);
        self.read_pos += len;
        Ok(len)
    }
}

impl Write for MockConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.log.borrow_mut().requests[self.index].extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Close for MockConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        self.log.borrow_mut().closes += 1;
        Ok(())
    }
}

impl Connection for MockConnection {}

/// A tick counter that only moves when told to.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer(pub Rc<std::cell::Cell<u32>>);

impl Timer for ManualTimer {
    fn millis(&mut self) -> u32 {
        self.0.get()
    }
}

/// A time source that always answers with the same text.
#[derive(Debug, Clone, Copy)]
pub struct FixedTime(pub &'static str);

impl TimeSource for FixedTime {
    fn server_time(&mut self) -> ServerTime {
        ServerTime::try_from(self.0).unwrap()
    }
}
