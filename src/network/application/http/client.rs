use super::request::{Headers, Name, Request, Value};
use crate::network::error::Error;
use crate::network::{Close, Connect, Read, Write};
use core::fmt::Write as _;
use heapless::{String, Vec};

/// Port used by [`Client::connect_default`].
pub const DEFAULT_PORT: u16 = 80;
/// Maximum length of a server host name.
pub const HOST_LEN: usize = 64;
/// Maximum length of one response line. Longer lines are truncated.
pub const LINE_LEN: usize = 512;
/// Capacity of a response body returned by [`Client::read_body`].
pub const BODY_LEN: usize = 1024;

const READ_BUFFER_LEN: usize = 256;
const REQUEST_LINE_LEN: usize = 512;

/// A single response line without its line terminator.
pub type Line = String<LINE_LEN>;
/// A response body.
pub type Body = String<BODY_LEN>;

/// HTTP request methods supported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
}

impl Method {
    /// The method name as sent on the request line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

/// A fully read response.
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code from the status line, or 0 if none was received.
    pub status_code: u16,
    /// Response headers. A repeated name keeps the last value.
    pub headers: Headers,
    /// Body lines concatenated without terminators.
    pub body: Body,
}

/// A blocking HTTP/1.1 client speaking one request per connection.
///
/// The client owns a network used to open connections and a small read
/// buffer. After sending a request only the status line is consumed; the
/// caller then pulls headers and body with [`Client::read_headers`] and
/// [`Client::read_body`], or line by line with [`Client::read_line`].
pub struct Client<N: Connect> {
    network: N,
    connection: Option<N::Connection>,
    server: String<HOST_LEN>,
    buffer: [u8; READ_BUFFER_LEN],
    pos: usize,
    len: usize,
    headers_read: bool,
}

impl<N: Connect> core::fmt::Debug for Client<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Client")
            .field("server", &self.server)
            .field("open", &self.connection.is_some())
            .field("buffered", &(self.len - self.pos))
            .finish_non_exhaustive()
    }
}

impl<N: Connect> Client<N> {
    /// Creates a disconnected client.
    pub fn new(network: N) -> Self {
        Self {
            network,
            connection: None,
            server: String::new(),
            buffer: [0; READ_BUFFER_LEN],
            pos: 0,
            len: 0,
            headers_read: false,
        }
    }

    /// Opens a connection to `server:port`, closing any previous one.
    ///
    /// Returns `false` if the host name is too long or the network refuses
    /// the connection.
    pub fn connect(&mut self, server: &str, port: u16) -> bool {
        self.close();

        let Ok(host) = String::try_from(server) else {
            log::warn!("server name {} exceeds {} bytes", server, HOST_LEN);
            return false;
        };
        let mut remote: String<{ HOST_LEN + 6 }> = String::new();
        if write!(remote, "{}:{}", server, port).is_err() {
            return false;
        }

        match self.network.connect(&remote) {
            Ok(connection) => {
                log::debug!("connected to {}", remote.as_str());
                self.server = host;
                self.connection = Some(connection);
                true
            }
            Err(e) => {
                log::warn!("connection to {} failed: {:?}", remote.as_str(), e);
                false
            }
        }
    }

    /// Opens a connection to `server` on [`DEFAULT_PORT`].
    pub fn connect_default(&mut self, server: &str) -> bool {
        self.connect(server, DEFAULT_PORT)
    }

    /// True while the connection is open or unread response bytes remain.
    pub fn connected(&self) -> bool {
        self.pos < self.len || self.connection.is_some()
    }

    /// Sends a `GET` and returns the response status code.
    pub fn get(&mut self, request: &Request<'_>) -> Result<u16, Error> {
        self.send(Method::Get, request)
    }

    /// Sends a `POST` and returns the response status code.
    pub fn post(&mut self, request: &Request<'_>) -> Result<u16, Error> {
        self.send(Method::Post, request)
    }

    /// Sends a `DELETE` and returns the response status code.
    pub fn remove(&mut self, request: &Request<'_>) -> Result<u16, Error> {
        self.send(Method::Delete, request)
    }

    /// Sends a request and reads the whole response.
    pub fn request(&mut self, method: Method, request: &Request<'_>) -> Result<Response, Error> {
        let status_code = self.send(method, request)?;
        let headers = self.read_headers();
        let body = self.read_body();
        Ok(Response {
            status_code,
            headers,
            body,
        })
    }

    /// Writes `request` and consumes the status line.
    ///
    /// Returns 0 when the server closed the connection without answering or
    /// the status line carries no numeric code.
    pub fn send(&mut self, method: Method, request: &Request<'_>) -> Result<u16, Error> {
        if self.connection.is_none() {
            return Err(Error::NotOpen);
        }
        self.headers_read = false;

        let mut line: String<REQUEST_LINE_LEN> = String::new();
        write!(line, "{} {}", method.as_str(), request.uri()).map_err(|_| Error::BufferOverflow)?;
        if request.has_parameters() {
            line.push('?').map_err(|_| Error::BufferOverflow)?;
            request
                .write_parameters(&mut line)
                .map_err(|_| Error::BufferOverflow)?;
        }
        line.push_str(" HTTP/1.1")
            .map_err(|_| Error::BufferOverflow)?;
        log::info!("{}", line.as_str());

        self.println(line.as_bytes())?;
        self.print(b"Host: ")?;
        let server = self.server.clone();
        self.println(server.as_bytes())?;

        for (name, value) in request.headers() {
            // Framing headers are owned by the client.
            if is_framing_header(name) {
                continue;
            }
            self.print(name.as_bytes())?;
            self.print(b": ")?;
            self.println(value.as_bytes())?;
        }

        let body = request.body();
        if !body.is_empty() {
            let mut length: String<20> = String::new();
            write!(length, "{}", body.len()).map_err(|_| Error::BufferOverflow)?;
            self.print(b"Content-Length: ")?;
            self.println(length.as_bytes())?;
        }
        self.println(b"Connection: close")?;
        self.println(b"")?;
        if !body.is_empty() {
            self.print(body.as_bytes())?;
        }
        self.flush()?;

        let status_line = self.read_line();
        let code = status_code(&status_line);
        log::debug!("status line {:?} -> {}", status_line.as_str(), code);
        Ok(code)
    }

    /// Reads one line, stripping `\r` and stopping at `\n`.
    ///
    /// Returns an empty line at end of stream. Bytes beyond [`LINE_LEN`]
    /// are dropped.
    pub fn read_line(&mut self) -> Line {
        let mut raw: Vec<u8, LINE_LEN> = Vec::new();
        while let Some(byte) = self.read_byte() {
            match byte {
                b'\n' => break,
                b'\r' => {}
                _ => {
                    let _ = raw.push(byte);
                }
            }
        }
        utf8_prefix(&raw)
    }

    /// Reads header lines up to the blank line that ends them.
    pub fn read_headers(&mut self) -> Headers {
        let mut headers = Headers::new();
        while self.connected() {
            let line = self.read_line();
            if line.is_empty() {
                break;
            }
            let Some((name, value)) = line.split_once(':') else {
                log::debug!("ignoring header line {:?}", line.as_str());
                continue;
            };
            let value = value.strip_prefix(' ').unwrap_or(value);
            match (Name::try_from(name), Value::try_from(value)) {
                (Ok(name), Ok(value)) => {
                    if headers.insert(name, value).is_err() {
                        log::debug!("header map full, dropping {:?}", line.as_str());
                    }
                }
                _ => log::debug!("header too long, dropping {:?}", line.as_str()),
            }
        }
        self.headers_read = true;
        headers
    }

    /// Reads the body as the concatenation of lines up to the first empty
    /// line or end of stream.
    ///
    /// Any headers not yet consumed are skipped first.
    pub fn read_body(&mut self) -> Body {
        if !self.headers_read {
            self.read_headers();
        }

        let mut body = Body::new();
        while self.connected() {
            let line = self.read_line();
            if line.is_empty() {
                break;
            }
            if body.push_str(&line).is_err() {
                log::warn!("response body exceeds {} bytes, discarding rest", BODY_LEN);
                self.drain();
                break;
            }
        }
        body
    }

    /// Reads and logs every remaining response line. Returns the number of
    /// lines discarded.
    pub fn drain(&mut self) -> usize {
        let mut count = 0;
        while self.connected() {
            let line = self.read_line();
            if !line.is_empty() {
                log::debug!("< {}", line.as_str());
            }
            count += 1;
        }
        count
    }

    /// Closes the connection and discards buffered response bytes.
    pub fn close(&mut self) {
        self.disconnect();
        self.pos = 0;
        self.len = 0;
        self.headers_read = false;
    }

    fn print(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let connection = self.connection.as_mut().ok_or(Error::NotOpen)?;
        let mut written = 0;
        while written < bytes.len() {
            match connection.write(&bytes[written..]) {
                Ok(0) => return Err(Error::WriteError),
                Ok(n) => written += n,
                Err(e) => {
                    log::debug!("write failed: {:?}", e);
                    return Err(Error::WriteError);
                }
            }
        }
        Ok(())
    }

    fn println(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.print(bytes)?;
        self.print(b"\r\n")
    }

    fn flush(&mut self) -> Result<(), Error> {
        let connection = self.connection.as_mut().ok_or(Error::NotOpen)?;
        connection.flush().map_err(|_| Error::WriteError)
    }

    fn read_byte(&mut self) -> Option<u8> {
        if self.pos == self.len && !self.fill() {
            return None;
        }
        let byte = self.buffer[self.pos];
        self.pos += 1;
        Some(byte)
    }

    fn fill(&mut self) -> bool {
        let Some(connection) = self.connection.as_mut() else {
            return false;
        };
        match connection.read(&mut self.buffer) {
            Ok(0) => {
                self.disconnect();
                false
            }
            Ok(n) => {
                self.pos = 0;
                self.len = n;
                true
            }
            Err(e) => {
                log::debug!("read failed: {:?}", e);
                self.disconnect();
                false
            }
        }
    }

    fn disconnect(&mut self) {
        if let Some(connection) = self.connection.take() {
            if let Err(e) = connection.close() {
                log::debug!("close failed: {:?}", e);
            }
        }
    }
}

impl<N: Connect> Drop for Client<N> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Extracts the status code from an HTTP status line.
///
/// The code is read from bytes 9 to 11 (`HTTP/1.1 200 OK`). Returns 0 for
/// lines that do not start with `HTTP/`, are too short or have a
/// non-numeric code.
///
/// ```rust
/// use qsense::network::application::http::client::status_code;
///
/// assert_eq!(status_code("HTTP/1.1 202 Accepted"), 202);
/// assert_eq!(status_code("garbage"), 0);
/// ```
pub fn status_code(line: &str) -> u16 {
    let bytes = line.as_bytes();
    if bytes.len() < 12 || !line.starts_with("HTTP/") {
        return 0;
    }
    let code = &bytes[9..12];
    if !code.iter().all(u8::is_ascii_digit) {
        return 0;
    }
    code.iter()
        .fold(0, |acc, digit| acc * 10 + u16::from(digit - b'0'))
}

fn is_framing_header(name: &str) -> bool {
    ["Host", "Content-Length", "Connection"]
        .iter()
        .any(|framing| name.eq_ignore_ascii_case(framing))
}

fn utf8_prefix<const N: usize>(bytes: &[u8]) -> String<N> {
    let text = match core::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
    };
    String::try_from(text).unwrap_or_default()
}
