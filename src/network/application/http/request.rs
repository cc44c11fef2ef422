use crate::network::error::Error;
use core::fmt::{self, Write};
use heapless::{FnvIndexMap, String};

/// Maximum length of a header or parameter name.
pub const NAME_LEN: usize = 32;
/// Maximum length of a header or parameter value.
pub const VALUE_LEN: usize = 128;
/// Maximum number of headers per request or response. Must be a power of two.
pub const MAX_HEADERS: usize = 16;
/// Maximum number of query parameters. Must be a power of two.
pub const MAX_PARAMETERS: usize = 8;

/// A header or parameter name.
pub type Name = String<NAME_LEN>;
/// A header or parameter value.
pub type Value = String<VALUE_LEN>;
/// Header map. Setting an existing name replaces its value.
pub type Headers = FnvIndexMap<Name, Value, MAX_HEADERS>;
/// Query parameter map. Setting an existing name replaces its value.
pub type Parameters = FnvIndexMap<Name, Value, MAX_PARAMETERS>;

/// An HTTP request for one server resource.
///
/// ```rust
/// use qsense::network::application::http::Request;
///
/// let mut request = Request::new("/search");
/// request.set_parameter("q", "a b").unwrap();
/// request.set_header("Accept", "text/plain").unwrap();
/// assert_eq!(request.parameters::<32>().unwrap().as_str(), "q=a%20b");
/// ```
#[derive(Debug, Clone)]
pub struct Request<'a> {
    uri: &'a str,
    body: &'a str,
    parameters: Parameters,
    headers: Headers,
}

impl<'a> Request<'a> {
    /// Creates a request for `uri` with no body, parameters or headers.
    pub fn new(uri: &'a str) -> Self {
        Self {
            uri,
            body: "",
            parameters: Parameters::new(),
            headers: Headers::new(),
        }
    }

    /// The URI path this request was created for.
    pub fn uri(&self) -> &str {
        self.uri
    }

    /// The request body. Empty for requests without one.
    pub fn body(&self) -> &str {
        self.body
    }

    /// Sets the body sent with the request.
    pub fn set_body(&mut self, body: &'a str) -> &mut Self {
        self.body = body;
        self
    }

    /// Sets a query parameter, replacing any previous value for `key`.
    pub fn set_parameter(&mut self, key: &str, value: &str) -> Result<&mut Self, Error> {
        insert(&mut self.parameters, key, value)?;
        Ok(self)
    }

    /// Sets a header, replacing any previous value for `key`.
    pub fn set_header(&mut self, key: &str, value: &str) -> Result<&mut Self, Error> {
        insert(&mut self.headers, key, value)?;
        Ok(self)
    }

    /// The request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Whether any query parameters are set.
    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// The query string without the leading `?`.
    pub fn parameters<const N: usize>(&self) -> Result<String<N>, Error> {
        let mut out = String::new();
        self.write_parameters(&mut out)
            .map_err(|_| Error::BufferOverflow)?;
        Ok(out)
    }

    pub(crate) fn write_parameters(&self, out: &mut impl Write) -> fmt::Result {
        for (i, (key, value)) in self.parameters.iter().enumerate() {
            if i > 0 {
                out.write_char('&')?;
            }
            encode_into(key, out)?;
            out.write_char('=')?;
            encode_into(value, out)?;
        }
        Ok(())
    }
}

fn insert<const N: usize>(
    map: &mut FnvIndexMap<Name, Value, N>,
    key: &str,
    value: &str,
) -> Result<(), Error> {
    let key = Name::try_from(key).map_err(|_| Error::BufferOverflow)?;
    let value = Value::try_from(value).map_err(|_| Error::BufferOverflow)?;
    map.insert(key, value).map_err(|_| Error::BufferOverflow)?;
    Ok(())
}

/// Percent-encodes `value` for use in a query string.
///
/// ASCII alphanumerics and `-_.~` pass through; every other byte becomes
/// `%XX` with uppercase hex.
///
/// ```rust
/// use qsense::network::application::http::request::encode;
///
/// assert_eq!(encode::<16>("a b").unwrap().as_str(), "a%20b");
/// assert_eq!(encode::<16>("abc-._~").unwrap().as_str(), "abc-._~");
/// ```
pub fn encode<const N: usize>(value: &str) -> Result<String<N>, Error> {
    let mut out = String::new();
    encode_into(value, &mut out).map_err(|_| Error::BufferOverflow)?;
    Ok(out)
}

fn encode_into(value: &str, out: &mut impl Write) -> fmt::Result {
    for &byte in value.as_bytes() {
        if is_unreserved(byte) {
            out.write_char(byte as char)?;
        } else {
            write!(out, "%{:02X}", byte)?;
        }
    }
    Ok(())
}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~')
}
