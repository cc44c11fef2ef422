use crate::network::Connect;
use crate::network::application::http::{Client, Request};
use crate::time::{ServerTime, TimeSource};
use serde::Deserialize;

/// Where network time is fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOptions<'a> {
    /// Host name of the time service.
    pub host: &'a str,
    /// TCP port of the time service.
    pub port: u16,
    /// Path answering with the current UTC time.
    pub path: &'a str,
    /// `User-Agent` sent with the request.
    pub user_agent: &'a str,
}

impl Default for TimeOptions<'_> {
    fn default() -> Self {
        Self {
            host: "www.timeapi.org",
            port: 80,
            path: "/utc/now",
            user_agent: "QSense",
        }
    }
}

#[derive(Deserialize)]
struct UtcTime<'a> {
    #[serde(rename = "utcTime")]
    utc_time: &'a str,
}

/// [`TimeSource`] that asks an HTTP time service for the current time.
#[derive(Debug)]
pub struct HttpTimeSource<'a, N: Connect> {
    network: N,
    options: TimeOptions<'a>,
}

impl<'a, N: Connect> HttpTimeSource<'a, N> {
    /// Creates a time source that connects through `network`.
    pub fn new(network: N, options: TimeOptions<'a>) -> Self {
        Self { network, options }
    }
}

impl<N: Connect> TimeSource for HttpTimeSource<'_, N> {
    fn server_time(&mut self) -> ServerTime {
        let mut client = Client::new(&mut self.network);
        if !client.connect(self.options.host, self.options.port) {
            log::warn!("connection to time server {} failed", self.options.host);
            return ServerTime::new();
        }

        let mut request = Request::new(self.options.path);
        if request.set_header("User-Agent", self.options.user_agent).is_err() {
            return ServerTime::new();
        }

        match client.get(&request) {
            Ok(200) => {}
            Ok(code) => {
                log::warn!("time server returned HTTP response code: {}", code);
                client.drain();
                return ServerTime::new();
            }
            Err(e) => {
                log::warn!("time request failed: {:?}", e);
                return ServerTime::new();
            }
        }

        let body = client.read_body();
        let time = parse_body(&body);
        log::debug!("time server returned {:?}", time.as_str());
        time
    }
}

/// Extracts the timestamp from a time service body: either the bare
/// ISO-8601 text or a JSON object with a `utcTime` field.
///
/// ```rust
/// use qsense::network::application::sidecar::time_source::parse_body;
///
/// assert_eq!(parse_body(" 2024-01-01T00:00:00Z ").as_str(), "2024-01-01T00:00:00Z");
/// assert_eq!(parse_body(r#"{"utcTime":"2024-01-01T00:00:00Z"}"#).as_str(), "2024-01-01T00:00:00Z");
/// ```
pub fn parse_body(body: &str) -> ServerTime {
    let body = body.trim();
    let text = if body.starts_with('{') {
        match serde_json_core::from_str::<UtcTime<'_>>(body) {
            Ok((time, _)) => time.utc_time,
            Err(e) => {
                log::warn!("unexpected time response {:?}: {:?}", body, e);
                ""
            }
        }
    } else {
        body
    };
    ServerTime::try_from(text).unwrap_or_default()
}
