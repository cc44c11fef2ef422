use super::context::{Context, Credentials, KEY_ID_LEN, SECRET_LEN};
use crate::event::{self, Envelope, Event, Reading};
use crate::hash::md5;
use crate::hash::signature::{self, SIGNATURE_LEN, SIGNATURE_VERSION};
use crate::network::Connect;
use crate::network::application::http::client::{Body, Client, Method};
use crate::network::application::http::Request;
use crate::network::error::Error;
use crate::time::{Date, DateTime, TimeSource, Timer, Timestamp};
use core::fmt::Write;
use heapless::String;
use serde::Serialize;

/// Sidecar API host.
pub const DEFAULT_HOST: &str = "api.sidecar.io";
/// Event publishing endpoint.
pub const EVENT_PATH: &str = "/rest/v1/event";
/// User creation and deletion endpoint.
pub const USER_PATH: &str = "/rest/v1/provision/application/user/";
/// Access key creation or retrieval endpoint.
pub const ACCESS_KEY_PATH: &str = "/rest/v1/provision/application/accesskey/";
/// User authentication endpoint.
pub const AUTH_PATH: &str = "/rest/v1/provision/application/auth/";

/// Status returned by the provisioning endpoints on success.
pub const STATUS_OK: u16 = 200;
/// Status returned when an event is accepted.
pub const STATUS_ACCEPTED: u16 = 202;
/// Status returned when a user is deleted.
pub const STATUS_NO_CONTENT: u16 = 204;

const PROVISION_BODY_LEN: usize = 256;
const AUTHORIZATION_LEN: usize = KEY_ID_LEN + SIGNATURE_LEN + 9;

/// Where the Sidecar API is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options<'a> {
    /// Host name of the API server.
    pub host: &'a str,
    /// TCP port of the API server.
    pub port: u16,
}

impl Default for Options<'_> {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: 80,
        }
    }
}

/// The result of a provisioning request.
///
/// `key_id` and `secret` are empty when the server did not return a key
/// pair, for example because the user name is taken.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserResponse {
    /// HTTP status code, 0 if no response was received.
    pub response_code: u16,
    /// The returned access key id.
    pub key_id: String<KEY_ID_LEN>,
    /// The returned access key secret.
    pub secret: String<SECRET_LEN>,
}

impl UserResponse {
    fn failed(response_code: u16) -> Self {
        Self {
            response_code,
            ..Self::default()
        }
    }

    /// Parses a provisioning response body.
    ///
    /// ```rust
    /// use qsense::network::application::sidecar::UserResponse;
    ///
    /// let response = UserResponse::parse(200, r#"{"keyId": "k1", "secret":"s1"}"#);
    /// assert_eq!(response.key_id.as_str(), "k1");
    /// assert_eq!(response.secret.as_str(), "s1");
    /// ```
    pub fn parse(response_code: u16, body: &str) -> Self {
        Self {
            response_code,
            key_id: string_field(body, "keyId"),
            secret: string_field(body, "secret"),
        }
    }
}

#[derive(Serialize)]
struct Account<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Copy)]
enum Signer {
    Api,
    User,
}

/// Client for the Sidecar provisioning and event APIs.
///
/// Every call opens a fresh connection, signs the request with the
/// appropriate key pair from the [`Context`] and closes the connection
/// before returning.
#[derive(Debug)]
pub struct SidecarClient<'a, N: Connect, T: Timer, S: TimeSource> {
    network: N,
    clock: DateTime<T, S>,
    context: Context,
    options: Options<'a>,
}

impl<'a, N: Connect, T: Timer, S: TimeSource> SidecarClient<'a, N, T, S> {
    /// Creates a client.
    pub fn new(network: N, clock: DateTime<T, S>, context: Context, options: Options<'a>) -> Self {
        Self {
            network,
            clock,
            context,
            options,
        }
    }

    /// Creates a new user account. Needed once per application user.
    pub fn create_user(&mut self, username: &str, password: &str) -> UserResponse {
        self.provision(Method::Post, USER_PATH, username, password)
    }

    /// Creates the user if needed and returns an access key pair.
    pub fn create_or_retrieve_access_keys(&mut self, username: &str, password: &str) -> UserResponse {
        self.provision(Method::Post, ACCESS_KEY_PATH, username, password)
    }

    /// Authenticates an existing user and returns its access key pair.
    pub fn authenticate(&mut self, username: &str, password: &str) -> UserResponse {
        self.provision(Method::Post, AUTH_PATH, username, password)
    }

    /// Deletes a user. Returns the status code; [`STATUS_NO_CONTENT`]
    /// means success.
    pub fn delete_user(&mut self, username: &str, password: &str) -> u16 {
        let Some(body) = account_body(username, password) else {
            return 0;
        };
        self.exchange(Method::Delete, USER_PATH, &body, Signer::Api, STATUS_NO_CONTENT)
            .0
    }

    /// Publishes an event. Returns `true` if the server accepted it.
    pub fn publish(&mut self, event: &Event) -> bool {
        if self.context.user_key().is_none() {
            log::warn!("user key not initialised, event not published");
            return false;
        }

        let millis = self.clock.current_time_millis();
        let ts = crate::time::iso8601::format(millis);
        let id = self.context.next_event_id(millis);
        let envelope = Envelope {
            id: &id,
            device_id: self.context.device_id(),
            ts: &ts,
            stream: self.context.stream(),
            location: self.context.location(),
        };
        let json = match event.to_json(&envelope) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("event not serialised: {:?}", e);
                return false;
            }
        };

        let (code, _) = self.exchange(Method::Post, EVENT_PATH, &json, Signer::User, STATUS_ACCEPTED);
        code == STATUS_ACCEPTED
    }

    /// Creates a reading of `value` stamped with the current time.
    pub fn reading(&mut self, key: &str, value: f32) -> Result<Reading, event::Error> {
        let ts = self.clock.current_time();
        Reading::new(key, value, &ts)
    }

    /// The current time as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
    pub fn current_time(&mut self) -> Timestamp {
        self.clock.current_time()
    }

    /// The current date as `YYYY-MM-DD`.
    pub fn date(&mut self) -> Date {
        self.clock.date()
    }

    /// Milliseconds since the UNIX epoch.
    pub fn current_time_millis(&mut self) -> i64 {
        self.clock.current_time_millis()
    }

    /// The device context.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Mutable access to the device context, for initialising keys.
    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    /// Mutable access to the clock.
    pub fn clock_mut(&mut self) -> &mut DateTime<T, S> {
        &mut self.clock
    }

    /// Mutable access to the network.
    pub fn network_mut(&mut self) -> &mut N {
        &mut self.network
    }

    fn provision(&mut self, method: Method, path: &str, username: &str, password: &str) -> UserResponse {
        let Some(body) = account_body(username, password) else {
            return UserResponse::failed(0);
        };
        let (code, response) = self.exchange(method, path, &body, Signer::Api, STATUS_OK);
        if code == STATUS_OK {
            UserResponse::parse(code, &response)
        } else {
            UserResponse::failed(code)
        }
    }

    /// Sends one signed request. Returns the status code, and the response
    /// body when the status matched `expected`.
    fn exchange(
        &mut self,
        method: Method,
        path: &str,
        body: &str,
        signer: Signer,
        expected: u16,
    ) -> (u16, Body) {
        let Self {
            network,
            clock,
            context,
            options,
        } = self;

        let credentials = match signer {
            Signer::Api => context.api_key(),
            Signer::User => context.user_key(),
        };
        let Some(credentials) = credentials else {
            log::warn!("{:?} key not initialised, {} {} not sent", signer, method.as_str(), path);
            return (0, Body::new());
        };

        let date = clock.current_time();
        let mut request = Request::new(path);
        request.set_body(body);
        if let Err(e) = sign(&mut request, credentials, method, &date) {
            log::warn!("request headers do not fit: {:?}", e);
            return (0, Body::new());
        }

        let mut client = Client::new(network);
        if !client.connect(options.host, options.port) {
            log::warn!("connection to {} failed", options.host);
            return (0, Body::new());
        }
        log::info!("connected to {}", options.host);

        let code = match client.send(method, &request) {
            Ok(code) => code,
            Err(e) => {
                log::warn!("{} {} failed: {:?}", method.as_str(), path, e);
                return (0, Body::new());
            }
        };
        log::info!("server returned HTTP response code: {}", code);

        if code == expected {
            (code, client.read_body())
        } else {
            client.drain();
            (code, Body::new())
        }
    }
}

/// Adds the Sidecar signature headers to `request`. `Content-Length` is
/// written by the transport.
fn sign(
    request: &mut Request<'_>,
    credentials: &Credentials,
    method: Method,
    date: &str,
) -> Result<(), Error> {
    let content_md5 = md5::hex(request.body().as_bytes());
    let token = signature::sign(
        credentials.secret(),
        method.as_str(),
        request.uri(),
        date,
        &content_md5,
        SIGNATURE_VERSION,
    );

    let mut authorization: String<AUTHORIZATION_LEN> = String::new();
    write!(authorization, "SIDECAR {}:{}", credentials.key_id(), token)
        .map_err(|_| Error::BufferOverflow)?;

    request
        .set_header("Date", date)?
        .set_header("Content-Type", "application/json")?
        .set_header("Content-MD5", &content_md5)?
        .set_header("Signature-Version", SIGNATURE_VERSION)?
        .set_header("Authorization", &authorization)?;
    Ok(())
}

fn account_body(username: &str, password: &str) -> Option<String<PROVISION_BODY_LEN>> {
    match serde_json_core::to_string(&Account { username, password }) {
        Ok(body) => Some(body),
        Err(_) => {
            log::warn!("user name or password too long");
            None
        }
    }
}

/// Finds the key `"name"` in `body` and returns the string value after it.
///
/// Occurrences not followed by `:` are values and are skipped. Returns an
/// empty string when the key is missing, the value is not a string or it
/// does not fit.
fn string_field<const N: usize>(body: &str, name: &str) -> String<N> {
    let mut marker: String<34> = String::new();
    if write!(marker, "\"{}\"", name).is_err() {
        return String::new();
    }
    let Some(rest) = body
        .match_indices(marker.as_str())
        .find_map(|(start, _)| body[start + marker.len()..].trim_start().strip_prefix(':'))
    else {
        return String::new();
    };
    let Some(rest) = rest.trim_start().strip_prefix('"') else {
        return String::new();
    };
    rest.split('"')
        .next()
        .and_then(|value| String::try_from(value).ok())
        .unwrap_or_default()
}
