use crate::event::Location;
use core::fmt::Write;
use heapless::String;
use uuid::{Timestamp, Uuid};

/// Maximum length of an access key id.
pub const KEY_ID_LEN: usize = 64;
/// Maximum length of an access key secret.
pub const SECRET_LEN: usize = 64;
/// Maximum length of a device id.
pub const DEVICE_ID_LEN: usize = 64;
/// Maximum length of a stream name.
pub const STREAM_LEN: usize = 32;
/// Length of a hyphenated event id.
pub const EVENT_ID_LEN: usize = 36;

/// A hyphenated lowercase UUID.
pub type EventId = String<EVENT_ID_LEN>;

// 100 ns intervals between 1582-10-15 and 1970-01-01.
const GREGORIAN_OFFSET: u64 = 0x01B2_1DD2_1381_4000;

/// An access key pair used to sign requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    key_id: String<KEY_ID_LEN>,
    secret: String<SECRET_LEN>,
}

impl Credentials {
    /// Creates a key pair. Returns `None` if either part is too long.
    pub fn new(key_id: &str, secret: &str) -> Option<Self> {
        Some(Self {
            key_id: String::try_from(key_id).ok()?,
            secret: String::try_from(secret).ok()?,
        })
    }

    /// The public key id sent in the `Authorization` header.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// The secret used to sign requests.
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

/// Per-device state shared by every request.
///
/// Credentials and event defaults are write-once: the first `init_*` call
/// wins and later calls are ignored, returning `false`.
#[derive(Debug, Default)]
pub struct Context {
    api_key: Option<Credentials>,
    user_key: Option<Credentials>,
    device_id: Option<String<DEVICE_ID_LEN>>,
    stream: Option<String<STREAM_LEN>>,
    location: Location,
    node_id: [u8; 6],
    sequence: u16,
}

impl Context {
    /// Creates an empty context. `node_id` identifies the device in event
    /// ids, typically its MAC address.
    pub fn new(node_id: [u8; 6]) -> Self {
        Self {
            node_id,
            ..Self::default()
        }
    }

    /// Sets the key pair that signs provisioning requests.
    pub fn init_api_key(&mut self, key_id: &str, secret: &str) -> bool {
        set_once(&mut self.api_key, "api key", || Credentials::new(key_id, secret))
    }

    /// Sets the key pair that signs event requests.
    pub fn init_user_key(&mut self, key_id: &str, secret: &str) -> bool {
        set_once(&mut self.user_key, "user key", || Credentials::new(key_id, secret))
    }

    /// Sets the device id, stream and default location stamped on every
    /// published event.
    pub fn init_event_defaults(&mut self, device_id: &str, stream: &str, location: Location) -> bool {
        if self.device_id.is_some() {
            log::warn!("event defaults already initialised, ignoring");
            return false;
        }
        let (Ok(device_id), Ok(stream)) = (String::try_from(device_id), String::try_from(stream)) else {
            log::warn!("device id or stream name too long");
            return false;
        };
        self.device_id = Some(device_id);
        self.stream = Some(stream);
        self.location = location;
        true
    }

    /// The provisioning key pair, if set.
    pub fn api_key(&self) -> Option<&Credentials> {
        self.api_key.as_ref()
    }

    /// The event key pair, if set.
    pub fn user_key(&self) -> Option<&Credentials> {
        self.user_key.as_ref()
    }

    /// The device id, empty until initialised.
    pub fn device_id(&self) -> &str {
        self.device_id.as_deref().unwrap_or_default()
    }

    /// The stream name, empty until initialised.
    pub fn stream(&self) -> &str {
        self.stream.as_deref().unwrap_or_default()
    }

    /// The default event location.
    pub fn location(&self) -> Location {
        self.location
    }

    /// Generates a time-based (version 1) event id for `epoch_millis`.
    ///
    /// A per-context counter fills the clock sequence so ids generated
    /// within the same millisecond stay distinct.
    pub fn next_event_id(&mut self, epoch_millis: i64) -> EventId {
        let millis = u64::try_from(epoch_millis).unwrap_or_default();
        let ticks = millis * 10_000 + GREGORIAN_OFFSET;
        let counter = self.sequence & 0x3FFF;
        self.sequence = self.sequence.wrapping_add(1);

        let uuid = Uuid::new_v1(Timestamp::from_gregorian(ticks, counter), &self.node_id);
        let mut id = EventId::new();
        let _ = write!(id, "{}", uuid.hyphenated());
        id
    }
}

fn set_once<V>(slot: &mut Option<V>, what: &str, value: impl FnOnce() -> Option<V>) -> bool {
    if slot.is_some() {
        log::warn!("{} already initialised, ignoring", what);
        return false;
    }
    match value() {
        Some(value) => {
            *slot = Some(value);
            true
        }
        None => {
            log::warn!("{} too long", what);
            false
        }
    }
}
