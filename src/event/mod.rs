//! Sensor events published to the Sidecar Event API.
//!
//! An [`Event`] collects [`Reading`]s plus optional tags and key/tag pairs.
//! Identity fields that are fixed per device (device id, stream, default
//! location) are supplied at serialization time through an [`Envelope`],
//! together with the event id and timestamp.
//!
//! ```rust
//! use qsense::event::{Envelope, Event, Location, Reading};
//!
//! let mut event = Event::new();
//! event.add_reading(Reading::new("temp", 23.5, "2024-01-01T00:00:00.000Z").unwrap()).unwrap();
//! event.add_tag("indoor").unwrap();
//! event.add_key_tag("room", "kitchen").unwrap();
//!
//! let envelope = Envelope {
//!     id: "7d444840-9dc0-11d1-b245-5ffdce74fad2",
//!     device_id: "weather-1",
//!     ts: "2024-01-01T00:00:00.000Z",
//!     stream: "climate",
//!     location: Location::new(1.5, -2.25),
//! };
//! let json = event.to_json(&envelope).unwrap();
//! assert!(json.starts_with(r#"{"id":"7d444840"#));
//! ```

use core::fmt::Write;
use heapless::{String, Vec};
use serde::Serialize;


/// Maximum length of a reading or key-tag key.
pub const KEY_LEN: usize = 32;
/// Maximum length of a tag.
pub const TAG_LEN: usize = 32;
/// Maximum length of a reading value. Holds the `Display` form of any `f32`.
pub const VALUE_LEN: usize = 64;
/// Maximum readings per event.
pub const MAX_READINGS: usize = 16;
/// Maximum plain tags per event.
pub const MAX_TAGS: usize = 8;
/// Maximum distinct key-tag keys per event.
pub const MAX_KEY_TAGS: usize = 8;
/// Maximum tags under one key.
pub const MAX_TAGS_PER_KEY: usize = 4;
/// Capacity of a serialized event.
pub const MAX_JSON_LEN: usize = 2048;

/// A reading or key-tag key.
pub type Key = String<KEY_LEN>;
/// A single tag.
pub type Tag = String<TAG_LEN>;
/// A serialized event document.
pub type Json = String<MAX_JSON_LEN>;

/// Errors raised while building or serializing an event.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// A fixed-capacity collection is full.
    Full,
    /// A string does not fit its field.
    TooLong,
    /// The document does not fit [`MAX_JSON_LEN`].
    Serialize,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Full => defmt::write!(f, "Full"),
            Error::TooLong => defmt::write!(f, "TooLong"),
            Error::Serialize => defmt::write!(f, "Serialize"),
        }
    }
}

/// A geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Location {
    /// Latitude in decimal degrees.
    #[serde(rename = "lat")]
    pub latitude: f32,
    /// Longitude in decimal degrees.
    #[serde(rename = "lon")]
    pub longitude: f32,
}

impl Location {
    /// Creates a location from decimal degrees.
    pub const fn new(latitude: f32, longitude: f32) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// One keyed sensor value with the time it was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reading {
    key: Key,
    ts: String<{ crate::time::iso8601::TIMESTAMP_LEN }>,
    value: String<VALUE_LEN>,
}

impl Reading {
    /// Creates a reading of a numeric value.
    ///
    /// The value is stored in its `Display` form, which always fits
    /// [`VALUE_LEN`]. Only an oversized key or timestamp is rejected.
    pub fn new(key: &str, value: f32, ts: &str) -> Result<Self, Error> {
        let mut text: String<VALUE_LEN> = String::new();
        write!(text, "{}", value).map_err(|_| Error::TooLong)?;
        Self::with_text(key, &text, ts)
    }

    /// Creates a reading whose value is already formatted.
    pub fn with_text(key: &str, value: &str, ts: &str) -> Result<Self, Error> {
        Ok(Self {
            key: bounded(key)?,
            ts: bounded(ts)?,
            value: bounded(value)?,
        })
    }

    /// The reading key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The formatted value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The time the reading was taken.
    pub fn timestamp(&self) -> &str {
        &self.ts
    }
}

/// Tags grouped under one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyTag {
    key: Key,
    tags: Vec<Tag, MAX_TAGS_PER_KEY>,
}

impl KeyTag {
    /// The key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Tags under the key, in insertion order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }
}

/// Per-publish fields wrapped around an event's contents.
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'a> {
    /// Unique event id.
    pub id: &'a str,
    /// Stable device identifier.
    pub device_id: &'a str,
    /// Event timestamp.
    pub ts: &'a str,
    /// User defined stream name.
    pub stream: &'a str,
    /// Location used when the event has none of its own.
    pub location: Location,
}

#[derive(Serialize)]
struct Document<'a> {
    id: &'a str,
    #[serde(rename = "deviceId")]
    device_id: &'a str,
    ts: &'a str,
    stream: &'a str,
    location: Location,
    readings: &'a [Reading],
    tags: &'a [Tag],
    #[serde(rename = "keyTags")]
    key_tags: &'a [KeyTag],
}

/// A set of readings published together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    readings: Vec<Reading, MAX_READINGS>,
    tags: Vec<Tag, MAX_TAGS>,
    key_tags: Vec<KeyTag, MAX_KEY_TAGS>,
    location: Option<Location>,
}

impl Event {
    /// Creates an empty event at the device's default location.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty event at `location`.
    pub fn with_location(location: Location) -> Self {
        Self {
            location: Some(location),
            ..Self::default()
        }
    }

    /// Adds a reading.
    pub fn add_reading(&mut self, reading: Reading) -> Result<&mut Self, Error> {
        self.readings.push(reading).map_err(|_| Error::Full)?;
        Ok(self)
    }

    /// Adds a tag. Tags should be single words.
    pub fn add_tag(&mut self, tag: &str) -> Result<&mut Self, Error> {
        self.tags.push(bounded(tag)?).map_err(|_| Error::Full)?;
        Ok(self)
    }

    /// Adds `tag` under `key`. Repeating a key collects its tags together.
    pub fn add_key_tag(&mut self, key: &str, tag: &str) -> Result<&mut Self, Error> {
        let tag = bounded(tag)?;
        if let Some(entry) = self.key_tags.iter_mut().find(|kt| kt.key == key) {
            entry.tags.push(tag).map_err(|_| Error::Full)?;
        } else {
            let mut tags = Vec::new();
            tags.push(tag).map_err(|_| Error::Full)?;
            self.key_tags
                .push(KeyTag {
                    key: bounded(key)?,
                    tags,
                })
                .map_err(|_| Error::Full)?;
        }
        Ok(self)
    }

    /// Readings in insertion order.
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    /// Tags in insertion order.
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Key-tag groups in insertion order.
    pub fn key_tags(&self) -> &[KeyTag] {
        &self.key_tags
    }

    /// The event's own location, if one was set.
    pub fn location(&self) -> Option<Location> {
        self.location
    }

    /// Removes all readings and tags, keeping the location.
    pub fn clear(&mut self) {
        self.readings.clear();
        self.tags.clear();
        self.key_tags.clear();
    }

    /// Serializes the event as the Sidecar event document.
    pub fn to_json(&self, envelope: &Envelope<'_>) -> Result<Json, Error> {
        let document = Document {
            id: envelope.id,
            device_id: envelope.device_id,
            ts: envelope.ts,
            stream: envelope.stream,
            location: self.location.unwrap_or(envelope.location),
            readings: &self.readings,
            tags: &self.tags,
            key_tags: &self.key_tags,
        };
        serde_json_core::to_string(&document).map_err(|_| Error::Serialize)
    }
}

fn bounded<const N: usize>(s: &str) -> Result<String<N>, Error> {
    String::try_from(s).map_err(|_| Error::TooLong)
}
