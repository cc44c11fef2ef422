//! Message digests and request signing.
//!
//! Every Sidecar request carries an MD5 hash of its body (`Content-MD5`) and
//! an HMAC-SHA1 signature over the method, path, date and that hash. Devices
//! have no crypto library to lean on, so both digests live here.
//!
//! Each algorithm exposes a move-only [`md5::Context`] / [`sha1::Context`] /
//! [`hmac::Hmac`] accumulator whose `finalize(self)` consumes it, so a
//! finished context can't be fed again. The free functions ([`md5::compute`],
//! [`sha1::hash`], [`hmac::hmac`]) are the one-shot entry points.
//!
//! ```rust
//! use qsense::hash::{md5, signature};
//!
//! let body = br#"{"a":1}"#;
//! let content_md5 = md5::hex(body);
//! assert_eq!(content_md5.as_str(), "bb6cb5c68df4652941caf652a366f2d8");
//!
//! let token = signature::sign(
//!     "s3cret",
//!     "POST",
//!     "/rest/v1/event",
//!     "2024-01-01T00:00:00.000Z",
//!     &content_md5,
//!     signature::SIGNATURE_VERSION,
//! );
//! assert_eq!(token.as_str(), "EONfko8sdlnA2yxzsf3CvLLiS9g=");
//! ```

use heapless::String;

/// MD5 (RFC 1321).
pub mod md5;

/// SHA-1 (FIPS 180-1).
pub mod sha1;

/// HMAC-SHA1 (RFC 2104).
pub mod hmac;

/// Sidecar `Authorization` signature.
pub mod signature;


/// Both MD5 and SHA-1 compress 64-byte blocks.
pub const BLOCK_LEN: usize = 64;

const PADDING: [u8; BLOCK_LEN] = {
    let mut padding = [0u8; BLOCK_LEN];
    padding[0] = 0x80;
    padding
};

/// Partial-block buffer shared by the MD5 and SHA-1 contexts.
///
/// Tracks the total number of bytes fed so far; the bit length appended
/// during padding wraps modulo 2^64.
#[derive(Debug)]
pub(crate) struct BlockBuffer {
    buffer: [u8; BLOCK_LEN],
    length: u64,
}

impl BlockBuffer {
    pub(crate) const fn new() -> Self {
        Self {
            buffer: [0; BLOCK_LEN],
            length: 0,
        }
    }

    /// Number of message bits fed so far, modulo 2^64.
    pub(crate) fn bit_length(&self) -> u64 {
        self.length.wrapping_mul(8)
    }

    /// Feeds `input`, calling `compress` for every completed block.
    pub(crate) fn update(&mut self, mut input: &[u8], mut compress: impl FnMut(&[u8; BLOCK_LEN])) {
        let index = (self.length % BLOCK_LEN as u64) as usize;
        self.length = self.length.wrapping_add(input.len() as u64);

        if index > 0 {
            let fill = BLOCK_LEN - index;
            if input.len() < fill {
                self.buffer[index..index + input.len()].copy_from_slice(input);
                return;
            }
            self.buffer[index..].copy_from_slice(&input[..fill]);
            compress(&self.buffer);
            input = &input[fill..];
        }

        let mut blocks = input.chunks_exact(BLOCK_LEN);
        for block in &mut blocks {
            if let Ok(block) = <&[u8; BLOCK_LEN]>::try_from(block) {
                compress(block);
            }
        }
        let rest = blocks.remainder();
        self.buffer[..rest.len()].copy_from_slice(rest);
    }

    /// Appends the `0x80` pad and the encoded bit length, leaving the buffer
    /// exactly block aligned.
    pub(crate) fn pad(&mut self, encoded_length: [u8; 8], mut compress: impl FnMut(&[u8; BLOCK_LEN])) {
        let index = (self.length % BLOCK_LEN as u64) as usize;
        let pad_len = if index < 56 { 56 - index } else { 120 - index };
        self.update(&PADDING[..pad_len], &mut compress);
        self.update(&encoded_length, &mut compress);
    }
}

/// Lowercase hex rendering of a digest.
pub(crate) fn to_hex<const N: usize>(bytes: &[u8]) -> String<N> {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";

    let mut out = String::new();
    for byte in bytes {
        // Callers size N to exactly twice the digest length.
        let _ = out.push(DIGITS[(byte >> 4) as usize] as char);
        let _ = out.push(DIGITS[(byte & 0x0f) as usize] as char);
    }
    out
}
