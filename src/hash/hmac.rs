use super::sha1::{self, DIGEST_LEN, HEX_LEN};
use super::{BLOCK_LEN, to_hex};
use core::fmt;
use heapless::String;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// Running HMAC-SHA1 computation.
///
/// Keys longer than one block are replaced by their SHA-1 digest before
/// padding, as RFC 2104 requires.
///
/// ```rust
/// use qsense::hash::hmac::Hmac;
///
/// let mut mac = Hmac::new(b"key");
/// mac.update(b"The quick brown fox ");
/// mac.update(b"jumps over the lazy dog");
/// assert_eq!(mac.finalize()[0], 0xde);
/// ```
pub struct Hmac {
    inner: sha1::Context,
    opad: [u8; BLOCK_LEN],
}

impl Hmac {
    /// Starts a MAC keyed with `key`.
    pub fn new(key: &[u8]) -> Self {
        let mut block = [0u8; BLOCK_LEN];
        if key.len() > BLOCK_LEN {
            block[..DIGEST_LEN].copy_from_slice(&sha1::hash(key));
        } else {
            block[..key.len()].copy_from_slice(key);
        }

        let mut ipad = [IPAD; BLOCK_LEN];
        let mut opad = [OPAD; BLOCK_LEN];
        for ((i, o), k) in ipad.iter_mut().zip(opad.iter_mut()).zip(block) {
            *i ^= k;
            *o ^= k;
        }

        let mut inner = sha1::Context::new();
        inner.update(&ipad);
        Self { inner, opad }
    }

    /// Feeds more message bytes.
    pub fn update(&mut self, input: &[u8]) {
        self.inner.update(input);
    }

    /// Returns the MAC, consuming the context.
    pub fn finalize(self) -> [u8; DIGEST_LEN] {
        let inner = self.inner.finalize();
        let mut outer = sha1::Context::new();
        outer.update(&self.opad);
        outer.update(&inner);
        outer.finalize()
    }
}

impl fmt::Debug for Hmac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hmac").finish_non_exhaustive()
    }
}

/// Computes HMAC-SHA1 of `input` under `key`.
pub fn hmac(key: &[u8], input: &[u8]) -> [u8; DIGEST_LEN] {
    let mut mac = Hmac::new(key);
    mac.update(input);
    mac.finalize()
}

/// Computes HMAC-SHA1 of `input` under `key` as lowercase hex.
pub fn hex(key: &[u8], input: &[u8]) -> String<HEX_LEN> {
    to_hex(&hmac(key, input))
}
