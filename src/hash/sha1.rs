use super::{BLOCK_LEN, BlockBuffer, to_hex};
use heapless::String;

/// Length of a SHA-1 digest in bytes.
pub const DIGEST_LEN: usize = 20;

/// Length of the lowercase hex form of a SHA-1 digest.
pub const HEX_LEN: usize = DIGEST_LEN * 2;

const INIT: [u32; 5] = [0x67452301, 0xEFCDAB89, 0x98BADCFE, 0x10325476, 0xC3D2E1F0];

/// Running SHA-1 computation.
#[derive(Debug)]
pub struct Context {
    state: [u32; 5],
    block: BlockBuffer,
}

impl Context {
    /// Starts a new digest.
    pub const fn new() -> Self {
        Self {
            state: INIT,
            block: BlockBuffer::new(),
        }
    }

    /// Feeds more message bytes.
    pub fn update(&mut self, input: &[u8]) {
        let state = &mut self.state;
        self.block.update(input, |block| transform(state, block));
    }

    /// Pads the message and returns the digest, consuming the context.
    pub fn finalize(mut self) -> [u8; DIGEST_LEN] {
        let length = self.block.bit_length().to_be_bytes();
        let state = &mut self.state;
        self.block.pad(length, |block| transform(state, block));

        let mut digest = [0u8; DIGEST_LEN];
        for (chunk, word) in digest.chunks_exact_mut(4).zip(self.state) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        digest
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the SHA-1 digest of `data`.
pub fn hash(data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut ctx = Context::new();
    ctx.update(data);
    ctx.finalize()
}

/// Computes the SHA-1 digest of `data` as lowercase hex.
pub fn hex(data: &[u8]) -> String<HEX_LEN> {
    to_hex(&hash(data))
}

fn transform(state: &mut [u32; 5], block: &[u8; BLOCK_LEN]) {
    let mut w = [0u32; 80];
    for (word, bytes) in w.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }
    for i in 16..80 {
        w[i] = (w[i - 3] ^ w[i - 8] ^ w[i - 14] ^ w[i - 16]).rotate_left(1);
    }

    let [mut a, mut b, mut c, mut d, mut e] = *state;

    for (i, word) in w.iter().enumerate() {
        let (f, k) = match i {
            0..20 => ((b & c) | (!b & d), 0x5A827999),
            20..40 => (b ^ c ^ d, 0x6ED9EBA1),
            40..60 => ((b & c) | (b & d) | (c & d), 0x8F1BBCDC),
            _ => (b ^ c ^ d, 0xCA62C1D6),
        };

        let temp = a
            .rotate_left(5)
            .wrapping_add(f)
            .wrapping_add(e)
            .wrapping_add(k)
            .wrapping_add(*word);
        e = d;
        d = c;
        c = b.rotate_left(30);
        b = a;
        a = temp;
    }

    state[0] = state[0].wrapping_add(a);
    state[1] = state[1].wrapping_add(b);
    state[2] = state[2].wrapping_add(c);
    state[3] = state[3].wrapping_add(d);
    state[4] = state[4].wrapping_add(e);
}
