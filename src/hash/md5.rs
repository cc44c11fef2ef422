use super::{BLOCK_LEN, BlockBuffer, to_hex};
use heapless::String;

/// Length of an MD5 digest in bytes.
pub const DIGEST_LEN: usize = 16;

/// Length of the lowercase hex form of an MD5 digest.
pub const HEX_LEN: usize = DIGEST_LEN * 2;

const INIT: [u32; 4] = [0x67452301, 0xefcdab89, 0x98badcfe, 0x10325476];

// Per-round shift amounts.
const S: [u32; 64] = [
    7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 7, 12, 17, 22, 5, 9, 14, 20, 5, 9, 14, 20, 5, 9,
    14, 20, 5, 9, 14, 20, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 4, 11, 16, 23, 6, 10, 15,
    21, 6, 10, 15, 21, 6, 10, 15, 21, 6, 10, 15, 21,
];

// floor(abs(sin(i + 1)) * 2^32)
const K: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee, 0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be, 0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa, 0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed, 0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c, 0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05, 0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039, 0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1, 0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

/// Running MD5 computation.
///
/// ```rust
/// use qsense::hash::md5::Context;
///
/// let mut ctx = Context::new();
/// ctx.update(b"a");
/// ctx.update(b"bc");
/// let digest = ctx.finalize();
/// assert_eq!(digest[0], 0x90);
/// ```
#[derive(Debug)]
pub struct Context {
    state: [u32; 4],
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
        let length = self.block.bit_length().to_le_bytes();
        let state = &mut self.state;
        self.block.pad(length, |block| transform(state, block));

        let mut digest = [0u8; DIGEST_LEN];
        for (chunk, word) in digest.chunks_exact_mut(4).zip(self.state) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        digest
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes the MD5 digest of `data`.
pub fn compute(data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut ctx = Context::new();
    ctx.update(data);
    ctx.finalize()
}

/// Computes the MD5 digest of `data` as lowercase hex, the form sent in the
/// `Content-MD5` header.
pub fn hex(data: &[u8]) -> String<HEX_LEN> {
    to_hex(&compute(data))
}

fn transform(state: &mut [u32; 4], block: &[u8; BLOCK_LEN]) {
    let mut x = [0u32; 16];
    for (word, bytes) in x.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    }

    let [mut a, mut b, mut c, mut d] = *state;

    for i in 0..64 {
        let (f, g) = match i {
            0..16 => ((b & c) | (!b & d), i),
            16..32 => ((d & b) | (!d & c), (5 * i + 1) % 16),
            32..48 => (b ^ c ^ d, (3 * i + 5) % 16),
            _ => (c ^ (b | !d), (7 * i) % 16),
        };

        let rotated = a
            .wrapping_add(f)
            .wrapping_add(K[i])
            .wrapping_add(x[g])
            .rotate_left(S[i]);
        a = d;
        d = c;
        c = b;
        b = b.wrapping_add(rotated);
    }

    state[0] = state[0].wrapping_add(a);
    state[1] = state[1].wrapping_add(b);
    state[2] = state[2].wrapping_add(c);
    state[3] = state[3].wrapping_add(d);
}
