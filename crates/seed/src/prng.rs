use rand::RngCore;

use crate::seed::Seed;

/// 2^-32.
const TWO_POW_NEG_32: f64 = 2.328_306_436_538_696_3e-10;
const TWO_POW_32: f64 = 4_294_967_296.0;

/// The shared deterministic random stream for one session.
///
/// Implements Johannes Baagøe's Alea generator: three lag registers plus a
/// carry, seeded by hashing the seed's canonical text with the Mash
/// function. Outputs are `f64` in `[0, 1)` with 32 bits of randomness.
///
/// Not `Default` and not `Clone`: a stream is built once from the session
/// seed and lent by `&mut` to every generator.
#[derive(Debug)]
pub struct PrngStream {
    s0: f64,
    s1: f64,
    s2: f64,
    carry: f64,
    draws: u64,
}

impl PrngStream {
    /// Build the stream for a session seed.
    pub fn new(seed: Seed) -> Self {
        Self::from_text(&seed.canonical_text())
    }

    /// Build a stream keyed by arbitrary text.
    pub fn from_text(key: &str) -> Self {
        let mut mash = Mash::new();
        let mut s0 = mash.hash(" ");
        let mut s1 = mash.hash(" ");
        let mut s2 = mash.hash(" ");

        s0 -= mash.hash(key);
        if s0 < 0.0 {
            s0 += 1.0;
        }
        s1 -= mash.hash(key);
        if s1 < 0.0 {
            s1 += 1.0;
        }
        s2 -= mash.hash(key);
        if s2 < 0.0 {
            s2 += 1.0;
        }

        Self {
            s0,
            s1,
            s2,
            carry: 1.0,
            draws: 0,
        }
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        let t = 2_091_639.0 * self.s0 + self.carry * TWO_POW_NEG_32;
        self.s0 = self.s1;
        self.s1 = self.s2;
        // t is non-negative and below 2^31, so truncation is the integer part.
        self.carry = t.trunc();
        self.s2 = t - self.carry;
        self.draws += 1;
        self.s2
    }

    /// Next value as `f32`, for geometry.
    pub fn next_f32(&mut self) -> f32 {
        self.next_f64() as f32
    }

    /// Uniform index in `0..len` via `floor(u * len)`. Returns 0 for `len == 0`
    /// without consuming a draw.
    pub fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let i = (self.next_f64() * len as f64).floor() as usize;
        i.min(len - 1)
    }

    /// Number of values drawn so far. Useful to assert call-order contracts.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RngCore for PrngStream {
    fn next_u32(&mut self) -> u32 {
        (self.next_f64() * TWO_POW_32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Mash string hash used to key Alea.
struct Mash {
    n: f64,
}

impl Mash {
    fn new() -> Self {
        Self {
            n: 0xefc8_249d_u32 as f64,
        }
    }

    fn hash(&mut self, data: &str) -> f64 {
        for unit in data.encode_utf16() {
            self.n += unit as f64;
            let mut h = 0.025_196_032_824_169_38 * self.n;
            self.n = to_u32(h);
            h -= self.n;
            h *= self.n;
            self.n = to_u32(h);
            h -= self.n;
            self.n += h * TWO_POW_32;
        }
        to_u32(self.n) * TWO_POW_NEG_32
    }
}

/// Integer part modulo 2^32, for non-negative inputs.
fn to_u32(x: f64) -> f64 {
    ((x as u64) & 0xffff_ffff) as f64
}
