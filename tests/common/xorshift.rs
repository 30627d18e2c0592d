#![allow(dead_code)]

// Shared by the integration tests and the library's unit tests, which
// pull it in from `src/lib.rs` with a `#[path]` module.

/// Deterministic xorshift generator.
pub struct Xorshift(pub u32);

impl Xorshift {
  pub fn next(&mut self) -> u32 {
    let mut x = self.0;

    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;

    self.0 = x;

    x
  }

  /// Uniform value that fits in `bits` bits, two's complement.
  pub fn signed(&mut self, bits: u32) -> i32 {
    let value = self.next() >> (32 - bits);

    if bits < 32 && value >= (1 << (bits - 1)) {
      (value as i64 - (1i64 << bits)) as i32
    } else {
      value as i32
    }
  }

  /// A slowly moving signal, the kind predictors do well on.
  pub fn signal(&mut self, length: usize, bits: u32) -> Vec<i32> {
    let limit     = (1i64 << (bits - 1)) - 1;
    let mut value = 0i64;

    (0..length).map(|_| {
      value += (self.signed(6) as i64) * 16;
      value  = value.max(-limit).min(limit);

      value as i32
    }).collect()
  }
}
