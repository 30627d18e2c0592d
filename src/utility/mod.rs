#[macro_use]
mod macros;
mod bits;
mod pool;

pub use self::bits::{BitReader, BitStream};
pub use self::pool::{BufferPool, PooledBuffer};

// Sign extend the lowest `bit_count` bits of `value`. A zero width value
// is always zero, which is what the format expects for zero bit raw
// residuals.
pub fn extend_sign(value: u32, bit_count: u32) -> i32 {
  if bit_count == 0 {
    0
  } else if bit_count >= 32 || value < (1 << (bit_count - 1)) {
    value as i32
  } else {
    (value as i32).wrapping_sub(1 << bit_count)
  }
}

// Same as `extend_sign`, widened to 64 bits.
pub fn extend_sign_u64(value: u64, bit_count: u32) -> i64 {
  if bit_count == 0 {
    0
  } else if bit_count >= 64 || value < (1 << (bit_count - 1)) {
    value as i64
  } else {
    (value as i64).wrapping_sub(1 << bit_count)
  }
}

#[inline]
pub fn power_of_two(exponent: u32) -> u32 {
  debug_assert!(exponent < 32);

  1 << exponent
}

// Floor of the base two logarithm, with zero mapping to zero.
#[inline]
pub fn ilog2(value: u32) -> u32 {
  if value == 0 {
    0
  } else {
    31 - value.leading_zeros()
  }
}
