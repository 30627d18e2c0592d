use nom::{IResult, Needed};

use crate::utility::{extend_sign, extend_sign_u64};

/// Sequential, forward-only reader of big-endian bits.
///
/// Every read returns `None` (or `false`) when the stream doesn't hold
/// enough bits to complete it. Reads are never retried; after a failed read
/// the position of the reader is unspecified.
pub trait BitReader {
  /// Reads `bit_count` bits, at most 32, as an unsigned number.
  fn read_bits_u32(&mut self, bit_count: u32) -> Option<u32>;

  /// Reads `bit_count` bits, at most 64, as an unsigned number.
  fn read_bits_u64(&mut self, bit_count: u32) -> Option<u64>;

  /// Reads `bit_count` bits, at most 32, as a two's complement number.
  fn read_bits_i32(&mut self, bit_count: u32) -> Option<i32> {
    self.read_bits_u32(bit_count).map(|value| extend_sign(value, bit_count))
  }

  /// Reads `bit_count` bits, at most 64, as a two's complement number.
  fn read_bits_i64(&mut self, bit_count: u32) -> Option<i64> {
    self.read_bits_u64(bit_count)
      .map(|value| extend_sign_u64(value, bit_count))
  }

  /// Counts zero bits up to and including the next one bit, returning the
  /// number of zeros.
  fn read_unary(&mut self) -> Option<u32> {
    let mut count = 0u32;

    loop {
      match self.read_bits_u32(1) {
        Some(1) => return Some(count),
        Some(_) => count = count.checked_add(1)?,
        None    => return None,
      }
    }
  }

  /// Fills `dest` with Rice coded, zigzag mapped residuals.
  ///
  /// `is_rice2` tells whether the parameter came from a five bit field,
  /// which only widens the valid parameter range. Returns false when the
  /// stream runs out or a code doesn't fit in 32 bits.
  fn read_rice_codes(&mut self,
                     dest: &mut [i32],
                     rice_parameter: u32,
                     is_rice2: bool)
                     -> bool {
    debug_assert!(rice_parameter < if is_rice2 { 31 } else { 15 });

    for sample in dest.iter_mut() {
      let quotient  = match self.read_unary() {
        Some(quotient) => quotient,
        None           => return false,
      };
      let remainder = match self.read_bits_u32(rice_parameter) {
        Some(remainder) => remainder,
        None            => return false,
      };

      match rice_to_signed(quotient, remainder, rice_parameter) {
        Some(value) => *sample = value,
        None        => return false,
      }
    }

    true
  }
}

/// Combines a Rice quotient and remainder and undoes the zigzag folding of
/// negative numbers. Values that need more than 32 bits are rejected.
#[inline]
pub fn rice_to_signed(quotient: u32, remainder: u32, parameter: u32)
                      -> Option<i32> {
  let folded = ((quotient as u64) << parameter) | remainder as u64;

  if folded > u32::max_value() as u64 {
    return None;
  }

  let value = folded as u32;

  Some(((value >> 1) as i32) ^ -((value & 1) as i32))
}

// Parser used to parse unary notation. Naming the parser `leading_zeros`
// was something that felt more clear in the code. It counts the zero bits
// before the next one bit and consumes that one bit as well.
pub fn leading_zeros(input: (&[u8], usize)) -> IResult<(&[u8], usize), u32> {
  let (bytes, offset) = input;

  let mut count = 0;
  let mut skip  = offset;

  for (index, byte) in bytes.iter().enumerate() {
    // Clear the number of offset bits
    let shifted = *byte << skip;

    if shifted > 0 {
      let zeros = shifted.leading_zeros() as usize;
      let end   = skip + zeros + 1;

      count += zeros;

      return if end >= 8 {
        IResult::Done((&bytes[(index + 1)..], end - 8), count as u32)
      } else {
        IResult::Done((&bytes[index..], end), count as u32)
      };
    }

    count += 8 - skip;
    skip   = 0;
  }

  IResult::Incomplete(Needed::Unknown)
}

/// `BitReader` over an in-memory byte slice, backed by nom's bit parsers.
#[derive(Debug, Clone)]
pub struct BitStream<'a> {
  input: (&'a [u8], usize),
  length: usize,
}

impl<'a> BitStream<'a> {
  pub fn new(bytes: &'a [u8]) -> Self {
    BitStream {
      input: (bytes, 0),
      length: bytes.len(),
    }
  }

  /// Number of bits consumed so far.
  pub fn position(&self) -> usize {
    let (bytes, offset) = self.input;

    (self.length - bytes.len()) * 8 + offset
  }

  /// Number of bits left to read.
  pub fn remaining(&self) -> usize {
    let (bytes, offset) = self.input;

    bytes.len() * 8 - offset
  }

  #[inline]
  pub fn is_aligned(&self) -> bool {
    self.input.1 == 0
  }

  /// Skips bits such that the next read will be byte-aligned.
  pub fn align_to_byte(&mut self) {
    let (bytes, offset) = self.input;

    if offset > 0 {
      self.input = (&bytes[1..], 0);
    }
  }

  // Moves past a successful parse, otherwise leaves the input alone.
  #[inline]
  fn advance<T>(&mut self, result: IResult<(&'a [u8], usize), T>)
                -> Option<T> {
    match result {
      IResult::Done(i, value) => {
        self.input = i;

        Some(value)
      }
      IResult::Error(_)       => None,
      IResult::Incomplete(_)  => None,
    }
  }
}

impl<'a> BitReader for BitStream<'a> {
  fn read_bits_u32(&mut self, bit_count: u32) -> Option<u32> {
    debug_assert!(bit_count <= 32);

    if bit_count == 0 {
      return Some(0);
    }

    let count  = bit_count as usize;
    let result = take_bits!(self.input, u32, count);

    self.advance(result)
  }

  fn read_bits_u64(&mut self, bit_count: u32) -> Option<u64> {
    debug_assert!(bit_count <= 64);

    if bit_count == 0 {
      return Some(0);
    }

    let count  = bit_count as usize;
    let result = take_bits!(self.input, u64, count);

    self.advance(result)
  }

  fn read_bits_i32(&mut self, bit_count: u32) -> Option<i32> {
    debug_assert!(bit_count <= 32);

    if bit_count == 0 {
      return Some(0);
    }

    let count  = bit_count as usize;
    let result = take_signed_bits!(self.input, i32, count);

    self.advance(result)
  }

  fn read_bits_i64(&mut self, bit_count: u32) -> Option<i64> {
    debug_assert!(bit_count <= 64);

    if bit_count == 0 {
      return Some(0);
    }

    let count  = bit_count as usize;
    let result = take_signed_bits!(self.input, i64, count);

    self.advance(result)
  }

  fn read_unary(&mut self) -> Option<u32> {
    let result = leading_zeros(self.input);

    self.advance(result)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use nom::{IResult, Needed};

  #[test]
  fn test_leading_zeros() {
    let inputs  = [ (&[0b10000000][..], 0)
                  , (&[0b11000000][..], 1)
                  , (&[0b00000001][..], 0)
                  , (&[0b11111111][..], 7)
                  , (&[0b00000000, 0b10000000][..], 0)
                  , (&[0b10000000, 0b10000000][..], 1)
                  , (&[0b00000000, 0b00000001][..], 0)
                  , (&[0b11111110, 0b00000010][..], 7)
                  , (&[0b10101010, 0b00000000][..], 7)
                  ];
    let results = [ IResult::Done((&inputs[0].0[..], 1), 0)
                  , IResult::Done((&inputs[1].0[..], 2), 0)
                  , IResult::Done((&[][..], 0), 7)
                  , IResult::Done((&[][..], 0), 0)
                  , IResult::Done((&inputs[4].0[1..], 1), 8)
                  , IResult::Done((&inputs[5].0[1..], 1), 7)
                  , IResult::Done((&[][..], 0), 15)
                  , IResult::Done((&inputs[7].0[1..], 7), 7)
                  , IResult::Incomplete(Needed::Unknown)
                  ];

    for (input, result) in inputs.iter().zip(results.iter()) {
      assert_eq!(leading_zeros(*input), *result);
    }
  }

  #[test]
  fn test_read_bits() {
    let bytes    = [ 0b1010_0101, 0b1110_0001, 0b1101_0010, 0b0101_0101
                   , 0b0111_0011, 0b0011_1111, 0b1010_1010, 0b0000_1100
                   ];
    let mut bits = BitStream::new(&bytes);

    assert_eq!(bits.read_bits_u32(0), Some(0));
    assert_eq!(bits.read_bits_u32(1), Some(1));
    assert_eq!(bits.read_bits_u32(1), Some(0));
    assert_eq!(bits.read_bits_u32(2), Some(0b10));
    assert_eq!(bits.read_bits_u32(2), Some(0b01));
    assert_eq!(bits.read_bits_u32(3), Some(0b011));
    assert_eq!(bits.read_bits_u32(3), Some(0b110));
    assert_eq!(bits.read_bits_u32(4), Some(0b0001));
    assert_eq!(bits.position(), 16);
    assert_eq!(bits.read_bits_u32(17), Some(0b1101_0010_0101_0101_0));
    assert_eq!(bits.read_bits_i32(7), Some(-13));
    assert_eq!(bits.remaining(), 24);
    assert_eq!(bits.read_bits_u32(25), None);
  }

  #[test]
  fn test_read_wide_bits() {
    let bytes    = [0xff; 9];
    let mut bits = BitStream::new(&bytes);

    assert_eq!(bits.read_bits_u32(4), Some(0b1111));
    assert_eq!(bits.read_bits_u64(64), Some(u64::max_value()));
    assert_eq!(bits.read_bits_i64(4), Some(-1));
    assert_eq!(bits.read_bits_i64(1), None);

    let bytes    = [0x80, 0, 0, 0, 0];
    let mut bits = BitStream::new(&bytes);

    assert_eq!(bits.read_bits_i32(32), Some(i32::min_value()));
    assert_eq!(bits.read_bits_i32(0), Some(0));
  }

  #[test]
  fn test_align_to_byte() {
    let bytes    = [0x00, 0xff];
    let mut bits = BitStream::new(&bytes);

    assert!(bits.is_aligned());
    assert_eq!(bits.read_bits_u32(5), Some(0));
    assert!(!bits.is_aligned());

    bits.align_to_byte();

    assert!(bits.is_aligned());
    assert_eq!(bits.read_bits_u32(3), Some(7));
  }

  #[test]
  fn test_read_unary() {
    let bytes    = [0b0001_1000, 0b0000_0000, 0b0100_0000];
    let mut bits = BitStream::new(&bytes);

    assert_eq!(bits.read_unary(), Some(3));
    assert_eq!(bits.read_unary(), Some(0));
    assert_eq!(bits.read_unary(), Some(12));
    assert_eq!(bits.read_unary(), None);
  }

  #[test]
  fn test_rice_to_signed() {
    assert_eq!(rice_to_signed(0, 0, 0), Some(0));
    assert_eq!(rice_to_signed(0, 1, 1), Some(-1));
    assert_eq!(rice_to_signed(1, 0, 1), Some(1));
    assert_eq!(rice_to_signed(1, 1, 1), Some(-2));
    assert_eq!(rice_to_signed(3, 0b01, 2), Some(-7));
    assert_eq!(rice_to_signed(0xffff, 0xffff, 16), Some(i32::min_value()));
    assert_eq!(rice_to_signed(0x1_0000, 0, 16), None);
  }

  #[test]
  fn test_read_rice_codes() {
    // Parameter 2: 0, -1, 5, -3 encode as 1|00, 1|01, 001|10, 01|01.
    let bytes      = [0b1001_0100, 0b1100_1010];
    let mut bits   = BitStream::new(&bytes);
    let mut output = [0; 4];

    assert!(bits.read_rice_codes(&mut output, 2, false));
    assert_eq!(output, [0, -1, 5, -3]);
    assert_eq!(bits.position(), 15);

    let mut output = [0; 2];

    assert!(!bits.read_rice_codes(&mut output, 2, false));
  }
}
