#![allow(dead_code)]

// Reference encoder for building subframes in tests. It writes the exact
// bit layout the decoder reads and computes residuals with 64-bit math, so
// a decode can be compared against the samples it started from.

mod xorshift;

pub use self::xorshift::Xorshift;

/// Big-endian bit writer.
pub struct BitWriter {
  bytes: Vec<u8>,
  current: u8,
  bit_count: usize,
}

impl BitWriter {
  pub fn new() -> Self {
    BitWriter {
      bytes: Vec::new(),
      current: 0,
      bit_count: 0,
    }
  }

  /// Number of bits written so far.
  pub fn len(&self) -> usize {
    self.bytes.len() * 8 + self.bit_count
  }

  pub fn write_bits(&mut self, value: u64, bit_count: usize) {
    debug_assert!(bit_count <= 64);

    for i in (0..bit_count).rev() {
      let bit = ((value >> i) & 1) as u8;

      self.current    = (self.current << 1) | bit;
      self.bit_count += 1;

      if self.bit_count == 8 {
        self.bytes.push(self.current);

        self.current   = 0;
        self.bit_count = 0;
      }
    }
  }

  pub fn write_signed(&mut self, value: i64, bit_count: usize) {
    let mask = if bit_count >= 64 {
      u64::max_value()
    } else {
      (1u64 << bit_count) - 1
    };

    self.write_bits(value as u64 & mask, bit_count);
  }

  pub fn write_unary(&mut self, zeros: u32) {
    for _ in 0..zeros {
      self.write_bits(0, 1);
    }

    self.write_bits(1, 1);
  }

  /// Pads the last byte with zero bits.
  pub fn into_bytes(mut self) -> Vec<u8> {
    if self.bit_count > 0 {
      let padding = 8 - self.bit_count;

      self.write_bits(0, padding);
    }

    self.bytes
  }
}

/// How residuals get written out.
#[derive(Clone, Copy, Debug)]
pub struct Residual {
  /// Two bit coding method, 0 for 4-bit and 1 for 5-bit Rice parameters.
  pub method: u64,
  pub partition_order: u32,
  /// Raw width for every partition instead of Rice codes.
  pub escape: Option<usize>,
}

impl Default for Residual {
  fn default() -> Self {
    Residual {
      method: 0,
      partition_order: 0,
      escape: None,
    }
  }
}

fn write_header(writer: &mut BitWriter, subframe_type: u64, wasted_bits: u32) {
  writer.write_bits(0, 1);
  writer.write_bits(subframe_type, 6);

  if wasted_bits > 0 {
    writer.write_bits(1, 1);
    writer.write_unary(wasted_bits - 1);
  } else {
    writer.write_bits(0, 1);
  }
}

fn strip(samples: &[i32], wasted_bits: u32) -> Vec<i64> {
  samples.iter().map(|&sample| {
    let mask = (1i64 << wasted_bits) - 1;

    assert_eq!(sample as i64 & mask, 0, "bits aren't wasted");

    (sample >> wasted_bits) as i64
  }).collect()
}

fn fold(value: i64) -> u64 {
  ((value << 1) ^ (value >> 63)) as u64
}

fn rice_len(values: &[i64], parameter: u32) -> u64 {
  values.iter()
    .map(|&value| (fold(value) >> parameter) + 1 + parameter as u64)
    .sum()
}

fn write_residual(writer: &mut BitWriter,
                  residual: &[i64],
                  order: usize,
                  block_size: usize,
                  options: Residual) {
  let (parameter_size, escape_code) = if options.method == 0 {
    (4, 0b1111)
  } else {
    (5, 0b11111)
  };

  writer.write_bits(options.method, 2);
  writer.write_bits(options.partition_order as u64, 4);

  let partition_size = block_size >> options.partition_order;
  let mut start      = 0;

  for partition in 0..(1 << options.partition_order) {
    let count  = if partition == 0 {
      partition_size - order
    } else {
      partition_size
    };
    let values = &residual[start..(start + count)];

    start += count;

    if let Some(width) = options.escape {
      writer.write_bits(escape_code, parameter_size);
      writer.write_bits(width as u64, 5);

      for &value in values {
        writer.write_signed(value, width);
      }

      continue;
    }

    let parameter = (0..(escape_code as u32))
      .min_by_key(|&parameter| rice_len(values, parameter))
      .unwrap_or(0);

    writer.write_bits(parameter as u64, parameter_size);

    for &value in values {
      let folded = fold(value);

      writer.write_unary((folded >> parameter) as u32);
      writer.write_bits(folded & ((1 << parameter) - 1), parameter as usize);
    }
  }

  assert_eq!(start, residual.len());
}

pub fn constant(value: i32, bits_per_sample: usize, wasted_bits: u32)
                -> BitWriter {
  let mut writer = BitWriter::new();
  let stored     = strip(&[value], wasted_bits)[0];

  write_header(&mut writer, 0b000000, wasted_bits);
  writer.write_signed(stored, bits_per_sample - wasted_bits as usize);

  writer
}

pub fn verbatim(samples: &[i32], bits_per_sample: usize, wasted_bits: u32)
                -> BitWriter {
  let mut writer = BitWriter::new();

  write_header(&mut writer, 0b000001, wasted_bits);

  for value in strip(samples, wasted_bits) {
    writer.write_signed(value, bits_per_sample - wasted_bits as usize);
  }

  writer
}

const POLYNOMIAL: [&[i64]; 5] = [ &[]
                                , &[1]
                                , &[2, -1]
                                , &[3, -3, 1]
                                , &[4, -6, 4, -1]
                                ];

pub fn fixed(samples: &[i32],
             order: usize,
             bits_per_sample: usize,
             wasted_bits: u32,
             options: Residual)
             -> BitWriter {
  let mut writer = BitWriter::new();
  let signal     = strip(samples, wasted_bits);
  let width      = bits_per_sample - wasted_bits as usize;

  write_header(&mut writer, 0b001000 | order as u64, wasted_bits);

  for &value in &signal[..order] {
    writer.write_signed(value, width);
  }

  let residual: Vec<i64> = (order..signal.len()).map(|i| {
    let prediction: i64 = POLYNOMIAL[order].iter().enumerate()
      .map(|(k, coefficient)| coefficient * signal[i - 1 - k])
      .sum();

    signal[i] - prediction
  }).collect();

  write_residual(&mut writer, &residual, order, signal.len(), options);

  writer
}

pub fn lpc(samples: &[i32],
           coefficients: &[i32],
           precision: usize,
           shift: u32,
           bits_per_sample: usize,
           wasted_bits: u32,
           options: Residual)
           -> BitWriter {
  let order      = coefficients.len();
  let mut writer = BitWriter::new();
  let signal     = strip(samples, wasted_bits);
  let width      = bits_per_sample - wasted_bits as usize;

  write_header(&mut writer, 0b100000 | (order as u64 - 1), wasted_bits);

  for &value in &signal[..order] {
    writer.write_signed(value, width);
  }

  writer.write_bits(precision as u64 - 1, 4);
  writer.write_signed(shift as i64, 5);

  for &coefficient in coefficients {
    writer.write_signed(coefficient as i64, precision);
  }

  let residual: Vec<i64> = (order..signal.len()).map(|i| {
    let prediction: i64 = coefficients.iter().enumerate()
      .map(|(k, &coefficient)| coefficient as i64 * signal[i - 1 - k])
      .sum();

    signal[i] - (prediction >> shift)
  }).collect();

  write_residual(&mut writer, &residual, order, signal.len(), options);

  writer
}
