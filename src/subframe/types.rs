use crate::utility::PooledBuffer;

/// Maximum order of the fixed predictors permitted by the format.
pub const MAX_FIXED_ORDER: usize = 4;

/// Maximum LPC order permitted by the format.
pub const MAX_LPC_ORDER: usize   = 32;

/// A single channel of decoded audio data.
///
/// Samples are fully restored when the subframe is constructed, wasted bits
/// included, and never change afterwards.
#[derive(Debug, PartialEq, Eq)]
pub struct Subframe {
  data: Data,
  block_size: usize,
  wasted_bits: u32,
}

/// General enum that holds all the different subframe data types.
#[derive(Debug, PartialEq, Eq)]
pub enum Data {
  /// A single value that represents a constant subframe.
  Constant(i32),
  /// An uncompressed subframe.
  Verbatim(PooledBuffer),
  /// Fixed linear prediction subframe.
  Fixed(Fixed),
  /// FIR linear prediction subframe.
  LPC(LPC),
}

/// Fixed linear prediction subframe.
#[derive(Debug, PartialEq, Eq)]
pub struct Fixed {
  /// Residual coding method.
  pub entropy_coding_method: EntropyCodingMethod,
  /// Polynomial order.
  pub order: u8,
  /// Restored signal, starting with the warm up samples.
  pub samples: PooledBuffer,
}

/// Finite Impulse Response (FIR) linear prediction subframe.
#[derive(Debug, PartialEq, Eq)]
pub struct LPC {
  /// Residual coding method.
  pub entropy_coding_method: EntropyCodingMethod,
  /// FIR order.
  pub order: u8,
  /// Quantized FIR filter coefficient precision in bits.
  pub qlp_coeff_precision: u8,
  /// Quantized linear predictor coefficient shift needed in bits.
  pub quantization_level: i8,
  /// FIR filter coefficients, the first one weighs the most recent sample.
  pub qlp_coefficients: Vec<i32>,
  /// Restored signal, starting with the warm up samples.
  pub samples: PooledBuffer,
}

/// Header for the entropy coding method.
#[derive(Debug, PartialEq, Eq)]
pub struct EntropyCodingMethod {
  /// The type of coding method being used.
  pub method_type: CodingMethod,
  /// Data for each entropy coding method partition.
  pub data: PartitionedRice,
}

/// The available entropy coding methods.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CodingMethod {
  /// Coding partition with a 4-bit Rice parameter.
  PartitionedRice,
  /// Coding partition with a 5-bit Rice parameter.
  PartitionedRice2,
}

impl CodingMethod {
  /// Width of the Rice parameter field and the parameter value that
  /// escapes to raw residuals.
  pub fn parameter_size(self) -> (u32, u32) {
    match self {
      CodingMethod::PartitionedRice  => (4, 0b1111),
      CodingMethod::PartitionedRice2 => (5, 0b11111),
    }
  }
}

/// Header for a Rice partitioned residual.
#[derive(Debug, PartialEq, Eq)]
pub struct PartitionedRice {
  /// Partition order.
  pub order: u32,
  /// Rice parameters and/or raw bits.
  pub contents: PartitionedRiceContents,
}

/// Contents of a Rice partitioned residual.
#[derive(Debug, PartialEq, Eq)]
pub struct PartitionedRiceContents {
  /// Rice parameter of each partition, the escape code for raw partitions.
  pub parameters: Vec<u32>,
  /// Bit width of each raw partition, zero for Rice coded ones.
  pub raw_bits: Vec<u32>,
}

impl PartitionedRiceContents {
  pub fn new(capacity: usize) -> PartitionedRiceContents {
    PartitionedRiceContents {
      parameters: Vec::with_capacity(capacity),
      raw_bits: Vec::with_capacity(capacity),
    }
  }
}

/// Outcome of `Subframe::read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadResult {
  /// Number of samples copied.
  Samples(usize),
  /// The destination can't hold the whole block.
  EndOfStream,
}

impl Subframe {
  pub(crate) fn new(data: Data, block_size: usize, wasted_bits: u32)
                    -> Subframe {
    Subframe {
      data: data,
      block_size: block_size,
      wasted_bits: wasted_bits,
    }
  }

  pub fn data(&self) -> &Data {
    &self.data
  }

  /// Number of wasted bits within each sample.
  pub fn wasted_bits(&self) -> u32 {
    self.wasted_bits
  }

  /// Number of samples in the subframe.
  pub fn block_size(&self) -> usize {
    self.block_size
  }

  /// Predictor order, zero for constant and verbatim subframes.
  pub fn order(&self) -> usize {
    match self.data {
      Data::Constant(_)   |
      Data::Verbatim(_)   => 0,
      Data::Fixed(ref fixed) => fixed.order as usize,
      Data::LPC(ref lpc)     => lpc.order as usize,
    }
  }

  /// The six bit type code this subframe was stored with.
  pub fn subframe_type(&self) -> u8 {
    match self.data {
      Data::Constant(_)      => 0b000000,
      Data::Verbatim(_)      => 0b000001,
      Data::Fixed(ref fixed) => 0b001000 | fixed.order,
      Data::LPC(ref lpc)     => 0b100000 | (lpc.order - 1),
    }
  }

  /// Copies the whole block into `dest`.
  ///
  /// Blocks are never delivered in pieces, so a `dest` shorter than the
  /// block size gets `ReadResult::EndOfStream` and stays untouched.
  pub fn read(&self, dest: &mut [i32]) -> ReadResult {
    let block_size = self.block_size;

    if block_size > dest.len() {
      return ReadResult::EndOfStream;
    }

    let output = &mut dest[0..block_size];

    match self.data {
      Data::Constant(constant)   => {
        for sample in output {
          *sample = constant;
        }
      }
      Data::Verbatim(ref samples) => output.copy_from_slice(samples),
      Data::Fixed(ref fixed)      => output.copy_from_slice(&fixed.samples),
      Data::LPC(ref lpc)          => output.copy_from_slice(&lpc.samples),
    }

    ReadResult::Samples(block_size)
  }

  /// Copies the block into a new vector.
  pub fn to_vec(&self) -> Vec<i32> {
    match self.data {
      Data::Constant(constant)    => vec![constant; self.block_size],
      Data::Verbatim(ref samples) => samples.to_vec(),
      Data::Fixed(ref fixed)      => fixed.samples.to_vec(),
      Data::LPC(ref lpc)          => lpc.samples.to_vec(),
    }
  }

  /// Hands over the samples, keeping their buffer out of any pool.
  pub fn into_samples(self) -> Vec<i32> {
    let block_size = self.block_size;

    match self.data {
      Data::Constant(constant) => vec![constant; block_size],
      Data::Verbatim(samples)  => samples.into_vec(),
      Data::Fixed(fixed)       => fixed.samples.into_vec(),
      Data::LPC(lpc)           => lpc.samples.into_vec(),
    }
  }
}
