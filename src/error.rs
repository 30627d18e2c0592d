use thiserror::Error;

/// Result type used by every decoding entry point.
pub type Result<T> = ::std::result::Result<T, Error>;

/// Failure while decoding a subframe.
///
/// Both variants are fatal to the subframe being decoded; no partially
/// restored samples are handed back.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
  /// The bits describe something the format forbids or reserves.
  #[error("invalid stream: {0}")]
  InvalidStream(#[from] Invalid),
  /// The reader ran out of bits in the middle of a field. Running out
  /// inside a residual partition is reported as `Invalid::Residual`
  /// instead, since a short Rice code can't be told from a corrupt one.
  #[error("stream truncated in the middle of a subframe")]
  Truncated,
}

/// Reason a stream was rejected as `Error::InvalidStream`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalid {
  #[error("subframe padding bit is not zero")]
  PaddingBit,
  #[error("reserved subframe type {0:#08b}")]
  SubframeType(u8),
  #[error("fixed predictor order {0} is above 4")]
  FixedOrder(usize),
  #[error("lpc order {0} is outside 1..=32")]
  LpcOrder(usize),
  #[error("qlp coefficient precision 0b1111 is reserved")]
  QlpPrecision,
  #[error("negative qlp shift {0}")]
  QlpShift(i8),
  #[error("reserved residual coding method {0:#04b}")]
  CodingMethod(u8),
  #[error("partition of {partition_size} samples is smaller than predictor order {order}")]
  PartitionSize { partition_size: usize, order: usize },
  #[error("block size {block_size} does not split into {partitions} partitions")]
  PartitionCount { block_size: usize, partitions: usize },
  #[error("block size {block_size} is smaller than predictor order {order}")]
  BlockSize { block_size: usize, order: usize },
  #[error("{wasted_bits} wasted bits leave nothing of {bits_per_sample} bits per sample")]
  WastedBits { wasted_bits: u32, bits_per_sample: usize },
  #[error("{0} bits per sample is outside 1..=32")]
  BitsPerSample(usize),
  /// A partition's Rice parameter, raw width, Rice codes or raw values
  /// couldn't be read, either cut short or too wide for 32 bits.
  #[error("malformed residual partition")]
  Residual,
  #[error("{0} channels don't match the channel assignment")]
  Channels(u8),
}

impl Error {
  /// Returns true for streams that are corrupt rather than incomplete.
  pub fn is_invalid(&self) -> bool {
    match *self {
      Error::InvalidStream(_) => true,
      Error::Truncated        => false,
    }
  }
}
