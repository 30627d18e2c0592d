mod types;
mod parser;
mod decoder;

pub use self::types::{
  MAX_FIXED_ORDER, MAX_LPC_ORDER,
  Subframe, ReadResult,
  Data,
  Fixed, LPC,
  EntropyCodingMethod, CodingMethod, PartitionedRice, PartitionedRiceContents,
};

pub use self::parser::{
  subframe_parser, SubframeDecoder,
  header, constant, verbatim, fixed, lpc, residual, partition_len,
};
pub use self::decoder::{
  fixed_restore_signal, lpc_restore_signal,
  needs_wide_accumulator, apply_wasted_bits,
};
