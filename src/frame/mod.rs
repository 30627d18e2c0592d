mod types;
mod decoder;

pub use self::types::{
  MAX_CHANNELS,
  ChannelAssignment,
  Header,
};

pub use self::decoder::{
  adjust_bits_per_sample,
  decode_subframes, decode_block,
  decode,
};
