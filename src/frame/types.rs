/// Maximum number of channels supported in the FLAC format.
pub const MAX_CHANNELS: usize = 8;

/// Channel assignment order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelAssignment {
  /// Independent channels, from one up to eight.
  Independent,
  /// Left and side stereo.
  LeftSide,
  /// Right and side stereo.
  RightSide,
  /// Midpoint and side stereo.
  MidpointSide,
}

/// What the caller knows about a block before its subframes are decoded.
///
/// Parsing the frame header itself is left to the container layer; this is
/// the part of it subframe decoding depends on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
  /// Number of samples per subframe.
  pub block_size: u32,
  /// Number of channels that also represent the number of subframes.
  pub channels: u8,
  /// Channel assignment order.
  pub channel_assignment: ChannelAssignment,
  /// Size, in bits, per sample.
  pub bits_per_sample: usize,
}
