use log::trace;

use crate::error::{Invalid, Result};
use crate::frame::{ChannelAssignment, Header, MAX_CHANNELS};
use crate::subframe::{ReadResult, Subframe, SubframeDecoder};
use crate::utility::BitReader;

// The channel's bits per sample that gets adjusted are the side channels
// for `LeftSide`, `MidpointSide`, and `RightSide`. The `Independent`
// channel assignment  doesn't get adjust on any of the channels.
pub fn adjust_bits_per_sample(header: &Header, channel: usize) -> usize {
  let bits_per_sample = header.bits_per_sample;

  match header.channel_assignment {
    ChannelAssignment::Independent  => bits_per_sample,
    ChannelAssignment::LeftSide     |
    ChannelAssignment::MidpointSide => {
      if channel == 1 {
        bits_per_sample + 1
      } else {
        bits_per_sample
      }
    }
    ChannelAssignment::RightSide    => {
      if channel == 0 {
        bits_per_sample + 1
      } else {
        bits_per_sample
      }
    }
  }
}

fn check_channels(header: &Header) -> Result<()> {
  let channels = header.channels as usize;
  let is_valid = match header.channel_assignment {
    ChannelAssignment::Independent => channels >= 1 && channels <= MAX_CHANNELS,
    _                              => channels == 2,
  };

  if is_valid {
    Ok(())
  } else {
    Err(Invalid::Channels(header.channels).into())
  }
}

/// Decodes the subframe of every channel in the block, in channel order.
pub fn decode_subframes<R: BitReader>(reader: &mut R,
                                      header: &Header,
                                      decoder: &SubframeDecoder)
                                      -> Result<Vec<Subframe>> {
  check_channels(header)?;

  let block_size = header.block_size as usize;
  let channels   = header.channels as usize;

  trace!("block: {} channels, {:?}, {} samples",
         channels, header.channel_assignment, block_size);

  (0..channels).map(|channel| {
    let bits_per_sample = adjust_bits_per_sample(header, channel);

    decoder.decode(&mut *reader, block_size, bits_per_sample)
  }).collect()
}

/// Decodes all channels of a block into one planar buffer, channel after
/// channel, with stereo decorrelation undone.
pub fn decode_block<R: BitReader>(reader: &mut R,
                                  header: &Header,
                                  decoder: &SubframeDecoder)
                                  -> Result<Vec<i32>> {
  let subframes  = decode_subframes(reader, header, decoder)?;
  let block_size = header.block_size as usize;
  let mut output = vec![0; block_size * subframes.len()];

  for (subframe, channel) in subframes.iter()
                               .zip(output.chunks_mut(block_size.max(1))) {
    let result = subframe.read(channel);

    debug_assert_eq!(result, ReadResult::Samples(block_size));
  }

  decode(header.channel_assignment, &mut output);

  Ok(output)
}

pub fn decode_left_side(buffer: &mut [i32]) {
  let block_size = buffer.len() / 2;

  for i in 0..block_size {
    let left = buffer[i];
    let side = buffer[i + block_size];

    // right channel
    buffer[i + block_size] = left.wrapping_sub(side);
  }
}

pub fn decode_right_side(buffer: &mut [i32]) {
  let block_size = buffer.len() / 2;

  for i in 0..block_size {
    let side  = buffer[i];
    let right = buffer[i + block_size];

    // left channel
    buffer[i] = side.wrapping_add(right);
  }
}

pub fn decode_midpoint_side(buffer: &mut [i32]) {
  let block_size = buffer.len() / 2;

  for i in 0..block_size {
    let mut middle = buffer[i];
    let side       = buffer[i + block_size];

    middle = (middle << 1) | (side & 1);

    // left and right channel
    buffer[i]              = middle.wrapping_add(side) >> 1;
    buffer[i + block_size] = middle.wrapping_sub(side) >> 1;
  }
}

/// Undoes inter-channel decorrelation of a planar stereo buffer in place.
pub fn decode(channel_assignment: ChannelAssignment, buffer: &mut [i32]) {
  match channel_assignment {
    ChannelAssignment::Independent  => return,
    ChannelAssignment::LeftSide     => decode_left_side(buffer),
    ChannelAssignment::RightSide    => decode_right_side(buffer),
    ChannelAssignment::MidpointSide => decode_midpoint_side(buffer),
  }
}
