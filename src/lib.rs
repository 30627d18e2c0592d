//! Subframe decoding for [FLAC](https://xiph.org/flac), free lossless audio
//! codec, written in Rust.
//!
//! A subframe is one channel of one block of audio. It's stored either as a
//! constant, verbatim, or as a fixed polynomial or LPC prediction over a
//! partitioned Rice coded residual. Decoding restores the exact integer
//! samples the encoder was given.
//!
//! ```
//! use flac_subframe::{subframe_parser, BitStream, ReadResult};
//!
//! // Constant subframe holding -3 in 8 bits per sample.
//! let bytes      = [0b0000_0000, 0b1111_1101];
//! let mut reader = BitStream::new(&bytes);
//! let subframe   = subframe_parser(&mut reader, 4, 8).unwrap();
//! let mut output = [0; 4];
//!
//! assert_eq!(subframe.read(&mut output), ReadResult::Samples(4));
//! assert_eq!(output, [-3, -3, -3, -3]);
//! ```

#[macro_use]
extern crate nom;

#[macro_use]
mod utility;
pub mod error;
pub mod frame;
pub mod subframe;

#[cfg(test)]
#[path = "../tests/common/xorshift.rs"]
mod xorshift;

pub use error::{Error, Invalid, Result};
pub use frame::{ChannelAssignment, Header};
pub use subframe::{subframe_parser, Subframe, SubframeDecoder, ReadResult};
pub use utility::{BitReader, BitStream, BufferPool, PooledBuffer};
