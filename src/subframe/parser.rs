use log::{debug, trace};

use crate::error::{Error, Invalid, Result};
use crate::subframe::{
  self,
  Subframe, Data,
  MAX_FIXED_ORDER, MAX_LPC_ORDER,
  CodingMethod, PartitionedRiceContents,
};
use crate::subframe::decoder::{
  apply_wasted_bits,
  fixed_restore_signal, lpc_restore_signal, needs_wide_accumulator,
};
use crate::utility::{power_of_two, BitReader, BufferPool, PooledBuffer};

/// Decodes subframes, recycling sample buffers through a pool.
///
/// A decoder is cheap to clone; clones share the pool.
#[derive(Debug, Clone, Default)]
pub struct SubframeDecoder {
  pool: BufferPool,
}

impl SubframeDecoder {
  pub fn new() -> Self {
    SubframeDecoder::default()
  }

  pub fn with_pool(pool: BufferPool) -> Self {
    SubframeDecoder { pool: pool }
  }

  pub fn pool(&self) -> &BufferPool {
    &self.pool
  }

  /// Decodes one subframe of `block_size` samples.
  ///
  /// `bits_per_sample` already includes the extra bit of a side channel.
  pub fn decode<R: BitReader>(&self,
                              reader: &mut R,
                              block_size: usize,
                              bits_per_sample: usize)
                              -> Result<Subframe> {
    parse(reader, block_size, bits_per_sample, Some(&self.pool))
  }
}

/// Parse a single channel of audio data.
///
/// Consumes exactly the bits of one subframe from `reader`. Samples land in
/// freshly allocated buffers, use `SubframeDecoder` to reuse them instead.
pub fn subframe_parser<R: BitReader>(reader: &mut R,
                                     block_size: usize,
                                     bits_per_sample: usize)
                                     -> Result<Subframe> {
  parse(reader, block_size, bits_per_sample, None)
}

fn parse<R: BitReader>(reader: &mut R,
                       block_size: usize,
                       bits_per_sample: usize,
                       pool: Option<&BufferPool>)
                       -> Result<Subframe> {
  let result = parse_subframe(reader, block_size, bits_per_sample, pool);

  if let Err(ref error) = result {
    debug!("subframe rejected: {}", error);
  }

  result
}

fn parse_subframe<R: BitReader>(reader: &mut R,
                                block_size: usize,
                                bits_per_sample: usize,
                                pool: Option<&BufferPool>)
                                -> Result<Subframe> {
  if bits_per_sample == 0 || bits_per_sample > 32 {
    return Err(Invalid::BitsPerSample(bits_per_sample).into());
  }

  let (subframe_type, has_wasted_bits) = header(reader)?;

  let wasted_bits = if has_wasted_bits {
    wasted_bits(reader)?
  } else {
    0
  };

  if wasted_bits as usize >= bits_per_sample {
    return Err(Invalid::WastedBits {
      wasted_bits: wasted_bits,
      bits_per_sample: bits_per_sample,
    }.into());
  }

  trace!("subframe type {:#08b}, {} wasted bits, block size {}",
         subframe_type, wasted_bits, block_size);

  let mut subframe_data = data(reader,
                               bits_per_sample - wasted_bits as usize,
                               block_size, subframe_type, pool)?;

  match subframe_data {
    Data::Constant(ref mut constant) => *constant <<= wasted_bits,
    Data::Verbatim(ref mut samples)  => {
      apply_wasted_bits(wasted_bits, samples)
    }
    Data::Fixed(ref mut fixed)       => {
      apply_wasted_bits(wasted_bits, &mut fixed.samples)
    }
    Data::LPC(ref mut lpc)           => {
      apply_wasted_bits(wasted_bits, &mut lpc.samples)
    }
  }

  Ok(Subframe::new(subframe_data, block_size, wasted_bits))
}

fn allocate(pool: Option<&BufferPool>, length: usize) -> PooledBuffer {
  match pool {
    Some(pool) => pool.take(length),
    None       => PooledBuffer::detached(length),
  }
}

// Parses the first byte of the subframe. The first bit must be zero to
// prevent sync-fooling, next six bits determines the subframe data type.
// Last bit is is there is wasted bits per sample, value one being true.
pub fn header<R: BitReader>(reader: &mut R) -> Result<(u8, bool)> {
  let byte = reader.read_bits_u32(8).ok_or(Error::Truncated)? as u8;

  let is_valid        = (byte >> 7) == 0;
  let subframe_type   = (byte >> 1) & 0b111111;
  let has_wasted_bits = (byte & 0b01) == 1;

  if is_valid {
    Ok((subframe_type, has_wasted_bits))
  } else {
    Err(Invalid::PaddingBit.into())
  }
}

// The wasted bit count is stored minus one in unary, as zeros closed off by
// a one bit.
fn wasted_bits<R: BitReader>(reader: &mut R) -> Result<u32> {
  let zeros = reader.read_unary().ok_or(Error::Truncated)?;

  Ok(zeros.saturating_add(1))
}

fn data<R: BitReader>(reader: &mut R,
                      bits_per_sample: usize,
                      block_size: usize,
                      subframe_type: u8,
                      pool: Option<&BufferPool>)
                      -> Result<Data> {
  match subframe_type {
    0b000000            => constant(reader, bits_per_sample),
    0b000001            => verbatim(reader, bits_per_sample, block_size, pool),
    0b001000..=0b001111 => {
      let order = (subframe_type & 0b0111) as usize;

      fixed(reader, order, bits_per_sample, block_size, pool)
    }
    0b100000..=0b111111 => {
      let order = (subframe_type & 0b011111) as usize + 1;

      lpc(reader, order, bits_per_sample, block_size, pool)
    }
    _                   => Err(Invalid::SubframeType(subframe_type).into()),
  }
}

pub fn constant<R: BitReader>(reader: &mut R, bits_per_sample: usize)
                              -> Result<Data> {
  let value = reader.read_bits_i32(bits_per_sample as u32)
                .ok_or(Error::Truncated)?;

  Ok(Data::Constant(value))
}

pub fn verbatim<R: BitReader>(reader: &mut R,
                              bits_per_sample: usize,
                              block_size: usize,
                              pool: Option<&BufferPool>)
                              -> Result<Data> {
  let mut samples = allocate(pool, block_size);

  read_signed(reader, bits_per_sample, &mut samples)?;

  Ok(Data::Verbatim(samples))
}

pub fn fixed<R: BitReader>(reader: &mut R,
                           order: usize,
                           bits_per_sample: usize,
                           block_size: usize,
                           pool: Option<&BufferPool>)
                           -> Result<Data> {
  if order > MAX_FIXED_ORDER {
    return Err(Invalid::FixedOrder(order).into());
  }

  check_block_size(block_size, order)?;

  let mut samples = allocate(pool, block_size);

  read_signed(reader, bits_per_sample, &mut samples[0..order])?;

  let entropy_coding_method = residual(reader, order, block_size,
                                       &mut samples[order..])?;

  fixed_restore_signal(order, &mut samples);

  Ok(Data::Fixed(subframe::Fixed {
    entropy_coding_method: entropy_coding_method,
    order: order as u8,
    samples: samples,
  }))
}

// This parser finds the bit length for each quantized linear predictor
// coefficient. To prevent sync fooling, four bit value cant be all ones.
fn qlp_coefficient_precision<R: BitReader>(reader: &mut R) -> Result<u8> {
  let precision = reader.read_bits_u32(4).ok_or(Error::Truncated)? as u8;

  if precision == 0b1111 {
    Err(Invalid::QlpPrecision.into())
  } else {
    Ok(precision + 1)
  }
}

pub fn lpc<R: BitReader>(reader: &mut R,
                         order: usize,
                         bits_per_sample: usize,
                         block_size: usize,
                         pool: Option<&BufferPool>)
                         -> Result<Data> {
  if order < 1 || order > MAX_LPC_ORDER {
    return Err(Invalid::LpcOrder(order).into());
  }

  check_block_size(block_size, order)?;

  let mut samples = allocate(pool, block_size);

  read_signed(reader, bits_per_sample, &mut samples[0..order])?;

  let qlp_coeff_precision = qlp_coefficient_precision(reader)?;
  let quantization_level  = reader.read_bits_i32(5)
                              .ok_or(Error::Truncated)? as i8;

  if quantization_level < 0 {
    return Err(Invalid::QlpShift(quantization_level).into());
  }

  let mut qlp_coefficients = vec![0; order];

  read_signed(reader, qlp_coeff_precision as usize, &mut qlp_coefficients)?;

  let entropy_coding_method = residual(reader, order, block_size,
                                       &mut samples[order..])?;
  let wide = needs_wide_accumulator(bits_per_sample,
                                    qlp_coeff_precision as u32, order);

  lpc_restore_signal(&qlp_coefficients, quantization_level as u32, wide,
                     &mut samples);

  Ok(Data::LPC(subframe::LPC {
    entropy_coding_method: entropy_coding_method,
    order: order as u8,
    qlp_coeff_precision: qlp_coeff_precision,
    quantization_level: quantization_level,
    qlp_coefficients: qlp_coefficients,
    samples: samples,
  }))
}

fn check_block_size(block_size: usize, order: usize) -> Result<()> {
  if block_size < order {
    Err(Invalid::BlockSize {
      block_size: block_size,
      order: order,
    }.into())
  } else {
    Ok(())
  }
}

fn read_signed<R: BitReader>(reader: &mut R,
                             bits_per_sample: usize,
                             samples: &mut [i32])
                             -> Result<()> {
  let bit_count = bits_per_sample as u32;

  for sample in samples {
    *sample = reader.read_bits_i32(bit_count).ok_or(Error::Truncated)?;
  }

  Ok(())
}

// Parser for figuring out the partitioned Rice coding, which there are only
// two, and the parser with fail when value is greater than one.
fn coding_method<R: BitReader>(reader: &mut R) -> Result<CodingMethod> {
  let method = reader.read_bits_u32(2).ok_or(Error::Truncated)? as u8;

  match method {
    0 => Ok(CodingMethod::PartitionedRice),
    1 => Ok(CodingMethod::PartitionedRice2),
    _ => Err(Invalid::CodingMethod(method).into()),
  }
}

/// Decodes the residual of a `predictor_order` subframe into `output`,
/// which must hold `block_size - predictor_order` samples.
pub fn residual<R: BitReader>(reader: &mut R,
                              predictor_order: usize,
                              block_size: usize,
                              output: &mut [i32])
                              -> Result<subframe::EntropyCodingMethod> {
  debug_assert_eq!(output.len() + predictor_order, block_size);

  let method          = coding_method(reader)?;
  let partition_order = reader.read_bits_u32(4).ok_or(Error::Truncated)?;

  rice_partition(reader, partition_order, predictor_order, block_size,
                 method, output)
}

/// Number of residuals stored in `partition`. The first partition leaves
/// room for the warm up samples.
pub fn partition_len(block_size: usize,
                     predictor_order: usize,
                     partition_order: u32,
                     partition: usize)
                     -> usize {
  let partition_size = block_size >> partition_order;

  if partition == 0 {
    partition_size - predictor_order
  } else {
    partition_size
  }
}

fn rice_partition<R: BitReader>(reader: &mut R,
                                partition_order: u32,
                                predictor_order: usize,
                                block_size: usize,
                                method: CodingMethod,
                                residual: &mut [i32])
                                -> Result<subframe::EntropyCodingMethod> {
  let (param_size, escape_code) = method.parameter_size();

  let partitions     = power_of_two(partition_order) as usize;
  let partition_size = block_size >> partition_order;

  if partition_order > 0 {
    if partition_size < predictor_order {
      return Err(Invalid::PartitionSize {
        partition_size: partition_size,
        order: predictor_order,
      }.into());
    }

    if partition_size * partitions != block_size {
      return Err(Invalid::PartitionCount {
        block_size: block_size,
        partitions: partitions,
      }.into());
    }
  }

  trace!("residual: {:?}, {} partitions of {} samples",
         method, partitions, partition_size);

  let is_rice2     = method == CodingMethod::PartitionedRice2;
  let mut sample   = 0;
  let mut contents = PartitionedRiceContents::new(partitions);

  for partition in 0..partitions {
    let start = sample;
    let end   = sample + partition_len(block_size, predictor_order,
                                       partition_order, partition);
    let rice_parameter = reader.read_bits_u32(param_size)
                           .ok_or(Invalid::Residual)?;
    let samples        = &mut residual[start..end];

    if rice_parameter == escape_code {
      let size = reader.read_bits_u32(5).ok_or(Invalid::Residual)?;

      for sample in samples.iter_mut() {
        *sample = reader.read_bits_i32(size).ok_or(Invalid::Residual)?;
      }

      contents.raw_bits.push(size);
    } else {
      if !reader.read_rice_codes(samples, rice_parameter, is_rice2) {
        return Err(Invalid::Residual.into());
      }

      contents.raw_bits.push(0);
    }

    contents.parameters.push(rice_parameter);

    sample = end;
  }

  debug_assert_eq!(sample, residual.len());

  Ok(subframe::EntropyCodingMethod {
    method_type: method,
    data: subframe::PartitionedRice {
      order: partition_order,
      contents: contents,
    },
  })
}
