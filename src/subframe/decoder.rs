use log::trace;

use crate::subframe::{MAX_FIXED_ORDER, MAX_LPC_ORDER};
use crate::utility::ilog2;

// Fixed polynomial coefficients, most recent sample first.
const POLYNOMIAL: [&[i32]; MAX_FIXED_ORDER + 1] = [ &[]
                                                  , &[1]
                                                  , &[2, -1]
                                                  , &[3, -3, 1]
                                                  , &[4, -6, 4, -1]
                                                  ];

/// Restores a fixed prediction signal in place.
///
/// `buffer` holds the `order` warm up samples followed by the residuals,
/// which get replaced by the restored samples from left to right. There is
/// no shift involved, so wrapping 32-bit arithmetic gives the exact result
/// whenever the true sample fits in 32 bits.
pub fn fixed_restore_signal(order: usize, buffer: &mut [i32]) {
  debug_assert!(order <= MAX_FIXED_ORDER);
  debug_assert!(order <= buffer.len());

  let coefficients = POLYNOMIAL[order];

  for i in order..buffer.len() {
    let prediction = coefficients.iter()
                       .zip(buffer[(i - order)..i].iter().rev())
                       .fold(0i32, |result, (coefficient, signal)|
                             result.wrapping_add(coefficient.wrapping_mul(*signal)));

    buffer[i] = buffer[i].wrapping_add(prediction);
  }
}

/// Decides whether the LPC dot product can overflow 32 bits.
///
/// Samples take `bits_per_sample` bits and coefficients `precision` bits,
/// so a sum of `order` products stays within
/// `bits_per_sample + precision + log2(order)` bits.
pub fn needs_wide_accumulator(bits_per_sample: usize,
                              precision: u32,
                              order: usize)
                              -> bool {
  bits_per_sample as u32 + precision + ilog2(order as u32) > 32
}

// Picks an unrolled kernel for orders up to eight and falls back to the
// generic loop for everything else.
macro_rules! dispatch_order (
  ($unrolled: ident, $generic: ident,
   $coefficients: expr, $shift: expr, $buffer: expr) => (
    match $coefficients.len() {
      1 => $unrolled::<1>($coefficients, $shift, $buffer),
      2 => $unrolled::<2>($coefficients, $shift, $buffer),
      3 => $unrolled::<3>($coefficients, $shift, $buffer),
      4 => $unrolled::<4>($coefficients, $shift, $buffer),
      5 => $unrolled::<5>($coefficients, $shift, $buffer),
      6 => $unrolled::<6>($coefficients, $shift, $buffer),
      7 => $unrolled::<7>($coefficients, $shift, $buffer),
      8 => $unrolled::<8>($coefficients, $shift, $buffer),
      _ => $generic($coefficients, $shift, $buffer),
    }
  );
);

/// Restores an LPC signal in place.
///
/// `buffer` holds `coefficients.len()` warm up samples followed by the
/// residuals. `coefficients[0]` weighs the sample right before the one
/// being restored. With `wide` set the prediction is accumulated in 64 bits
/// before shifting, which is exact for coefficients of up to 15 bits, the
/// widest the format stores. Wider coefficients wrap instead of panicking.
pub fn lpc_restore_signal(coefficients: &[i32],
                          shift: u32,
                          wide: bool,
                          buffer: &mut [i32]) {
  let order = coefficients.len();

  debug_assert!(order >= 1 && order <= MAX_LPC_ORDER);
  debug_assert!(order <= buffer.len());
  debug_assert!(shift < 32);

  trace!("lpc restore: order {}, shift {}, wide {}", order, shift, wide);

  if wide {
    dispatch_order!(restore_wide_unrolled, restore_wide,
                    coefficients, shift, buffer)
  } else {
    dispatch_order!(restore_narrow_unrolled, restore_narrow,
                    coefficients, shift, buffer)
  }
}

fn restore_narrow(coefficients: &[i32], shift: u32, buffer: &mut [i32]) {
  let order = coefficients.len();

  for i in order..buffer.len() {
    let prediction = coefficients.iter()
                       .zip(buffer[(i - order)..i].iter().rev())
                       .fold(0i32, |result, (coefficient, signal)|
                             result.wrapping_add(coefficient.wrapping_mul(*signal)));

    buffer[i] = buffer[i].wrapping_add(prediction >> shift);
  }
}

fn restore_wide(coefficients: &[i32], shift: u32, buffer: &mut [i32]) {
  let order = coefficients.len();

  for i in order..buffer.len() {
    // 32 products of a 15-bit coefficient and a 32-bit sample stay well
    // within 64 bits; anything wider wraps.
    let prediction = coefficients.iter()
                       .zip(buffer[(i - order)..i].iter().rev())
                       .fold(0i64, |result, (coefficient, signal)|
                             result.wrapping_add((*coefficient as i64) *
                                                 (*signal as i64)));

    buffer[i] = (buffer[i] as i64).wrapping_add(prediction >> shift) as i32;
  }
}

fn restore_narrow_unrolled<const N: usize>(coefficients: &[i32],
                                           shift: u32,
                                           buffer: &mut [i32]) {
  let mut weights = [0i32; N];

  weights.copy_from_slice(coefficients);

  for i in N..buffer.len() {
    let history        = &buffer[(i - N)..i];
    let mut prediction = 0i32;

    for k in 0..N {
      prediction = prediction.wrapping_add(
        weights[k].wrapping_mul(history[N - 1 - k]));
    }

    buffer[i] = buffer[i].wrapping_add(prediction >> shift);
  }
}

fn restore_wide_unrolled<const N: usize>(coefficients: &[i32],
                                         shift: u32,
                                         buffer: &mut [i32]) {
  let mut weights = [0i64; N];

  for (weight, coefficient) in weights.iter_mut().zip(coefficients) {
    *weight = *coefficient as i64;
  }

  for i in N..buffer.len() {
    let history        = &buffer[(i - N)..i];
    let mut prediction = 0i64;

    for k in 0..N {
      prediction = prediction.wrapping_add(
        weights[k] * history[N - 1 - k] as i64);
    }

    buffer[i] = (buffer[i] as i64).wrapping_add(prediction >> shift) as i32;
  }
}

/// Restores the low bits the encoder stripped from every sample.
pub fn apply_wasted_bits(wasted_bits: u32, buffer: &mut [i32]) {
  debug_assert!(wasted_bits < 32);

  if wasted_bits > 0 {
    for value in buffer {
      *value <<= wasted_bits;
    }
  }
}
