// A parser combinator for converting parsed unsigned numbers into signed
// two's complement based numbers. Without an explicit type passed in, the
// default return type is `i32`. Passing `i64` reads up to 64 bits. The
// count is a `usize`, as `take_bits!` expects.
macro_rules! take_signed_bits (
  ($input: expr, i64, $count: expr) => (
    map!($input, take_bits!(u64, $count), |value| {
      $crate::utility::extend_sign_u64(value, $count as u32)
    })
  );
  ($input: expr, $signed_type: ty, $count: expr) => (
    map!($input, take_bits!(u32, $count), |value| {
      $crate::utility::extend_sign(value, $count as u32) as $signed_type
    })
  );
  ($input: expr, $count: expr) => (
    take_signed_bits!($input, i32, $count)
  );
);
