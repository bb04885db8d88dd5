//! Half-precision codec: bit-exact conversion between the 16-bit compact
//! float encoding and `f32`.
//!
//! # Layout
//!
//! | bits  | field    |
//! |-------|----------|
//! | 15    | sign     |
//! | 14-10 | exponent (bias 15) |
//! | 9-0   | mantissa |
//!
//! Decoding is exact for every bit pattern, subnormals included. Encoding
//! rounds the mantissa to nearest on the first discarded bit, saturates
//! exponent overflow to infinity and flushes exponent underflow to signed
//! zero, so it never produces a subnormal. Both directions are total.
//!
//! # Example
//!
//! ```
//! use halfbit_core::codec::{decode_half, encode_half, Half};
//!
//! let h = encode_half(1.5);
//! assert_eq!(h.to_bits(), 0x3e00);
//! assert_eq!(decode_half(h), 1.5);
//! assert!(decode_half(Half::NAN).is_nan());
//! ```

use std::fmt;

/// Largest finite magnitude representable in half precision.
pub const HALF_MAX: f32 = 65504.0;

const SIGN_MASK: u16 = 0x8000;
const EXPONENT_MASK: u16 = 0x7c00;
const MANTISSA_MASK: u16 = 0x03ff;

/// 2^-24, the value of one subnormal mantissa step.
const SUBNORMAL_STEP: f32 = 1.0 / 16_777_216.0;

/// A compact half-precision value (1 sign, 5 exponent, 10 mantissa bits).
///
/// The bit layout is the contract: `Half` is `repr(transparent)` over `u16`
/// so slices of it can be handed to the F16C conversion instructions as-is.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Half(u16);

impl Half {
    /// Positive zero.
    pub const ZERO: Half = Half(0x0000);
    /// Negative zero.
    pub const NEG_ZERO: Half = Half(0x8000);
    /// One.
    pub const ONE: Half = Half(0x3c00);
    /// Largest finite value, 65504.
    pub const MAX: Half = Half(0x7bff);
    /// Smallest positive subnormal, 2^-24.
    pub const MIN_POSITIVE_SUBNORMAL: Half = Half(0x0001);
    /// Positive infinity.
    pub const INFINITY: Half = Half(0x7c00);
    /// Negative infinity.
    pub const NEG_INFINITY: Half = Half(0xfc00);
    /// Canonical NaN as produced by [`encode_half`].
    pub const NAN: Half = Half(0x7c01);

    /// Wraps raw bits.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u16 {
        self.0
    }

    /// Encodes an `f32`, see [`encode_half`].
    #[inline]
    #[must_use]
    pub fn from_f32(value: f32) -> Self {
        encode_half(value)
    }

    /// Decodes to `f32`, see [`decode_half`].
    #[inline]
    #[must_use]
    pub fn to_f32(self) -> f32 {
        decode_half(self)
    }

    /// Returns `true` if the sign bit is set (including `-0` and negative NaN).
    #[inline]
    #[must_use]
    pub const fn is_sign_negative(self) -> bool {
        self.0 & SIGN_MASK != 0
    }

    /// Returns `true` for any NaN bit pattern.
    #[inline]
    #[must_use]
    pub const fn is_nan(self) -> bool {
        self.0 & EXPONENT_MASK == EXPONENT_MASK && self.0 & MANTISSA_MASK != 0
    }

    /// Returns `true` for positive or negative infinity.
    #[inline]
    #[must_use]
    pub const fn is_infinite(self) -> bool {
        self.0 & !SIGN_MASK == EXPONENT_MASK
    }

    /// Returns `true` for zero, subnormal and normal values.
    #[inline]
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.0 & EXPONENT_MASK != EXPONENT_MASK
    }

    /// Returns `true` for nonzero values with an all-zero exponent.
    #[inline]
    #[must_use]
    pub const fn is_subnormal(self) -> bool {
        self.0 & EXPONENT_MASK == 0 && self.0 & MANTISSA_MASK != 0
    }
}

impl fmt::Debug for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Half({:#06x} = {})", self.0, self.to_f32())
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f32(), f)
    }
}

impl From<half::f16> for Half {
    #[inline]
    fn from(value: half::f16) -> Self {
        Self(value.to_bits())
    }
}

impl From<Half> for half::f16 {
    #[inline]
    fn from(value: Half) -> Self {
        half::f16::from_bits(value.0)
    }
}

impl From<Half> for f32 {
    #[inline]
    fn from(value: Half) -> Self {
        decode_half(value)
    }
}

/// Decodes a half-precision value to `f32`.
///
/// Exact for every finite input. Any NaN pattern decodes to a quiet `f32`
/// NaN; the payload is not preserved.
#[inline]
#[must_use]
pub fn decode_half(h: Half) -> f32 {
    let bits = h.0;
    let negative = bits & SIGN_MASK != 0;
    let exponent = u32::from((bits & EXPONENT_MASK) >> 10);
    let mantissa = u32::from(bits & MANTISSA_MASK);

    let magnitude = match exponent {
        0 => {
            if mantissa == 0 {
                0.0
            } else {
                // mantissa < 2^10, so the product is exact
                #[allow(clippy::cast_precision_loss)]
                let m = mantissa as f32;
                m * SUBNORMAL_STEP
            }
        }
        31 => {
            if mantissa != 0 {
                return f32::NAN;
            }
            f32::INFINITY
        }
        // Rebias 15 -> 127 and widen the mantissa; exact by construction.
        _ => f32::from_bits(((exponent + 112) << 23) | (mantissa << 13)),
    };

    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Encodes an `f32` as half precision.
///
/// - the 13 discarded mantissa bits round to nearest on their top bit,
///   carrying into the exponent when the mantissa overflows;
/// - rebiased exponents `>= 31` saturate to signed infinity;
/// - rebiased exponents `<= 0` flush to signed zero;
/// - infinity maps to signed infinity, NaN to signed NaN with a one-bit payload.
#[inline]
#[must_use]
pub fn encode_half(value: f32) -> Half {
    let bits = value.to_bits();
    // Each field is masked to its width, so the narrowing casts are lossless.
    #[allow(clippy::cast_possible_truncation)]
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exponent = (bits >> 23) & 0xff;
    let mantissa = bits & 0x007f_ffff;

    if exponent == 0xff {
        let payload = u16::from(mantissa != 0);
        return Half(sign | EXPONENT_MASK | payload);
    }

    #[allow(clippy::cast_possible_wrap)]
    let mut rebiased = exponent as i32 - 127 + 15;
    if rebiased >= 31 {
        return Half(sign | EXPONENT_MASK);
    }
    if rebiased <= 0 {
        return Half(sign);
    }

    #[allow(clippy::cast_possible_truncation)]
    let mut half_mantissa = (mantissa >> 13) as u16;
    if mantissa & 0x1000 != 0 {
        half_mantissa += 1;
        if half_mantissa == 0x400 {
            half_mantissa = 0;
            rebiased += 1;
            if rebiased == 31 {
                return Half(sign | EXPONENT_MASK);
            }
        }
    }

    // 1 <= rebiased <= 30 here
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let exponent_bits = (rebiased as u16) << 10;
    Half(sign | exponent_bits | half_mantissa)
}

/// Encodes an `f32`, rejecting values that do not fit.
///
/// Returns `None` for NaN, infinities and magnitudes above [`HALF_MAX`].
#[inline]
#[must_use]
pub fn try_encode_half(value: f32) -> Option<Half> {
    if value.is_finite() && value.abs() <= HALF_MAX {
        Some(encode_half(value))
    } else {
        None
    }
}
