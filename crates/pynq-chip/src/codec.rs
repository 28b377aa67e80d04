//! Register-word codec.
//!
//! Every co-processor program hands its results back as raw 32-bit mailbox
//! words. Floating point readings are the IEEE-754 single-precision bit
//! pattern, integer readings are two's-complement. The helpers here are the
//! only place that layout is interpreted.
//!
//! ```text
//!  31  30        23 22                        0
//! ┌───┬────────────┬───────────────────────────┐
//! │ S │  exponent  │          mantissa         │
//! └───┴────────────┴───────────────────────────┘
//!        biased +127     fraction of 2^23
//! ```
//!
//! [`decode_float`] is exact. [`decode_float_rounded`] applies the two-decimal
//! display convention on top of it and is meant for presentation only.

// ── Field layout ─────────────────────────────────────────────────────────────

/// Sign bit (bit 31).
pub const SIGN_MASK: u32 = 0x8000_0000;
/// Biased exponent field (bits 30..23).
pub const EXPONENT_MASK: u32 = 0x7F80_0000;
/// Mantissa field (bits 22..0).
pub const MANTISSA_MASK: u32 = 0x007F_FFFF;
/// Bit position of the exponent field.
pub const EXPONENT_SHIFT: u32 = 23;
/// Number of stored mantissa bits.
pub const MANTISSA_BITS: u32 = 23;
/// IEEE-754 single-precision exponent bias.
pub const EXPONENT_BIAS: i32 = 127;
/// Biased exponent reserved for infinities and NaNs.
pub const EXPONENT_SPECIAL: u8 = 0xFF;

/// Decimal digits kept by the display convention.
pub const DISPLAY_DECIMALS: i32 = 2;

/// A raw 32-bit word read from a mailbox slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RegisterWord(pub u32);

impl RegisterWord {
    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Sign bit.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 & SIGN_MASK != 0
    }

    /// Stored (biased) exponent.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // masked to 8 bits
    pub const fn biased_exponent(self) -> u8 {
        ((self.0 & EXPONENT_MASK) >> EXPONENT_SHIFT) as u8
    }

    /// Stored mantissa, without the implicit leading bit.
    #[must_use]
    pub const fn mantissa(self) -> u32 {
        self.0 & MANTISSA_MASK
    }

    /// Interpret as IEEE-754 single precision.
    #[must_use]
    pub fn as_float(self) -> f32 {
        decode_float(self.0)
    }

    /// Interpret as two's-complement signed integer.
    #[must_use]
    pub const fn as_int(self) -> i32 {
        decode_int(self.0)
    }
}

impl From<u32> for RegisterWord {
    fn from(word: u32) -> Self {
        Self(word)
    }
}

impl From<RegisterWord> for u32 {
    fn from(word: RegisterWord) -> Self {
        word.0
    }
}

impl std::fmt::Display for RegisterWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Reconstruct an IEEE-754 single-precision value from its bit fields.
///
/// Total over all 2^32 inputs. Zero maps to `0.0`, a biased exponent of 0 is
/// subnormal (no implicit leading 1, scale 2^-126), a biased exponent of 255
/// is an infinity or NaN. For every non-NaN word the result is bit-identical
/// to [`f32::from_bits`]; NaN payloads are not preserved.
#[must_use]
pub fn decode_float(word: u32) -> f32 {
    if word == 0 {
        return 0.0;
    }

    let reg = RegisterWord(word);
    let fraction = f64::from(reg.mantissa()) / f64::from(1u32 << MANTISSA_BITS);

    let magnitude = match reg.biased_exponent() {
        0 => fraction * 2f64.powi(1 - EXPONENT_BIAS),
        EXPONENT_SPECIAL if reg.mantissa() == 0 => f64::INFINITY,
        EXPONENT_SPECIAL => return f32::NAN,
        biased => (1.0 + fraction) * 2f64.powi(i32::from(biased) - EXPONENT_BIAS),
    };

    let sign = if reg.is_negative() { -1.0 } else { 1.0 };

    // Every f32 is exactly representable in f64, so this narrowing is lossless.
    #[allow(clippy::cast_possible_truncation)]
    let value = (sign * magnitude) as f32;
    value
}

/// [`decode_float`] followed by [`round_display`].
#[must_use]
pub fn decode_float_rounded(word: u32) -> f32 {
    round_display(decode_float(word))
}

/// Reinterpret a register word as a two's-complement `i32`.
///
/// Equivalent to `-(bit31 × 2^31) + Σ bit_i × 2^i` for `i` in `0..31`.
#[must_use]
pub const fn decode_int(word: u32) -> i32 {
    i32::from_ne_bytes(word.to_ne_bytes())
}

/// IEEE-754 bit pattern of `value`, as the co-processor would store it.
#[must_use]
pub fn encode_float(value: f32) -> u32 {
    value.to_bits()
}

/// Two's-complement bit pattern of `value`.
#[must_use]
pub const fn encode_int(value: i32) -> u32 {
    u32::from_ne_bytes(value.to_ne_bytes())
}

/// Decode a block of mailbox words as floats.
#[must_use]
pub fn decode_floats(words: &[u32]) -> Vec<f32> {
    words.iter().copied().map(decode_float).collect()
}

/// Decode a block of mailbox words as signed integers.
#[must_use]
pub fn decode_ints(words: &[u32]) -> Vec<i32> {
    words.iter().copied().map(decode_int).collect()
}

/// Round to two decimals, exact ties to even.
///
/// `0.125` gives `0.12` and `0.375` gives `0.38`, as with `%.2f` style
/// formatting. Scaling an `f32` by 100 in `f64` is exact, so only true binary
/// ties take the even branch. Non-finite values are returned unchanged.
#[must_use]
pub fn round_display(value: f32) -> f32 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(DISPLAY_DECIMALS);
    #[allow(clippy::cast_possible_truncation)]
    let rounded = ((f64::from(value) * scale).round_ties_even() / scale) as f32;
    rounded
}

/// [`round_display`] for derived quantities computed in `f64`.
#[must_use]
pub fn round_display_f64(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(DISPLAY_DECIMALS);
    (value * scale).round_ties_even() / scale
}
