//! Silicon-free model of the Pynq-Z2 Arduino co-processor interface.
//!
//! This crate has **no dependencies** and **no hardware access**. It holds the
//! pieces every peripheral driver shares: the register-word codec used to turn
//! raw mailbox words into numbers, and the Grove shield pin map used to
//! configure the co-processor's IO switch.
//!
//! # Crate organisation
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`codec`] | `u32` register word → IEEE-754 `f32` / two's-complement `i32` |
//! | [`grove`] | Grove connector groups (G1–G7, I2C) and analog channels (A0–A5) |
//!
//! # Example
//!
//! ```
//! use pynq_chip::codec::{decode_float, decode_int, round_display};
//!
//! assert_eq!(decode_float(0x3F80_0000), 1.0);
//! assert_eq!(decode_int(0xFFFF_FFFF), -1);
//! assert_eq!(round_display(decode_float(0x4049_0FDB)), 3.14);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod codec;
pub mod grove;

pub use codec::{decode_float, decode_float_rounded, decode_int, RegisterWord};
pub use grove::{AnalogChannel, GroveGroup};
