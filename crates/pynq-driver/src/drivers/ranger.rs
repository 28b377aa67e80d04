//! Ultrasonic ranger drivers
//!
//! The ranger program times the echo pulse in FCLK0 cycles and leaves the
//! count in mailbox word 0. The host converts cycles to microseconds and
//! microseconds to centimetres (58 µs per cm round trip).

use super::ledbar;
use crate::config::BoardConfig;
use crate::error::Result;
use crate::mailbox::{configure, Mailbox};
use pynq_chip::GroveGroup;
use tracing::warn;

/// Distance reported when the echo takes longer than [`MAX_ECHO_MS`].
pub const OUT_OF_RANGE_CM: f64 = 500.0;

/// Longest echo accepted before the reading is treated as out of range.
const MAX_ECHO_MS: f64 = 30.0;

/// Echo time per centimetre of distance.
const US_PER_CM: f64 = 58.0;

/// Convert an echo pulse of `cycles` FCLK0 cycles to centimetres.
#[allow(clippy::cast_precision_loss)]
pub fn pulse_to_distance_cm(cycles: u32, clock_period_ns: u64) -> f64 {
    let micros = f64::from(cycles) * clock_period_ns as f64 * 0.001;
    if micros * 0.001 > MAX_ECHO_MS {
        warn!("Echo of {micros:.0}us exceeds {MAX_ECHO_MS}ms, reporting out of range");
        OUT_OF_RANGE_CM
    } else {
        micros / US_PER_CM
    }
}

fn read_distance<M: Mailbox>(mailbox: &mut M, opcode: u32, config: &BoardConfig) -> Result<f64> {
    mailbox.write_blocking_command(opcode)?;
    let cycles = mailbox.read_word(0)?;
    Ok(pulse_to_distance_cm(cycles, config.clock_period_ns()))
}

/// Grove ultrasonic ranger on a digital connector
#[derive(Debug)]
pub struct GroveUsRanger<M: Mailbox> {
    mailbox: M,
    config: BoardConfig,
}

impl<M: Mailbox> GroveUsRanger<M> {
    /// Program file.
    pub const PROGRAM: &'static str = "arduino_grove_usranger.bin";
    const GET_DISTANCE: u32 = 0x3;

    /// Load the ranger program on `group`
    ///
    /// # Errors
    ///
    /// Returns error if `group` is not G1–G7 or the program cannot be started.
    pub fn new(mut mailbox: M, group: GroveGroup, config: BoardConfig) -> Result<Self> {
        let pins = super::digital_pins("ultrasonic ranger", group)?;
        configure(&mut mailbox, Self::PROGRAM, pins)?;
        Ok(Self { mailbox, config })
    }

    /// Distance to the nearest obstacle in centimetres
    ///
    /// Returns [`OUT_OF_RANGE_CM`] when no echo arrives in time.
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn distance_cm(&mut self) -> Result<f64> {
        read_distance(&mut self.mailbox, Self::GET_DISTANCE, &self.config)
    }

    /// Release the mailbox
    pub fn into_inner(self) -> M {
        self.mailbox
    }
}

/// Ultrasonic ranger driving an LED bar alarm
#[derive(Debug)]
pub struct GroveAutoAlarm<M: Mailbox> {
    mailbox: M,
    config: BoardConfig,
}

impl<M: Mailbox> GroveAutoAlarm<M> {
    /// Program file.
    pub const PROGRAM: &'static str = "arduino_grove_autoalarm.bin";
    const GET_DISTANCE: u32 = 0x3;
    const WRITE_LEDS: u32 = 0x5;

    /// Load the alarm program with the ranger on `ranger` and LED bar on `led`
    ///
    /// # Errors
    ///
    /// Returns error if either connector is not G1–G7 or the program cannot
    /// be started.
    pub fn new(mut mailbox: M, ranger: GroveGroup, led: GroveGroup, config: BoardConfig) -> Result<Self> {
        let ranger_pins = super::digital_pins("ultrasonic ranger", ranger)?;
        let led_pins = super::digital_pins("LED bar", led)?;
        let pins = [ranger_pins, led_pins].concat();
        configure(&mut mailbox, Self::PROGRAM, &pins)?;
        Ok(Self { mailbox, config })
    }

    /// Distance in centimetres, see [`GroveUsRanger::distance_cm`]
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn distance_cm(&mut self) -> Result<f64> {
        read_distance(&mut self.mailbox, Self::GET_DISTANCE, &self.config)
    }

    /// Light the LED bar from the 10 low bits of `data` (bit 0 = red end)
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn write_binary(&mut self, data: u32) -> Result<()> {
        ledbar::write_binary(&mut self.mailbox, Self::WRITE_LEDS, data)
    }

    /// Release the mailbox
    pub fn into_inner(self) -> M {
        self.mailbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycles_to_centimetres() {
        // 10 ns clock: 58_000 cycles = 580 µs = 10 cm
        assert!((pulse_to_distance_cm(58_000, 10) - 10.0).abs() < 1e-9);
        assert_eq!(pulse_to_distance_cm(0, 10), 0.0);
    }

    #[test]
    fn long_echo_is_out_of_range() {
        // 3_100_000 cycles at 10 ns is 31 ms
        assert_eq!(pulse_to_distance_cm(3_100_000, 10), OUT_OF_RANGE_CM);
        assert!((pulse_to_distance_cm(1_160_000, 10) - 200.0).abs() < 1e-6);
    }
}
