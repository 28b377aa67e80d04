//! LED bar and pedestrian counter
//!
//! The Grove LED bar is a 10-segment MY9221 gauge. Bit 0 of every LED word is
//! the red end, bit 9 the green end. The pedestrian counter program pairs the
//! bar with a mini PIR sensor.

use crate::error::{PynqError, Result};
use crate::mailbox::{configure, Mailbox};
use pynq_chip::GroveGroup;

/// Segments on the bar.
pub const LED_COUNT: usize = 10;

/// Per-segment brightness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Brightness {
    /// Segment off
    Off = 0x00,
    /// Dim
    Low = 0x01,
    /// Medium
    Med = 0xAA,
    /// Full
    High = 0xFF,
}

impl Brightness {
    /// Mailbox word for this level
    pub const fn word(self) -> u32 {
        self as u32
    }
}

/// Brightness applied when none is given.
pub const BRIGHTNESS_DEFAULT: [Brightness; LED_COUNT] = [Brightness::Med; LED_COUNT];

/// Highest level accepted by `SET_LEVEL`.
const MAX_LEVEL: u32 = 10;
/// Highest preset brightness accepted by `SET_LEVEL`.
const MAX_BRIGHT_LEVEL: u32 = 3;

/// Write `data` and issue the program's LED opcode.
pub(crate) fn write_binary<M: Mailbox>(mailbox: &mut M, opcode: u32, data: u32) -> Result<()> {
    mailbox.write_mailbox(0, &[data])?;
    mailbox.write_blocking_command(opcode)
}

/// LED bar state as a binary string, MSB (green) first, at least 10 digits.
pub(crate) fn format_leds(value: u32) -> String {
    format!("{value:0width$b}", width = LED_COUNT)
}

/// LED bar plus mini PIR pedestrian counter
#[derive(Debug)]
pub struct GrovePCounter<M: Mailbox> {
    mailbox: M,
}

impl<M: Mailbox> GrovePCounter<M> {
    /// Program file.
    pub const PROGRAM: &'static str = "arduino_grove_pcounter.bin";
    const RESET: u32 = 0x3;
    const WRITE_LEDS: u32 = 0x5;
    const SET_BRIGHTNESS: u32 = 0x7;
    const SET_LEVEL: u32 = 0x9;
    const READ_LEDS: u32 = 0xB;
    const READ_PIR: u32 = 0xD;

    /// Load the counter program with the bar on `led` and the PIR on `pir`
    ///
    /// Defaults on the shield are G4 for the bar and G3 for the PIR.
    ///
    /// # Errors
    ///
    /// Returns error if either connector is not G1–G7 or the program cannot
    /// be started.
    pub fn new(mut mailbox: M, led: GroveGroup, pir: GroveGroup) -> Result<Self> {
        let led_pin = super::require_digital("LED bar", led)?;
        let pir_pin = super::require_digital("mini PIR", pir)?;
        configure(&mut mailbox, Self::PROGRAM, &[led_pin, pir_pin])?;
        Ok(Self { mailbox })
    }

    /// Turn every segment off
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn reset(&mut self) -> Result<()> {
        self.mailbox.write_blocking_command(Self::RESET)
    }

    /// Light segments from the 10 low bits of `data`
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn write_binary(&mut self, data: u32) -> Result<()> {
        write_binary(&mut self.mailbox, Self::WRITE_LEDS, data)
    }

    /// Light segments from `data` with a brightness per segment
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn write_brightness(&mut self, data: u32, brightness: [Brightness; LED_COUNT]) -> Result<()> {
        let mut words = Vec::with_capacity(LED_COUNT + 1);
        words.push(data);
        words.extend(brightness.iter().map(|b| b.word()));
        self.mailbox.write_mailbox(0, &words)?;
        self.mailbox.write_blocking_command(Self::SET_BRIGHTNESS)
    }

    /// Fill the bar to `level` (0–10) at preset brightness `bright_level` (0–3)
    ///
    /// `green_to_red` selects the fill direction.
    ///
    /// # Errors
    ///
    /// Returns error if an argument is out of range or the command fails.
    pub fn write_level(&mut self, level: u32, bright_level: u32, green_to_red: bool) -> Result<()> {
        if level > MAX_LEVEL {
            return Err(PynqError::invalid_argument(format!(
                "level {level} exceeds {MAX_LEVEL}"
            )));
        }
        if bright_level > MAX_BRIGHT_LEVEL {
            return Err(PynqError::invalid_argument(format!(
                "brightness level {bright_level} exceeds {MAX_BRIGHT_LEVEL}"
            )));
        }
        self.mailbox
            .write_mailbox(0, &[level, bright_level, u32::from(green_to_red)])?;
        self.mailbox.write_blocking_command(Self::SET_LEVEL)
    }

    /// Current segment state as a 10-digit binary string
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn read(&mut self) -> Result<String> {
        self.mailbox.write_blocking_command(Self::READ_LEDS)?;
        Ok(format_leds(self.mailbox.read_word(0)?))
    }

    /// True when the PIR sees something in front of it
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn read_pir(&mut self) -> Result<bool> {
        self.mailbox.write_blocking_command(Self::READ_PIR)?;
        Ok(self.mailbox.read_word(0)? != 0)
    }

    /// Release the mailbox
    pub fn into_inner(self) -> M {
        self.mailbox
    }
}
