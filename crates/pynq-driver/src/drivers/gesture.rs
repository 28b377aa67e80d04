//! Gesture sensor and gesture game drivers

use super::ledbar;
use crate::error::{PynqError, Result};
use crate::mailbox::{configure, Mailbox};
use pynq_chip::GroveGroup;
use std::fmt;
use tracing::{info, warn};

/// Gesture code reported by the PAJ7620
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// Nothing recognised
    NoDetection,
    /// Hand moved away from the sensor face
    Forward,
    /// Hand moved toward the sensor face
    Backward,
    /// Swipe right
    Right,
    /// Swipe left
    Left,
    /// Swipe up
    Up,
    /// Swipe down
    Down,
    /// Clockwise circle
    Clockwise,
    /// Counter-clockwise circle
    CounterClockwise,
    /// Wave
    Wave,
}

impl Gesture {
    /// Decode a gesture code, `None` for codes outside 0–9
    pub const fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            0 => Self::NoDetection,
            1 => Self::Forward,
            2 => Self::Backward,
            3 => Self::Right,
            4 => Self::Left,
            5 => Self::Up,
            6 => Self::Down,
            7 => Self::Clockwise,
            8 => Self::CounterClockwise,
            9 => Self::Wave,
            _ => return None,
        })
    }

    /// Display name
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoDetection => "no-detection",
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Right => "right",
            Self::Left => "left",
            Self::Up => "up",
            Self::Down => "down",
            Self::Clockwise => "clockwise",
            Self::CounterClockwise => "counter-clockwise",
            Self::Wave => "wave",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Gesture-controlled LED bar game
#[derive(Debug)]
pub struct GroveGesGame<M: Mailbox> {
    mailbox: M,
}

impl<M: Mailbox> GroveGesGame<M> {
    /// Program file.
    pub const PROGRAM: &'static str = "arduino_grove_gesgame.bin";
    const GET_GESTURE: u32 = 0x3;
    const WRITE_LEDS: u32 = 0x5;

    /// Load the game with the LED bar on `led` (default G4)
    ///
    /// # Errors
    ///
    /// Returns error if `led` is not G1–G7 or the program cannot be started.
    pub fn new(mut mailbox: M, led: GroveGroup) -> Result<Self> {
        let pins = super::digital_pins("LED bar", led)?;
        configure(&mut mailbox, Self::PROGRAM, pins)?;
        Ok(Self { mailbox })
    }

    /// Latest gesture, `None` for an unrecognised code
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn gesture(&mut self) -> Result<Option<Gesture>> {
        self.mailbox.write_blocking_command(Self::GET_GESTURE)?;
        let code = self.mailbox.read_word(0)?;
        let gesture = Gesture::from_code(code);
        if gesture.is_none() {
            warn!("Unknown gesture code {code}");
        }
        Ok(gesture)
    }

    /// Light the LED bar from the 10 low bits of `data`
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

/// PAJ7620 gesture sensor, fixed on the A18/A19 I2C pins
#[derive(Debug)]
pub struct GestureSensor<M: Mailbox> {
    mailbox: M,
}

impl<M: Mailbox> GestureSensor<M> {
    /// Program file.
    pub const PROGRAM: &'static str = "arduino_gesture.bin";
    const READ_GESTURE: u32 = 0x3;

    /// Load the program and check both initialisation flags it reports
    ///
    /// # Errors
    ///
    /// Returns [`PynqError::InitFailed`] if the chip or the gesture engine did
    /// not come up, or an error if the program cannot be started.
    pub fn new(mut mailbox: M) -> Result<Self> {
        configure(&mut mailbox, Self::PROGRAM, &[])?;
        let status = mailbox.read_mailbox(0, 2)?;
        let (chip, sensor) = two_words(&status)?;
        if chip == 0 {
            return Err(PynqError::init_failed("chip initialization failed"));
        }
        if sensor == 0 {
            return Err(PynqError::init_failed("gesture sensor initialization failed"));
        }
        info!("Gesture sensor initialized");
        Ok(Self { mailbox })
    }

    /// Latest gesture, `None` when nothing valid was detected
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn read_gesture(&mut self) -> Result<Option<Gesture>> {
        self.mailbox.write_blocking_command(Self::READ_GESTURE)?;
        let data = self.mailbox.read_mailbox(0, 2)?;
        let (valid, code) = two_words(&data)?;
        if valid == 0 {
            return Ok(None);
        }
        Ok(Gesture::from_code(code))
    }

    /// Release the mailbox
    pub fn into_inner(self) -> M {
        self.mailbox
    }
}

fn two_words(words: &[u32]) -> Result<(u32, u32)> {
    match words {
        [first, second, ..] => Ok((*first, *second)),
        _ => Err(PynqError::out_of_range(format!(
            "gesture program returned {} words, expected 2",
            words.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_and_names() {
        assert_eq!(Gesture::from_code(0), Some(Gesture::NoDetection));
        assert_eq!(Gesture::from_code(8).map(Gesture::name), Some("counter-clockwise"));
        assert_eq!(Gesture::from_code(9).unwrap().to_string(), "wave");
        assert_eq!(Gesture::from_code(10), None);
    }
}
