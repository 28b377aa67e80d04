//! Four-motor car with an ultrasonic ranger
//!
//! Twelve Arduino pins drive the car, in this order:
//!
//! ```text
//! pins[0..4]   PWM output, motors a b c d
//! pins[4..8]   direction, motors a b c d   (1 normal, 0 reverse)
//! pins[8..12]  speed feedback, motors a b c d
//!
//! a: right front   b: right rear   c: left front   d: left rear
//! ```

use crate::error::{PynqError, Result};
use crate::mailbox::{configure, Mailbox};
use pynq_chip::grove::MAX_ARDUINO_PIN;
use std::fmt;
use std::str::FromStr;

/// Number of pins the program expects.
pub const MOTOR_PIN_COUNT: usize = 12;

/// Shield wiring used when no pin list is given.
pub const DEFAULT_MOTOR_PINS: [u32; MOTOR_PIN_COUNT] = [3, 5, 6, 9, 2, 4, 7, 8, 10, 11, 12, 13];

/// Highest accepted speed, in percent.
pub const MAX_SPEED: u32 = 100;

/// PWM period used by [`RunUsRanger::pwm_control_default`], in timer ticks.
pub const DEFAULT_PWM_PERIOD: u32 = 625_998;
/// PWM pulse width used by [`RunUsRanger::pwm_control_default`], in timer ticks.
pub const DEFAULT_PWM_PULSE: u32 = 312_998;

/// Travel direction for `MOVE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Direction {
    /// All wheels forward
    Forward = 0,
    /// All wheels backward
    Backward = 1,
    /// Curve left
    Left = 2,
    /// Curve right
    Right = 3,
    /// Spin counter-clockwise in place
    RotateLeft = 4,
    /// Spin clockwise in place
    RotateRight = 5,
}

impl Direction {
    /// Mailbox word for this direction
    pub const fn word(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
            Self::Left => "left",
            Self::Right => "right",
            Self::RotateLeft => "rotate-left",
            Self::RotateRight => "rotate-right",
        };
        f.write_str(name)
    }
}

impl FromStr for Direction {
    type Err = PynqError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward" => Ok(Self::Forward),
            "backward" => Ok(Self::Backward),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "rotate-left" => Ok(Self::RotateLeft),
            "rotate-right" => Ok(Self::RotateRight),
            other => Err(PynqError::invalid_argument(format!(
                "unknown direction {other:?}"
            ))),
        }
    }
}

/// Motor car with an ultrasonic ranger
#[derive(Debug)]
pub struct RunUsRanger<M: Mailbox> {
    mailbox: M,
}

impl<M: Mailbox> RunUsRanger<M> {
    /// Program file.
    pub const PROGRAM: &'static str = "arduino_run_usranger.bin";
    const STOP: u32 = 0x3;
    const MOVE: u32 = 0x5;
    const VELOCITY: u32 = 0x7;
    const PWM_CONTROL: u32 = 0x9;
    const GET_DISTANCE: u32 = 0xB;

    /// Load the program with the given pin wiring
    ///
    /// # Errors
    ///
    /// Returns error unless exactly twelve pins in `0..=21` are given, or if
    /// the program cannot be started.
    pub fn new(mut mailbox: M, pins: &[u32]) -> Result<Self> {
        if pins.len() != MOTOR_PIN_COUNT {
            return Err(PynqError::invalid_pin(
                "motor car",
                format!("expected exactly {MOTOR_PIN_COUNT} pins, got {}", pins.len()),
            ));
        }
        if let Some(bad) = pins.iter().find(|&&p| p > MAX_ARDUINO_PIN) {
            return Err(PynqError::invalid_pin(
                "motor car",
                format!("pin {bad} is outside 0..={MAX_ARDUINO_PIN}"),
            ));
        }
        configure(&mut mailbox, Self::PROGRAM, pins)?;
        Ok(Self { mailbox })
    }

    /// Stop all motors
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn stop(&mut self) -> Result<()> {
        self.mailbox.write_blocking_command(Self::STOP)
    }

    /// Drive in `direction` at `speed` percent
    ///
    /// # Errors
    ///
    /// Returns error if `speed` exceeds 100 or the command fails.
    pub fn move_to(&mut self, direction: Direction, speed: u32) -> Result<()> {
        if speed > MAX_SPEED {
            return Err(PynqError::invalid_argument(format!(
                "speed {speed} is outside 0..={MAX_SPEED}"
            )));
        }
        self.mailbox.write_mailbox(0, &[direction.word(), speed])?;
        self.mailbox.write_blocking_command(Self::MOVE)
    }

    /// Mean of the four wheel speed counters
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn velocity(&mut self) -> Result<f64> {
        self.mailbox.write_blocking_command(Self::VELOCITY)?;
        let counts = self.mailbox.read_mailbox(0, 4)?;
        if counts.len() != 4 {
            return Err(PynqError::out_of_range(format!(
                "velocity returned {} words, expected 4",
                counts.len()
            )));
        }
        Ok(counts.iter().map(|&c| f64::from(c)).sum::<f64>() / 4.0)
    }

    /// Program PWM `timer` with `period` and `pulse` width in timer ticks
    ///
    /// # Errors
    ///
    /// Returns error if `pulse` exceeds `period` or the command fails.
    pub fn pwm_control(&mut self, timer: u32, period: u32, pulse: u32) -> Result<()> {
        if pulse > period {
            return Err(PynqError::invalid_argument(format!(
                "pulse {pulse} longer than period {period}"
            )));
        }
        self.mailbox.write_mailbox(0, &[timer, period, pulse])?;
        self.mailbox.write_blocking_command(Self::PWM_CONTROL)
    }

    /// [`pwm_control`](Self::pwm_control) on timer 0 with a 50% duty cycle
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn pwm_control_default(&mut self) -> Result<()> {
        self.pwm_control(0, DEFAULT_PWM_PERIOD, DEFAULT_PWM_PULSE)
    }

    /// Raw distance word computed by the program
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn distance(&mut self) -> Result<u32> {
        self.mailbox.write_blocking_command(Self::GET_DISTANCE)?;
        self.mailbox.read_word(0)
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
    fn default_pins_are_valid() {
        assert_eq!(DEFAULT_MOTOR_PINS.len(), MOTOR_PIN_COUNT);
        assert!(DEFAULT_MOTOR_PINS.iter().all(|&p| p <= MAX_ARDUINO_PIN));
    }

    #[test]
    fn direction_names_round_trip() {
        for d in [
            Direction::Forward,
            Direction::Backward,
            Direction::Left,
            Direction::Right,
            Direction::RotateLeft,
            Direction::RotateRight,
        ] {
            assert_eq!(d.to_string().parse::<Direction>().unwrap(), d);
        }
        assert!("sideways".parse::<Direction>().is_err());
    }
}
