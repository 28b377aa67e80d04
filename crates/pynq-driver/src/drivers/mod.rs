//! Grove peripheral drivers
//!
//! One driver per co-processor program. Each driver owns its [`Mailbox`],
//! validates its connectors, loads its program and applies the pin
//! configuration on construction. Readings come back through the shared
//! register codec and are scaled per sensor here.
//!
//! | Driver | Peripherals |
//! |--------|-------------|
//! | [`GroveImu`] | IMU 10DOF (MPU-9250 + BMP180) |
//! | [`GroveMulti`] | IMU 10DOF, DHT11, analog light sensor |
//! | [`GroveUsRanger`] | Ultrasonic ranger |
//! | [`GroveAutoAlarm`] | Ultrasonic ranger + LED bar |
//! | [`GrovePCounter`] | LED bar + mini PIR |
//! | [`GrovePSensor`] | Mini PIR + relay |
//! | [`GroveGesGame`] | Gesture game + LED bar |
//! | [`GestureSensor`] | PAJ7620 gesture sensor |
//! | [`LineTracker`] | Two analog line trackers |
//! | [`RunUsRanger`] | Four-motor car with ultrasonic ranger |
//!
//! [`Mailbox`]: crate::Mailbox

mod gesture;
mod imu;
mod ledbar;
mod linetracker;
mod motor;
mod multisensor;
mod psensor;
mod ranger;

pub use gesture::{Gesture, GestureSensor, GroveGesGame};
pub use imu::{GroveImu, ImuReading};
pub use ledbar::{Brightness, GrovePCounter, BRIGHTNESS_DEFAULT, LED_COUNT};
pub use linetracker::{LineReading, LineTracker};
pub use motor::{Direction, RunUsRanger, DEFAULT_MOTOR_PINS};
pub use multisensor::{DhtReading, GroveMulti};
pub use psensor::GrovePSensor;
pub use ranger::{pulse_to_distance_cm, GroveAutoAlarm, GroveUsRanger, OUT_OF_RANGE_CM};

use crate::error::{PynqError, Result};
use pynq_chip::GroveGroup;

/// Signal pin of a digital connector, or an error naming `peripheral`.
fn require_digital(peripheral: &'static str, group: GroveGroup) -> Result<u32> {
    group
        .signal_pin()
        .ok_or_else(|| PynqError::invalid_pin(peripheral, format!("{group} is not one of G1 - G7")))
}

/// Both pins of a digital connector.
fn digital_pins(peripheral: &'static str, group: GroveGroup) -> Result<&'static [u32]> {
    require_digital(peripheral, group)?;
    Ok(group.pins())
}

/// Reject anything but the I2C connector.
fn require_i2c(peripheral: &'static str, group: GroveGroup) -> Result<()> {
    if group == GroveGroup::I2c {
        Ok(())
    } else {
        Err(PynqError::invalid_pin(
            peripheral,
            format!("{group} given, only I2C is supported"),
        ))
    }
}
