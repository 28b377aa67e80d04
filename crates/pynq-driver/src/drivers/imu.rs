//! Grove IMU 10DOF driver
//!
//! The IMU combines an MPU-9250 (accelerometer, gyroscope, magnetometer) with
//! a BMP180 barometer on the I2C connector. The program returns eleven float
//! words; the sensor ranges below turn raw counts into physical units.
//!
//! ```text
//! word  0..3   accel x/y/z   counts  / 16384       → g
//! word  3..6   gyro  x/y/z   counts  × 250 / 32768 → °/s
//! word  6..9   mag   x/y/z   counts  × 1200 / 4096 → µT
//! word  9      temperature   °C
//! word 10      pressure      Pa
//! ```

use crate::error::{PynqError, Result};
use crate::mailbox::{configure, Mailbox};
use pynq_chip::codec::round_display_f64;
use pynq_chip::GroveGroup;
use std::f64::consts::PI;

/// Number of float words returned per reading.
pub(crate) const IMU_WORDS: usize = 11;

const ACCEL_COUNTS_PER_G: f64 = 16384.0;
const GYRO_FULL_SCALE_DPS: f64 = 250.0;
const GYRO_COUNTS: f64 = 32768.0;
const MAG_FULL_SCALE_UT: f64 = 1200.0;
const MAG_COUNTS: f64 = 4096.0;

/// Standard sea-level pressure (Pa).
pub(crate) const SEA_LEVEL_PA: f64 = 101_325.0;

/// One scaled IMU sample
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImuReading {
    /// Acceleration x/y/z (g)
    pub accel: [f64; 3],
    /// Angular rate x/y/z (°/s)
    pub gyro: [f64; 3],
    /// Magnetic field x/y/z (µT)
    pub compass: [f64; 3],
    /// Temperature (°C)
    pub temperature: f64,
    /// Pressure (Pa)
    pub pressure: f64,
}

impl ImuReading {
    /// Scale eleven decoded words into physical units
    pub(crate) fn from_raw(raw: &[f32]) -> Result<Self> {
        if raw.len() < IMU_WORDS {
            return Err(PynqError::out_of_range(format!(
                "IMU returned {} words, expected {IMU_WORDS}",
                raw.len()
            )));
        }
        let v = |i: usize| f64::from(raw[i]);
        Ok(Self {
            accel: [0, 1, 2].map(|i| v(i) / ACCEL_COUNTS_PER_G),
            gyro: [3, 4, 5].map(|i| v(i) * GYRO_FULL_SCALE_DPS / GYRO_COUNTS),
            compass: [6, 7, 8].map(|i| v(i) * MAG_FULL_SCALE_UT / MAG_COUNTS),
            temperature: v(9),
            pressure: v(10),
        })
    }

    /// Copy with every field rounded to two decimals, for display
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self {
            accel: self.accel.map(round_display_f64),
            gyro: self.gyro.map(round_display_f64),
            compass: self.compass.map(round_display_f64),
            temperature: round_display_f64(self.temperature),
            pressure: round_display_f64(self.pressure),
        }
    }

    /// All eleven values in wire order
    pub fn to_array(&self) -> [f64; IMU_WORDS] {
        let [ax, ay, az] = self.accel;
        let [gx, gy, gz] = self.gyro;
        let [mx, my, mz] = self.compass;
        [ax, ay, az, gx, gy, gz, mx, my, mz, self.temperature, self.pressure]
    }

    /// Compass heading, degrees from +X toward +Y in `[0, 360)`
    pub fn heading(&self) -> f64 {
        let [mx, my, _] = self.compass;
        let heading = 180.0 * my.atan2(mx) / PI;
        if heading < 0.0 {
            heading + 360.0
        } else {
            heading
        }
    }

    /// Tilt-compensated compass heading in degrees
    ///
    /// # Errors
    ///
    /// Returns error if the accelerometer readings put pitch or roll outside
    /// the domain of `asin`, as happens with a disconnected sensor.
    pub fn tilt_heading(&self) -> Result<f64> {
        let [ax, ay, _] = self.accel;
        let [mx, my, mz] = self.compass;

        let pitch = (-ax).asin();
        let roll = (ay / pitch.cos()).asin();

        let xh = mx * pitch.cos() + mz * pitch.sin();
        let yh = mx * roll.sin() * pitch.sin() + my * roll.cos() - mz * roll.sin() * pitch.cos();

        let mut tilt = 180.0 * yh.atan2(xh) / PI;
        if yh < 0.0 {
            tilt += 360.0;
        }
        if tilt.is_finite() {
            Ok(tilt)
        } else {
            Err(PynqError::out_of_range(format!(
                "tilt heading undefined for accel ({ax}, {ay})"
            )))
        }
    }

    /// Pressure relative to standard sea level
    pub fn atm(&self) -> f64 {
        self.pressure / SEA_LEVEL_PA
    }

    /// Altitude in metres from the hypsometric fit used by the IMU program
    ///
    /// # Errors
    ///
    /// Returns error for a non-positive pressure.
    pub fn altitude_hypsometric(&self) -> Result<f64> {
        let p = self.positive_pressure()?;
        let a = p / 1000.0;
        let b = 1.0 / 5.25885;
        let c = 288.15 - ((a.ln() + 18.2573) * b).exp();
        Ok(c / 0.0065)
    }

    /// Altitude in metres from the international barometric formula
    ///
    /// # Errors
    ///
    /// Returns error for a non-positive pressure.
    pub fn altitude_barometric(&self) -> Result<f64> {
        let p = self.positive_pressure()?;
        Ok(44300.0 * (1.0 - (p / SEA_LEVEL_PA).powf(1.0 / 5.255)))
    }

    fn positive_pressure(&self) -> Result<f64> {
        if self.pressure > 0.0 && self.pressure.is_finite() {
            Ok(self.pressure)
        } else {
            Err(PynqError::out_of_range(format!(
                "pressure {} Pa cannot give an altitude",
                self.pressure
            )))
        }
    }
}

/// Read and scale one IMU sample with `opcode`.
pub(crate) fn read_imu<M: Mailbox>(mailbox: &mut M, opcode: u32) -> Result<ImuReading> {
    mailbox.write_blocking_command(opcode)?;
    let raw = mailbox.read_floats(0, IMU_WORDS)?;
    ImuReading::from_raw(&raw)
}

/// Grove IMU 10DOF on the I2C connector
#[derive(Debug)]
pub struct GroveImu<M: Mailbox> {
    mailbox: M,
}

impl<M: Mailbox> GroveImu<M> {
    /// Program file.
    pub const PROGRAM: &'static str = "grove_imu.bin";
    const GET_DATA: u32 = 0x3;

    /// Load the IMU program
    ///
    /// # Errors
    ///
    /// Returns error if `group` is not the I2C connector or the program
    /// cannot be started.
    pub fn new(mut mailbox: M, group: GroveGroup) -> Result<Self> {
        super::require_i2c("Grove IMU", group)?;
        configure(&mut mailbox, Self::PROGRAM, &[])?;
        Ok(Self { mailbox })
    }

    /// Read one full sample
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn get_data(&mut self) -> Result<ImuReading> {
        read_imu(&mut self.mailbox, Self::GET_DATA)
    }

    /// Fresh sample's compass heading in degrees
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn heading(&mut self) -> Result<f64> {
        Ok(self.get_data()?.heading())
    }

    /// Fresh sample's tilt-compensated heading in degrees
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the readings are out of range.
    pub fn tilt_heading(&mut self) -> Result<f64> {
        self.get_data()?.tilt_heading()
    }

    /// Fresh sample's pressure in atmospheres
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn atm(&mut self) -> Result<f64> {
        Ok(self.get_data()?.atm())
    }

    /// Fresh sample's altitude in metres
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the pressure is not positive.
    pub fn altitude(&mut self) -> Result<f64> {
        self.get_data()?.altitude_hypsometric()
    }

    /// Underlying mailbox
    pub fn mailbox(&self) -> &M {
        &self.mailbox
    }

    /// Release the mailbox
    pub fn into_inner(self) -> M {
        self.mailbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(compass: [f64; 3]) -> ImuReading {
        ImuReading {
            accel: [0.0, 0.0, 1.0],
            compass,
            pressure: SEA_LEVEL_PA,
            ..ImuReading::default()
        }
    }

    #[test]
    fn scaling() {
        let raw = [
            16384.0, -8192.0, 0.0, 32768.0, 0.0, -16384.0, 4096.0, 2048.0, 0.0, 24.5, 100_000.0,
        ];
        let r = ImuReading::from_raw(&raw).unwrap();
        assert_eq!(r.accel, [1.0, -0.5, 0.0]);
        assert_eq!(r.gyro, [250.0, 0.0, -125.0]);
        assert_eq!(r.compass, [1200.0, 600.0, 0.0]);
        assert_eq!(r.temperature, 24.5);
        assert_eq!(r.pressure, 100_000.0);
    }

    #[test]
    fn short_block_is_rejected() {
        assert!(ImuReading::from_raw(&[0.0; 10]).is_err());
    }

    #[test]
    fn heading_quadrants() {
        assert!((level([1.0, 0.0, 0.0]).heading() - 0.0).abs() < 1e-9);
        assert!((level([0.0, 1.0, 0.0]).heading() - 90.0).abs() < 1e-9);
        assert!((level([-1.0, 0.0, 0.0]).heading() - 180.0).abs() < 1e-9);
        assert!((level([0.0, -1.0, 0.0]).heading() - 270.0).abs() < 1e-9);
    }

    #[test]
    fn tilt_heading_level_matches_heading() {
        let r = level([0.0, 1.0, 0.0]);
        assert!((r.tilt_heading().unwrap() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn tilt_heading_wraps_negative_yh() {
        let r = level([0.0, -1.0, 0.0]);
        assert!((r.tilt_heading().unwrap() - 270.0).abs() < 1e-9);
        assert!((r.tilt_heading().unwrap() - r.heading()).abs() < 1e-9);
    }

    #[test]
    fn tilt_heading_out_of_domain() {
        let r = ImuReading {
            accel: [2.0, 0.0, 0.0],
            compass: [1.0, 0.0, 0.0],
            ..ImuReading::default()
        };
        assert!(matches!(r.tilt_heading(), Err(PynqError::OutOfRange { .. })));
    }

    #[test]
    fn pressure_derived_values() {
        let r = level([1.0, 0.0, 0.0]);
        assert!((r.atm() - 1.0).abs() < 1e-12);
        assert!(r.altitude_barometric().unwrap().abs() < 1e-9);

        let expected = (288.15 - ((101.325f64.ln() + 18.2573) / 5.25885).exp()) / 0.0065;
        assert!((r.altitude_hypsometric().unwrap() - expected).abs() < 1e-9);

        let vacuum = ImuReading::default();
        assert!(vacuum.altitude_hypsometric().is_err());
        assert!(vacuum.altitude_barometric().is_err());
    }

    #[test]
    fn rounded_copy() {
        let r = ImuReading {
            temperature: 21.456,
            accel: [0.004, -0.006, 1.0],
            ..ImuReading::default()
        };
        let d = r.rounded();
        assert_eq!(d.temperature, 21.46);
        assert_eq!(d.accel, [0.0, -0.01, 1.0]);
        assert_eq!(r.to_array()[9], 21.456);
    }
}
