//! IMU, DHT11 and light sensor behind one program
//!
//! Shares the IMU sample layout with [`GroveImu`](super::GroveImu) but
//! reports altitude with the barometric formula.

use super::imu::{read_imu, ImuReading};
use crate::error::{PynqError, Result};
use crate::mailbox::{configure, Mailbox};
use pynq_chip::codec::decode_float;
use pynq_chip::{AnalogChannel, GroveGroup};

/// Light sensor full-scale output (V).
const LIGHT_FULL_SCALE_V: f64 = 3.3;
/// Illuminance at full-scale output (lux).
const LIGHT_FULL_SCALE_LUX: f64 = 350.0;

/// DHT11 sample
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DhtReading {
    /// Temperature (°C)
    pub temperature: f32,
    /// Relative humidity (%)
    pub humidity: f32,
}

/// Grove IMU 10DOF, DHT11 and analog light sensor
#[derive(Debug)]
pub struct GroveMulti<M: Mailbox> {
    mailbox: M,
}

impl<M: Mailbox> GroveMulti<M> {
    /// Program file.
    pub const PROGRAM: &'static str = "arduino_grove_multisensor.bin";
    const GET_IMU_DATA: u32 = 0x3;
    const GET_DHT_DATA: u32 = 0x5;
    const GET_LIGHT_DATA: u32 = 0x7;

    /// Load the program with the IMU on `imu` (I2C), the DHT11 on `dht`
    /// (default G2) and the light sensor on `light` (default A0)
    ///
    /// # Errors
    ///
    /// Returns error if `imu` is not I2C, `dht` is not G1–G7, or the program
    /// cannot be started.
    pub fn new(mut mailbox: M, imu: GroveGroup, dht: GroveGroup, light: AnalogChannel) -> Result<Self> {
        super::require_i2c("Grove IMU", imu)?;
        let dht_pin = super::require_digital("DHT11", dht)?;
        configure(&mut mailbox, Self::PROGRAM, &[dht_pin, light.index()])?;
        Ok(Self { mailbox })
    }

    /// Read one IMU sample
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn imu_data(&mut self) -> Result<ImuReading> {
        read_imu(&mut self.mailbox, Self::GET_IMU_DATA)
    }

    /// Read temperature and humidity
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn dht_data(&mut self) -> Result<DhtReading> {
        self.mailbox.write_blocking_command(Self::GET_DHT_DATA)?;
        match self.mailbox.read_mailbox(0, 2)?.as_slice() {
            &[temp, humi, ..] => Ok(DhtReading {
                temperature: decode_float(temp),
                humidity: decode_float(humi),
            }),
            short => Err(PynqError::out_of_range(format!(
                "DHT11 returned {} words, expected 2",
                short.len()
            ))),
        }
    }

    /// Illuminance in lux
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn light_lux(&mut self) -> Result<f64> {
        self.mailbox.write_blocking_command(Self::GET_LIGHT_DATA)?;
        let voltage = f64::from(decode_float(self.mailbox.read_word(0)?));
        Ok(voltage * LIGHT_FULL_SCALE_LUX / LIGHT_FULL_SCALE_V)
    }

    /// Fresh sample's compass heading in degrees
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn heading(&mut self) -> Result<f64> {
        Ok(self.imu_data()?.heading())
    }

    /// Fresh sample's tilt-compensated heading in degrees
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the readings are out of range.
    pub fn tilt_heading(&mut self) -> Result<f64> {
        self.imu_data()?.tilt_heading()
    }

    /// Fresh sample's pressure in atmospheres
    ///
    /// # Errors
    ///
    /// Returns error if the command fails.
    pub fn atm(&mut self) -> Result<f64> {
        Ok(self.imu_data()?.atm())
    }

    /// Fresh sample's altitude in metres
    ///
    /// # Errors
    ///
    /// Returns error if the command fails or the pressure is not positive.
    pub fn altitude(&mut self) -> Result<f64> {
        self.imu_data()?.altitude_barometric()
    }

    /// Release the mailbox
    pub fn into_inner(self) -> M {
        self.mailbox
    }
}
