//! Grove shield connector map for the Pynq-Z2 Arduino header.
//!
//! Digital Grove connectors expose two adjacent Arduino pins; the I2C
//! connector is wired to the dedicated SDA/SCL lines and carries no selectable
//! pins. Analog inputs are addressed by XADC channel index.

use std::fmt;
use std::str::FromStr;

/// Highest Arduino header pin the IO switch can route.
pub const MAX_ARDUINO_PIN: u32 = 21;

/// Grove connector on the Arduino shield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroveGroup {
    /// Digital connector G1, pins 0/1.
    G1,
    /// Digital connector G2, pins 2/3.
    G2,
    /// Digital connector G3, pins 3/4.
    G3,
    /// Digital connector G4, pins 6/7.
    G4,
    /// Digital connector G5, pins 8/9.
    G5,
    /// Digital connector G6, pins 10/11.
    G6,
    /// Digital connector G7, pins 12/13.
    G7,
    /// I2C connector, fixed SDA/SCL.
    I2c,
}

impl GroveGroup {
    /// All digital connectors, in shield order.
    pub const DIGITAL: [Self; 7] = [
        Self::G1,
        Self::G2,
        Self::G3,
        Self::G4,
        Self::G5,
        Self::G6,
        Self::G7,
    ];

    /// Arduino header pins behind this connector.
    #[must_use]
    pub const fn pins(self) -> &'static [u32] {
        match self {
            Self::G1 => &[0, 1],
            Self::G2 => &[2, 3],
            Self::G3 => &[3, 4],
            Self::G4 => &[6, 7],
            Self::G5 => &[8, 9],
            Self::G6 => &[10, 11],
            Self::G7 => &[12, 13],
            Self::I2c => &[],
        }
    }

    /// Signal pin (first pin) of a digital connector.
    #[must_use]
    pub const fn signal_pin(self) -> Option<u32> {
        match self.pins() {
            [first, ..] => Some(*first),
            [] => None,
        }
    }

    /// True for G1–G7.
    #[must_use]
    pub const fn is_digital(self) -> bool {
        !matches!(self, Self::I2c)
    }
}

impl fmt::Display for GroveGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::G1 => "G1",
            Self::G2 => "G2",
            Self::G3 => "G3",
            Self::G4 => "G4",
            Self::G5 => "G5",
            Self::G6 => "G6",
            Self::G7 => "G7",
            Self::I2c => "I2C",
        };
        f.write_str(name)
    }
}

impl FromStr for GroveGroup {
    type Err = UnknownConnector;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "G1" => Ok(Self::G1),
            "G2" => Ok(Self::G2),
            "G3" => Ok(Self::G3),
            "G4" => Ok(Self::G4),
            "G5" => Ok(Self::G5),
            "G6" => Ok(Self::G6),
            "G7" => Ok(Self::G7),
            "I2C" => Ok(Self::I2c),
            _ => Err(UnknownConnector(s.to_string())),
        }
    }
}

/// Analog input channel on the A0–A5 header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalogChannel {
    /// Channel A0.
    A0,
    /// Channel A1.
    A1,
    /// Channel A2.
    A2,
    /// Channel A3.
    A3,
    /// Channel A4.
    A4,
    /// Channel A5.
    A5,
}

impl AnalogChannel {
    /// All channels, in index order.
    pub const ALL: [Self; 6] = [Self::A0, Self::A1, Self::A2, Self::A3, Self::A4, Self::A5];

    /// Channel index written to the mailbox.
    #[must_use]
    pub const fn index(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for AnalogChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CHANNEL_A{}", self.index())
    }
}

impl FromStr for AnalogChannel {
    type Err = UnknownConnector;

    /// Accepts `CHANNEL_A0`..`CHANNEL_A5` as well as the short `A0`..`A5`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let short = upper.strip_prefix("CHANNEL_").unwrap_or(&upper);
        Self::ALL
            .into_iter()
            .find(|ch| short == format!("A{}", ch.index()))
            .ok_or_else(|| UnknownConnector(s.to_string()))
    }
}

/// Name did not match any connector or channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownConnector(pub String);

impl fmt::Display for UnknownConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown connector: {}", self.0)
    }
}

impl std::error::Error for UnknownConnector {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digital_pins_within_header() {
        for group in GroveGroup::DIGITAL {
            assert_eq!(group.pins().len(), 2);
            assert!(group.pins().iter().all(|&p| p <= MAX_ARDUINO_PIN));
            assert!(group.is_digital());
        }
        assert!(GroveGroup::I2c.pins().is_empty());
        assert_eq!(GroveGroup::I2c.signal_pin(), None);
        assert_eq!(GroveGroup::G4.signal_pin(), Some(6));
    }

    #[test]
    fn parse_names() {
        assert_eq!("g3".parse::<GroveGroup>(), Ok(GroveGroup::G3));
        assert_eq!("I2C".parse::<GroveGroup>(), Ok(GroveGroup::I2c));
        assert!("G8".parse::<GroveGroup>().is_err());
        assert_eq!("CHANNEL_A3".parse::<AnalogChannel>(), Ok(AnalogChannel::A3));
        assert_eq!("a5".parse::<AnalogChannel>(), Ok(AnalogChannel::A5));
        assert!("CHANNEL_A6".parse::<AnalogChannel>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for ch in AnalogChannel::ALL {
            assert_eq!(ch.to_string().parse::<AnalogChannel>(), Ok(ch));
        }
        assert_eq!(GroveGroup::G7.to_string(), "G7");
    }
}
