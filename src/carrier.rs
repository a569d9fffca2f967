//! Carrier signals and associated frequencies
use crate::{
    constants::SPEED_OF_LIGHT_M_S,
    prelude::{Constellation, Error, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Carrier signals this crate knows how to combine
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Carrier {
    /// L1 (GPS, QZSS)
    #[default]
    L1,
    /// L2 (GPS, QZSS)
    L2,
    /// L5 (GPS, QZSS, IRNSS)
    L5,
    /// Glonass G1 for given frequency channel
    G1(i8),
    /// Glonass G2 for given frequency channel
    G2(i8),
    /// E1: GAL
    E1,
    /// E5a: GAL
    E5a,
    /// E5b: GAL
    E5b,
    /// B1I: BeiDou
    B1I,
    /// B2I: BeiDou
    B2I,
    /// B3: BeiDou
    B3,
    /// IRNSS S band
    S,
}

impl std::fmt::Display for Carrier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
            Self::L5 => write!(f, "L5"),
            Self::G1(k) => write!(f, "G1({})", k),
            Self::G2(k) => write!(f, "G2({})", k),
            Self::E1 => write!(f, "E1"),
            Self::E5a => write!(f, "E5a"),
            Self::E5b => write!(f, "E5b"),
            Self::B1I => write!(f, "B1I"),
            Self::B2I => write!(f, "B2I"),
            Self::B3 => write!(f, "B3"),
            Self::S => write!(f, "S"),
        }
    }
}

impl Carrier {
    /// Returns carrier frequency in MHz
    pub fn frequency_mhz(&self) -> f64 {
        match self {
            Self::L1 | Self::E1 => 1575.42_f64,
            Self::L2 => 1227.60_f64,
            Self::L5 | Self::E5a => 1176.45_f64,
            Self::E5b | Self::B2I => 1207.14_f64,
            Self::G1(k) => 1602.0_f64 + *k as f64 * 0.5625_f64,
            Self::G2(k) => 1246.0_f64 + *k as f64 * 0.4375_f64,
            Self::B1I => 1561.098_f64,
            Self::B3 => 1268.52_f64,
            Self::S => 2492.028_f64,
        }
    }
    /// Returns carrier frequency in Hz
    pub fn frequency(&self) -> f64 {
        self.frequency_mhz() * 1.0E6
    }
    /// Returns carrier wavelength in meters
    pub fn wavelength(&self) -> f64 {
        SPEED_OF_LIGHT_M_S / self.frequency()
    }
    /// Returns the (primary, secondary) carriers we combine for
    /// given [SV]. Glonass requires the frequency channel.
    pub fn dual_frequency(sv: SV, glonass_channel: Option<i8>) -> Result<(Self, Self), Error> {
        match sv.constellation {
            Constellation::GPS | Constellation::QZSS => Ok((Self::L1, Self::L2)),
            Constellation::Galileo => Ok((Self::E1, Self::E5a)),
            Constellation::BeiDou => Ok((Self::B1I, Self::B2I)),
            Constellation::IRNSS => Ok((Self::L5, Self::S)),
            Constellation::Glonass => {
                let k = glonass_channel.ok_or(Error::MissingGlonassChannel(sv))?;
                Ok((Self::G1(k), Self::G2(k)))
            },
            c => Err(Error::UnsupportedConstellation(c)),
        }
    }
}

/// Widelane wavelength [m] of given frequency pair (Hz)
pub(crate) fn widelane_wavelength(f1: f64, f2: f64) -> f64 {
    SPEED_OF_LIGHT_M_S / (f1 - f2)
}
