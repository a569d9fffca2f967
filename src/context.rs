//! Execution context
use std::collections::HashMap;

use itertools::Itertools;
use log::warn;
use map_3d::{ecef2geodetic, Ellipsoid};

use crate::{
    carrier::{widelane_wavelength, Carrier},
    constants::H_IPP_RANGE_M,
    prelude::{Constellation, Error, SV},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default thin shell height [m]
pub const DEFAULT_H_IPP: f64 = 350_000.0;

/// Systems we support
const SUPPORTED: [Constellation; 6] = [
    Constellation::GPS,
    Constellation::Glonass,
    Constellation::Galileo,
    Constellation::BeiDou,
    Constellation::QZSS,
    Constellation::IRNSS,
];

/// [Context] gathers everything the calibration needs to know
/// about the receiver and the signals, on top of the observations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Context {
    /// Receiver position, ECEF [m]
    pub receiver_position: (f64, f64, f64),
    /// Station acronym (lowercase, 4 characters)
    pub receiver_name: Option<String>,
    /// Thin shell height [m]
    pub h_ipp: f64,
    /// Active systems
    pub constellations: Vec<Constellation>,
    /// Glonass frequency channels
    pub glonass_channels: HashMap<SV, i8>,
    /// (f1, f2) frequencies [Hz] that replace our default pairing
    pub frequencies: HashMap<Constellation, (f64, f64)>,
}

impl Context {
    /// Builds a new [Context] for given receiver position (ECEF, meters)
    /// and list of systems. Duplicates are removed.
    pub fn new(
        receiver_position: (f64, f64, f64),
        constellations: &[Constellation],
    ) -> Result<Self, Error> {
        let mut active = Vec::with_capacity(constellations.len());
        for constellation in constellations.iter().unique() {
            if !SUPPORTED.contains(constellation) {
                return Err(Error::UnsupportedConstellation(*constellation));
            }
            active.push(*constellation);
        }
        if active.is_empty() {
            return Err(Error::NoConstellation);
        }
        Ok(Self {
            receiver_position,
            receiver_name: None,
            h_ipp: DEFAULT_H_IPP,
            constellations: active,
            glonass_channels: HashMap::new(),
            frequencies: HashMap::new(),
        })
    }
    /// Copies and defines station name, which prefixes arc identifiers
    pub fn with_receiver_name(&self, name: &str) -> Self {
        let mut s = self.clone();
        let name = name.trim().to_lowercase().chars().take(4).collect::<String>();
        s.receiver_name = if name.is_empty() { None } else { Some(name) };
        s
    }
    /// Copies and defines thin shell height [m]
    pub fn with_h_ipp(&self, h_ipp: f64) -> Self {
        if h_ipp < H_IPP_RANGE_M.0 || h_ipp > H_IPP_RANGE_M.1 {
            warn!(
                "h_ipp={}m looks unusual, typical values lie within [{}; {}]m",
                h_ipp, H_IPP_RANGE_M.0, H_IPP_RANGE_M.1
            );
        }
        let mut s = self.clone();
        s.h_ipp = h_ipp;
        s
    }
    /// Copies and defines Glonass frequency channels
    pub fn with_glonass_channels(&self, channels: HashMap<SV, i8>) -> Self {
        let mut s = self.clone();
        s.glonass_channels = channels;
        s
    }
    /// Copies and overrides (f1, f2) frequencies [Hz] for this system
    pub fn with_frequencies(&self, constellation: Constellation, f1: f64, f2: f64) -> Self {
        let mut s = self.clone();
        s.frequencies.insert(constellation, (f1, f2));
        s
    }
    /// Returns true if this vehicle belongs to an active system
    pub fn is_active(&self, sv: SV) -> bool {
        self.constellations.contains(&sv.constellation)
    }
    /// Returns (f1, f2) frequencies [Hz] to combine, for this vehicle
    pub fn frequencies(&self, sv: SV) -> Result<(f64, f64), Error> {
        if let Some((f1, f2)) = self.frequencies.get(&sv.constellation) {
            return Ok((*f1, *f2));
        }
        let channel = self.glonass_channels.get(&sv).copied();
        let (c1, c2) = Carrier::dual_frequency(sv, channel)?;
        Ok((c1.frequency(), c2.frequency()))
    }
    /// Returns half the widelane wavelength [m], which is the
    /// initial MW noise level for this vehicle
    pub fn widelane_sigma(&self, sv: SV) -> Result<f64, Error> {
        let (f1, f2) = self.frequencies(sv)?;
        Ok(widelane_wavelength(f1, f2) / 2.0)
    }
    /// Returns receiver geodetic coordinates (latitude [ddeg], longitude [ddeg], altitude [m])
    pub fn receiver_geodetic(&self) -> (f64, f64, f64) {
        let (x, y, z) = self.receiver_position;
        let (lat, lon, alt) = ecef2geodetic(x, y, z, Ellipsoid::WGS84);
        (lat.to_degrees(), lon.to_degrees(), alt)
    }
}
