//! Physical constants

/// Speed of light in vacuum [m/s]
pub(crate) const SPEED_OF_LIGHT_M_S: f64 = 299_792_458.0;

/// Mean Earth radius [km], used by the thin shell model
pub(crate) const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Ionospheric refraction constant [m^3 s^-2]
pub(crate) const IONO_REFRACTION: f64 = 40.308;

/// One TEC unit [electrons/m^2]
pub(crate) const TECU: f64 = 1.0E16;

/// Typical thin shell height range [m]
pub(crate) const H_IPP_RANGE_M: (f64, f64) = (250_000.0, 500_000.0);
