use thiserror::Error;

use gnss::prelude::{Constellation, SV};

/// Errors that may rise while calibrating TEC
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// GLONASS frequency channel is required to resolve the carrier frequencies
    #[error("missing glonass frequency channel for {0}")]
    MissingGlonassChannel(SV),
    /// No dual frequency definition for this system
    #[error("no dual frequency definition for {0}")]
    UnsupportedConstellation(Constellation),
    /// Execution context requires at least one system
    #[error("at least one gnss system must be selected")]
    NoConstellation,
    /// Invalid option value
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Recombined system does not contain a single usable equation
    #[error("degenerate system: no valid equations")]
    EmptySystem,
    /// Solvable block is too small to produce any meaningful bias
    #[error("under-determined system: solvable block size is {0}")]
    Underdetermined(usize),
    /// Least squares solver failure
    #[error("least squares solving error: {0}")]
    Solving(&'static str),
}
