#![doc(html_logo_url = "https://raw.githubusercontent.com/georust/meta/master/logo/logo.png")]
#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::type_complexity)]

/*
 * GNSS-TEC is part of the rtk-rs framework.
 * Authors: Guillaume W. Bres <guillaume.bressaix@gmail.com> et al.
 * (cf. https://github.com/rtk-rs/gnss-tec/graphs/contributors)
 * This framework is shipped under Mozilla Public V2 license.
 *
 * Documentation: https://github.com/rtk-rs/gnss-tec
 */

extern crate gnss_rs as gnss;

pub mod arc;
pub mod calibration;
pub mod carrier;
pub mod cfg;
pub mod combination;
pub mod context;
pub mod cs;
pub mod levelling;
pub mod observation;
pub mod processing;
pub mod tec;

mod constants;
mod error;

#[cfg(test)]
mod tests;

/// Package to include all basic structures
pub mod prelude {
    pub use crate::{
        arc::{Arc, ArcId, ArcSegmenter},
        calibration::{
            BatchAggregation, BiasEstimator, BiasMap, CalibrationSample, GlobalArcIndex,
            ModipProvider,
        },
        carrier::Carrier,
        cfg::Config,
        combination::{DualFrequencySample, LinearCombination},
        context::Context,
        cs::{CycleSlipDetector, DetectionResult},
        error::Error,
        levelling::{JumpLeveler, PhaseCodeLeveler},
        observation::{Observation, TecRecord},
        processing::Calibrator,
        tec::{mapping_function, TecProducer},
    };

    // pub re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, Epoch, TimeScale};
}

pub use error::Error;
