//! integrated tests
pub mod toolkit;

mod levelling;
