//! Arc levelling
mod jump;
mod phase_code;

pub use jump::JumpLeveler;
pub use phase_code::PhaseCodeLeveler;
