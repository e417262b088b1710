//! Time-windowed enablement.
//!
//! A [`Gate`] is open while the current instant lies between its optional
//! start and end bounds.

pub use config::GateConfig;
pub use gate::{Gate, GateState};
pub use svc::{Clock, FixedClock, SharedGate, SystemClock};

pub mod config;
pub mod gate;
pub mod svc;
