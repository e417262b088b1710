pub use clock::{Clock, FixedClock, SystemClock};
pub use shared_gate::SharedGate;

mod clock;
mod shared_gate;
