//! Brightness boost engine
//!
//! One cycle reads the configuration, looks at the current panel brightness
//! and decides whether to raise it to the configured maximum:
//!
//! 1. [`decision`] - threshold, ceiling and sleep window rules
//! 2. [`ramp`] - direct or stepped writes to the brightness register
//! 3. [`cycle`] - one full pass, including log rotation and status update
//! 4. [`service`] - boot delay and cycle loop, stoppable between cycles

pub mod cycle;
pub mod decision;
pub mod ramp;
pub mod service;

pub use cycle::{BoostCycle, CycleOutcome, CycleSummary};
pub use decision::{Verdict, evaluate};
pub use ramp::RampReport;
pub use service::{BoostService, ServiceStats};
