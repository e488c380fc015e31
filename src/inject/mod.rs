//! Keystroke injection: script, character encoder, scheduler, and the
//! transport seam the scheduler submits reports through.

pub mod encoder;
pub mod scheduler;
pub mod script;
pub mod transport;

#[cfg(test)]
mod tests;

pub use encoder::{encode, Key};
pub use scheduler::{Emission, InjectionScheduler, SchedulerState, Tick, Timing};
pub use script::Script;
pub use transport::ReportTransport;
