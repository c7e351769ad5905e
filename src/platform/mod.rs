//! Platform abstraction layer
//!
//! Everything between the host (browser or native shell) and the simulation:
//! - Input events → edge-triggered jump intents
//! - Display-frame scheduling and run teardown
//! - Game-over bookkeeping (session high scores)

pub mod driver;
pub mod input;

pub use driver::{FrameReport, FrameScheduler, RunDriver};
pub use input::{InputHandler, Trigger};
