//! Filesystem freeze/thaw with an optional bounded auto-unfreeze.

pub mod channel;
pub mod controller;
pub mod error;
pub mod hold;

pub use channel::{FreezeTarget, Target};
pub use controller::{Mode, Outcome, Request, execute, run};
pub use error::{FreezeError, Result};
pub use hold::{
    Cancellation, HoldOutcome, Interrupt, InterruptSource, SignalInterrupts, cancellation, hold,
};
