//! Timed freeze controller.
//!
//! Sequences open → freeze → optional hold → thaw and releases the target
//! exactly once. Once a freeze with auto-unfreeze succeeds, thaw is always
//! attempted, even when the hold could not be armed.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::channel::{FreezeTarget, Target};
use crate::error::Result;
use crate::hold::{HoldOutcome, InterruptSource, SignalInterrupts, hold};

/// Operation selected for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Freeze, then thaw after `auto_unfreeze` if given.
    Freeze { auto_unfreeze: Option<Duration> },
    /// Thaw a previously frozen filesystem.
    Unfreeze,
}

/// Validated request handed over by the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub path: PathBuf,
    pub mode: Mode,
}

/// How a successful invocation left the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Frozen, with no auto-unfreeze requested.
    LeftFrozen,
    /// Thawed by an explicit unfreeze request.
    Thawed,
    /// Frozen, held, then thawed.
    AutoThawed(HoldOutcome),
}

/// Open the request's path and drive it to completion, using process
/// signals as the early wake-up for any hold.
pub async fn execute(request: Request) -> Result<Outcome> {
    let target = Target::open(&request.path)?;
    run(target, request.mode, SignalInterrupts::install).await
}

/// Drive `target` through `mode`, then close it.
///
/// `arm` is called only when a hold is needed; an error from it is logged
/// and the target is thawed straight away.
pub async fn run<T, I, A>(target: T, mode: Mode, arm: A) -> Result<Outcome>
where
    T: FreezeTarget,
    I: InterruptSource,
    A: FnOnce() -> io::Result<I>,
{
    let result = sequence(&target, mode, arm).await;
    target.close();
    result
}

async fn sequence<T, I, A>(target: &T, mode: Mode, arm: A) -> Result<Outcome>
where
    T: FreezeTarget,
    I: InterruptSource,
    A: FnOnce() -> io::Result<I>,
{
    let path = target.path().display().to_string();

    let auto_unfreeze = match mode {
        Mode::Unfreeze => {
            target.thaw()?;
            tracing::info!(%path, "unfroze filesystem");
            return Ok(Outcome::Thawed);
        }
        Mode::Freeze { auto_unfreeze } => auto_unfreeze,
    };

    let Some(deadline) = auto_unfreeze else {
        target.freeze()?;
        tracing::info!(%path, "froze filesystem");
        return Ok(Outcome::LeftFrozen);
    };

    // Listeners go in before the freeze so no interrupt can end the process
    // between freeze and thaw.
    let interrupts = arm();
    target.freeze()?;
    tracing::info!(%path, "froze filesystem");

    let held = match interrupts {
        Ok(mut interrupts) => {
            tracing::info!(%path, ?deadline, "holding freeze");
            let outcome = hold(deadline, &mut interrupts).await;
            tracing::info!(%path, ?outcome, "hold released");
            outcome
        }
        Err(source) => {
            tracing::warn!(%path, error = %source, "failed to setup timeout, unfreezing now");
            HoldOutcome::SetupFailed
        }
    };

    target.thaw()?;
    tracing::info!(%path, "unfroze filesystem");
    Ok(Outcome::AutoThawed(held))
}
