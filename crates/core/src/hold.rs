//! Bounded wait used by auto-unfreeze.
//!
//! A hold races a monotonic deadline against the next interrupt. Whichever
//! wins, the deadline is disarmed when the hold returns.

use std::future::{Future, pending};
use std::io;
use std::time::Duration;

use tokio::sync::oneshot;

/// What released a hold early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    /// A process signal, by name.
    Signal(&'static str),
    /// An in-process cancellation.
    Cancelled,
}

/// Why a hold ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldOutcome {
    /// The deadline passed.
    Elapsed,
    /// Something interrupted the wait before the deadline.
    Interrupted(Interrupt),
    /// The wait could not be armed, so nothing was waited for.
    SetupFailed,
}

/// Source of early wake-ups for a hold.
pub trait InterruptSource {
    /// Resolve on the next interrupt.
    fn recv(&mut self) -> impl Future<Output = Interrupt>;
}

/// Wait until `deadline` has passed or `interrupts` fires, whichever is first.
pub async fn hold<I: InterruptSource>(deadline: Duration, interrupts: &mut I) -> HoldOutcome {
    let alarm = tokio::time::sleep(deadline);
    tokio::select! {
        _ = alarm => HoldOutcome::Elapsed,
        interrupt = interrupts.recv() => HoldOutcome::Interrupted(interrupt),
    }
}

/// Termination-style signals delivered to this process.
#[cfg(unix)]
#[derive(Debug)]
pub struct SignalInterrupts {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
    hangup: tokio::signal::unix::Signal,
    quit: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl SignalInterrupts {
    /// Start listening for SIGINT, SIGTERM, SIGHUP and SIGQUIT.
    ///
    /// Must be called from within a tokio runtime.
    pub fn install() -> io::Result<Self> {
        // tokio keeps these handlers registered until exit; the prior disposition is not restored.
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
            hangup: signal(SignalKind::hangup())?,
            quit: signal(SignalKind::quit())?,
        })
    }
}

#[cfg(unix)]
impl InterruptSource for SignalInterrupts {
    async fn recv(&mut self) -> Interrupt {
        let name = tokio::select! {
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
            _ = self.hangup.recv() => "SIGHUP",
            _ = self.quit.recv() => "SIGQUIT",
        };
        Interrupt::Signal(name)
    }
}

#[cfg(not(unix))]
#[derive(Debug)]
pub struct SignalInterrupts;

#[cfg(not(unix))]
impl SignalInterrupts {
    pub fn install() -> io::Result<Self> {
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }
}

#[cfg(not(unix))]
impl InterruptSource for SignalInterrupts {
    async fn recv(&mut self) -> Interrupt {
        pending().await
    }
}

/// Single-slot in-process interrupt, fired through the paired sender.
///
/// Dropping the sender without sending never releases the hold.
#[derive(Debug)]
pub struct Cancellation {
    rx: Option<oneshot::Receiver<()>>,
}

/// Create a cancellation and the sender that fires it.
pub fn cancellation() -> (oneshot::Sender<()>, Cancellation) {
    let (tx, rx) = oneshot::channel();
    (tx, Cancellation { rx: Some(rx) })
}

impl InterruptSource for Cancellation {
    async fn recv(&mut self) -> Interrupt {
        if let Some(rx) = self.rx.take() {
            if rx.await.is_ok() {
                return Interrupt::Cancelled;
            }
        }
        pending().await
    }
}
