use thiserror::Error;

/// Failure modes of a drill run.
///
/// Running out of line retries is deliberately not in here: that is the
/// `succeeded == false` leg of a [`crate::drill::LineOutcome`], which the
/// passage drill recovers from by retreating a line.
#[derive(Debug, Error)]
pub enum DrillError {
    /// stdin is not attached to an interactive terminal; detected before any
    /// drill runs.
    #[error("this program must be run in a terminal")]
    NotInteractive,

    /// The user pressed the interrupt key mid-drill. Propagates all the way
    /// out so the process can exit quietly with the terminal restored.
    #[error("interrupted")]
    Interrupted,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
