//! Error types used by the fanvisor runtime and its workers.
//!
//! This module defines two main error enums:
//!
//! - [`RuntimeError`] errors raised by the coordinator itself (config validation, fail-fast).
//! - [`WorkError`] errors raised by a single worker's unit of work.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.

use thiserror::Error;

use crate::work::WorkerId;

/// # Errors produced by the fanvisor runtime.
///
/// These represent failures of a whole run: an invalid configuration rejected
/// before any worker is spawned, or a worker failure that ended the run early.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Delay bounds are inverted (`min > max`).
    #[error("invalid delay bounds: min {min} > max {max}")]
    InvalidBounds {
        /// Lower bound as configured.
        min: u64,
        /// Upper bound as configured.
        max: u64,
    },

    /// A worker failed; the remaining workers were aborted and the channel closed.
    #[error("worker {worker} failed: {error}")]
    WorkerFailed {
        /// Worker that failed first.
        worker: WorkerId,
        /// The underlying work error.
        #[source]
        error: WorkError,
    },

    /// A runtime task could not be joined (it panicked outside of the work body).
    #[error("{context} could not be joined: {reason}")]
    Join {
        /// Which runtime task was lost ("worker", "supervisor").
        context: &'static str,
        /// Join error description.
        reason: String,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use fanvisor::RuntimeError;
    ///
    /// let err = RuntimeError::InvalidBounds { min: 5, max: 1 };
    /// assert_eq!(err.as_label(), "runtime_invalid_bounds");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::InvalidBounds { .. } => "runtime_invalid_bounds",
            RuntimeError::WorkerFailed { .. } => "runtime_worker_failed",
            RuntimeError::Join { .. } => "runtime_join_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::InvalidBounds { min, max } => {
                format!("delay bounds [{min}, {max}] are inverted")
            }
            RuntimeError::WorkerFailed { worker, error } => {
                format!("worker={worker} {}", error.as_message())
            }
            RuntimeError::Join { context, reason } => format!("{context} lost: {reason}"),
        }
    }
}

/// # Errors produced by a worker's unit of work.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WorkError {
    /// Work returned an error.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Work panicked; the panic was caught at the worker boundary.
    #[error("panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl WorkError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use fanvisor::WorkError;
    ///
    /// let err = WorkError::Fail { error: "boom".into() };
    /// assert_eq!(err.as_label(), "work_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkError::Fail { .. } => "work_failed",
            WorkError::Panicked { .. } => "work_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            WorkError::Fail { error } => format!("error: {error}"),
            WorkError::Panicked { info } => format!("panic: {info}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_failed_keeps_source() {
        let err = RuntimeError::WorkerFailed {
            worker: WorkerId::new(2),
            error: WorkError::Fail {
                error: "disk on fire".into(),
            },
        };
        assert_eq!(err.as_label(), "runtime_worker_failed");
        assert_eq!(
            err.to_string(),
            "worker 3 failed: execution failed: disk on fire"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn panicked_message() {
        let err = WorkError::Panicked {
            info: "index out of bounds".into(),
        };
        assert_eq!(err.as_label(), "work_panicked");
        assert_eq!(err.as_message(), "panic: index out of bounds");
    }
}
