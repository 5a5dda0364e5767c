//! Error type shared across the crate.

/// Errors raised by the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TspError {
    /// A construction parameter is out of range. Raised before any worker starts.
    #[error("InvalidConfiguration: {reason}")]
    InvalidConfiguration { reason: String },

    /// A tour's total distance is zero, so its fitness is undefined.
    #[error("DegenerateTour: tour has zero total distance (distance = {distance})")]
    DegenerateTour { distance: f64 },

    /// `run` was called on an engine that already ran.
    #[error("AlreadyStarted: an engine executes exactly one run")]
    AlreadyStarted,

    /// The worker task panicked before it could finish.
    #[error("WorkerAborted: {reason}")]
    WorkerAborted { reason: String },
}

impl TspError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(distance: f64) -> Self {
        Self::DegenerateTour { distance }
    }

    pub(crate) fn aborted(reason: impl Into<String>) -> Self {
        Self::WorkerAborted {
            reason: reason.into(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TspError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_variant() {
        let err = TspError::invalid("population_size must be at least 1");
        assert_eq!(
            err.to_string(),
            "InvalidConfiguration: population_size must be at least 1"
        );
        assert!(TspError::degenerate(0.0)
            .to_string()
            .starts_with("DegenerateTour"));
        assert!(TspError::aborted("boom").to_string().contains("boom"));
    }
}
