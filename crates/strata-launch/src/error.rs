//! Error types for the launch domain.

/// The result type used throughout strata-launch.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while deciding and issuing a launch.
///
/// Every variant is terminal for the current launch attempt; nothing here
/// is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No partition set could be resolved for the job.
    #[error("unable to find partition set on {job_name}: {detail}")]
    PartitionSetNotFound {
        /// The job whose partition set lookup failed.
        job_name: String,
        /// Detail from the service, or a placeholder when none was provided.
        detail: String,
    },

    /// A query returned an error-typed payload or failed at the transport level.
    #[error("remote error during {operation}: {detail}")]
    Remote {
        /// The operation that failed (e.g. "load partition tags").
        operation: String,
        /// The underlying error detail.
        detail: String,
    },

    /// The mutation succeeded at the transport level but returned a failure variant.
    #[error("launch rejected: {detail}")]
    LaunchRejected {
        /// The failure detail reported by the orchestration service.
        detail: String,
    },

    /// A launch is already in flight for this session.
    #[error("a launch is already in progress for this session")]
    LaunchInProgress,

    /// The run configuration document could not be used.
    #[error("invalid run configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration problem.
        message: String,
    },

    /// The selection cannot be launched (e.g. nothing selected).
    #[error("invalid selection: {message}")]
    InvalidSelection {
        /// Description of the selection problem.
        message: String,
    },
}

impl Error {
    /// Creates a remote error for a named operation.
    #[must_use]
    pub fn remote(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Remote {
            operation: operation.into(),
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display_names_the_job() {
        let err = Error::PartitionSetNotFound {
            job_name: "analytics_job".into(),
            detail: "no details provided".into(),
        };
        assert!(err.to_string().contains("analytics_job"));
    }

    #[test]
    fn remote_display_names_the_operation() {
        let err = Error::remote("load partition tags", "boom");
        let msg = err.to_string();
        assert!(msg.contains("load partition tags"));
        assert!(msg.contains("boom"));
    }
}
