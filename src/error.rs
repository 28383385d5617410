use std::fmt;

/// Errors surfaced by the dashboard pipeline.
///
/// Empty aggregations are not errors: mean-style metrics return `None` and the
/// presentation layer renders a placeholder instead.
#[derive(Debug)]
pub enum DashboardError {
    /// Bad generation parameters or out-of-range values in a loaded dataset
    InvalidArgument(String),

    /// Aggregation requested for a teacher with no records in the current filter
    NotFound(String),

    /// Configuration file could not be read or parsed
    Config(String),

    /// IO error (export file, config file)
    Io(std::io::Error),

    /// CSV read/write error
    Csv(csv::Error),

    /// JSON serialization error
    Serialization(serde_json::Error),
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            DashboardError::NotFound(what) => write!(f, "Not found: {what}"),
            DashboardError::Config(msg) => write!(f, "Configuration error: {msg}"),
            DashboardError::Io(err) => write!(f, "IO error: {err}"),
            DashboardError::Csv(err) => write!(f, "CSV error: {err}"),
            DashboardError::Serialization(err) => write!(f, "Serialization error: {err}"),
        }
    }
}

impl std::error::Error for DashboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DashboardError::Io(err) => Some(err),
            DashboardError::Csv(err) => Some(err),
            DashboardError::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Io(err)
    }
}

impl From<csv::Error> for DashboardError {
    fn from(err: csv::Error) -> Self {
        DashboardError::Csv(err)
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Serialization(err)
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn display_names_the_error_kind() {
        let err = DashboardError::NotFound("teacher 'Ghost'".to_string());
        assert_eq!(format!("{err}"), "Not found: teacher 'Ghost'");

        let err = DashboardError::InvalidArgument("count must be >= 0".to_string());
        assert_eq!(format!("{err}"), "Invalid argument: count must be >= 0");
    }

    #[test]
    fn io_errors_keep_their_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked");
        let err = DashboardError::from(io);
        assert!(matches!(err, DashboardError::Io(_)));
        assert!(err.source().is_some());
        assert!(DashboardError::Config("x".into()).source().is_none());
    }
}
