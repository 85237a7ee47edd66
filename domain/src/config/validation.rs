//! Configuration issues.
//!
//! Configuration is loaded by the infrastructure layer, but the vocabulary
//! for reporting problems with it is shared by every layer that prints or
//! acts on those problems.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A numeric setting is zero where at least one is required.
    ZeroValue { field: String },
    /// A setting is outside its accepted range or format.
    InvalidValue { field: String, value: String },
    /// `retry.initial_backoff_ms` exceeds `retry.max_backoff_ms`.
    BackoffInverted,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_severity() {
        let e = ConfigIssue::error(ConfigIssueCode::BackoffInverted, "bad");
        assert!(e.is_error());

        let w = ConfigIssue::warning(
            ConfigIssueCode::ZeroValue {
                field: "x".to_string(),
            },
            "meh",
        );
        assert!(!w.is_error());
        assert_eq!(w.message, "meh");
    }
}
