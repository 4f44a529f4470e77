use std::fmt;

/// Machine-readable error codes surfaced by the CLI and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    LengthMismatch,
    NonFiniteValue,
    SelectionSizeOutOfRange,
    InvalidConfig,
    ConfigParseError,
    BackendUnavailable,
    BackendTimeout,
    BackendFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::LengthMismatch => "E1001",
            Self::NonFiniteValue => "E1002",
            Self::SelectionSizeOutOfRange => "E1003",
            Self::InvalidConfig => "E2001",
            Self::ConfigParseError => "E2002",
            Self::BackendUnavailable => "E3001",
            Self::BackendTimeout => "E3002",
            Self::BackendFailed => "E3003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::LengthMismatch => "Input arrays have mismatched lengths",
            Self::NonFiniteValue => "Input contains NaN or infinite values",
            Self::SelectionSizeOutOfRange => "Selection size K is larger than the candidate set",
            Self::InvalidConfig => "Invalid selection configuration",
            Self::ConfigParseError => "Config file parse error",
            Self::BackendUnavailable => "QUBO backend unavailable",
            Self::BackendTimeout => "QUBO backend timed out",
            Self::BackendFailed => "QUBO backend failed",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::LengthMismatch => {
                Some("Pass one relevance, freshness, embedding and intent entry per candidate.")
            }
            Self::NonFiniteValue => Some("Replace NaN/Inf scores before selection."),
            Self::SelectionSizeOutOfRange => Some("Lower `k` or supply more candidates."),
            Self::InvalidConfig => Some("Weights must be finite and `qaoa_reps` at least 1."),
            Self::ConfigParseError => Some("Fix syntax in qhive.toml and retry."),
            Self::BackendUnavailable | Self::BackendTimeout | Self::BackendFailed => {
                Some("Selection fell back to the classical solver; no action required.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Validation failures. Always raised before any solving starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    /// A positional array does not match the candidate count.
    #[error("{what} has length {got}, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// A score, embedding or intent value is NaN or infinite.
    #[error("{what}[{index}] is not finite")]
    NonFinite { what: &'static str, index: usize },

    /// `k` exceeds the number of candidates.
    #[error("selection size k={k} is outside [0, {n}]")]
    SelectionSizeOutOfRange { k: usize, n: usize },

    /// A configuration field holds an unusable value.
    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

impl InputError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::LengthMismatch { .. } => ErrorCode::LengthMismatch,
            Self::NonFinite { .. } => ErrorCode::NonFiniteValue,
            Self::SelectionSizeOutOfRange { .. } => ErrorCode::SelectionSizeOutOfRange,
            Self::InvalidConfig { .. } => ErrorCode::InvalidConfig,
        }
    }
}

/// Failures reported by a [`QuboBackend`](crate::backend::QuboBackend).
///
/// None of these reach the caller of the selection API: the adapter turns
/// every terminal backend error into a classical fallback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The capability is not installed or not configured.
    #[error("backend `{0}` is not available")]
    Unavailable(String),

    /// The problem has more variables than the backend accepts.
    #[error("problem has {variables} variables, backend limit is {limit}")]
    TooLarge { variables: usize, limit: usize },

    /// The attempt ran past its deadline.
    #[error("backend exceeded its deadline")]
    Timeout,

    /// A failure worth retrying.
    #[error("transient backend failure: {0}")]
    Transient(String),

    /// The backend returned an assignment of the wrong width.
    #[error("backend returned {got} variables, expected {expected}")]
    MalformedAssignment { expected: usize, got: usize },
}

impl BackendError {
    /// Whether the adapter should try the same backend again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Unavailable(_) => ErrorCode::BackendUnavailable,
            Self::Timeout => ErrorCode::BackendTimeout,
            Self::TooLarge { .. } | Self::Transient(_) | Self::MalformedAssignment { .. } => {
                ErrorCode::BackendFailed
            }
        }
    }
}

pub(crate) fn ensure_len(what: &'static str, expected: usize, got: usize) -> Result<(), InputError> {
    if expected == got {
        Ok(())
    } else {
        Err(InputError::LengthMismatch {
            what,
            expected,
            got,
        })
    }
}

pub(crate) fn ensure_finite(what: &'static str, values: &[f64]) -> Result<(), InputError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(InputError::NonFinite { what, index }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::LengthMismatch,
            ErrorCode::NonFiniteValue,
            ErrorCode::SelectionSizeOutOfRange,
            ErrorCode::InvalidConfig,
            ErrorCode::ConfigParseError,
            ErrorCode::BackendUnavailable,
            ErrorCode::BackendTimeout,
            ErrorCode::BackendFailed,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::SelectionSizeOutOfRange.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn only_transient_errors_retry() {
        assert!(BackendError::Transient("flaky".into()).is_retryable());
        assert!(!BackendError::Timeout.is_retryable());
        assert!(!BackendError::Unavailable("null".into()).is_retryable());
        assert!(!BackendError::TooLarge {
            variables: 30,
            limit: 20
        }
        .is_retryable());
    }

    #[test]
    fn ensure_finite_reports_first_bad_index() {
        let err = ensure_finite("relevance", &[0.1, f64::NAN, f64::INFINITY]).unwrap_err();
        assert_eq!(
            err,
            InputError::NonFinite {
                what: "relevance",
                index: 1
            }
        );
        assert_eq!(err.code(), ErrorCode::NonFiniteValue);
    }

    #[test]
    fn length_mismatch_message_names_the_array() {
        let err = ensure_len("freshness", 4, 3).unwrap_err();
        assert_eq!(err.to_string(), "freshness has length 3, expected 4");
    }
}
