// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports and logs hold copies)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid application name '{input}': it must contain at least one word")]
    InvalidName { input: String },

    #[error("Invalid {field} '{value}': {reason}")]
    InvalidIdentifier {
        field: &'static str,
        value: String,
        reason: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("Invalid template manifest: {0}")]
    InvalidManifest(String),
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidName { .. } => vec![
                "Enter a name with at least one non-whitespace word".into(),
                "Example: projgen new \"My Shop\"".into(),
            ],
            Self::InvalidIdentifier { field, reason, .. } => vec![
                format!("The {} was rejected: {}", field, reason),
                "Edit the value or re-derive it from the application name".into(),
            ],
            Self::InvalidManifest(msg) => vec![
                format!("Manifest problem: {}", msg),
                "Every template entry must live in a skeleton directory".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidName { .. } | Self::InvalidIdentifier { .. } => {
                ErrorCategory::Validation
            }
            Self::InvalidManifest(_) => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Internal,
}
