use crate::domain::{error::DomainError, naming::DerivedIdentifiers};

/// Longest database name accepted in strict mode (MySQL's identifier limit).
pub const MAX_DATABASE_NAME_LEN: usize = 64;

/// How strictly identifiers are checked before a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Only reject values that would escape the projects root or produce an
    /// unusable file name.
    #[default]
    Permissive,
    /// Additionally require portable folder names, SQL-safe database names
    /// and a controller name that is a valid class identifier.
    Strict,
}

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across entities.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_identifiers(
        ids: &DerivedIdentifiers,
        mode: ValidationMode,
    ) -> Result<(), DomainError> {
        Self::validate_path_component("folder name", ids.folder())?;
        Self::validate_path_component("controller name", ids.controller())?;
        Self::require_non_empty("database name", ids.database())?;
        Self::require_non_empty("instance name", ids.instance())?;

        if mode == ValidationMode::Strict {
            Self::validate_portable_folder(ids.folder())?;
            Self::validate_database_name(ids.database())?;
            Self::validate_class_name(ids.controller())?;
        }

        Ok(())
    }

    fn require_non_empty(field: &'static str, value: &str) -> Result<(), DomainError> {
        if value.trim().is_empty() {
            return Err(invalid(field, value, "must not be empty"));
        }
        Ok(())
    }

    fn validate_path_component(field: &'static str, value: &str) -> Result<(), DomainError> {
        Self::require_non_empty(field, value)?;

        if value == "." || value == ".." {
            return Err(invalid(field, value, "must not be a relative path marker"));
        }
        if value.contains(['/', '\\', '\0']) {
            return Err(invalid(field, value, "must not contain path separators"));
        }
        Ok(())
    }

    fn validate_portable_folder(value: &str) -> Result<(), DomainError> {
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(invalid(
                "folder name",
                value,
                "only ASCII letters, digits, '_' and '-' are allowed",
            ));
        }
        Ok(())
    }

    fn validate_database_name(value: &str) -> Result<(), DomainError> {
        if value.len() > MAX_DATABASE_NAME_LEN {
            return Err(invalid(
                "database name",
                value,
                &format!("must be at most {MAX_DATABASE_NAME_LEN} characters"),
            ));
        }
        if !is_identifier(value) {
            return Err(invalid(
                "database name",
                value,
                "must start with a letter or '_' and contain only ASCII letters, digits and '_'",
            ));
        }
        Ok(())
    }

    fn validate_class_name(value: &str) -> Result<(), DomainError> {
        if !is_identifier(value) {
            return Err(invalid(
                "controller name",
                value,
                "must be a valid class identifier",
            ));
        }
        Ok(())
    }
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && (s.as_bytes()[0].is_ascii_alphabetic() || s.as_bytes()[0] == b'_')
        && s.as_bytes()[1..]
            .iter()
            .all(|&ch| ch.is_ascii_alphanumeric() || ch == b'_')
}

fn invalid(field: &'static str, value: &str, reason: &str) -> DomainError {
    DomainError::InvalidIdentifier {
        field,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
