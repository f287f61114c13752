//! Literal placeholder substitution.
//!
//! Three fixed, case-sensitive tokens are recognised. Replacement is a single
//! left-to-right pass, so a replacement value that happens to contain a token
//! is inserted verbatim and never re-expanded.

use std::fmt;

use serde::Serialize;

use crate::domain::naming::DerivedIdentifiers;

/// Sigil prefixed to the instance identifier when no other is configured.
pub const DEFAULT_INSTANCE_SIGIL: &str = "$";

/// A placeholder token recognised in substitutable template files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Placeholder {
    ControllerName,
    DatabaseName,
    InstanceName,
}

impl Placeholder {
    pub const ALL: [Placeholder; 3] = [
        Placeholder::ControllerName,
        Placeholder::DatabaseName,
        Placeholder::InstanceName,
    ];

    pub const fn token(&self) -> &'static str {
        match self {
            Self::ControllerName => "%CONTROLLERNAME%",
            Self::DatabaseName => "%DATABASENAME%",
            Self::InstanceName => "%INSTANCENAME%",
        }
    }

    /// Number of occurrences of this token in `text`.
    pub fn count_in(&self, text: &str) -> usize {
        text.matches(self.token()).count()
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Result of substituting one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substituted {
    pub text: String,
    pub replacements: usize,
}

/// The values bound to each placeholder for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenBindings {
    controller: String,
    database: String,
    instance: String,
}

impl TokenBindings {
    /// Bind identifiers, prefixing the instance name with `sigil`.
    ///
    /// An instance name that already starts with the sigil (the user typed
    /// `$shop` while editing) is used as is.
    pub fn new(identifiers: &DerivedIdentifiers, sigil: &str) -> Self {
        let instance = identifiers.instance();
        let instance = if sigil.is_empty() || instance.starts_with(sigil) {
            instance.to_string()
        } else {
            format!("{sigil}{instance}")
        };

        Self {
            controller: identifiers.controller().to_string(),
            database: identifiers.database().to_string(),
            instance,
        }
    }

    pub fn value(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::ControllerName => &self.controller,
            Placeholder::DatabaseName => &self.database,
            Placeholder::InstanceName => &self.instance,
        }
    }

    /// Replace every placeholder occurrence in `text`.
    pub fn apply(&self, text: &str) -> Substituted {
        let mut out = String::with_capacity(text.len());
        let mut replacements = 0;
        let mut rest = text;

        while let Some(pos) = rest.find('%') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos..];

            match Placeholder::ALL.iter().find(|p| tail.starts_with(p.token())) {
                Some(placeholder) => {
                    out.push_str(self.value(*placeholder));
                    rest = &tail[placeholder.token().len()..];
                    replacements += 1;
                }
                None => {
                    out.push('%');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);

        Substituted {
            text: out,
            replacements,
        }
    }
}
