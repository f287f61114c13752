//! Name derivation: one free-text application name, three identifier forms.
//!
//! # Casing rules
//!
//! The raw name is split on whitespace. Runs of whitespace act as a single
//! delimiter and leading/trailing whitespace is dropped.
//!
//! | Form       | Rule                                               | `"My Shop"` |
//! |------------|----------------------------------------------------|-------------|
//! | controller | first code point upper-cased, rest kept, no sep    | `MyShop`    |
//! | machine    | whole word lower-cased, joined with `_`            | `my_shop`   |
//! | instance   | first word lower-first, later words upper-first    | `myShop`    |
//!
//! Only the first code point of each word is touched by the controller and
//! instance forms, so `"iPhone app"` becomes `IPhoneApp` and `iPhoneApp`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Split a raw name into its non-empty whitespace-delimited words.
pub fn tokenize(raw: &str) -> Vec<&str> {
    raw.split_whitespace().collect()
}

/// PascalCase join: `["my", "shop"]` → `MyShop`.
pub fn to_controller_identifier<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens.iter().map(|t| upper_first(t.as_ref())).collect()
}

/// Lower-cased words joined with `_`: `["My", "Shop"]` → `my_shop`.
pub fn to_machine_identifier<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .map(|t| t.as_ref().to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// camelCase join: `["My", "shop"]` → `myShop`.
pub fn to_instance_identifier<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i == 0 {
            out.push_str(&lower_first(token.as_ref()));
        } else {
            out.push_str(&upper_first(token.as_ref()));
        }
    }
    out
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ── ApplicationName ───────────────────────────────────────────────────────────

/// A raw application name that tokenizes to at least one word.
///
/// Invariant: `tokens` is never empty. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationName {
    raw: String,
    tokens: Vec<String>,
}

impl ApplicationName {
    /// Parse a raw name, rejecting empty and whitespace-only input.
    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        let tokens: Vec<String> = tokenize(&raw).into_iter().map(String::from).collect();

        if tokens.is_empty() {
            return Err(DomainError::InvalidName { input: raw });
        }

        Ok(Self { raw, tokens })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn controller_identifier(&self) -> String {
        to_controller_identifier(&self.tokens)
    }

    pub fn machine_identifier(&self) -> String {
        to_machine_identifier(&self.tokens)
    }

    pub fn instance_identifier(&self) -> String {
        to_instance_identifier(&self.tokens)
    }

    /// Derive the full identifier set.
    pub fn derive(&self) -> DerivedIdentifiers {
        DerivedIdentifiers::from(self)
    }
}

impl fmt::Display for ApplicationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ── DerivedIdentifiers ────────────────────────────────────────────────────────

/// The identifier set that drives one generation run.
///
/// Folder and database names start out equal (both are the machine
/// identifier) but are separate fields so either can be edited or validated
/// on its own terms. Values are immutable; the `with_*` methods return an
/// edited copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedIdentifiers {
    controller: String,
    folder: String,
    database: String,
    instance: String,
}

impl DerivedIdentifiers {
    /// Build an identifier set from explicit values.
    pub fn new(
        controller: impl Into<String>,
        folder: impl Into<String>,
        database: impl Into<String>,
        instance: impl Into<String>,
    ) -> Self {
        Self {
            controller: controller.into(),
            folder: folder.into(),
            database: database.into(),
            instance: instance.into(),
        }
    }

    /// Parse `raw` and derive all identifiers from it.
    pub fn from_name(raw: &str) -> Result<Self, DomainError> {
        ApplicationName::parse(raw).map(|name| name.derive())
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn with_controller(mut self, value: impl Into<String>) -> Self {
        self.controller = value.into();
        self
    }

    pub fn with_folder(mut self, value: impl Into<String>) -> Self {
        self.folder = value.into();
        self
    }

    pub fn with_database(mut self, value: impl Into<String>) -> Self {
        self.database = value.into();
        self
    }

    pub fn with_instance(mut self, value: impl Into<String>) -> Self {
        self.instance = value.into();
        self
    }
}

impl From<&ApplicationName> for DerivedIdentifiers {
    fn from(name: &ApplicationName) -> Self {
        let machine = name.machine_identifier();
        Self {
            controller: name.controller_identifier(),
            folder: machine.clone(),
            database: machine,
            instance: name.instance_identifier(),
        }
    }
}

impl fmt::Display for DerivedIdentifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "controller={} folder={} database={} instance={}",
            self.controller, self.folder, self.database, self.instance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn derive(raw: &str) -> DerivedIdentifiers {
        DerivedIdentifiers::from_name(raw).unwrap()
    }

    #[test]
    fn two_word_name() {
        let ids = derive("My Shop");
        assert_eq!(ids.controller(), "MyShop");
        assert_eq!(ids.folder(), "my_shop");
        assert_eq!(ids.database(), "my_shop");
        assert_eq!(ids.instance(), "myShop");
    }

    #[test]
    fn single_word_name() {
        let ids = derive("blog");
        assert_eq!(ids.controller(), "Blog");
        assert_eq!(ids.folder(), "blog");
        assert_eq!(ids.instance(), "blog");
    }

    #[test]
    fn empty_and_blank_names_are_rejected() {
        for raw in ["", "   ", "\t\n"] {
            assert!(matches!(
                ApplicationName::parse(raw),
                Err(DomainError::InvalidName { .. })
            ));
        }
    }

    #[test]
    fn whitespace_runs_collapse() {
        let name = ApplicationName::parse("  my \t  little\nshop ").unwrap();
        assert_eq!(name.tokens(), ["my", "little", "shop"]);
        assert_eq!(name.controller_identifier(), "MyLittleShop");
        assert_eq!(name.machine_identifier(), "my_little_shop");
        assert_eq!(name.instance_identifier(), "myLittleShop");
    }

    #[test]
    fn only_first_code_point_changes_case() {
        let ids = derive("iPhone APP store");
        assert_eq!(ids.controller(), "IPhoneAPPStore");
        assert_eq!(ids.instance(), "iPhoneAPPStore");
        assert_eq!(ids.database(), "iphone_app_store");
    }

    #[test]
    fn non_ascii_first_letters() {
        let ids = derive("élan vital");
        assert_eq!(ids.controller(), "ÉlanVital");
        assert_eq!(ids.instance(), "élanVital");
        assert_eq!(ids.folder(), "élan_vital");
    }

    #[test]
    fn leading_digit_is_kept() {
        let ids = derive("2nd hand");
        assert_eq!(ids.controller(), "2ndHand");
        assert_eq!(ids.instance(), "2ndHand");
    }

    #[test]
    fn controller_has_no_whitespace_and_upper_token_starts() {
        for raw in ["a b c", "hello   world", "x", "mixed Case words here"] {
            let name = ApplicationName::parse(raw).unwrap();
            let controller = name.controller_identifier();
            assert!(!controller.chars().any(char::is_whitespace));

            let mut offset = 0;
            for token in name.tokens() {
                let first = controller[offset..].chars().next().unwrap();
                assert!(first.is_uppercase(), "{raw}: token {token}");
                offset += token.len();
            }
        }
    }

    #[test]
    fn machine_identifier_is_stable_under_rederivation() {
        for raw in ["My Shop", "Some_Thing Else", "ALL CAPS", "_lead trail_"] {
            let machine = ApplicationName::parse(raw).unwrap().machine_identifier();
            assert_eq!(machine, machine.to_lowercase());

            let resplit: Vec<&str> = machine.split('_').collect();
            assert_eq!(to_machine_identifier(&resplit), machine);
        }
    }

    #[test]
    fn instance_starts_lower_then_upper_token_starts() {
        let name = ApplicationName::parse("Order Book Service").unwrap();
        let instance = name.instance_identifier();
        assert_eq!(instance, "orderBookService");
        assert!(instance.starts_with(|c: char| c.is_lowercase()));
    }

    #[test]
    fn edits_return_new_values() {
        let ids = derive("My Shop").with_database("shop_db");
        assert_eq!(ids.database(), "shop_db");
        assert_eq!(ids.folder(), "my_shop");
    }
}
