//! Assertion model
//!
//! An assertion is a signed, typed statement. Only its headers matter here:
//! signature checking happens before assertions ever reach this crate.
//!
//! # Examples
//!
//! ```
//! use seedgraph::core::models::{Assertion, AssertionType};
//!
//! let a: Assertion = serde_json::from_str(
//!     r#"{"type": "account", "account-id": "acme", "display-name": "ACME"}"#,
//! ).unwrap();
//! assert_eq!(a.assertion_type, AssertionType::Account);
//! assert_eq!(a.reference().unwrap().unique(), "account/acme");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while interpreting assertion headers
#[derive(Debug, Error)]
pub enum AssertionError {
    /// A primary key header is missing
    #[error("{assertion_type} assertion is missing primary key header {header:?}")]
    MissingPrimaryKey {
        /// Type of the offending assertion
        assertion_type: AssertionType,
        /// Header name
        header: &'static str,
    },

    /// A primary key header is present but not a non-empty string
    #[error("{assertion_type} assertion header {header:?} must be a non-empty string")]
    InvalidPrimaryKey {
        /// Type of the offending assertion
        assertion_type: AssertionType,
        /// Header name
        header: &'static str,
    },

    /// The `revision` header is present but not a non-negative integer
    #[error("{assertion_type} assertion header \"revision\" must be a non-negative integer")]
    InvalidRevision {
        /// Type of the offending assertion
        assertion_type: AssertionType,
    },

    /// Headers could not be decoded into the expected shape
    #[error("invalid {assertion_type} assertion headers: {source}")]
    InvalidHeaders {
        /// Type of the offending assertion
        assertion_type: AssertionType,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },

    /// The assertion is not of the expected type
    #[error("expected {expected} assertion, got {actual}")]
    WrongType {
        /// Expected type
        expected: AssertionType,
        /// Actual type
        actual: AssertionType,
    },
}

/// Kinds of assertion understood by the importer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssertionType {
    /// An account (brand or publisher)
    Account,
    /// A public key belonging to an account
    AccountKey,
    /// The device model descriptor
    Model,
    /// Binds a package id to its name and publisher
    PackageDeclaration,
    /// Binds a package file digest to a package id and revision
    PackageRevision,
}

impl AssertionType {
    /// Header names forming the primary key, in order
    #[must_use]
    pub const fn primary_key(self) -> &'static [&'static str] {
        match self {
            Self::Account => &["account-id"],
            Self::AccountKey => &["public-key-id"],
            Self::Model => &["series", "brand-id", "model"],
            Self::PackageDeclaration => &["series", "package-id"],
            Self::PackageRevision => &["package-digest"],
        }
    }

    /// Wire name of this type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::AccountKey => "account-key",
            Self::Model => "model",
            Self::PackageDeclaration => "package-declaration",
            Self::PackageRevision => "package-revision",
        }
    }
}

impl fmt::Display for AssertionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded assertion: its type plus all remaining headers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    /// Assertion type
    #[serde(rename = "type")]
    pub assertion_type: AssertionType,

    /// All other headers, keyed by header name
    #[serde(flatten)]
    pub headers: BTreeMap<String, Value>,
}

impl Assertion {
    /// Build an assertion from a type and string headers
    #[must_use]
    pub fn new<'a>(
        assertion_type: AssertionType,
        headers: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Self {
        Self {
            assertion_type,
            headers: headers.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }

    /// Get a header as a string, if present and a string
    #[must_use]
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(Value::as_str)
    }

    /// The `revision` header, defaulting to 0 when absent
    pub fn revision(&self) -> Result<u64, AssertionError> {
        match self.headers.get("revision") {
            None => Ok(0),
            Some(value) => value.as_u64().ok_or(AssertionError::InvalidRevision {
                assertion_type: self.assertion_type,
            }),
        }
    }

    /// Compute the reference identifying this assertion
    ///
    /// Also rejects a malformed `revision`, so anything with a reference can
    /// take part in revision merging.
    pub fn reference(&self) -> Result<AssertionRef, AssertionError> {
        self.revision()?;
        let mut primary_key = Vec::new();
        for &header in self.assertion_type.primary_key() {
            let value = self.headers.get(header).ok_or(AssertionError::MissingPrimaryKey {
                assertion_type: self.assertion_type,
                header,
            })?;
            match value.as_str() {
                Some(s) if !s.is_empty() => primary_key.push(s.to_string()),
                _ => {
                    return Err(AssertionError::InvalidPrimaryKey {
                        assertion_type: self.assertion_type,
                        header,
                    });
                },
            }
        }
        Ok(AssertionRef {
            assertion_type: self.assertion_type,
            primary_key,
        })
    }
}

/// Opaque identifier of an assertion within a trust store
///
/// Two references denote the same assertion iff their [`unique`](Self::unique)
/// keys are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssertionRef {
    /// Assertion type
    pub assertion_type: AssertionType,
    /// Primary key values, in [`AssertionType::primary_key`] order
    pub primary_key: Vec<String>,
}

impl AssertionRef {
    /// Create a reference from a type and primary key values
    #[must_use]
    pub fn new(assertion_type: AssertionType, primary_key: &[&str]) -> Self {
        Self {
            assertion_type,
            primary_key: primary_key.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Identity key: type followed by the primary key, `/`-separated
    #[must_use]
    pub fn unique(&self) -> String {
        let mut key = self.assertion_type.as_str().to_string();
        for part in &self.primary_key {
            key.push('/');
            key.push_str(part);
        }
        key
    }
}

impl fmt::Display for AssertionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.assertion_type, self.primary_key)
    }
}
