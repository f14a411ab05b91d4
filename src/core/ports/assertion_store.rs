//! Assertion store port
//!
//! Defines the interface to the trusted assertion database.

use thiserror::Error;

use crate::core::models::{Assertion, AssertionRef};

/// Errors returned by an assertion store
#[derive(Debug, Error)]
pub enum StoreError {
    /// No assertion with this reference is stored
    #[error("{0} not found")]
    NotFound(AssertionRef),

    /// An incoming assertion clashes with a stored one of the same identity
    #[error("cannot add {reference}: conflicts with revision {existing} already present")]
    Conflict {
        /// Clashing assertion
        reference: AssertionRef,
        /// Revision of the assertion already present
        existing: u64,
    },

    /// An incoming assertion is malformed
    #[error(transparent)]
    Invalid(#[from] crate::core::models::AssertionError),

    /// Backend failure
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    /// Whether this is a not-found error
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Trusted assertion database
pub trait AssertionStore: Send + Sync {
    /// Add a set of assertions, all or nothing
    ///
    /// Either every assertion becomes visible, or the store is left exactly
    /// as it was and an error is returned.
    fn commit(&self, assertions: &[Assertion]) -> Result<(), StoreError>;

    /// Look up a committed assertion
    fn find(&self, reference: &AssertionRef) -> Result<Assertion, StoreError>;
}
