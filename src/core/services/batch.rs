//! Assertion batch
//!
//! Accumulates assertions decoded from seed streams so they can be committed
//! to the store in one all-or-nothing step.

use std::collections::HashMap;
use std::io::{BufReader, Read};

use log::debug;
use thiserror::Error;

use crate::core::models::{Assertion, AssertionError, AssertionRef};
use crate::core::ports::{AssertionStore, StoreError};

/// Errors raised while adding a stream to a batch
#[derive(Debug, Error)]
pub enum BatchError {
    /// The stream is not a sequence of well-formed assertions
    #[error("cannot decode assertion stream: {0}")]
    Decode(#[from] serde_json::Error),

    /// An assertion lacks its identity headers
    #[error(transparent)]
    Invalid(#[from] AssertionError),

    /// Two assertions with the same identity disagree
    #[error(transparent)]
    Conflict(StoreError),
}

/// How an incoming assertion relates to one already held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merge {
    /// Nothing with this identity is held yet
    Insert,
    /// Identical or older than what is held; nothing to do
    Keep,
    /// Newer revision of what is held
    Replace,
}

/// Decide how to merge `incoming` over `existing`
///
/// Identical re-adds and older revisions are ignored, newer revisions win,
/// and a different assertion at the same revision is a conflict.
pub fn merge(
    existing: Option<&Assertion>,
    incoming: &Assertion,
    reference: &AssertionRef,
) -> Result<Merge, StoreError> {
    let Some(existing) = existing else {
        return Ok(Merge::Insert);
    };
    if existing == incoming {
        return Ok(Merge::Keep);
    }
    let held = existing.revision()?;
    match incoming.revision()?.cmp(&held) {
        std::cmp::Ordering::Greater => Ok(Merge::Replace),
        std::cmp::Ordering::Less => Ok(Merge::Keep),
        std::cmp::Ordering::Equal => Err(StoreError::Conflict {
            reference: reference.clone(),
            existing: held,
        }),
    }
}

/// Uncommitted set of assertions
#[derive(Debug, Clone, Default)]
pub struct AssertionBatch {
    pending: Vec<Assertion>,
    index: HashMap<String, usize>,
}

impl AssertionBatch {
    /// Create an empty batch
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every assertion in `reader` and add it to the batch
    ///
    /// Returns a reference for each assertion read, in stream order. The
    /// stream is consumed to the end; if any part of it fails to decode the
    /// batch is left unchanged.
    pub fn add_stream<R: Read>(&mut self, reader: R) -> Result<Vec<AssertionRef>, BatchError> {
        let mut decoded = Vec::new();
        let stream = serde_json::Deserializer::from_reader(BufReader::new(reader));
        for item in stream.into_iter::<Assertion>() {
            let assertion = item?;
            let reference = assertion.reference()?;
            decoded.push((reference, assertion));
        }

        let mut pending = self.pending.clone();
        let mut index = self.index.clone();
        let mut refs = Vec::with_capacity(decoded.len());
        for (reference, assertion) in decoded {
            let key = reference.unique();
            let slot = index.get(&key).copied();
            match merge(slot.map(|i| &pending[i]), &assertion, &reference)
                .map_err(BatchError::Conflict)?
            {
                Merge::Insert => {
                    index.insert(key, pending.len());
                    pending.push(assertion);
                },
                Merge::Replace => {
                    if let Some(i) = slot {
                        pending[i] = assertion;
                    }
                },
                Merge::Keep => debug!("ignoring duplicate assertion {key}"),
            }
            refs.push(reference);
        }

        self.pending = pending;
        self.index = index;
        Ok(refs)
    }

    /// Get a pending assertion by reference
    #[must_use]
    pub fn get(&self, reference: &AssertionRef) -> Option<&Assertion> {
        self.index.get(&reference.unique()).map(|&i| &self.pending[i])
    }

    /// Number of distinct assertions held
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether the batch is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Commit all pending assertions to `store` in one step
    pub fn commit(self, store: &dyn AssertionStore) -> Result<(), StoreError> {
        debug!("committing {} assertions", self.pending.len());
        store.commit(&self.pending)
    }
}
