//! Graph builder
//!
//! Places fragments one at a time. A fragment can only wait on fragments
//! placed before it, so the resulting graph is acyclic by construction.

use crate::core::models::{Fragment, FragmentId, PendingFragment, SeedGraph};

/// Incrementally built [`SeedGraph`]
#[derive(Debug, Default)]
pub struct GraphBuilder {
    fragments: Vec<Fragment>,
}

impl GraphBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `fragment` after `predecessors` and return its id
    ///
    /// Predecessors must have been returned by this builder.
    pub fn append_after(
        &mut self,
        fragment: PendingFragment,
        predecessors: impl IntoIterator<Item = FragmentId>,
    ) -> FragmentId {
        let id = FragmentId(self.fragments.len());
        let mut waits_for: Vec<FragmentId> = predecessors.into_iter().collect();
        debug_assert!(waits_for.iter().all(|p| *p < id), "predecessor placed after fragment");
        waits_for.sort_unstable();
        waits_for.dedup();

        self.fragments.push(Fragment {
            id,
            operation: fragment.operation,
            summary: fragment.summary,
            tasks: fragment.tasks,
            waits_for,
        });
        id
    }

    /// Place `chain` as a linear sequence after `after`
    ///
    /// Returns the new tail: the last fragment placed, or `after` if the
    /// chain was empty.
    pub fn append_chain(
        &mut self,
        chain: impl IntoIterator<Item = PendingFragment>,
        after: Option<FragmentId>,
    ) -> Option<FragmentId> {
        chain.into_iter().fold(after, |tail, fragment| Some(self.append_after(fragment, tail)))
    }

    /// Number of fragments placed
    #[must_use]
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether nothing has been placed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Finish building
    #[must_use]
    pub fn finish(self) -> SeedGraph {
        SeedGraph {
            fragments: self.fragments,
        }
    }
}
