//! In-memory state of one product collection run
//!
//! Owned exclusively by the collection loop. Nothing here is persisted; a
//! crashed run starts again from the first category and only the last
//! progress file survives.

use crate::catalog::ProductRecord;
use crate::state::CategoryPhase;
use crate::{Result, RippleError};

/// Accumulated output of the collection loop
#[derive(Debug, Default)]
pub struct RunState {
    records: Vec<ProductRecord>,
    failed_categories: Vec<String>,
    outcomes: Vec<CategoryPhase>,
    pages_requested: usize,
}

/// Number of categories per terminal phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub exhausted: usize,
    pub limit_reached: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn push_record(&mut self, record: ProductRecord) {
        self.records.push(record);
    }

    /// True once `max_products` records have been collected
    pub fn product_cap_reached(&self, max_products: Option<usize>) -> bool {
        max_products.is_some_and(|max| self.records.len() >= max)
    }

    /// Titles of categories that failed, in the order they failed
    pub fn failed_categories(&self) -> &[String] {
        &self.failed_categories
    }

    pub fn mark_failed(&mut self, title: &str) {
        self.failed_categories.push(title.to_string());
    }

    pub fn note_page_request(&mut self) {
        self.pages_requested += 1;
    }

    /// Catalog page requests issued so far in this run
    pub fn pages_requested(&self) -> usize {
        self.pages_requested
    }

    /// Records the terminal phase of a finished category
    pub fn finish_category(&mut self, phase: CategoryPhase) {
        debug_assert!(phase.is_terminal(), "category finished in {}", phase);
        self.outcomes.push(phase);
    }

    pub fn outcome_counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for phase in &self.outcomes {
            match phase {
                CategoryPhase::Exhausted => counts.exhausted += 1,
                CategoryPhase::LimitReached => counts.limit_reached += 1,
                CategoryPhase::Failed => counts.failed += 1,
                CategoryPhase::Skipped => counts.skipped += 1,
                _ => {}
            }
        }
        counts
    }
}

/// Moves `phase` to `next`, rejecting illegal transitions
pub fn advance(phase: &mut CategoryPhase, next: CategoryPhase) -> Result<()> {
    if !phase.can_transition_to(&next) {
        return Err(RippleError::InvalidTransition {
            from: *phase,
            to: next,
        });
    }
    *phase = next;
    Ok(())
}
