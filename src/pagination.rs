//! Incremental reveal of the visible result set.
//!
//! Cards are revealed in fixed-size batches as the user's selection
//! approaches the end of what is already shown. The controller owns a cursor
//! into the current `VisibleSet`; replacing the set zeroes the cursor and
//! bumps a generation counter so that a reveal scheduled against the old set
//! is discarded instead of mixing stale cards into the new view.

use std::ops::Range;
use std::sync::Arc;

use crate::filter::{Card, VisibleSet};

/// Default number of cards revealed per batch.
pub const DEFAULT_BATCH_SIZE: usize = 30;

/// Tracks how much of the visible set has been revealed.
#[derive(Debug)]
pub struct PaginationController {
    set: Arc<VisibleSet>,
    displayed: usize,
    batch_size: usize,
    /// Re-entrancy guard: a reveal in progress suppresses overlapping
    /// reveals triggered by repeated scroll signals.
    busy: bool,
    generation: u64,
}

impl PaginationController {
    pub fn new(batch_size: usize) -> Self {
        Self {
            set: Arc::new(VisibleSet::default()),
            displayed: 0,
            batch_size: batch_size.max(1),
            busy: false,
            generation: 0,
        }
    }

    /// Replaces the tracked result set, zeroing the cursor and invalidating
    /// any reveal pending against the previous set.
    pub fn reset(&mut self, set: VisibleSet) -> u64 {
        self.set = Arc::new(set);
        self.displayed = 0;
        self.busy = false;
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Generation of the currently tracked set. A pending reveal carrying an
    /// older generation is stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts revealing the next batch and sets the busy flag.
    ///
    /// Returns the index range of the newly revealed cards, or `None` when a
    /// reveal is already in progress or the set is exhausted. Exhaustion is
    /// not an error: repeated calls stay safe and reveal nothing twice.
    pub fn begin_reveal(&mut self) -> Option<Range<usize>> {
        if self.busy || !self.has_more() {
            return None;
        }
        self.busy = true;
        let start = self.displayed;
        let end = (start + self.batch_size).min(self.set.len());
        self.displayed = end;
        Some(start..end)
    }

    /// Marks the in-progress reveal as rendered, re-arming the controller.
    pub fn finish_reveal(&mut self) {
        self.busy = false;
    }

    /// Whether unrevealed cards remain.
    pub fn has_more(&self) -> bool {
        self.displayed < self.set.len()
    }

    /// Number of cards currently revealed.
    pub fn displayed(&self) -> usize {
        self.displayed
    }

    /// The cards revealed so far, in order.
    pub fn revealed_cards(&self) -> &[Card] {
        &self.set.cards[..self.displayed]
    }

    /// The full tracked set (for section boundaries such as the favorites
    /// banner length).
    pub fn set(&self) -> &VisibleSet {
        &self.set
    }
}

impl Default for PaginationController {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}
