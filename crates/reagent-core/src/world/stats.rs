//! Simulation statistics collection trait

/// Trait for collecting simulation statistics
///
/// Lets the engine report what happened during a tick without owning any
/// counters itself.
pub trait SimStats {
    /// Record that a cell swapped places during a pass
    fn record_cell_moved(&mut self);

    /// Record that a reaction fired
    fn record_reaction(&mut self);

    /// Record a swap refused because a cell already moved this tick
    fn record_blocked_swap(&mut self) {}
}

/// A no-op implementation for when stats collection is not needed
#[derive(Default)]
pub struct NoopStats;

impl SimStats for NoopStats {
    fn record_cell_moved(&mut self) {}
    fn record_reaction(&mut self) {}
}

/// Plain counters, reset by the caller between ticks if needed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickStats {
    pub cells_moved: u64,
    pub reactions: u64,
    pub blocked_swaps: u64,
}

impl TickStats {
    /// Total grid mutations (moves plus reactions)
    pub fn mutations(&self) -> u64 {
        self.cells_moved + self.reactions
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl SimStats for TickStats {
    fn record_cell_moved(&mut self) {
        self.cells_moved += 1;
    }

    fn record_reaction(&mut self) {
        self.reactions += 1;
    }

    fn record_blocked_swap(&mut self) {
        self.blocked_swaps += 1;
    }
}
